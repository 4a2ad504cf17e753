use crate::error::{Error, Result};
use moon_compiler::{CodegenOptions, RuntimeNames};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// File name of the per-project configuration.
pub const PROJECT_CONFIG_FILE: &str = "moon.json";

/// Runtime configuration for the moonc CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Explicit project config file; `moon.json` in `cwd` otherwise.
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
            config_path: None,
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    /// Set an explicit project config file.
    #[must_use]
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Resolve a possibly relative path against `cwd`.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Load the project config.
    ///
    /// A missing `moon.json` in `cwd` means defaults; a missing file given
    /// explicitly is an error.
    pub fn load_project(&self) -> Result<ProjectConfig> {
        match &self.config_path {
            Some(path) => ProjectConfig::load(&self.resolve(path)),
            None => ProjectConfig::load_or_default(&self.cwd.join(PROJECT_CONFIG_FILE)),
        }
    }
}

/// Per-project settings read from `moon.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectConfig {
    /// Names the generated code calls into.
    pub runtime: RuntimeConfig,

    /// File extensions `build` compiles, without the dot.
    pub extensions: Vec<String>,

    /// Directory compiled files are written to, mirroring the source tree.
    /// Next to each source file when unset.
    pub out_dir: Option<PathBuf>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig::default(),
            extensions: vec!["moon".to_string()],
            out_dir: None,
        }
    }
}

/// Runtime name overrides; unset names keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RuntimeConfig {
    pub components: Option<String>,
    pub normalize_children: Option<String>,
    pub merge: Option<String>,
}

impl RuntimeConfig {
    #[must_use]
    pub fn names(&self) -> RuntimeNames {
        let defaults = RuntimeNames::default();
        RuntimeNames {
            components: self.components.clone().unwrap_or(defaults.components),
            normalize_children: self
                .normalize_children
                .clone()
                .unwrap_or(defaults.normalize_children),
            merge: self.merge.clone().unwrap_or(defaults.merge),
        }
    }
}

impl ProjectConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(path, &content)?;
        tracing::debug!(path = %path.display(), "loaded project config");
        Ok(config)
    }

    /// Like [`ProjectConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(Error::ConfigRead { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Code generation options for this project.
    #[must_use]
    pub fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions::default().with_runtime(self.runtime.names())
    }

    /// Whether `path` has one of the configured extensions.
    #[must_use]
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|wanted| wanted == ext))
    }
}
