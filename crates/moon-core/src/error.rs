use moon_compiler::CompileError;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for moonc operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Syntax {
        path: PathBuf,
        /// The text that failed to compile, for rendering the report.
        input: String,
        #[source]
        source: CompileError,
    },

    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output path {path} would overwrite its input")]
    OutputIsInput { path: PathBuf },

    #[error("Failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("{0}")]
    Other(String),
}

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// The compile error behind a syntax failure.
    #[must_use]
    pub fn as_syntax(&self) -> Option<(&std::path::Path, &str, &CompileError)> {
        match self {
            Self::Syntax {
                path,
                input,
                source,
            } => Some((path.as_path(), input.as_str(), source)),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
