//! Version metadata reported by `moonc version`.

use serde::Serialize;
use std::fmt;

/// Crate version, taken from the workspace manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shape version of every JSON document the CLI prints on stdout.
pub const OUTPUT_SCHEMA_VERSION: u32 = 1;

/// What `moonc version` reports, in both output modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub schema_version: u32,
    pub name: &'static str,
    pub version: &'static str,
    /// Commit the binary was built from, when the build exported
    /// `MOONC_BUILD_GIT_HASH`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_hash: Option<&'static str>,
}

impl VersionInfo {
    #[must_use]
    pub const fn current() -> Self {
        Self {
            schema_version: OUTPUT_SCHEMA_VERSION,
            name: "moonc",
            version: VERSION,
            git_hash: option_env!("MOONC_BUILD_GIT_HASH"),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)?;
        if let Some(hash) = self.git_hash {
            write!(f, " ({hash})")?;
        }
        Ok(())
    }
}
