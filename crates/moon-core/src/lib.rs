#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

pub mod build;
pub mod config;
pub mod error;
pub mod fs;
pub mod version;

pub use build::{
    build, check_source, compile_file, compile_files, compile_source, discover_sources,
    output_path, BuildReport, Compiled, FileResult,
};
pub use config::{Config, ProjectConfig, RuntimeConfig, PROJECT_CONFIG_FILE};
pub use error::{Error, Result};
pub use version::VERSION;
