//! Command implementations.
//!
//! Every command prints one JSON document on stdout under `--json`; the
//! shapes below are shared so `compile`, `check` and `build` report files
//! the same way.

pub mod build;
pub mod check;
pub mod compile;
pub mod version;

use crate::diagnostic;
use miette::{IntoDiagnostic, Result};
use moon_compiler::LineIndex;
use moon_core::version::OUTPUT_SCHEMA_VERSION;
use moon_core::Error;
use serde::Serialize;
use std::path::Path;

/// Path that stands for stdin (and stdout when compiling).
pub const STDIN_PATH: &str = "-";

/// Exit code when at least one file failed.
pub const EXIT_FAILED: i32 = 1;

pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_PATH
}

/// Top-level JSON document for file-processing commands.
#[derive(Serialize)]
pub struct CommandResultJson {
    pub schema_version: u32,
    pub command: &'static str,
    pub ok: bool,
    pub counts: CountsJson,
    pub files: Vec<FileResultJson>,
}

#[derive(Serialize)]
pub struct CountsJson {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Serialize, Default)]
pub struct FileResultJson {
    pub input: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Compiled code, for `compile --stdout`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Number of views, for `check`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorJson>,
}

#[derive(Serialize)]
pub struct ErrorJson {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl FileResultJson {
    pub fn success(input: &Path) -> Self {
        Self {
            input: input.display().to_string(),
            ok: true,
            ..Self::default()
        }
    }

    pub fn failure(input: &Path, error: &Error) -> Self {
        Self {
            input: input.display().to_string(),
            ok: false,
            error: Some(ErrorJson::from_error(error)),
            ..Self::default()
        }
    }
}

impl ErrorJson {
    pub fn from_error(error: &Error) -> Self {
        match error.as_syntax() {
            Some((_, input, source)) => {
                let (line, column) = LineIndex::new(input).line_col(source.position());
                Self {
                    message: source.detailed.clone(),
                    expected: Some(source.expected().to_string()),
                    position: Some(source.position()),
                    line: Some(line),
                    column: Some(column),
                }
            }
            None => Self {
                message: error.to_string(),
                expected: None,
                position: None,
                line: None,
                column: None,
            },
        }
    }
}

impl CommandResultJson {
    pub fn new(command: &'static str, files: Vec<FileResultJson>) -> Self {
        let succeeded = files.iter().filter(|file| file.ok).count();
        let counts = CountsJson {
            total: files.len(),
            succeeded,
            failed: files.len() - succeeded,
        };
        Self {
            schema_version: OUTPUT_SCHEMA_VERSION,
            command,
            ok: counts.failed == 0,
            counts,
            files,
        }
    }

    /// Print the document and exit non-zero if anything failed.
    pub fn emit(&self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(self).into_diagnostic()?);
        if !self.ok {
            std::process::exit(EXIT_FAILED);
        }
        Ok(())
    }
}

/// Print each failure as a diagnostic and summarize.
pub fn report_failures(command: &str, total: usize, errors: Vec<Error>) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    let failed = errors.len();
    for error in errors {
        eprintln!("{:?}", diagnostic::report(error));
    }
    Err(miette::miette!("{command}: {failed} of {total} file(s) failed"))
}
