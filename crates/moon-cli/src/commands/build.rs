//! `moonc build` command implementation.

use super::{report_failures, CommandResultJson, FileResultJson};
use crate::diagnostic;
use miette::Result;
use moon_core::Config;
use std::path::PathBuf;

/// Build command action.
#[derive(Debug, Clone)]
pub struct BuildAction {
    /// Directory to scan; the working directory when unset.
    pub root: Option<PathBuf>,
    /// Overrides `outDir` from `moon.json`.
    pub out_dir: Option<PathBuf>,
}

pub fn run(config: &Config, action: &BuildAction, json: bool) -> Result<()> {
    let project = config.load_project().map_err(diagnostic::report)?;
    let root = action
        .root
        .as_deref()
        .map_or_else(|| config.cwd.clone(), |root| config.resolve(root));
    let out_dir = action
        .out_dir
        .as_deref()
        .or(project.out_dir.as_deref())
        .map(|dir| config.resolve(dir));

    let report =
        moon_core::build(&root, &project, out_dir.as_deref()).map_err(diagnostic::report)?;

    if json {
        let files = report
            .results
            .iter()
            .map(|file| match &file.result {
                Ok(compiled) => FileResultJson {
                    output: Some(compiled.output.display().to_string()),
                    ..FileResultJson::success(&file.input)
                },
                Err(error) => FileResultJson::failure(&file.input, error),
            })
            .collect();
        return CommandResultJson::new("build", files).emit();
    }

    let total = report.results.len();
    let mut errors = Vec::new();
    for file in report.results {
        match file.result {
            Ok(compiled) => println!("{} -> {}", file.input.display(), compiled.output.display()),
            Err(error) => errors.push(error),
        }
    }

    if errors.is_empty() {
        println!("Compiled {total} file(s) under {}", root.display());
    }
    report_failures("build", total, errors)
}
