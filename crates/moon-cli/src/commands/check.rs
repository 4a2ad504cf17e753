//! `moonc check` command implementation.

use super::{is_stdin, report_failures, CommandResultJson, FileResultJson};
use miette::Result;
use moon_core::fs::read_source;
use moon_core::{check_source, Config, Error};
use std::path::{Path, PathBuf};

pub fn run(config: &Config, inputs: &[PathBuf], json: bool) -> Result<()> {
    let mut files = Vec::with_capacity(inputs.len());
    let mut errors = Vec::new();

    for input in inputs {
        match check_input(config, input) {
            Ok(views) if json => files.push(FileResultJson {
                views: Some(views),
                ..FileResultJson::success(input)
            }),
            Ok(views) => println!("{}: ok ({views} views)", input.display()),
            Err(error) if json => files.push(FileResultJson::failure(input, &error)),
            Err(error) => errors.push(error),
        }
    }

    if json {
        return CommandResultJson::new("check", files).emit();
    }
    report_failures("check", inputs.len(), errors)
}

fn check_input(config: &Config, input: &Path) -> moon_core::Result<usize> {
    let source = if is_stdin(input) {
        std::io::read_to_string(std::io::stdin()).map_err(|source| Error::Read {
            path: input.to_path_buf(),
            source,
        })?
    } else {
        read_source(&config.resolve(input))?
    };
    check_source(input, &source)
}
