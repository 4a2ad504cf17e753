//! `moonc compile` command implementation.

use super::{is_stdin, report_failures, CommandResultJson, FileResultJson};
use crate::diagnostic;
use miette::Result;
use moon_compiler::CodegenOptions;
use moon_core::fs::{read_source, write_output};
use moon_core::{compile_file, compile_source, output_path, Config, Error};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Compile command action.
#[derive(Debug, Clone)]
pub struct CompileAction {
    pub inputs: Vec<PathBuf>,
    /// Overrides `outDir` from `moon.json`.
    pub out_dir: Option<PathBuf>,
    pub stdout: bool,
}

/// Where one input's compiled code went.
enum Emitted {
    Code(String),
    Written(PathBuf),
}

pub fn run(config: &Config, action: &CompileAction, json: bool) -> Result<()> {
    let project = config.load_project().map_err(diagnostic::report)?;
    let options = project.codegen_options();
    let out_dir = action
        .out_dir
        .as_deref()
        .or(project.out_dir.as_deref())
        .map(|dir| config.resolve(dir));

    let mut files = Vec::with_capacity(action.inputs.len());
    let mut errors = Vec::new();

    for input in &action.inputs {
        let result = compile_input(config, input, action.stdout, out_dir.as_deref(), &options);

        if json {
            files.push(match result {
                Ok(Emitted::Code(code)) => FileResultJson {
                    code: Some(code),
                    ..FileResultJson::success(input)
                },
                Ok(Emitted::Written(output)) => FileResultJson {
                    output: Some(output.display().to_string()),
                    ..FileResultJson::success(input)
                },
                Err(error) => FileResultJson::failure(input, &error),
            });
            continue;
        }

        match result {
            Ok(Emitted::Code(code)) => print!("{code}"),
            Ok(Emitted::Written(output)) => {
                println!("{} -> {}", input.display(), output.display());
            }
            Err(error) => errors.push(error),
        }
    }

    if json {
        return CommandResultJson::new("compile", files).emit();
    }
    report_failures("compile", action.inputs.len(), errors)
}

fn compile_input(
    config: &Config,
    input: &Path,
    stdout: bool,
    out_dir: Option<&Path>,
    options: &CodegenOptions,
) -> moon_core::Result<Emitted> {
    if is_stdin(input) {
        let source = std::io::read_to_string(std::io::stdin()).map_err(|source| Error::Read {
            path: input.to_path_buf(),
            source,
        })?;
        return compile_source(input, &source, options).map(Emitted::Code);
    }

    let path = config.resolve(input);
    if stdout {
        return compile_file(&path, options).map(Emitted::Code);
    }

    // Resolve the target first so nothing is compiled for an input that
    // would be overwritten.
    let output = output_path(&path, &config.cwd, out_dir)?;
    let source = read_source(&path)?;
    let code = compile_source(&path, &source, options)?;
    write_output(&output, &code)?;
    debug!(input = %path.display(), output = %output.display(), "wrote");
    Ok(Emitted::Written(output))
}
