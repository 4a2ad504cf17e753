//! Batch compilation of a source tree.
//!
//! Sources are discovered by extension, compiled in parallel, and written
//! next to their input or mirrored under an output directory. One failing
//! file does not stop the others; nothing is written for it.

use crate::config::ProjectConfig;
use crate::error::{Error, Result};
use crate::fs::{read_source, write_output};
use moon_compiler::{compile_with, count_views, parse, CodegenOptions, CompileError};
use rayon::prelude::*;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Extension of compiled files.
pub const OUTPUT_EXTENSION: &str = "js";

fn is_skipped_dir(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name == "node_modules" || name.starts_with('.')
}

/// Find every source file under `root` with a configured extension.
///
/// `node_modules` and hidden directories are skipped. Paths are sorted for
/// deterministic output.
pub fn discover_sources(root: &Path, project: &ProjectConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !(e.file_type().is_dir() && is_skipped_dir(e.file_name())))
    {
        let entry = entry.map_err(|source| Error::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && project.matches_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Where the compiled form of `input` goes.
///
/// Without `out_dir` the output sits next to the input; with it, the path
/// relative to `root` is mirrored under `out_dir`.
pub fn output_path(input: &Path, root: &Path, out_dir: Option<&Path>) -> Result<PathBuf> {
    let target = match out_dir {
        Some(out_dir) => {
            let relative = input
                .strip_prefix(root)
                .ok()
                .filter(|relative| !relative.as_os_str().is_empty())
                .or_else(|| input.file_name().map(Path::new))
                .unwrap_or(input);
            out_dir.join(relative)
        }
        None => input.to_path_buf(),
    }
    .with_extension(OUTPUT_EXTENSION);

    if target == input {
        return Err(Error::OutputIsInput { path: target });
    }
    Ok(target)
}

/// Compile source text that was read from `path`.
pub fn compile_source(path: &Path, input: &str, options: &CodegenOptions) -> Result<String> {
    compile_with(input, options).map_err(|source| syntax_error(path, input, source))
}

/// Parse source text without generating, returning the number of views.
pub fn check_source(path: &Path, input: &str) -> Result<usize> {
    parse(input)
        .map(|nodes| count_views(&nodes))
        .map_err(|failure| syntax_error(path, input, CompileError::new(input, failure)))
}

fn syntax_error(path: &Path, input: &str, source: CompileError) -> Error {
    debug!(
        path = %path.display(),
        expected = %source.expected(),
        position = source.position(),
        "invalid view syntax"
    );
    Error::Syntax {
        path: path.to_path_buf(),
        input: input.to_string(),
        source,
    }
}

/// Read and compile one file.
pub fn compile_file(path: &Path, options: &CodegenOptions) -> Result<String> {
    let input = read_source(path)?;
    let output = compile_source(path, &input, options)?;
    debug!(path = %path.display(), bytes = output.len(), "compiled");
    Ok(output)
}

/// A written output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    pub output: PathBuf,
    pub bytes: usize,
}

/// The outcome for one input file.
#[derive(Debug)]
pub struct FileResult {
    pub input: PathBuf,
    pub result: Result<Compiled>,
}

impl FileResult {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Compile and write each file, in parallel. Results keep the order of
/// `files`.
pub fn compile_files(
    files: &[PathBuf],
    root: &Path,
    out_dir: Option<&Path>,
    options: &CodegenOptions,
) -> Vec<FileResult> {
    files
        .par_iter()
        .map(|input| FileResult {
            input: input.clone(),
            result: compile_one(input, root, out_dir, options),
        })
        .collect()
}

fn compile_one(
    input: &Path,
    root: &Path,
    out_dir: Option<&Path>,
    options: &CodegenOptions,
) -> Result<Compiled> {
    let output = output_path(input, root, out_dir)?;
    let code = compile_file(input, options)?;
    write_output(&output, &code)?;
    debug!(input = %input.display(), output = %output.display(), "wrote");
    Ok(Compiled {
        output,
        bytes: code.len(),
    })
}

/// Results of a `build` run.
#[derive(Debug)]
pub struct BuildReport {
    pub root: PathBuf,
    pub results: Vec<FileResult>,
}

impl BuildReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failed() == 0
    }
}

/// Discover and compile every source under `root`.
pub fn build(root: &Path, project: &ProjectConfig, out_dir: Option<&Path>) -> Result<BuildReport> {
    let files = discover_sources(root, project)?;
    info!(root = %root.display(), files = files.len(), "compiling");

    let options = project.codegen_options();
    let results = compile_files(&files, root, out_dir, &options);
    let report = BuildReport {
        root: root.to_path_buf(),
        results,
    };

    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "build finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_discover_sources_filters_and_sorts() {
        let dir = tempdir().unwrap();
        write(dir.path(), "b.moon", "");
        write(dir.path(), "a/c.moon", "");
        write(dir.path(), "a/d.js", "");
        write(dir.path(), "node_modules/x/e.moon", "");
        write(dir.path(), ".cache/f.moon", "");

        let files = discover_sources(dir.path(), &ProjectConfig::default()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(names, vec![PathBuf::from("a/c.moon"), PathBuf::from("b.moon")]);
    }

    #[test]
    fn test_output_path() {
        let root = Path::new("/src");
        assert_eq!(
            output_path(Path::new("/src/app.moon"), root, None).unwrap(),
            PathBuf::from("/src/app.js")
        );
        assert_eq!(
            output_path(Path::new("/src/views/app.moon"), root, Some(Path::new("/out"))).unwrap(),
            PathBuf::from("/out/views/app.js")
        );
        assert!(matches!(
            output_path(Path::new("/src/app.js"), root, None),
            Err(Error::OutputIsInput { .. })
        ));
    }

    #[test]
    fn test_compile_source_syntax_error() {
        let err = compile_source(Path::new("bad.moon"), "<div a=\"/>", &CodegenOptions::default())
            .unwrap_err();
        let (path, input, source) = err.as_syntax().unwrap();
        assert_eq!(path, Path::new("bad.moon"));
        assert_eq!(input, "<div a=\"/>");
        assert_eq!(source.expected(), "\"\"\"");
    }

    #[test]
    fn test_check_source_counts_views() {
        let count = check_source(Path::new("a.moon"), "f(<a>x</a>, <><b/></>)").unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_build_writes_outputs_and_reports_failures() {
        let dir = tempdir().unwrap();
        let good = write(dir.path(), "src/good.moon", "export default <p>hi</p>;");
        write(dir.path(), "src/bad.moon", "<p a=\"/>");
        let out = dir.path().join("dist");

        let report = build(&dir.path().join("src"), &ProjectConfig::default(), Some(&out)).unwrap();
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_ok());

        let compiled = fs::read_to_string(out.join("good.js")).unwrap();
        assert!(compiled.starts_with("export default Moon.view.components.p("));
        assert!(!out.join("bad.js").exists());
        assert!(good.exists());
    }

    #[test]
    fn test_compile_files_keeps_order() {
        let dir = tempdir().unwrap();
        let files: Vec<_> = (0..8)
            .map(|i| write(dir.path(), &format!("v{i}.moon"), "<br/>"))
            .collect();

        let results = compile_files(&files, dir.path(), None, &CodegenOptions::default());
        let inputs: Vec<_> = results.iter().map(|r| r.input.clone()).collect();
        assert_eq!(inputs, files);
        assert!(results.iter().all(FileResult::is_ok));
        assert_eq!(
            fs::read_to_string(dir.path().join("v3.js")).unwrap(),
            "Moon.view.components.br({})"
        );
    }
}
