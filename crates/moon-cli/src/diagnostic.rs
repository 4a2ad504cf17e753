//! Rendering errors as `miette` reports.

use miette::{Diagnostic, NamedSource, SourceSpan};
use moon_core::Error;
use thiserror::Error;

/// A syntax error pointing into the file that failed to parse.
#[derive(Debug, Error, Diagnostic)]
#[error("{name}: invalid view syntax, expected {expected}")]
#[diagnostic(code(moonc::syntax))]
pub struct SyntaxDiagnostic {
    name: String,
    expected: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("expected here")]
    at: SourceSpan,
    #[help]
    context: String,
}

/// Any other failure: I/O, config, output paths.
#[derive(Debug, Error, Diagnostic)]
#[error(transparent)]
#[diagnostic(code(moonc::error))]
pub struct CoreDiagnostic(Error);

/// Turn a core error into a report, with source context for syntax errors.
pub fn report(error: Error) -> miette::Report {
    match error.as_syntax() {
        Some((path, input, source)) => {
            let name = path.display().to_string();
            let position = source.position().min(input.len());
            let width = input[position..].chars().next().map_or(0, char::len_utf8);
            miette::Report::new(SyntaxDiagnostic {
                expected: source.expected().to_string(),
                source_code: NamedSource::new(name.clone(), input.to_string()),
                at: (position, width).into(),
                context: source.context.clone(),
                name,
            })
        }
        None => miette::Report::new(CoreDiagnostic(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moon_compiler::CodegenOptions;
    use std::path::Path;

    #[test]
    fn test_syntax_report_has_code_and_label() {
        let error = moon_core::compile_source(
            Path::new("view.moon"),
            "<p a=\"x/>",
            &CodegenOptions::default(),
        )
        .unwrap_err();
        let report = report(error);
        assert_eq!(
            report.code().map(|code| code.to_string()),
            Some("moonc::syntax".to_string())
        );
        assert!(report.to_string().starts_with("view.moon: invalid view syntax"));
        let labels: Vec<_> = report.labels().unwrap().collect();
        assert_eq!(labels[0].offset(), 9);
        assert_eq!(labels[0].len(), 0);
    }

    #[test]
    fn test_core_report_is_transparent() {
        let report = report(Error::other("nothing to do"));
        assert_eq!(report.to_string(), "nothing to do");
        assert_eq!(
            report.code().map(|code| code.to_string()),
            Some("moonc::error".to_string())
        );
    }
}
