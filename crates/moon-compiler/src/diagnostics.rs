//! Human-readable syntax error reports.

use crate::span::LineIndex;

/// One-line summary of a failure followed by the offending line and a caret.
///
/// ```text
/// Parse error: expected ">" at 2:5
/// 2:5 <div
///         ^
/// ```
pub fn format_detailed(input: &str, position: usize, expected: &str) -> String {
    if position >= input.len() {
        return format!("Parse error: expected {expected} at end of input");
    }

    let index = LineIndex::new(input);
    let (line, column) = index.line_col(position);
    let text = index.line(line).unwrap_or_default();
    let prefix = format!("{line}:{column}");
    let indent = " ".repeat(prefix.len() + column);
    format!("Parse error: expected {expected} at {prefix}\n{prefix} {text}\n{indent}^")
}

/// The lines around a position with a numbered gutter and a caret line.
///
/// Positions past the end are shown as if the input were padded with
/// spaces.
pub fn format_context(input: &str, position: usize) -> String {
    let mut padded = input.to_string();
    while padded.len() <= position {
        padded.push(' ');
    }

    let index = LineIndex::new(&padded);
    let (line, column) = index.line_col(position);
    let width = digits(line + 1) + 2;

    let mut formatted = String::new();
    if let Some(previous) = line.checked_sub(1).and_then(|n| index.line(n)) {
        let number = format!("{}| ", line - 1);
        formatted.push_str(&format!("{number:>width$}{previous}\n"));
    }

    let number = format!("{line}| ");
    let text = index.line(line).unwrap_or_default();
    formatted.push_str(&format!("{number:>width$}{text}\n{:>width$}{:>column$}", "| ", "^"));

    if let Some(next) = index.line(line + 1) {
        let number = format!("{}| ", line + 1);
        formatted.push_str(&format!("\n{number:>width$}{next}"));
    }

    formatted
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
