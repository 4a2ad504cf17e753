//! moon-compiler: compiles JavaScript with embedded Moon view syntax.
//!
//! Views are written inline in host code and compile to runtime calls:
//!
//! ```text
//! const view = <div class="greeting">Hello {name}</div>;
//! ```
//!
//! becomes
//!
//! ```text
//! const view = Moon.view.components.div ({"class":"greeting",children:[...]});
//! ```
//!
//! # Design Principles
//!
//! 1. **No tokenizer**
//!    - Host code is never parsed, only skipped over in spans
//!    - `/` and `<` are resolved by trying each reading in order
//!
//! 2. **Failures are values**
//!    - Every parser returns `Result`; nothing unwinds
//!    - A failure that consumed input commits, unless rewound by `attempt`
//!
//! 3. **Spans, not strings**
//!    - The tree points into the input; generation copies host code through
//!
//! # Example
//!
//! ```
//! let output = moon_compiler::compile("<p>hi</p>").unwrap();
//! assert_eq!(
//!     output,
//!     "Moon.view.components.p({children:[Moon.view.components.text({data:\"hi\"})]})"
//! );
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod combinator;
pub mod diagnostics;
mod error;
pub mod grammar;
mod names;
mod span;
pub mod tree;

mod codegen;

// Re-exports
pub use codegen::{Codegen, CodegenOptions, GeneratedList, RuntimeNames};
pub use combinator::{Failure, Outcome};
pub use error::CompileError;
pub use grammar::parse;
pub use names::{is_builtin, normalize_attribute_name, BUILTIN_NAMES};
pub use span::{LineIndex, Span};
pub use tree::{count_views, Attribute, Data, Delimiter, Kind, Node, Tag};

/// Generate JavaScript from a parsed tree.
pub fn generate(source: &str, nodes: &[Node], options: &CodegenOptions) -> String {
    Codegen::new(source, options).generate(nodes)
}

/// Compile with the default runtime names.
pub fn compile(input: &str) -> Result<String, CompileError> {
    compile_with(input, &CodegenOptions::default())
}

/// Compile a source file, replacing every view with runtime calls.
pub fn compile_with(input: &str, options: &CodegenOptions) -> Result<String, CompileError> {
    let nodes = parse(input).map_err(|failure| CompileError::new(input, failure))?;
    Ok(generate(input, &nodes, options))
}
