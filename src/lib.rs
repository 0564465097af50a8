//! Decaf front end: source text in, typed and position-annotated AST out.
//!
//! ```
//! use decaf::{compile, CompileOptions};
//!
//! let source = "class Main { void main() { x = 1 + 2 * 3; } }";
//! let program = compile(source, &CompileOptions::default()).unwrap();
//! assert_eq!(program.classes[0].method_declarations[0].name, "main");
//! ```

pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod engine;
pub mod errors;
pub mod lower;
pub mod syntax;

pub use ast::Program;
pub use diagnostics::{DiagnosticReporter, ErrorListener};
pub use engine::{compile, compile_with_listener, CompileOptions};
pub use errors::{CompileError, SyntaxError};
