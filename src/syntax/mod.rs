//! Syntax module for the Decaf language
//!
//! The lexer and parser collaborators that sit in front of lowering. Both
//! are driven by `grammar.pest`; neither builds AST nodes.

pub mod lexer;
pub mod parser;

pub use lexer::{tokenize, LexFailure, Token, TokenKind};
pub use parser::{parse_tree, DecafParser, ParseFailure, Rule};
