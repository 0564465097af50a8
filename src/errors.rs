//! Decaf Error Handling
//!
//! Every way a compilation can stop, plus the source context needed to
//! report it. Errors render two ways:
//!
//! - `Display` gives the plain two-line report: a location line
//!   (`File "<name>":<line>:<col>:`) followed by a message line.
//! - `miette::Diagnostic` gives the graphical report with the source
//!   snippet and a labelled span.

use std::{fmt, sync::Arc};

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use serde::Serialize;
use thiserror::Error;

use crate::ast::{LineIndex, Position};

pub type SourceArc = Arc<NamedSource<String>>;

// ============================================================================
// EXIT CODES
// ============================================================================

/// Process exit codes used by the CLI, one per error family.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const SYNTAX: i32 = 1;
    pub const UNSUPPORTED: i32 = 2;
    /// Compiler defect (EX_SOFTWARE).
    pub const INTERNAL: i32 = 70;
    /// Could not read input (EX_IOERR).
    pub const IO: i32 = 74;
}

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

/// The text being compiled and the name it is reported under.
///
/// Borrowed for the duration of one compilation; the text is only copied
/// when an error needs to carry it.
#[derive(Debug, Clone)]
pub struct SourceContext<'src> {
    pub name: Option<Arc<str>>,
    pub content: &'src str,
    lines: LineIndex,
}

impl<'src> SourceContext<'src> {
    pub fn new(content: &'src str, name: Option<&str>) -> Self {
        Self {
            name: name.map(Arc::from),
            content,
            lines: LineIndex::new(content),
        }
    }

    /// The name shown in reports; unnamed sources print as `<unknown>`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unknown>")
    }

    pub fn position_at(&self, offset: usize) -> Position {
        Position::locate(self.content, &self.lines, offset, self.name.as_ref())
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> SourceArc {
        Arc::new(NamedSource::new(
            self.display_name(),
            self.content.to_string(),
        ))
    }
}

/// Byte span for a miette label, clamped to the source.
pub fn to_source_span(source: &str, offset: usize, len: usize) -> SourceSpan {
    let start = offset.min(source.len());
    let len = len.min(source.len() - start);
    SourceSpan::from((start, len))
}

fn location_line(position: &Position) -> String {
    format!(
        "File \"{}\":{}:{}:",
        position.display_name(),
        position.line,
        position.column
    )
}

// ============================================================================
// SYNTAX ERRORS
// ============================================================================

/// Which collaborator detected a syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorOrigin {
    Lexer,
    Parser,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorOrigin::Lexer => f.write_str("lexer"),
            ErrorOrigin::Parser => f.write_str("parser"),
        }
    }
}

/// Malformed input, raised by the diagnostic reporter on the first lexer or
/// parser failure.
#[derive(Debug, Error)]
#[error("{}\nError: {message}", location_line(.position))]
pub struct SyntaxError {
    pub origin: ErrorOrigin,
    /// Message text without the `Error: ` prefix, e.g.
    /// ``syntax error unrecognized token `#` ``.
    pub message: String,
    pub position: Position,
    pub src: SourceArc,
    pub span: SourceSpan,
}

impl SyntaxError {
    pub fn location_line(&self) -> String {
        location_line(&self.position)
    }

    pub fn message_line(&self) -> String {
        format!("Error: {}", self.message)
    }
}

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.origin {
            ErrorOrigin::Lexer => "decaf::syntax::lexer",
            ErrorOrigin::Parser => "decaf::syntax::parser",
        };
        Some(Box::new(code))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(self.src.as_ref())
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = format!("{} stopped here", self.origin);
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(label),
            self.span,
        ))))
    }
}

// ============================================================================
// LITERAL CONVERSION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionFailure {
    /// The value does not fit the target type.
    Overflow,
    /// The lexeme is not shaped like the literal it claims to be.
    Malformed,
}

impl fmt::Display for ConversionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionFailure::Overflow => f.write_str("does not fit in 32 bits"),
            ConversionFailure::Malformed => f.write_str("is malformed"),
        }
    }
}

/// A literal lexeme that could not be converted to its value.
///
/// The grammar makes this unreachable for well-formed lexemes, so lowering
/// reports it as an internal error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{literal_type} literal `{lexeme}` {kind}")]
pub struct LiteralConversionError {
    pub literal_type: &'static str,
    pub kind: ConversionFailure,
    pub lexeme: String,
}

// ============================================================================
// COMPILE ERRORS
// ============================================================================

/// Why a compilation produced no AST.
#[derive(Debug, Error, Diagnostic)]
pub enum CompileError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    /// Valid syntax for a construct lowering does not handle yet.
    #[error("{}\nError: unsupported construct `{construct}`", location_line(.position))]
    #[diagnostic(
        code(decaf::lower::unsupported),
        help("this construct parses but cannot be lowered yet")
    )]
    Unsupported {
        construct: String,
        position: Position,
        #[source_code]
        src: SourceArc,
        #[label("not supported")]
        span: SourceSpan,
    },

    /// Lowering met a parse tree it believed impossible. A compiler bug.
    #[error("{}\nInternal error: {message}", location_line(.position))]
    #[diagnostic(
        code(decaf::internal),
        help("This is an internal compiler error. Please report this as a bug.")
    )]
    Internal {
        message: String,
        position: Position,
        #[source_code]
        src: SourceArc,
        #[label("while lowering this")]
        span: SourceSpan,
        #[source]
        cause: Option<LiteralConversionError>,
    },
}

impl CompileError {
    pub fn position(&self) -> &Position {
        match self {
            CompileError::Syntax(err) => &err.position,
            CompileError::Unsupported { position, .. } | CompileError::Internal { position, .. } => {
                position
            }
        }
    }

    /// `File "<name>":<line>:<col>:`
    pub fn location_line(&self) -> String {
        location_line(self.position())
    }

    /// The second line of the plain report.
    pub fn message_line(&self) -> String {
        match self {
            CompileError::Syntax(err) => err.message_line(),
            CompileError::Unsupported { construct, .. } => {
                format!("Error: unsupported construct `{}`", construct)
            }
            CompileError::Internal { message, .. } => format!("Internal error: {}", message),
        }
    }

    /// Internal errors are compiler defects rather than problems with the input.
    pub fn is_internal(&self) -> bool {
        matches!(self, CompileError::Internal { .. })
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CompileError::Syntax(_) => exit_code::SYNTAX,
            CompileError::Unsupported { .. } => exit_code::UNSUPPORTED,
            CompileError::Internal { .. } => exit_code::INTERNAL,
        }
    }
}

// ============================================================================
// ERROR REPORTING
// ============================================================================

/// Context-aware error creation for anything that knows its source.
pub trait ErrorReporting {
    fn source_context(&self) -> &SourceContext<'_>;

    /// A construct the grammar accepts but lowering does not support.
    fn unsupported(&self, construct: &str, span: pest::Span<'_>) -> CompileError {
        let ctx = self.source_context();
        CompileError::Unsupported {
            construct: construct.to_string(),
            position: ctx.position_at(span.start()),
            src: ctx.to_named_source(),
            span: to_source_span(ctx.content, span.start(), span.end() - span.start()),
        }
    }

    /// Creates an internal error - these indicate lowering bugs, not user errors.
    fn internal_error(&self, message: &str, span: pest::Span<'_>) -> CompileError {
        let ctx = self.source_context();
        CompileError::Internal {
            message: message.to_string(),
            position: ctx.position_at(span.start()),
            src: ctx.to_named_source(),
            span: to_source_span(ctx.content, span.start(), span.end() - span.start()),
            cause: None,
        }
    }

    /// Folds a failed literal conversion into an internal error.
    fn conversion_error(&self, cause: LiteralConversionError, span: pest::Span<'_>) -> CompileError {
        match self.internal_error(&cause.to_string(), span) {
            CompileError::Internal {
                message,
                position,
                src,
                span,
                ..
            } => CompileError::Internal {
                message,
                position,
                src,
                span,
                cause: Some(cause),
            },
            other => other,
        }
    }
}

impl ErrorReporting for SourceContext<'_> {
    fn source_context(&self) -> &SourceContext<'_> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_renders_two_lines() {
        let source = "class A {}";
        let ctx = SourceContext::new(source, Some("a.decaf"));
        let span = pest::Span::new(source, 6, 7).unwrap();
        let err = ctx.unsupported("new object expression", span);
        assert_eq!(
            err.to_string(),
            "File \"a.decaf\":1:6:\nError: unsupported construct `new object expression`"
        );
        assert_eq!(err.exit_code(), exit_code::UNSUPPORTED);
    }

    #[test]
    fn conversion_errors_are_internal_with_cause() {
        let source = "99999999999";
        let ctx = SourceContext::new(source, None);
        let span = pest::Span::new(source, 0, source.len()).unwrap();
        let cause = LiteralConversionError {
            literal_type: "integer",
            kind: ConversionFailure::Overflow,
            lexeme: source.to_string(),
        };
        let err = ctx.conversion_error(cause.clone(), span);
        assert!(err.is_internal());
        assert_eq!(err.exit_code(), exit_code::INTERNAL);
        assert_eq!(
            err.message_line(),
            "Internal error: integer literal `99999999999` does not fit in 32 bits"
        );
        let source_err = std::error::Error::source(&err).unwrap();
        assert_eq!(source_err.to_string(), cause.to_string());
    }

    #[test]
    fn source_spans_are_clamped() {
        let span = to_source_span("abc", 2, 10);
        assert_eq!(span.offset(), 2);
        assert_eq!(span.len(), 1);
    }
}
