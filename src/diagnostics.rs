//! Syntax diagnostics
//!
//! The lexer and parser never raise errors themselves. The engine turns
//! each failure into a [`SyntaxEvent`] and hands it to whatever
//! [`ErrorListener`] the caller installed for that compilation. The default
//! listener, [`DiagnosticReporter`], halts on the first event.
//!
//! There is no process-wide listener: every call to
//! [`compile_with_listener`](crate::engine::compile_with_listener) receives
//! its own.

use tracing::debug;

use crate::{
    ast::Position,
    errors::{to_source_span, ErrorOrigin, SourceContext, SyntaxError},
};

/// One lexer or parser failure, described in source terms.
#[derive(Debug, Clone)]
pub struct SyntaxEvent<'a> {
    pub origin: ErrorOrigin,
    pub position: Position,
    /// The offending character (lexer) or token (parser), `<EOF>` at end of input.
    pub offending_text: &'a str,
    /// Message without the `Error: ` prefix.
    pub message: String,
    pub source: &'a SourceContext<'a>,
}

impl SyntaxEvent<'_> {
    /// Builds the error the default reporter raises for this event.
    pub fn to_syntax_error(&self) -> SyntaxError {
        let len = if self.offending_text == "<EOF>" {
            0
        } else {
            self.offending_text.len()
        };
        SyntaxError {
            origin: self.origin,
            message: self.message.clone(),
            position: self.position.clone(),
            src: self.source.to_named_source(),
            span: to_source_span(self.source.content, self.position.offset, len),
        }
    }
}

/// Pluggable hook invoked for every syntax failure.
///
/// Returning `Err` halts the compilation with that error. Returning `Ok`
/// only declines to choose the error: compilation still stops, because
/// nothing downstream can recover.
pub trait ErrorListener {
    fn syntax_error(&mut self, event: &SyntaxEvent<'_>) -> Result<(), SyntaxError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReporterState {
    #[default]
    Listening,
    Reporting,
    Halted,
}

/// The default listener: report the first failure, then stop listening.
#[derive(Debug, Default)]
pub struct DiagnosticReporter {
    state: ReporterState,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ReporterState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == ReporterState::Halted
    }
}

impl ErrorListener for DiagnosticReporter {
    fn syntax_error(&mut self, event: &SyntaxEvent<'_>) -> Result<(), SyntaxError> {
        if self.state == ReporterState::Halted {
            return Ok(());
        }
        self.state = ReporterState::Reporting;
        let error = event.to_syntax_error();
        self.state = ReporterState::Halted;
        debug!(
            origin = %event.origin,
            position = %event.position,
            "halting on first syntax error"
        );
        Err(error)
    }
}

/// Message for a character no token starts with.
pub fn unrecognized_token_message(offending: &str) -> String {
    format!("syntax error unrecognized token `{}`", offending)
}

/// Message for a token the parser did not expect.
pub fn parser_message(detail: &str) -> String {
    format!("syntax error {}", detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event<'a>(ctx: &'a SourceContext<'a>, offset: usize, text: &'a str) -> SyntaxEvent<'a> {
        SyntaxEvent {
            origin: ErrorOrigin::Lexer,
            position: ctx.position_at(offset),
            offending_text: text,
            message: unrecognized_token_message(text),
            source: ctx,
        }
    }

    #[test]
    fn reporter_halts_on_first_event() {
        let ctx = SourceContext::new("class A { # $ }", Some("a.decaf"));
        let mut reporter = DiagnosticReporter::new();
        assert_eq!(reporter.state(), ReporterState::Listening);

        let err = reporter.syntax_error(&event(&ctx, 10, "#")).unwrap_err();
        assert!(reporter.is_halted());
        assert_eq!(err.location_line(), "File \"a.decaf\":1:10:");
        assert_eq!(err.message_line(), "Error: syntax error unrecognized token `#`");

        assert!(reporter.syntax_error(&event(&ctx, 12, "$")).is_ok());
        assert_eq!(reporter.state(), ReporterState::Halted);
    }

    #[test]
    fn eof_events_label_an_empty_span() {
        let ctx = SourceContext::new("class", None);
        let ev = SyntaxEvent {
            origin: ErrorOrigin::Parser,
            position: ctx.position_at(5),
            offending_text: "<EOF>",
            message: parser_message("mismatched input `<EOF>` expecting identifier"),
            source: &ctx,
        };
        let err = ev.to_syntax_error();
        assert_eq!(err.span.offset(), 5);
        assert_eq!(err.span.len(), 0);
        assert_eq!(err.location_line(), "File \"<unknown>\":1:5:");
    }
}
