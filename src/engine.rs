//! Compilation pipeline: lex, parse, lower.
//!
//! Each compilation gets its own error listener and its own source
//! context; nothing is shared between calls.

use tracing::{debug, instrument};

use crate::{
    ast::Program,
    diagnostics::{
        parser_message, unrecognized_token_message, DiagnosticReporter, ErrorListener, SyntaxEvent,
    },
    errors::{CompileError, ErrorOrigin, SourceContext, SyntaxError},
    lower::Lowerer,
    syntax::{
        lexer::{self, LexFailure, Token},
        parser,
    },
};

/// Per-compilation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Name used in positions and error reports. `None` for in-memory text.
    pub source_name: Option<String>,
}

impl CompileOptions {
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }
}

/// Compiles `source` into a [`Program`], halting on the first syntax error.
///
/// ```
/// use decaf::engine::{compile, CompileOptions};
///
/// let program = compile("class Main { int x; }", &CompileOptions::default()).unwrap();
/// assert_eq!(program.classes[0].name, "Main");
/// ```
pub fn compile(source: &str, options: &CompileOptions) -> Result<Program, CompileError> {
    let mut reporter = DiagnosticReporter::new();
    compile_with_listener(source, options, &mut reporter)
}

/// Like [`compile`], but lexer and parser failures go to `listener`.
#[instrument(
    level = "debug",
    skip_all,
    fields(source = options.source_name.as_deref().unwrap_or("<unknown>"))
)]
pub fn compile_with_listener<L>(
    source: &str,
    options: &CompileOptions,
    listener: &mut L,
) -> Result<Program, CompileError>
where
    L: ErrorListener + ?Sized,
{
    debug!(bytes = source.len(), "compilation started");
    let ctx = SourceContext::new(source, options.source_name.as_deref());

    // Lexer and parser both stop at their first failure; whichever comes
    // first in the text is the one reported.
    let lex_failure = lexer::tokenize(source).err();

    let tree = match parser::parse_tree(source) {
        Ok(tree) => tree,
        Err(error) => {
            let failure = parser::describe_failure(&error, source);
            if let Some(lex) = lex_failure.filter(|lex| lex.offset <= failure.offset) {
                return Err(report_lex_failure(&ctx, lex, listener).into());
            }
            let event = SyntaxEvent {
                origin: ErrorOrigin::Parser,
                position: ctx.position_at(failure.offset),
                offending_text: &failure.found,
                message: parser_message(&failure.message),
                source: &ctx,
            };
            return Err(halt(listener, &event).into());
        }
    };
    if let Some(lex) = lex_failure {
        return Err(report_lex_failure(&ctx, lex, listener).into());
    }

    let program = Lowerer::new(ctx).lower_program(tree)?;
    debug!(classes = program.classes.len(), "compilation finished");
    Ok(program)
}

/// Runs only the lexer, reporting a failure the same way [`compile`] does.
pub fn tokenize(source: &str, options: &CompileOptions) -> Result<Vec<Token>, CompileError> {
    let ctx = SourceContext::new(source, options.source_name.as_deref());
    lexer::tokenize(source).map_err(|failure| {
        let mut reporter = DiagnosticReporter::new();
        CompileError::from(report_lex_failure(&ctx, failure, &mut reporter))
    })
}

fn report_lex_failure<L>(ctx: &SourceContext<'_>, failure: LexFailure, listener: &mut L) -> SyntaxError
where
    L: ErrorListener + ?Sized,
{
    let offending = failure.offending_text(ctx.content);
    let event = SyntaxEvent {
        origin: ErrorOrigin::Lexer,
        position: ctx.position_at(failure.offset),
        offending_text: offending,
        message: unrecognized_token_message(offending),
        source: ctx,
    };
    halt(listener, &event)
}

/// There is no recovery: a listener that returns `Ok` still stops the
/// compilation, with the default error for the event.
fn halt<L>(listener: &mut L, event: &SyntaxEvent<'_>) -> SyntaxError
where
    L: ErrorListener + ?Sized,
{
    match listener.syntax_error(event) {
        Err(error) => error,
        Ok(()) => event.to_syntax_error(),
    }
}
