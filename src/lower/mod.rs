//! Tree lowering
//!
//! Turns the concrete parse tree (`pest` pairs for the `program` rule) into
//! the AST. Lowering is one bottom-up pass: every child is lowered before
//! the node that owns it is built, and the first failure aborts the whole
//! compilation unit.
//!
//! Each grammar rule has exactly one lowering method, split by area:
//!
//! - `declarations.rs`: classes, fields, methods, parameters, blocks
//! - `statements.rs`: statements, calls, locations
//! - `expressions.rs`: operator levels, literals, simple expressions
//!
//! Grammar alternatives that lowering does not implement raise
//! [`CompileError::Unsupported`]. Parse tree shapes the grammar cannot
//! produce raise [`CompileError::Internal`].

use pest::iterators::{Pair, Pairs};

use crate::{
    ast::{Position, Program},
    errors::{CompileError, ErrorReporting, SourceContext},
    syntax::{lexer, Rule},
};

mod declarations;
mod expressions;
pub mod literals;
mod statements;

pub struct Lowerer<'src> {
    source: SourceContext<'src>,
}

impl ErrorReporting for Lowerer<'_> {
    fn source_context(&self) -> &SourceContext<'_> {
        &self.source
    }
}

impl<'src> Lowerer<'src> {
    pub fn new(source: SourceContext<'src>) -> Self {
        Self { source }
    }

    /// Lowers a `program` pair into a [`Program`].
    pub fn lower_program(&self, pair: Pair<'_, Rule>) -> Result<Program, CompileError> {
        self.expect_rule(&pair, Rule::program)?;
        let span = pair.as_span();

        let classes = pair
            .into_inner()
            .filter(|p| p.as_rule() != Rule::EOI)
            .map(|p| self.lower_class(p))
            .collect::<Result<Vec<_>, _>>()?;

        // Leading trivia is not part of any class, so the program starts
        // where its first class does.
        let position = match classes.first() {
            Some(first) => first.position.clone(),
            None => return Err(self.internal_error("program without classes", span)),
        };

        Ok(Program { position, classes })
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn position(&self, pair: &Pair<'_, Rule>) -> Position {
        Position::from_pair(pair, self.source.lines(), self.source.name.as_ref())
    }

    /// The span of `pair` up to its last token.
    ///
    /// A rule ending in a repetition or an option, such as `location`, has
    /// pest's implicit trivia after its final token inside its span.
    fn content_span<'i>(&self, pair: &Pair<'i, Rule>) -> pest::Span<'i> {
        let span = pair.as_span();
        let end = lexer::content_end(span.get_input(), span.start(), span.end());
        pest::Span::new(span.get_input(), span.start(), end).unwrap_or(span)
    }

    fn expect_rule(&self, pair: &Pair<'_, Rule>, rule: Rule) -> Result<(), CompileError> {
        if pair.as_rule() == rule {
            Ok(())
        } else {
            Err(self.internal_error(
                &format!("expected {:?}, found {:?}", rule, pair.as_rule()),
                pair.as_span(),
            ))
        }
    }

    fn unexpected(&self, pair: &Pair<'_, Rule>, context: &str) -> CompileError {
        self.internal_error(
            &format!("unexpected {:?} in {}", pair.as_rule(), context),
            pair.as_span(),
        )
    }

    /// The only child of a pass-through rule such as `expr` or `primary`.
    fn single_child<'i>(&self, pair: Pair<'i, Rule>) -> Result<Pair<'i, Rule>, CompileError> {
        let span = pair.as_span();
        let rule = pair.as_rule();
        pair.into_inner()
            .next()
            .ok_or_else(|| self.internal_error(&format!("empty {:?}", rule), span))
    }
}

/// Cursor over a rule's children, in grammar order.
struct Children<'i> {
    rule: Rule,
    span: pest::Span<'i>,
    inner: Pairs<'i, Rule>,
}

impl<'i> Children<'i> {
    fn of(pair: Pair<'i, Rule>) -> Self {
        Self {
            rule: pair.as_rule(),
            span: pair.as_span(),
            inner: pair.into_inner(),
        }
    }

    /// The next child, which the grammar guarantees is `rule`.
    fn expect(&mut self, lowerer: &Lowerer<'_>, rule: Rule) -> Result<Pair<'i, Rule>, CompileError> {
        match self.inner.next() {
            Some(pair) if pair.as_rule() == rule => Ok(pair),
            Some(pair) => Err(lowerer.internal_error(
                &format!("expected {:?} in {:?}, found {:?}", rule, self.rule, pair.as_rule()),
                pair.as_span(),
            )),
            None => Err(lowerer.internal_error(
                &format!("missing {:?} in {:?}", rule, self.rule),
                self.span,
            )),
        }
    }

    /// The next child if it is an optional `rule`.
    fn next_if(&mut self, rule: Rule) -> Option<Pair<'i, Rule>> {
        match self.inner.peek() {
            Some(pair) if pair.as_rule() == rule => self.inner.next(),
            _ => None,
        }
    }
}

impl<'i> Iterator for Children<'i> {
    type Item = Pair<'i, Rule>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
