use pest::iterators::Pair;

use super::{literals, Lowerer};
use crate::{
    ast::Expression,
    errors::{CompileError, ErrorReporting},
    syntax::Rule,
};

/// The operator rule each binary level folds over.
fn level_operator(level: Rule) -> Option<Rule> {
    match level {
        Rule::or_expr => Some(Rule::or_op),
        Rule::and_expr => Some(Rule::and_op),
        Rule::eq_expr => Some(Rule::eq_op),
        Rule::rel_expr => Some(Rule::rel_op),
        Rule::add_expr => Some(Rule::add_op),
        Rule::mul_expr => Some(Rule::mul_op),
        _ => None,
    }
}

impl Lowerer<'_> {
    pub(super) fn lower_expr(&self, pair: Pair<'_, Rule>) -> Result<Expression, CompileError> {
        match pair.as_rule() {
            Rule::expr | Rule::unary_expr | Rule::primary => {
                let inner = self.single_child(pair)?;
                self.lower_expr(inner)
            }

            Rule::or_expr
            | Rule::and_expr
            | Rule::eq_expr
            | Rule::rel_expr
            | Rule::add_expr
            | Rule::mul_expr => self.lower_binary_level(pair),

            Rule::not_expr => {
                let position = self.position(&pair);
                let span = pair.as_span();
                let mut children = pair.into_inner();
                let (op, operand) = match (children.next(), children.next()) {
                    (Some(op), Some(operand)) if op.as_rule() == Rule::not_op => (op, operand),
                    _ => return Err(self.internal_error("malformed prefix expression", span)),
                };
                Ok(Expression::PrefixOp {
                    position,
                    operator: op.as_str().to_string(),
                    operand: Box::new(self.lower_expr(operand)?),
                })
            }

            // The parentheses already shaped the tree.
            Rule::paren_expr => {
                let inner = self.single_child(pair)?;
                self.lower_expr(inner)
            }

            Rule::new_object => Err(self.unsupported("new object expression", pair.as_span())),
            Rule::new_array => Err(self.unsupported("new array expression", pair.as_span())),

            Rule::literal => self.lower_literal(pair),
            Rule::simple_expr => self.lower_simple_expr(pair),

            _ => Err(self.unexpected(&pair, "expression")),
        }
    }

    /// Folds `operand (op operand)*` to the left. Every node built here
    /// takes the level's position, i.e. its leftmost operand's.
    fn lower_binary_level(&self, pair: Pair<'_, Rule>) -> Result<Expression, CompileError> {
        let position = self.position(&pair);
        let span = pair.as_span();
        let level = pair.as_rule();
        let expected_op = level_operator(level)
            .ok_or_else(|| self.internal_error(&format!("{:?} is not a binary level", level), span))?;

        let mut children = pair.into_inner();
        let first = children
            .next()
            .ok_or_else(|| self.internal_error(&format!("empty {:?}", level), span))?;
        let mut lhs = self.lower_expr(first)?;

        while let Some(op) = children.next() {
            if op.as_rule() != expected_op {
                return Err(self.unexpected(&op, "binary expression"));
            }
            let rhs = match children.next() {
                Some(rhs) => self.lower_expr(rhs)?,
                None => {
                    return Err(self.internal_error("operator without right operand", op.as_span()))
                }
            };
            lhs = Expression::BinaryOp {
                position: position.clone(),
                lhs: Box::new(lhs),
                operator: op.as_str().to_string(),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn lower_literal(&self, pair: Pair<'_, Rule>) -> Result<Expression, CompileError> {
        let position = self.position(&pair);
        let literal = self.single_child(pair)?;
        let text = literal.as_str();
        let span = literal.as_span();

        match literal.as_rule() {
            Rule::int_lit => literals::parse_integer(text)
                .map(|value| Expression::IntegerLiteral { position, value })
                .map_err(|cause| self.conversion_error(cause, span)),
            Rule::char_lit => literals::parse_char(text)
                .map(|value| Expression::CharLiteral { position, value })
                .map_err(|cause| self.conversion_error(cause, span)),
            Rule::bool_lit => literals::parse_bool(text)
                .map(|value| Expression::BoolLiteral { position, value })
                .map_err(|cause| self.conversion_error(cause, span)),
            Rule::null_lit => Ok(Expression::NullLiteral { position }),
            _ => Err(self.unexpected(&literal, "literal")),
        }
    }

    /// `this`, a location, or a call in expression position. Only the text
    /// is kept, but the inner form is still lowered so unsupported shapes
    /// are reported.
    fn lower_simple_expr(&self, pair: Pair<'_, Rule>) -> Result<Expression, CompileError> {
        let position = self.position(&pair);
        let text = self.content_span(&pair).as_str().to_string();
        let inner = self.single_child(pair)?;

        match inner.as_rule() {
            Rule::THIS => {}
            Rule::method_call => {
                self.lower_method_call(inner)?;
            }
            Rule::location => {
                self.lower_location(inner)?;
            }
            _ => return Err(self.unexpected(&inner, "simple expression")),
        }

        Ok(Expression::SimpleExpression { position, text })
    }
}
