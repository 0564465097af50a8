use pest::iterators::Pair;

use super::{Children, Lowerer};
use crate::{
    ast::{Expression, Location, Statement},
    errors::{CompileError, ErrorReporting},
    syntax::Rule,
};

impl Lowerer<'_> {
    pub(super) fn lower_statement(&self, pair: Pair<'_, Rule>) -> Result<Statement, CompileError> {
        self.expect_rule(&pair, Rule::statement)?;
        let stmt = self.single_child(pair)?;
        let position = self.position(&stmt);
        let rule = stmt.as_rule();
        let mut children = Children::of(stmt.clone());

        match rule {
            Rule::assign_stmt => {
                let location = self.lower_location(children.expect(self, Rule::location)?)?;
                let expression = self.lower_expr(children.expect(self, Rule::expr)?)?;
                Ok(Statement::Assignment {
                    position,
                    location,
                    expression,
                })
            }
            Rule::expression_stmt => {
                let call = self.lower_call(children.expect(self, Rule::call_expr)?)?;
                Ok(Statement::ExpressionStatement { position, call })
            }
            Rule::if_stmt => {
                children.expect(self, Rule::IF)?;
                let condition = self.lower_expr(children.expect(self, Rule::expr)?)?;
                let true_branch = self.lower_block(children.expect(self, Rule::block)?)?;
                let false_branch = match children.next_if(Rule::else_branch) {
                    Some(branch) => {
                        let mut inner = Children::of(branch);
                        inner.expect(self, Rule::ELSE)?;
                        Some(self.lower_block(inner.expect(self, Rule::block)?)?)
                    }
                    None => None,
                };
                Ok(Statement::If {
                    position,
                    condition,
                    true_branch,
                    false_branch,
                })
            }
            Rule::while_stmt => {
                children.expect(self, Rule::WHILE)?;
                let condition = self.lower_expr(children.expect(self, Rule::expr)?)?;
                let body = self.lower_block(children.expect(self, Rule::block)?)?;
                Ok(Statement::While {
                    position,
                    condition,
                    body,
                })
            }
            Rule::return_stmt => {
                children.expect(self, Rule::RETURN)?;
                let value = match children.next_if(Rule::expr) {
                    Some(expr) => Some(self.lower_expr(expr)?),
                    None => None,
                };
                Ok(Statement::Return { position, value })
            }
            _ => Err(self.unexpected(&stmt, "statement")),
        }
    }

    // ========================================================================
    // CALLS
    // ========================================================================

    /// A `call_expr`: a method call or a `callout`.
    pub(super) fn lower_call(&self, pair: Pair<'_, Rule>) -> Result<Expression, CompileError> {
        self.expect_rule(&pair, Rule::call_expr)?;
        let call = self.single_child(pair)?;
        match call.as_rule() {
            Rule::method_call => self.lower_method_call(call),
            Rule::prim_callout => self.lower_callout(call),
            _ => Err(self.unexpected(&call, "call")),
        }
    }

    pub(super) fn lower_method_call(
        &self,
        pair: Pair<'_, Rule>,
    ) -> Result<Expression, CompileError> {
        self.expect_rule(&pair, Rule::method_call)?;
        let position = self.position(&pair);
        let mut children = Children::of(pair);

        let method = self.lower_location(children.expect(self, Rule::location)?)?;
        let arguments = match children.next_if(Rule::arg_list) {
            Some(args) => args
                .into_inner()
                .map(|arg| self.lower_expr(arg))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Expression::Call {
            position,
            method,
            arguments,
        })
    }

    /// `callout("name", args...)`. Only expression arguments are lowered.
    fn lower_callout(&self, pair: Pair<'_, Rule>) -> Result<Expression, CompileError> {
        self.expect_rule(&pair, Rule::prim_callout)?;
        let position = self.position(&pair);
        let mut children = Children::of(pair);

        children.expect(self, Rule::CALLOUT)?;
        let id = children.expect(self, Rule::string_lit)?;
        let primitive_id = match id
            .as_str()
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            Some(name) => name.to_string(),
            None => return Err(self.internal_error("unquoted callout name", id.as_span())),
        };

        let mut arguments = Vec::new();
        for arg in children {
            self.expect_rule(&arg, Rule::callout_arg)?;
            let value = self.single_child(arg)?;
            match value.as_rule() {
                Rule::expr => arguments.push(self.lower_expr(value)?),
                Rule::string_lit => {
                    return Err(self.unsupported("string literal callout argument", value.as_span()))
                }
                _ => return Err(self.unexpected(&value, "callout argument")),
            }
        }

        Ok(Expression::PrimitiveCall {
            position,
            primitive_id,
            arguments,
        })
    }

    // ========================================================================
    // LOCATIONS
    // ========================================================================

    /// `x`, `x.f` or `x[i]`. Longer selector chains are not supported.
    pub(super) fn lower_location(&self, pair: Pair<'_, Rule>) -> Result<Location, CompileError> {
        self.expect_rule(&pair, Rule::location)?;
        let position = self.position(&pair);
        let span = self.content_span(&pair);
        let mut children = Children::of(pair);

        let root = children.expect(self, Rule::ident)?.as_str().to_string();
        let selectors: Vec<_> = children.collect();
        if selectors.len() > 1 {
            return Err(self.unsupported("multi-level field access", span));
        }

        let mut location = Location {
            position,
            root,
            path: None,
            index_expr: None,
        };
        if let Some(selector) = selectors.into_iter().next() {
            match selector.as_rule() {
                Rule::field_access => {
                    let mut inner = Children::of(selector);
                    location.path = Some(inner.expect(self, Rule::ident)?.as_str().to_string());
                }
                Rule::index_access => {
                    let mut inner = Children::of(selector);
                    let index = self.lower_expr(inner.expect(self, Rule::expr)?)?;
                    location.index_expr = Some(Box::new(index));
                }
                _ => return Err(self.unexpected(&selector, "location")),
            }
        }
        Ok(location)
    }
}
