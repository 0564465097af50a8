use pest::iterators::Pair;
use tracing::trace;

use super::{Children, Lowerer};
use crate::{
    ast::{Block, ClassDecl, MethodDecl, Parameter, Type, VarBind, VariableDeclaration},
    errors::CompileError,
    syntax::Rule,
};

impl Lowerer<'_> {
    pub(super) fn lower_class(&self, pair: Pair<'_, Rule>) -> Result<ClassDecl, CompileError> {
        self.expect_rule(&pair, Rule::class_decl)?;
        let position = self.position(&pair);
        let mut children = Children::of(pair);

        children.expect(self, Rule::CLASS)?;
        let name = children.expect(self, Rule::ident)?.as_str().to_string();
        let super_class_name = match children.next_if(Rule::superclass) {
            Some(superclass) => {
                let mut inner = Children::of(superclass);
                inner.expect(self, Rule::EXTENDS)?;
                Some(inner.expect(self, Rule::ident)?.as_str().to_string())
            }
            None => None,
        };

        let mut variable_declarations = Vec::new();
        let mut method_declarations = Vec::new();
        for member in children {
            match member.as_rule() {
                Rule::var_decl => variable_declarations.push(self.lower_var_decl(member)?),
                Rule::method_decl => method_declarations.push(self.lower_method(member)?),
                _ => return Err(self.unexpected(&member, "class body")),
            }
        }

        trace!(
            class = %name,
            fields = variable_declarations.len(),
            methods = method_declarations.len(),
            "lowered class"
        );

        Ok(ClassDecl {
            position,
            name,
            super_class_name,
            variable_declarations,
            method_declarations,
        })
    }

    // ========================================================================
    // VARIABLES AND TYPES
    // ========================================================================

    /// `int x, y[];` becomes one declaration with a bind per name.
    fn lower_var_decl(&self, pair: Pair<'_, Rule>) -> Result<VariableDeclaration, CompileError> {
        self.expect_rule(&pair, Rule::var_decl)?;
        let position = self.position(&pair);
        let mut children = Children::of(pair);

        let var_type = self.lower_type(children.expect(self, Rule::type_name)?)?;
        let var_binds = children
            .expect(self, Rule::var_bind_list)?
            .into_inner()
            .map(|bind| self.lower_var_bind(bind))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(VariableDeclaration {
            position,
            var_type,
            var_binds,
        })
    }

    fn lower_var_bind(&self, pair: Pair<'_, Rule>) -> Result<VarBind, CompileError> {
        self.expect_rule(&pair, Rule::var_bind)?;
        let position = self.position(&pair);
        let mut children = Children::of(pair);

        let name = children.expect(self, Rule::ident)?.as_str().to_string();
        let is_array = children.next_if(Rule::array_marker).is_some();

        Ok(VarBind {
            position,
            name,
            is_array,
        })
    }

    fn lower_type(&self, pair: Pair<'_, Rule>) -> Result<Type, CompileError> {
        self.expect_rule(&pair, Rule::type_name)?;
        let position = self.position(&pair);
        let name = self.single_child(pair)?;
        match name.as_rule() {
            Rule::INT | Rule::BOOLEAN | Rule::ident => Ok(Type {
                position,
                name: name.as_str().to_string(),
            }),
            _ => Err(self.unexpected(&name, "type")),
        }
    }

    fn lower_return_type(&self, pair: Pair<'_, Rule>) -> Result<Type, CompileError> {
        self.expect_rule(&pair, Rule::return_type)?;
        let position = self.position(&pair);
        let inner = self.single_child(pair)?;
        match inner.as_rule() {
            Rule::VOID => Ok(Type {
                position,
                name: inner.as_str().to_string(),
            }),
            Rule::type_name => self.lower_type(inner),
            _ => Err(self.unexpected(&inner, "return type")),
        }
    }

    // ========================================================================
    // METHODS
    // ========================================================================

    fn lower_method(&self, pair: Pair<'_, Rule>) -> Result<MethodDecl, CompileError> {
        self.expect_rule(&pair, Rule::method_decl)?;
        let position = self.position(&pair);
        let mut children = Children::of(pair);

        let return_type = self.lower_return_type(children.expect(self, Rule::return_type)?)?;
        let name = children.expect(self, Rule::ident)?.as_str().to_string();
        let parameters = match children.next_if(Rule::param_list) {
            Some(list) => list
                .into_inner()
                .map(|param| self.lower_param(param))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let body = self.lower_block(children.expect(self, Rule::block)?)?;

        trace!(method = %name, params = parameters.len(), "lowered method");

        Ok(MethodDecl {
            position,
            return_type,
            name,
            parameters,
            body,
        })
    }

    fn lower_param(&self, pair: Pair<'_, Rule>) -> Result<Parameter, CompileError> {
        self.expect_rule(&pair, Rule::param)?;
        let position = self.position(&pair);
        let mut children = Children::of(pair);

        let param_type = self.lower_type(children.expect(self, Rule::type_name)?)?;
        let name = children.expect(self, Rule::ident)?.as_str().to_string();
        let is_array = children.next_if(Rule::array_marker).is_some();

        Ok(Parameter {
            position,
            param_type,
            name,
            is_array,
        })
    }

    pub(super) fn lower_block(&self, pair: Pair<'_, Rule>) -> Result<Block, CompileError> {
        self.expect_rule(&pair, Rule::block)?;
        let position = self.position(&pair);

        let mut variable_declarations = Vec::new();
        let mut statements = Vec::new();
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::var_decl if statements.is_empty() => {
                    variable_declarations.push(self.lower_var_decl(child)?)
                }
                Rule::statement => statements.push(self.lower_statement(child)?),
                _ => return Err(self.unexpected(&child, "block")),
            }
        }

        Ok(Block {
            position,
            variable_declarations,
            statements,
        })
    }
}
