//! The common view over every AST node.

use super::{
    Block, ClassDecl, Expression, Location, MethodDecl, NodeKind, Parameter, Position, Program,
    Statement, Type, VarBind, VariableDeclaration,
};

/// Behaviour shared by all node types.
pub trait Node {
    fn kind(&self) -> NodeKind;

    fn position(&self) -> &Position;

    /// Calls `visit` on each direct child, in source order.
    fn visit_children<'a>(&'a self, visit: &mut dyn FnMut(&'a dyn Node));
}

impl Node for Program {
    fn kind(&self) -> NodeKind {
        NodeKind::Program
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn visit_children<'a>(&'a self, visit: &mut dyn FnMut(&'a dyn Node)) {
        for class in &self.classes {
            visit(class);
        }
    }
}

impl Node for ClassDecl {
    fn kind(&self) -> NodeKind {
        NodeKind::ClassDecl
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn visit_children<'a>(&'a self, visit: &mut dyn FnMut(&'a dyn Node)) {
        for decl in &self.variable_declarations {
            visit(decl);
        }
        for method in &self.method_declarations {
            visit(method);
        }
    }
}

impl Node for VariableDeclaration {
    fn kind(&self) -> NodeKind {
        NodeKind::VariableDeclaration
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn visit_children<'a>(&'a self, visit: &mut dyn FnMut(&'a dyn Node)) {
        visit(&self.var_type);
        for bind in &self.var_binds {
            visit(bind);
        }
    }
}

impl Node for VarBind {
    fn kind(&self) -> NodeKind {
        NodeKind::VarBind
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn visit_children<'a>(&'a self, _visit: &mut dyn FnMut(&'a dyn Node)) {}
}

impl Node for Type {
    fn kind(&self) -> NodeKind {
        NodeKind::Type
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn visit_children<'a>(&'a self, _visit: &mut dyn FnMut(&'a dyn Node)) {}
}

impl Node for MethodDecl {
    fn kind(&self) -> NodeKind {
        NodeKind::MethodDecl
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn visit_children<'a>(&'a self, visit: &mut dyn FnMut(&'a dyn Node)) {
        visit(&self.return_type);
        for param in &self.parameters {
            visit(param);
        }
        visit(&self.body);
    }
}

impl Node for Parameter {
    fn kind(&self) -> NodeKind {
        NodeKind::Parameter
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn visit_children<'a>(&'a self, visit: &mut dyn FnMut(&'a dyn Node)) {
        visit(&self.param_type);
    }
}

impl Node for Block {
    fn kind(&self) -> NodeKind {
        NodeKind::Block
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn visit_children<'a>(&'a self, visit: &mut dyn FnMut(&'a dyn Node)) {
        for decl in &self.variable_declarations {
            visit(decl);
        }
        for stmt in &self.statements {
            visit(stmt);
        }
    }
}

impl Node for Location {
    fn kind(&self) -> NodeKind {
        NodeKind::Location
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn visit_children<'a>(&'a self, visit: &mut dyn FnMut(&'a dyn Node)) {
        if let Some(index) = &self.index_expr {
            visit(index.as_ref());
        }
    }
}

impl Node for Statement {
    fn kind(&self) -> NodeKind {
        match self {
            Statement::Assignment { .. } => NodeKind::Assignment,
            Statement::ExpressionStatement { .. } => NodeKind::ExpressionStatement,
            Statement::If { .. } => NodeKind::If,
            Statement::While { .. } => NodeKind::While,
            Statement::Return { .. } => NodeKind::Return,
        }
    }

    fn position(&self) -> &Position {
        match self {
            Statement::Assignment { position, .. }
            | Statement::ExpressionStatement { position, .. }
            | Statement::If { position, .. }
            | Statement::While { position, .. }
            | Statement::Return { position, .. } => position,
        }
    }

    fn visit_children<'a>(&'a self, visit: &mut dyn FnMut(&'a dyn Node)) {
        match self {
            Statement::Assignment {
                location,
                expression,
                ..
            } => {
                visit(location);
                visit(expression);
            }
            Statement::ExpressionStatement { call, .. } => visit(call),
            Statement::If {
                condition,
                true_branch,
                false_branch,
                ..
            } => {
                visit(condition);
                visit(true_branch);
                if let Some(block) = false_branch {
                    visit(block);
                }
            }
            Statement::While {
                condition, body, ..
            } => {
                visit(condition);
                visit(body);
            }
            Statement::Return { value, .. } => {
                if let Some(value) = value {
                    visit(value);
                }
            }
        }
    }
}

impl Node for Expression {
    fn kind(&self) -> NodeKind {
        match self {
            Expression::SimpleExpression { .. } => NodeKind::SimpleExpression,
            Expression::BinaryOp { .. } => NodeKind::BinaryOp,
            Expression::PrefixOp { .. } => NodeKind::PrefixOp,
            Expression::Call { .. } => NodeKind::Call,
            Expression::PrimitiveCall { .. } => NodeKind::PrimitiveCall,
            Expression::IntegerLiteral { .. } => NodeKind::IntegerLiteral,
            Expression::CharLiteral { .. } => NodeKind::CharLiteral,
            Expression::BoolLiteral { .. } => NodeKind::BoolLiteral,
            Expression::NullLiteral { .. } => NodeKind::NullLiteral,
        }
    }

    fn position(&self) -> &Position {
        match self {
            Expression::SimpleExpression { position, .. }
            | Expression::BinaryOp { position, .. }
            | Expression::PrefixOp { position, .. }
            | Expression::Call { position, .. }
            | Expression::PrimitiveCall { position, .. }
            | Expression::IntegerLiteral { position, .. }
            | Expression::CharLiteral { position, .. }
            | Expression::BoolLiteral { position, .. }
            | Expression::NullLiteral { position } => position,
        }
    }

    fn visit_children<'a>(&'a self, visit: &mut dyn FnMut(&'a dyn Node)) {
        match self {
            Expression::BinaryOp { lhs, rhs, .. } => {
                visit(lhs.as_ref());
                visit(rhs.as_ref());
            }
            Expression::PrefixOp { operand, .. } => visit(operand.as_ref()),
            Expression::Call {
                method, arguments, ..
            } => {
                visit(method);
                for arg in arguments {
                    visit(arg);
                }
            }
            Expression::PrimitiveCall { arguments, .. } => {
                for arg in arguments {
                    visit(arg);
                }
            }
            Expression::SimpleExpression { .. }
            | Expression::IntegerLiteral { .. }
            | Expression::CharLiteral { .. }
            | Expression::BoolLiteral { .. }
            | Expression::NullLiteral { .. } => {}
        }
    }
}
