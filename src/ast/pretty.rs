//! Compact prefix rendering of expressions and locations.
//!
//! `x = 1 + 1 * 2` renders its right-hand side as `(+ 1 (* 1 2))`, which
//! makes the tree shape visible at a glance in tests and CLI output.

use super::{Expression, Location};

impl Expression {
    /// Pretty-prints the expression as a prefix form.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use decaf::ast::{Expression, Position};
    /// let pos = Position { source_name: None, line: 1, column: 0, offset: 0 };
    /// let expr = Expression::BinaryOp {
    ///     position: pos.clone(),
    ///     lhs: Box::new(Expression::IntegerLiteral { position: pos.clone(), value: 1 }),
    ///     operator: "+".to_string(),
    ///     rhs: Box::new(Expression::BoolLiteral { position: pos, value: true }),
    /// };
    /// assert_eq!(expr.pretty(), "(+ 1 true)");
    /// ```
    pub fn pretty(&self) -> String {
        match self {
            Expression::SimpleExpression { text, .. } => text.clone(),
            Expression::BinaryOp {
                lhs, operator, rhs, ..
            } => format!("({} {} {})", operator, lhs.pretty(), rhs.pretty()),
            Expression::PrefixOp {
                operator, operand, ..
            } => format!("({} {})", operator, operand.pretty()),
            Expression::Call {
                method, arguments, ..
            } => Self::pretty_call(&method.pretty(), arguments),
            Expression::PrimitiveCall {
                primitive_id,
                arguments,
                ..
            } => Self::pretty_call(&format!("callout \"{}\"", primitive_id), arguments),
            Expression::IntegerLiteral { value, .. } => value.to_string(),
            Expression::CharLiteral { value, .. } => format!("'{}'", value),
            Expression::BoolLiteral { value, .. } => value.to_string(),
            Expression::NullLiteral { .. } => "null".to_string(),
        }
    }

    fn pretty_call(head: &str, arguments: &[Expression]) -> String {
        let mut s = format!("(call {}", head);
        for arg in arguments {
            s.push(' ');
            s.push_str(&arg.pretty());
        }
        s.push(')');
        s
    }
}

impl Location {
    /// Renders the location as written: `a`, `a.b`, or `a[<index>]`.
    pub fn pretty(&self) -> String {
        match (&self.path, &self.index_expr) {
            (Some(path), _) => format!("{}.{}", self.root, path),
            (None, Some(index)) => format!("{}[{}]", self.root, index.pretty()),
            (None, None) => self.root.clone(),
        }
    }
}
