//! AST module for the Decaf language
//!
//! The tree produced by lowering. Every node owns its children outright and
//! carries exactly one [`Position`]. Nothing here mutates after construction;
//! later compiler phases receive the tree as a read-only artifact.
//!
//! Serialized nodes are tagged with a stable `"type"` name (for example
//! `"AssignmentStatement"`) that is independent of the Rust type names.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::{Deserialize, Serialize};

pub mod dump;
pub mod node;
pub mod position;
pub mod pretty;
pub mod walk;

pub use node::Node;
pub use position::{LineIndex, Position};

// ============================================================================
// NODE KINDS
// ============================================================================

/// Discriminant for every concrete node variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    Program,
    ClassDecl,
    MethodDecl,
    Block,
    VariableDeclaration,
    Type,
    VarBind,
    Parameter,
    Location,
    Assignment,
    ExpressionStatement,
    Call,
    PrimitiveCall,
    If,
    While,
    Return,
    SimpleExpression,
    BinaryOp,
    PrefixOp,
    IntegerLiteral,
    CharLiteral,
    BoolLiteral,
    NullLiteral,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::ClassDecl => "ClassDecl",
            NodeKind::MethodDecl => "MethodDecl",
            NodeKind::Block => "Block",
            NodeKind::VariableDeclaration => "VariableDeclaration",
            NodeKind::Type => "Type",
            NodeKind::VarBind => "VarBind",
            NodeKind::Parameter => "Parameter",
            NodeKind::Location => "Location",
            NodeKind::Assignment => "Assignment",
            NodeKind::ExpressionStatement => "ExpressionStatement",
            NodeKind::Call => "Call",
            NodeKind::PrimitiveCall => "PrimitiveCall",
            NodeKind::If => "If",
            NodeKind::While => "While",
            NodeKind::Return => "Return",
            NodeKind::SimpleExpression => "SimpleExpression",
            NodeKind::BinaryOp => "BinaryOp",
            NodeKind::PrefixOp => "PrefixOp",
            NodeKind::IntegerLiteral => "IntegerLiteral",
            NodeKind::CharLiteral => "CharLiteral",
            NodeKind::BoolLiteral => "BoolLiteral",
            NodeKind::NullLiteral => "NullLiteral",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// A compilation unit: the classes in source order. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Program", rename_all = "camelCase")]
pub struct Program {
    pub position: Position,
    pub classes: Vec<ClassDecl>,
}

/// `class Name [extends Super] { fields... methods... }`
///
/// The superclass is recorded by name only; resolving it (and rejecting
/// inheritance cycles) belongs to semantic analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "ClassDeclaration", rename_all = "camelCase")]
pub struct ClassDecl {
    pub position: Position,
    pub name: String,
    pub super_class_name: Option<String>,
    pub variable_declarations: Vec<VariableDeclaration>,
    pub method_declarations: Vec<MethodDecl>,
}

/// One type shared by one or more bindings: `int x, y, z[];`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "VariableDeclaration", rename_all = "camelCase")]
pub struct VariableDeclaration {
    pub position: Position,
    pub var_type: Type,
    pub var_binds: Vec<VarBind>,
}

/// A single declared name, optionally array-typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "VarBind", rename_all = "camelCase")]
pub struct VarBind {
    pub position: Position,
    pub name: String,
    pub is_array: bool,
}

/// A type as written: `int`, `boolean`, `void`, or a class name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Type", rename_all = "camelCase")]
pub struct Type {
    pub position: Position,
    pub name: String,
}

impl Type {
    pub fn is_void(&self) -> bool {
        self.name == "void"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "MethodDeclaration", rename_all = "camelCase")]
pub struct MethodDecl {
    pub position: Position,
    pub return_type: Type,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Parameter", rename_all = "camelCase")]
pub struct Parameter {
    pub position: Position,
    pub param_type: Type,
    pub name: String,
    pub is_array: bool,
}

/// Local declarations followed by statements. The two never interleave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Block", rename_all = "camelCase")]
pub struct Block {
    pub position: Position,
    pub variable_declarations: Vec<VariableDeclaration>,
    pub statements: Vec<Statement>,
}

/// An assignable place: `x`, `x.field`, or `x[index]`.
///
/// At most one of `path` and `index_expr` is present. Deeper chains such as
/// `a.b.c` are rejected during lowering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Location", rename_all = "camelCase")]
pub struct Location {
    pub position: Position,
    pub root: String,
    pub path: Option<String>,
    pub index_expr: Option<Box<Expression>>,
}

impl Location {
    /// True for a plain identifier with no field access or subscript.
    pub fn is_bare(&self) -> bool {
        self.path.is_none() && self.index_expr.is_none()
    }
}

// ============================================================================
// STATEMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Statement {
    #[serde(rename = "AssignmentStatement")]
    Assignment {
        position: Position,
        location: Location,
        expression: Expression,
    },
    /// A call evaluated for its effect; `call` is always a `Call` or `PrimitiveCall`.
    #[serde(rename = "ExpressionStatement")]
    ExpressionStatement { position: Position, call: Expression },
    #[serde(rename = "IfStatement")]
    If {
        position: Position,
        condition: Expression,
        true_branch: Block,
        false_branch: Option<Block>,
    },
    #[serde(rename = "WhileStatement")]
    While {
        position: Position,
        condition: Expression,
        body: Block,
    },
    #[serde(rename = "ReturnStatement")]
    Return {
        position: Position,
        value: Option<Expression>,
    },
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

/// Expressions, literals included.
///
/// Operators are kept as their source text; giving them meaning is left to
/// later phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Expression {
    /// Placeholder for `this`, bare locations, and calls in expression
    /// position. Only the source text is kept for now.
    #[serde(rename = "SimpleExpression")]
    SimpleExpression { position: Position, text: String },
    #[serde(rename = "BinopExpression")]
    BinaryOp {
        position: Position,
        lhs: Box<Expression>,
        operator: String,
        rhs: Box<Expression>,
    },
    #[serde(rename = "PrefixExpression")]
    PrefixOp {
        position: Position,
        operator: String,
        operand: Box<Expression>,
    },
    #[serde(rename = "CallExpression")]
    Call {
        position: Position,
        method: Location,
        arguments: Vec<Expression>,
    },
    #[serde(rename = "PrimitiveCallExpression")]
    PrimitiveCall {
        position: Position,
        primitive_id: String,
        arguments: Vec<Expression>,
    },
    IntegerLiteral { position: Position, value: i32 },
    /// The raw interior character of the literal; escapes are not decoded.
    CharLiteral { position: Position, value: char },
    BoolLiteral { position: Position, value: bool },
    NullLiteral { position: Position },
}

impl Expression {
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expression::IntegerLiteral { .. }
                | Expression::CharLiteral { .. }
                | Expression::BoolLiteral { .. }
                | Expression::NullLiteral { .. }
        )
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Expression::Call { .. } | Expression::PrimitiveCall { .. })
    }
}
