//! Decaf Parser
//!
//! The parser collaborator: matches source text against the `program` rule
//! of `grammar.pest` and hands back the concrete parse tree. It builds no
//! AST and never recovers; failures are described here and routed to the
//! installed error listener by the engine.

use pest::{
    error::{Error, ErrorVariant, InputLocation},
    iterators::Pair,
    Parser,
};
use pest_derive::Parser;

use crate::syntax::lexer;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
pub struct DecafParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses a whole compilation unit, returning the `program` pair.
pub fn parse_tree(source: &str) -> Result<Pair<'_, Rule>, Error<Rule>> {
    let mut pairs = DecafParser::parse(Rule::program, source)?;
    pairs.next().ok_or_else(|| {
        Error::new_from_pos(
            ErrorVariant::CustomError {
                message: "parser produced no program".to_string(),
            },
            pest::Position::from_start(source),
        )
    })
}

/// A parse failure reduced to what the diagnostic reporter needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// Byte offset of the offending input.
    pub offset: usize,
    /// The offending token's text, or `<EOF>`.
    pub found: String,
    /// Human-readable message, e.g. ``mismatched input `}` expecting identifier``.
    pub message: String,
}

/// Describes a pest error the way the reporter prints it.
pub fn describe_failure(error: &Error<Rule>, source: &str) -> ParseFailure {
    let offset = match error.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };
    let found = offending_text(source, offset);

    let message = match &error.variant {
        ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
            format!(
                "mismatched input `{}` expecting {}",
                found,
                expected_list(positives)
            )
        }
        ErrorVariant::ParsingError { .. } => format!("extraneous input `{}`", found),
        ErrorVariant::CustomError { message } => message.clone(),
    };

    ParseFailure {
        offset,
        found,
        message,
    }
}

// ============================================================================
// MESSAGE HELPERS
// ============================================================================

fn offending_text(source: &str, offset: usize) -> String {
    if offset >= source.len() {
        return "<EOF>".to_string();
    }
    match lexer::token_at(source, offset) {
        Some(token) => token.to_string(),
        None => source[offset..]
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_else(|| "<EOF>".to_string()),
    }
}

fn expected_list(positives: &[Rule]) -> String {
    let mut names: Vec<String> = Vec::new();
    for rule in positives {
        let name = describe_rule(*rule);
        if !names.contains(&name) {
            names.push(name);
        }
    }
    if names.len() == 1 {
        names.remove(0)
    } else {
        format!("{{{}}}", names.join(", "))
    }
}

/// Readable name for a grammar rule, as used in "expecting ..." messages.
pub fn describe_rule(rule: Rule) -> String {
    let name = match rule {
        Rule::EOI => "<EOF>",
        Rule::BOOLEAN => "'boolean'",
        Rule::CALLOUT => "'callout'",
        Rule::CLASS => "'class'",
        Rule::ELSE => "'else'",
        Rule::EXTENDS => "'extends'",
        Rule::FALSE => "'false'",
        Rule::IF => "'if'",
        Rule::INT => "'int'",
        Rule::NEW => "'new'",
        Rule::NULL => "'null'",
        Rule::RETURN => "'return'",
        Rule::THIS => "'this'",
        Rule::TRUE => "'true'",
        Rule::VOID => "'void'",
        Rule::WHILE => "'while'",
        Rule::ident => "identifier",
        Rule::int_lit => "integer literal",
        Rule::char_lit => "char literal",
        Rule::string_lit => "string literal",
        Rule::or_op => "'||'",
        Rule::and_op => "'&&'",
        Rule::eq_op => "equality operator",
        Rule::rel_op => "relational operator",
        Rule::add_op => "'+' or '-'",
        Rule::mul_op => "'*' or '/'",
        Rule::not_op => "'!'",
        Rule::class_decl => "class declaration",
        Rule::superclass => "'extends'",
        Rule::var_decl => "variable declaration",
        Rule::var_bind_list | Rule::var_bind => "variable name",
        Rule::array_marker => "'[]'",
        Rule::type_name | Rule::return_type => "type",
        Rule::method_decl => "method declaration",
        Rule::param_list | Rule::param => "parameter",
        Rule::block => "block",
        Rule::statement
        | Rule::assign_stmt
        | Rule::expression_stmt
        | Rule::if_stmt
        | Rule::while_stmt
        | Rule::return_stmt => "statement",
        Rule::else_branch => "'else'",
        Rule::call_expr | Rule::method_call | Rule::prim_callout => "call",
        Rule::arg_list | Rule::callout_arg => "argument",
        Rule::location => "location",
        Rule::field_access => "'.'",
        Rule::index_access => "'['",
        Rule::expr
        | Rule::or_expr
        | Rule::and_expr
        | Rule::eq_expr
        | Rule::rel_expr
        | Rule::add_expr
        | Rule::mul_expr
        | Rule::unary_expr
        | Rule::not_expr
        | Rule::primary
        | Rule::paren_expr
        | Rule::simple_expr => "expression",
        Rule::new_object | Rule::new_array => "'new'",
        Rule::literal | Rule::bool_lit | Rule::null_lit => "literal",
        other => return format!("{:?}", other).replace('_', " "),
    };
    name.to_string()
}
