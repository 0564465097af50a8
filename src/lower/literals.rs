//! Literal lexeme conversion.
//!
//! The grammar only hands these functions well-formed lexemes, so every
//! failure here means the grammar and the converters disagree.

use crate::errors::{ConversionFailure, LiteralConversionError};

/// Decimal digits to a 32-bit signed integer.
pub fn parse_integer(lexeme: &str) -> Result<i32, LiteralConversionError> {
    if lexeme.is_empty() || !lexeme.bytes().all(|b| b.is_ascii_digit()) {
        return Err(failure("integer", ConversionFailure::Malformed, lexeme));
    }
    // Digits only, so the parse can only fail by overflowing.
    lexeme
        .parse::<i32>()
        .map_err(|_| failure("integer", ConversionFailure::Overflow, lexeme))
}

/// The first interior character of a quoted char literal.
///
/// Escapes are taken verbatim: `'\n'` yields `\`.
pub fn parse_char(lexeme: &str) -> Result<char, LiteralConversionError> {
    let interior = lexeme
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''));
    match interior.and_then(|body| body.chars().next()) {
        Some(c) => Ok(c),
        None => Err(failure("char", ConversionFailure::Malformed, lexeme)),
    }
}

pub fn parse_bool(lexeme: &str) -> Result<bool, LiteralConversionError> {
    match lexeme {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(failure("boolean", ConversionFailure::Malformed, lexeme)),
    }
}

fn failure(
    literal_type: &'static str,
    kind: ConversionFailure,
    lexeme: &str,
) -> LiteralConversionError {
    LiteralConversionError {
        literal_type,
        kind,
        lexeme: lexeme.to_string(),
    }
}
