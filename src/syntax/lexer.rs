//! Decaf Lexer
//!
//! The lexer collaborator. It reuses the grammar's token rules one lexeme
//! at a time, so the token stream and the parser always agree on what a
//! token is. Whitespace and `//` comments are skipped.

use std::fmt;

use pest::{iterators::Pair, Parser};
use serde::Serialize;

use crate::{
    ast::LineIndex,
    syntax::parser::{DecafParser, Rule},
};

// ============================================================================
// TOKENS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Keywords
    Boolean,
    Callout,
    Class,
    Else,
    Extends,
    False,
    If,
    Int,
    New,
    Null,
    Return,
    This,
    True,
    Void,
    While,
    // Names and literals
    Ident,
    IntLit,
    CharLit,
    StringLit,
    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBrack,
    RBrack,
    Semi,
    Comma,
    Dot,
    // Operators
    Not,
    Plus,
    Minus,
    Mult,
    Div,
    Leq,
    Geq,
    Lt,
    Gt,
    Eq,
    Neq,
    And,
    Or,
    Assign,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One lexeme with its location. Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// The first input that starts no token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexFailure {
    pub offset: usize,
}

impl LexFailure {
    /// The unrecognized character, as reported to the user.
    pub fn offending_text(self, source: &str) -> &str {
        let rest = &source[self.offset..];
        match rest.chars().next() {
            Some(c) => &rest[..c.len_utf8()],
            None => "",
        }
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Splits `source` into tokens, ending with an `Eof` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexFailure> {
    let lines = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut offset = skip_trivia(source, 0);

    while offset < source.len() {
        let pair = match lexeme_at(source, offset) {
            Some(pair) => pair,
            None => return Err(LexFailure { offset }),
        };
        let kind = classify(&pair).ok_or(LexFailure { offset })?;
        let text = pair.as_str();
        tokens.push(make_token(source, &lines, offset, kind, text));
        offset = skip_trivia(source, offset + text.len());
    }

    tokens.push(make_token(source, &lines, source.len(), TokenKind::Eof, ""));
    Ok(tokens)
}

/// The text of the token starting exactly at `offset`, if any.
pub fn token_at(source: &str, offset: usize) -> Option<&str> {
    if offset >= source.len() || !source.is_char_boundary(offset) {
        return None;
    }
    let pair = lexeme_at(source, offset)?;
    let len = pair.as_str().len();
    Some(&source[offset..offset + len])
}

/// Offset just past the last token in `source[start..limit]`.
///
/// Trailing whitespace and comments are excluded. Input that is not a
/// token leaves the range unchanged.
pub fn content_end(source: &str, start: usize, limit: usize) -> usize {
    let limit = limit.min(source.len());
    let mut end = start;
    let mut offset = start;

    while offset < limit {
        let len = match lexeme_at(source, offset) {
            Some(pair) => pair.as_str().len(),
            None => return limit,
        };
        end = (offset + len).min(limit);
        offset = skip_trivia(source, end);
    }
    end
}

// ============================================================================
// HELPERS
// ============================================================================

/// The rest of the line at `offset`, line break included.
///
/// Lexemes never cross a line break, so the entry rules only ever see one
/// line and the cost of a lookup does not grow with the input.
fn line_rest(source: &str, offset: usize) -> &str {
    let rest = &source[offset..];
    match rest.find('\n') {
        Some(at) => &rest[..=at],
        None => rest,
    }
}

fn lexeme_at(source: &str, offset: usize) -> Option<Pair<'_, Rule>> {
    let lexeme = DecafParser::parse(Rule::lexeme, line_rest(source, offset))
        .ok()?
        .next()?;
    let token = lexeme.into_inner().next()?;
    if token.as_str().is_empty() {
        return None;
    }
    Some(token)
}

fn skip_trivia(source: &str, mut offset: usize) -> usize {
    loop {
        let line = line_rest(source, offset);
        let skipped = match DecafParser::parse(Rule::trivia, line) {
            Ok(mut pairs) => pairs.next().map_or(0, |p| p.as_str().len()),
            Err(_) => 0,
        };
        offset += skipped;
        if skipped == 0 || skipped < line.len() {
            return offset;
        }
    }
}

fn make_token(
    source: &str,
    lines: &LineIndex,
    offset: usize,
    kind: TokenKind,
    text: &str,
) -> Token {
    let (line, column) = lines.line_col(source, offset);
    Token {
        kind,
        text: text.to_string(),
        offset,
        line,
        column,
    }
}

/// The token kind of a `lexeme` child; `None` for any other rule.
fn classify(pair: &Pair<'_, Rule>) -> Option<TokenKind> {
    let text = pair.as_str();
    let kind = match pair.as_rule() {
        Rule::BOOLEAN => TokenKind::Boolean,
        Rule::CALLOUT => TokenKind::Callout,
        Rule::CLASS => TokenKind::Class,
        Rule::ELSE => TokenKind::Else,
        Rule::EXTENDS => TokenKind::Extends,
        Rule::FALSE => TokenKind::False,
        Rule::IF => TokenKind::If,
        Rule::INT => TokenKind::Int,
        Rule::NEW => TokenKind::New,
        Rule::NULL => TokenKind::Null,
        Rule::RETURN => TokenKind::Return,
        Rule::THIS => TokenKind::This,
        Rule::TRUE => TokenKind::True,
        Rule::VOID => TokenKind::Void,
        Rule::WHILE => TokenKind::While,
        Rule::int_lit => TokenKind::IntLit,
        Rule::char_lit => TokenKind::CharLit,
        Rule::string_lit => TokenKind::StringLit,
        Rule::LPAREN => TokenKind::LParen,
        Rule::RPAREN => TokenKind::RParen,
        Rule::LBRACE => TokenKind::LBrace,
        Rule::RBRACE => TokenKind::RBrace,
        Rule::LBRACK => TokenKind::LBrack,
        Rule::RBRACK => TokenKind::RBrack,
        Rule::SEMI => TokenKind::Semi,
        Rule::COMMA => TokenKind::Comma,
        Rule::DOT => TokenKind::Dot,
        Rule::ASSIGN => TokenKind::Assign,
        Rule::not_op => TokenKind::Not,
        Rule::or_op => TokenKind::Or,
        Rule::and_op => TokenKind::And,
        Rule::eq_op if text == "==" => TokenKind::Eq,
        Rule::eq_op => TokenKind::Neq,
        Rule::rel_op => match text {
            "<=" => TokenKind::Leq,
            ">=" => TokenKind::Geq,
            "<" => TokenKind::Lt,
            _ => TokenKind::Gt,
        },
        Rule::add_op if text == "+" => TokenKind::Plus,
        Rule::add_op => TokenKind::Minus,
        Rule::mul_op if text == "*" => TokenKind::Mult,
        Rule::mul_op => TokenKind::Div,
        Rule::ident => TokenKind::Ident,
        _ => return None,
    };
    Some(kind)
}
