//! Lexer for Elm source text.
//!
//! Tokenization is driven by `logos`; a thin wrapper converts byte spans
//! into 1-based row/column [`Range`]s so the parser can enforce the
//! layout rules (declarations at column 1, aligned `let` bindings and
//! `case` arms) and adjacency rules (qualified names, record access).

use logos::{Lexer, Logos};

use crate::parser::ParseError;
use crate::range::{Position, Range};

/// A token with its source location.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub range: Range,
}

/// The kinds of tokens the parser consumes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    LowerName(String),
    UpperName(String),
    Int(i64),
    HexInt(i64),
    Float(f64),
    Str(String),
    Char(char),
    Glsl(String),
    Operator(String),

    Module,
    Import,
    Exposing,
    As,
    Port,
    If,
    Then,
    Else,
    Let,
    In,
    Case,
    Of,
    Type,

    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Underscore,
    Backslash,
    Eq,
    Arrow,
    Pipe,
    Dot,
    DotDot,
    Colon,
}

impl TokenKind {
    /// Short description used in "expected …" parse errors.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::LowerName(name) | TokenKind::UpperName(name) => format!("`{name}`"),
            TokenKind::Int(n) | TokenKind::HexInt(n) => format!("`{n}`"),
            TokenKind::Float(n) => format!("`{n}`"),
            TokenKind::Str(_) => "a string literal".to_string(),
            TokenKind::Char(_) => "a character literal".to_string(),
            TokenKind::Glsl(_) => "a glsl literal".to_string(),
            TokenKind::Operator(op) => format!("`{op}`"),
            TokenKind::Module => "`module`".to_string(),
            TokenKind::Import => "`import`".to_string(),
            TokenKind::Exposing => "`exposing`".to_string(),
            TokenKind::As => "`as`".to_string(),
            TokenKind::Port => "`port`".to_string(),
            TokenKind::If => "`if`".to_string(),
            TokenKind::Then => "`then`".to_string(),
            TokenKind::Else => "`else`".to_string(),
            TokenKind::Let => "`let`".to_string(),
            TokenKind::In => "`in`".to_string(),
            TokenKind::Case => "`case`".to_string(),
            TokenKind::Of => "`of`".to_string(),
            TokenKind::Type => "`type`".to_string(),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::LBrace => "`{`".to_string(),
            TokenKind::RBrace => "`}`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Underscore => "`_`".to_string(),
            TokenKind::Backslash => "`\\`".to_string(),
            TokenKind::Eq => "`=`".to_string(),
            TokenKind::Arrow => "`->`".to_string(),
            TokenKind::Pipe => "`|`".to_string(),
            TokenKind::Dot => "`.`".to_string(),
            TokenKind::DotDot => "`..`".to_string(),
            TokenKind::Colon => "`:`".to_string(),
        }
    }
}

/// Raw logos tokens, mapped to [`TokenKind`] by [`lex`].
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    // Must outrank the operator run so `--` always starts a comment.
    #[regex(r"--[^\n]*", logos::skip, priority = 10)]
    LineComment,

    #[token("module")]
    Module,
    #[token("import")]
    Import,
    #[token("exposing")]
    Exposing,
    #[token("as")]
    As,
    #[token("port")]
    Port,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("let")]
    Let,
    #[token("in")]
    In,
    #[token("case")]
    Case,
    #[token("of")]
    Of,
    #[token("type")]
    Type,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token("_")]
    Underscore,
    #[token("\\")]
    Backslash,

    #[token("{-", block_comment)]
    BlockComment,

    #[token("[glsl|", glsl_literal)]
    Glsl(String),

    #[regex(r"[a-z][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    LowerName(String),
    #[regex(r"[A-Z][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    UpperName(String),

    #[regex(r"0x[0-9a-fA-F]+", hex_literal)]
    HexInt(i64),
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", float_literal)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", float_literal)]
    Float(f64),
    #[regex(r"[0-9]+", int_literal)]
    Int(i64),

    #[token("\"\"\"", triple_string)]
    TripleStr(String),
    #[regex(r#""(?:[^"\\\n]|\\.)*""#, string_literal)]
    Str(String),
    #[regex(r"'(?:[^'\\]|\\.)+'", char_literal)]
    Char(char),

    #[regex(r"[+\-*/=.<>:&|^?%!]+", |lex| lex.slice().to_string())]
    OperatorRun(String),
}

fn int_literal(lex: &mut Lexer<RawToken>) -> Option<i64> {
    lex.slice().parse().ok()
}

fn hex_literal(lex: &mut Lexer<RawToken>) -> Option<i64> {
    i64::from_str_radix(&lex.slice()[2..], 16).ok()
}

fn float_literal(lex: &mut Lexer<RawToken>) -> Option<f64> {
    lex.slice().parse().ok()
}

fn string_literal(lex: &mut Lexer<RawToken>) -> Option<String> {
    let slice = lex.slice();
    unescape(&slice[1..slice.len() - 1])
}

fn char_literal(lex: &mut Lexer<RawToken>) -> Option<char> {
    let slice = lex.slice();
    let content = unescape(&slice[1..slice.len() - 1])?;
    let mut chars = content.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Consumes up to and including the closing `"""`.
fn triple_string(lex: &mut Lexer<RawToken>) -> Option<String> {
    let rem = lex.remainder();
    let bytes = rem.as_bytes();
    let mut i = 0;
    loop {
        if i >= bytes.len() {
            return None;
        }
        match bytes[i] {
            b'\\' => i += 2,
            b'"' if bytes[i..].starts_with(b"\"\"\"") => break,
            _ => i += 1,
        }
    }
    let content = unescape(&rem[..i])?;
    lex.bump(i + 3);
    Some(content)
}

/// Consumes a `{- … -}` comment, honoring nesting.
fn block_comment(lex: &mut Lexer<RawToken>) -> logos::Skip {
    let rem = lex.remainder();
    let mut depth = 1usize;
    let mut i = 0usize;
    while depth > 0 {
        let open = rem[i..].find("{-");
        let close = rem[i..].find("-}");
        match (open, close) {
            (Some(o), Some(c)) if o < c => {
                depth += 1;
                i += o + 2;
            }
            (_, Some(c)) => {
                depth -= 1;
                i += c + 2;
            }
            (_, None) => {
                // Unterminated comment: swallow the rest of the file.
                i = rem.len();
                break;
            }
        }
    }
    lex.bump(i);
    logos::Skip
}

/// Consumes up to and including the closing `|]`.
fn glsl_literal(lex: &mut Lexer<RawToken>) -> Option<String> {
    let rem = lex.remainder();
    let end = rem.find("|]")?;
    let shader = rem[..end].to_string();
    lex.bump(end + 2);
    Some(shader)
}

fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\\' => out.push('\\'),
            'u' => {
                if chars.next()? != '{' {
                    return None;
                }
                let mut hex = String::new();
                loop {
                    match chars.next()? {
                        '}' => break,
                        digit => hex.push(digit),
                    }
                }
                let code = u32::from_str_radix(&hex, 16).ok()?;
                out.push(char::from_u32(code)?);
            }
            _ => return None,
        }
    }
    Some(out)
}

/// Maps byte offsets to 1-based (row, column) positions. Columns count
/// characters, not bytes.
struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    fn position(&self, source: &str, offset: usize) -> Position {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let column = source[self.line_starts[line]..offset].chars().count() + 1;
        Position::new(line + 1, column)
    }
}

/// Tokenizes a source file.
pub(crate) fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let index = LineIndex::new(source);
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let range = Range::new(
            index.position(source, span.start),
            index.position(source, span.end),
        );
        let raw = result.map_err(|()| ParseError::UnexpectedCharacter {
            position: range.start,
        })?;
        let kind = match raw {
            RawToken::Module => TokenKind::Module,
            RawToken::Import => TokenKind::Import,
            RawToken::Exposing => TokenKind::Exposing,
            RawToken::As => TokenKind::As,
            RawToken::Port => TokenKind::Port,
            RawToken::If => TokenKind::If,
            RawToken::Then => TokenKind::Then,
            RawToken::Else => TokenKind::Else,
            RawToken::Let => TokenKind::Let,
            RawToken::In => TokenKind::In,
            RawToken::Case => TokenKind::Case,
            RawToken::Of => TokenKind::Of,
            RawToken::Type => TokenKind::Type,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Underscore => TokenKind::Underscore,
            RawToken::Backslash => TokenKind::Backslash,
            RawToken::Glsl(shader) => TokenKind::Glsl(shader),
            RawToken::LowerName(name) => TokenKind::LowerName(name),
            RawToken::UpperName(name) => TokenKind::UpperName(name),
            RawToken::HexInt(value) => TokenKind::HexInt(value),
            RawToken::Float(value) => TokenKind::Float(value),
            RawToken::Int(value) => TokenKind::Int(value),
            RawToken::TripleStr(value) | RawToken::Str(value) => TokenKind::Str(value),
            RawToken::Char(value) => TokenKind::Char(value),
            // Reserved symbol runs get their own kinds; anything else is
            // an operator.
            RawToken::OperatorRun(run) => match run.as_str() {
                "=" => TokenKind::Eq,
                "->" => TokenKind::Arrow,
                "|" => TokenKind::Pipe,
                "." => TokenKind::Dot,
                ".." => TokenKind::DotDot,
                ":" => TokenKind::Colon,
                _ => TokenKind::Operator(run),
            },
            RawToken::LineComment | RawToken::BlockComment => {
                unreachable!("comments are skipped")
            }
        };
        tokens.push(Token { kind, range });
    }
    Ok(tokens)
}
