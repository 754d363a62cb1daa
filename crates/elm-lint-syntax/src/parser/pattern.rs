//! Pattern parsing.

use super::Parser;
use crate::ast::{Node, Pattern};
use crate::lexer::{Token, TokenKind};
use crate::parser::ParseError;
use crate::range::Range;

impl Parser {
    /// A full pattern: constructor arguments, `::` chains and `as` aliases.
    pub(crate) fn parse_pattern(&mut self, min_indent: usize) -> Result<Node<Pattern>, ParseError> {
        let mut left = self.parse_pattern_constructor(min_indent)?;
        if self
            .peek()
            .is_some_and(|t| t.kind == TokenKind::Operator("::".to_string()))
        {
            self.bump("`::`")?;
            let right = self.parse_pattern(min_indent)?;
            let range = left.range.merge(&right.range);
            left = Node::new(range, Pattern::Cons(Box::new(left), Box::new(right)));
        }
        while self.at(&TokenKind::As) {
            self.bump("`as`")?;
            let alias = self.expect_lower("an alias name")?;
            let range = left.range.merge(&alias.range);
            left = Node::new(range, Pattern::As(Box::new(left), alias));
        }
        Ok(left)
    }

    fn parse_pattern_constructor(
        &mut self,
        min_indent: usize,
    ) -> Result<Node<Pattern>, ParseError> {
        if matches!(
            self.peek().map(|t| &t.kind),
            Some(TokenKind::UpperName(_))
        ) {
            let (mut segments, _, range) = self.parse_qualified(false)?;
            let name = segments.pop().unwrap_or_default();
            let mut args = Vec::new();
            while self.can_start_pattern_atom(min_indent) {
                args.push(self.parse_pattern_atom(min_indent)?);
            }
            let full_range = args
                .last()
                .map_or(range, |last| range.merge(&last.range));
            Ok(Node::new(
                full_range,
                Pattern::Named {
                    module_name: segments,
                    name,
                    args,
                },
            ))
        } else {
            self.parse_pattern_atom(min_indent)
        }
    }

    fn can_start_pattern_atom(&self, min_indent: usize) -> bool {
        self.peek_in(min_indent).is_some_and(|t| {
            matches!(
                t.kind,
                TokenKind::Underscore
                    | TokenKind::LowerName(_)
                    | TokenKind::UpperName(_)
                    | TokenKind::Int(_)
                    | TokenKind::HexInt(_)
                    | TokenKind::Char(_)
                    | TokenKind::Str(_)
                    | TokenKind::LParen
                    | TokenKind::LBracket
                    | TokenKind::LBrace
            )
        })
    }

    /// A pattern without constructor arguments, as found in argument lists.
    pub(crate) fn parse_pattern_atom(
        &mut self,
        min_indent: usize,
    ) -> Result<Node<Pattern>, ParseError> {
        let token = match self.peek_in(min_indent) {
            Some(token) => token.clone(),
            None => return Err(self.unexpected("a pattern")),
        };
        match token.kind {
            TokenKind::Underscore => {
                self.bump("`_`")?;
                Ok(Node::new(token.range, Pattern::Wildcard))
            }
            TokenKind::LowerName(_) => {
                let name = self.expect_lower("a pattern")?;
                Ok(Node::new(name.range, Pattern::Var(name.value)))
            }
            TokenKind::UpperName(_) => {
                let (mut segments, _, range) = self.parse_qualified(false)?;
                let name = segments.pop().unwrap_or_default();
                Ok(Node::new(
                    range,
                    Pattern::Named {
                        module_name: segments,
                        name,
                        args: Vec::new(),
                    },
                ))
            }
            TokenKind::Int(value) => {
                self.bump("a pattern")?;
                Ok(Node::new(token.range, Pattern::Int(value)))
            }
            TokenKind::HexInt(value) => {
                self.bump("a pattern")?;
                Ok(Node::new(token.range, Pattern::Hex(value)))
            }
            TokenKind::Char(value) => {
                self.bump("a pattern")?;
                Ok(Node::new(token.range, Pattern::Char(value)))
            }
            TokenKind::Str(value) => {
                self.bump("a pattern")?;
                Ok(Node::new(token.range, Pattern::String(value)))
            }
            TokenKind::Operator(ref op) if op == "-" => {
                let minus = self.bump("`-`")?;
                match self.peek() {
                    Some(Token {
                        kind: TokenKind::Int(value),
                        range,
                    }) if range.start == minus.range.end => {
                        let value = *value;
                        let end = range.end;
                        self.bump("a number")?;
                        Ok(Node::new(
                            Range::new(minus.range.start, end),
                            Pattern::Int(-value),
                        ))
                    }
                    _ => Err(self.unexpected("a number")),
                }
            }
            TokenKind::LParen => self.parse_paren_pattern(),
            TokenKind::LBracket => self.parse_list_pattern(),
            TokenKind::LBrace => self.parse_record_pattern(),
            _ => Err(self.unexpected("a pattern")),
        }
    }

    fn parse_paren_pattern(&mut self) -> Result<Node<Pattern>, ParseError> {
        let lparen = self.bump("`(`")?;
        if self.at(&TokenKind::RParen) {
            let rparen = self.bump("`)`")?;
            return Ok(Node::new(
                Range::new(lparen.range.start, rparen.range.end),
                Pattern::Unit,
            ));
        }
        let first = self.parse_pattern(0)?;
        if self.at(&TokenKind::Comma) {
            let mut items = vec![first];
            while self.eat(&TokenKind::Comma) {
                items.push(self.parse_pattern(0)?);
            }
            let rparen = self.expect(TokenKind::RParen, "`)`")?;
            Ok(Node::new(
                Range::new(lparen.range.start, rparen.range.end),
                Pattern::Tuple(items),
            ))
        } else {
            let rparen = self.expect(TokenKind::RParen, "`)`")?;
            Ok(Node::new(
                Range::new(lparen.range.start, rparen.range.end),
                Pattern::Parenthesized(Box::new(first)),
            ))
        }
    }

    fn parse_list_pattern(&mut self) -> Result<Node<Pattern>, ParseError> {
        let lbracket = self.bump("`[`")?;
        if self.at(&TokenKind::RBracket) {
            let rbracket = self.bump("`]`")?;
            return Ok(Node::new(
                Range::new(lbracket.range.start, rbracket.range.end),
                Pattern::List(Vec::new()),
            ));
        }
        let mut items = vec![self.parse_pattern(0)?];
        while self.eat(&TokenKind::Comma) {
            items.push(self.parse_pattern(0)?);
        }
        let rbracket = self.expect(TokenKind::RBracket, "`]`")?;
        Ok(Node::new(
            Range::new(lbracket.range.start, rbracket.range.end),
            Pattern::List(items),
        ))
    }

    fn parse_record_pattern(&mut self) -> Result<Node<Pattern>, ParseError> {
        let lbrace = self.bump("`{`")?;
        if self.at(&TokenKind::RBrace) {
            let rbrace = self.bump("`}`")?;
            return Ok(Node::new(
                Range::new(lbrace.range.start, rbrace.range.end),
                Pattern::Record(Vec::new()),
            ));
        }
        let mut fields = vec![self.expect_lower("a field name")?];
        while self.eat(&TokenKind::Comma) {
            fields.push(self.expect_lower("a field name")?);
        }
        let rbrace = self.expect(TokenKind::RBrace, "`}`")?;
        Ok(Node::new(
            Range::new(lbrace.range.start, rbrace.range.end),
            Pattern::Record(fields),
        ))
    }
}
