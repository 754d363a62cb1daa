//! Expression parsing.
//!
//! Operator chains are parsed left-folded with a placeholder
//! associativity; post-processing re-associates them from the operator
//! table (see `post_process`).

use super::Parser;
use crate::ast::{
    CaseBlock, Expression, InfixDirection, Lambda, LetBlock, LetDeclaration, Node,
};
use crate::lexer::{Token, TokenKind};
use crate::parser::ParseError;
use crate::range::Range;

impl Parser {
    pub(crate) fn parse_expression(
        &mut self,
        min_indent: usize,
    ) -> Result<Node<Expression>, ParseError> {
        match self.peek_in(min_indent).map(|t| t.kind.clone()) {
            Some(TokenKind::If) => self.parse_if(min_indent),
            Some(TokenKind::Let) => self.parse_let(min_indent),
            Some(TokenKind::Case) => self.parse_case(min_indent),
            Some(TokenKind::Backslash) => self.parse_lambda(min_indent),
            Some(_) => self.parse_operator_chain(min_indent),
            None => Err(self.unexpected("an expression")),
        }
    }

    fn parse_operator_chain(&mut self, min_indent: usize) -> Result<Node<Expression>, ParseError> {
        let mut left = self.parse_application(min_indent)?;
        loop {
            let op = match self.peek_in(min_indent) {
                Some(Token {
                    kind: TokenKind::Operator(op),
                    ..
                }) => op.clone(),
                _ => break,
            };
            self.bump("an operator")?;
            let right = match self.peek_in(min_indent).map(|t| t.kind.clone()) {
                Some(
                    TokenKind::If | TokenKind::Let | TokenKind::Case | TokenKind::Backslash,
                ) => self.parse_expression(min_indent)?,
                _ => self.parse_application(min_indent)?,
            };
            let range = left.range.merge(&right.range);
            left = Node::new(
                range,
                Expression::OperatorApplication(
                    op,
                    InfixDirection::Non,
                    Box::new(left),
                    Box::new(right),
                ),
            );
        }
        Ok(left)
    }

    fn parse_application(&mut self, min_indent: usize) -> Result<Node<Expression>, ParseError> {
        let first = self.parse_atom(min_indent)?;
        if !self.can_start_argument(min_indent) {
            return Ok(first);
        }
        let mut operands = vec![first];
        while self.can_start_argument(min_indent) {
            operands.push(self.parse_atom(min_indent)?);
        }
        let range = operands[0].range.merge(&operands[operands.len() - 1].range);
        Ok(Node::new(range, Expression::Application(operands)))
    }

    fn can_start_argument(&self, min_indent: usize) -> bool {
        let Some(token) = self.peek_in(min_indent) else {
            return false;
        };
        match &token.kind {
            TokenKind::LowerName(_)
            | TokenKind::UpperName(_)
            | TokenKind::Int(_)
            | TokenKind::HexInt(_)
            | TokenKind::Float(_)
            | TokenKind::Str(_)
            | TokenKind::Char(_)
            | TokenKind::Glsl(_)
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::LBrace => true,
            TokenKind::Dot => self.dot_starts_accessor_function(),
            // `f -1` applies `f` to a negated literal; `f - 1` subtracts.
            TokenKind::Operator(op) if op == "-" => {
                let attached_right = self
                    .peek_at(1)
                    .is_some_and(|next| next.range.start == token.range.end);
                let attached_left = token.range.start == self.prev_end();
                attached_right && !attached_left
            }
            _ => false,
        }
    }

    fn dot_starts_accessor_function(&self) -> bool {
        match (self.peek(), self.peek_at(1)) {
            (
                Some(Token {
                    kind: TokenKind::Dot,
                    range: dot_range,
                }),
                Some(Token {
                    kind: TokenKind::LowerName(_),
                    range: name_range,
                }),
            ) => name_range.start == dot_range.end,
            _ => false,
        }
    }

    fn parse_atom(&mut self, min_indent: usize) -> Result<Node<Expression>, ParseError> {
        let token = match self.peek_in(min_indent) {
            Some(token) => token.clone(),
            None => return Err(self.unexpected("an expression")),
        };
        let base = match token.kind {
            TokenKind::LowerName(_) | TokenKind::UpperName(_) => self.parse_reference()?,
            TokenKind::Int(value) => self.leaf(Expression::Integer(value))?,
            TokenKind::HexInt(value) => self.leaf(Expression::Hex(value))?,
            TokenKind::Float(value) => self.leaf(Expression::Float(value))?,
            TokenKind::Str(value) => self.leaf(Expression::StringLiteral(value))?,
            TokenKind::Char(value) => self.leaf(Expression::CharLiteral(value))?,
            TokenKind::Glsl(shader) => self.leaf(Expression::Glsl(shader))?,
            TokenKind::Dot => {
                let dot = self.bump("`.`")?;
                if !self.dot_was_accessor(&dot) {
                    return Err(ParseError::UnexpectedToken {
                        found: "`.`".to_string(),
                        expected: "a record accessor like `.name`".to_string(),
                        position: dot.range.start,
                    });
                }
                let name = self.expect_lower("a field name")?;
                Node::new(
                    Range::new(dot.range.start, name.range.end),
                    Expression::RecordAccessFunction(name.value),
                )
            }
            TokenKind::Operator(ref op) if op == "-" => {
                let minus = self.bump("`-`")?;
                let attached = self
                    .peek()
                    .is_some_and(|next| next.range.start == minus.range.end);
                if !attached {
                    return Err(ParseError::UnexpectedToken {
                        found: "`-`".to_string(),
                        expected: "an expression".to_string(),
                        position: minus.range.start,
                    });
                }
                let inner = self.parse_atom(min_indent)?;
                Node::new(
                    Range::new(minus.range.start, inner.range.end),
                    Expression::Negation(Box::new(inner)),
                )
            }
            TokenKind::LParen => self.parse_paren_expression()?,
            TokenKind::LBracket => self.parse_list_expression()?,
            TokenKind::LBrace => self.parse_record_expression()?,
            _ => return Err(self.unexpected("an expression")),
        };
        self.parse_access_chain(base)
    }

    fn dot_was_accessor(&self, dot: &Token) -> bool {
        self.peek().is_some_and(|next| {
            matches!(next.kind, TokenKind::LowerName(_)) && next.range.start == dot.range.end
        })
    }

    fn leaf(&mut self, expression: Expression) -> Result<Node<Expression>, ParseError> {
        let token = self.bump("a literal")?;
        Ok(Node::new(token.range, expression))
    }

    /// Chained record access: `config.server.port`.
    fn parse_access_chain(
        &mut self,
        mut base: Node<Expression>,
    ) -> Result<Node<Expression>, ParseError> {
        loop {
            let dot_adjacent = matches!(
                self.peek(),
                Some(Token {
                    kind: TokenKind::Dot,
                    range,
                }) if range.start == self.prev_end()
            );
            if !dot_adjacent || !self.dot_starts_accessor_function() {
                break;
            }
            self.bump("`.`")?;
            let name = self.expect_lower("a field name")?;
            let range = Range::new(base.range.start, name.range.end);
            base = Node::new(range, Expression::RecordAccess(Box::new(base), name));
        }
        Ok(base)
    }

    fn parse_reference(&mut self) -> Result<Node<Expression>, ParseError> {
        if matches!(
            self.peek().map(|t| &t.kind),
            Some(TokenKind::LowerName(_))
        ) {
            let name = self.expect_lower("a name")?;
            return Ok(Node::new(
                name.range,
                Expression::FunctionOrValue(Vec::new(), name.value),
            ));
        }
        let (mut segments, final_lower, range) = self.parse_qualified(true)?;
        match final_lower {
            Some(name) => Ok(Node::new(
                range,
                Expression::FunctionOrValue(segments, name),
            )),
            None => {
                let name = segments.pop().unwrap_or_default();
                Ok(Node::new(range, Expression::FunctionOrValue(segments, name)))
            }
        }
    }

    fn parse_paren_expression(&mut self) -> Result<Node<Expression>, ParseError> {
        let lparen = self.bump("`(`")?;
        if self.at(&TokenKind::RParen) {
            let rparen = self.bump("`)`")?;
            return Ok(Node::new(
                Range::new(lparen.range.start, rparen.range.end),
                Expression::Unit,
            ));
        }
        // `(+)` section of an operator
        let is_section = matches!(
            (self.peek(), self.peek_at(1)),
            (
                Some(Token {
                    kind: TokenKind::Operator(_),
                    ..
                }),
                Some(Token {
                    kind: TokenKind::RParen,
                    ..
                }),
            )
        );
        if is_section {
            let token = self.bump("an operator")?;
            let rparen = self.bump("`)`")?;
            if let TokenKind::Operator(op) = token.kind {
                return Ok(Node::new(
                    Range::new(lparen.range.start, rparen.range.end),
                    Expression::PrefixOperator(op),
                ));
            }
        }
        let first = self.parse_expression(0)?;
        if self.at(&TokenKind::Comma) {
            let mut items = vec![first];
            while self.eat(&TokenKind::Comma) {
                items.push(self.parse_expression(0)?);
            }
            let rparen = self.expect(TokenKind::RParen, "`)`")?;
            Ok(Node::new(
                Range::new(lparen.range.start, rparen.range.end),
                Expression::Tupled(items),
            ))
        } else {
            let rparen = self.expect(TokenKind::RParen, "`)`")?;
            Ok(Node::new(
                Range::new(lparen.range.start, rparen.range.end),
                Expression::Parenthesized(Box::new(first)),
            ))
        }
    }

    fn parse_list_expression(&mut self) -> Result<Node<Expression>, ParseError> {
        let lbracket = self.bump("`[`")?;
        if self.at(&TokenKind::RBracket) {
            let rbracket = self.bump("`]`")?;
            return Ok(Node::new(
                Range::new(lbracket.range.start, rbracket.range.end),
                Expression::List(Vec::new()),
            ));
        }
        let mut items = vec![self.parse_expression(0)?];
        while self.eat(&TokenKind::Comma) {
            items.push(self.parse_expression(0)?);
        }
        let rbracket = self.expect(TokenKind::RBracket, "`]`")?;
        Ok(Node::new(
            Range::new(lbracket.range.start, rbracket.range.end),
            Expression::List(items),
        ))
    }

    fn parse_record_expression(&mut self) -> Result<Node<Expression>, ParseError> {
        let lbrace = self.bump("`{`")?;
        if self.at(&TokenKind::RBrace) {
            let rbrace = self.bump("`}`")?;
            return Ok(Node::new(
                Range::new(lbrace.range.start, rbrace.range.end),
                Expression::Record(Vec::new()),
            ));
        }
        let first_name = self.expect_lower("a field name")?;
        if self.eat(&TokenKind::Pipe) {
            let setters = self.parse_record_setters()?;
            let rbrace = self.expect(TokenKind::RBrace, "`}`")?;
            return Ok(Node::new(
                Range::new(lbrace.range.start, rbrace.range.end),
                Expression::RecordUpdate(first_name, setters),
            ));
        }
        self.expect(TokenKind::Eq, "`=`")?;
        let first_value = self.parse_expression(0)?;
        let first_range = first_name.range.merge(&first_value.range);
        let mut setters = vec![Node::new(first_range, (first_name, first_value))];
        while self.eat(&TokenKind::Comma) {
            setters.push(self.parse_record_setter()?);
        }
        let rbrace = self.expect(TokenKind::RBrace, "`}`")?;
        Ok(Node::new(
            Range::new(lbrace.range.start, rbrace.range.end),
            Expression::Record(setters),
        ))
    }

    fn parse_record_setters(
        &mut self,
    ) -> Result<Vec<Node<crate::ast::RecordSetter>>, ParseError> {
        let mut setters = vec![self.parse_record_setter()?];
        while self.eat(&TokenKind::Comma) {
            setters.push(self.parse_record_setter()?);
        }
        Ok(setters)
    }

    fn parse_record_setter(&mut self) -> Result<Node<crate::ast::RecordSetter>, ParseError> {
        let name = self.expect_lower("a field name")?;
        self.expect(TokenKind::Eq, "`=`")?;
        let value = self.parse_expression(0)?;
        let range = name.range.merge(&value.range);
        Ok(Node::new(range, (name, value)))
    }

    fn parse_if(&mut self, min_indent: usize) -> Result<Node<Expression>, ParseError> {
        let keyword = self.bump("`if`")?;
        let condition = self.parse_expression(min_indent)?;
        self.expect(TokenKind::Then, "`then`")?;
        let then_branch = self.parse_expression(min_indent)?;
        self.expect(TokenKind::Else, "`else`")?;
        let else_branch = self.parse_expression(min_indent)?;
        let range = Range::new(keyword.range.start, else_branch.range.end);
        Ok(Node::new(
            range,
            Expression::If(
                Box::new(condition),
                Box::new(then_branch),
                Box::new(else_branch),
            ),
        ))
    }

    fn parse_lambda(&mut self, min_indent: usize) -> Result<Node<Expression>, ParseError> {
        let backslash = self.bump("`\\`")?;
        let mut args = vec![self.parse_pattern_atom(min_indent)?];
        while !self.at(&TokenKind::Arrow) && self.peek_in(min_indent).is_some() {
            args.push(self.parse_pattern_atom(min_indent)?);
        }
        self.expect(TokenKind::Arrow, "`->`")?;
        let body = self.parse_expression(min_indent)?;
        let range = Range::new(backslash.range.start, body.range.end);
        Ok(Node::new(
            range,
            Expression::Lambda(Lambda {
                args,
                expression: Box::new(body),
            }),
        ))
    }

    fn parse_let(&mut self, min_indent: usize) -> Result<Node<Expression>, ParseError> {
        let keyword = self.bump("`let`")?;
        let binding_column = match self.peek() {
            Some(token) => token.range.start.column,
            None => {
                return Err(ParseError::UnexpectedEof {
                    expected: "a let binding".to_string(),
                })
            }
        };
        let mut declarations = vec![self.parse_let_declaration(binding_column)?];
        loop {
            match self.peek() {
                Some(token)
                    if token.kind != TokenKind::In
                        && token.range.start.column == binding_column =>
                {
                    declarations.push(self.parse_let_declaration(binding_column)?);
                }
                _ => break,
            }
        }
        self.expect(TokenKind::In, "`in`")?;
        let body = self.parse_expression(min_indent)?;
        let range = Range::new(keyword.range.start, body.range.end);
        Ok(Node::new(
            range,
            Expression::Let(LetBlock {
                declarations,
                expression: Box::new(body),
            }),
        ))
    }

    fn parse_let_declaration(
        &mut self,
        binding_column: usize,
    ) -> Result<Node<LetDeclaration>, ParseError> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::LowerName(_)) => {
                let (function, range) = self.parse_function(binding_column)?;
                Ok(Node::new(range, LetDeclaration::LetFunction(function)))
            }
            Some(_) => {
                let pattern = self.parse_pattern(binding_column)?;
                self.expect(TokenKind::Eq, "`=`")?;
                let expression = self.parse_expression(binding_column)?;
                let range = pattern.range.merge(&expression.range);
                Ok(Node::new(
                    range,
                    LetDeclaration::LetDestructuring(pattern, expression),
                ))
            }
            None => Err(ParseError::UnexpectedEof {
                expected: "a let binding".to_string(),
            }),
        }
    }

    fn parse_case(&mut self, min_indent: usize) -> Result<Node<Expression>, ParseError> {
        let keyword = self.bump("`case`")?;
        let scrutinee = self.parse_expression(min_indent)?;
        self.expect(TokenKind::Of, "`of`")?;
        let arm_column = match self.peek() {
            Some(token) => token.range.start.column,
            None => {
                return Err(ParseError::UnexpectedEof {
                    expected: "a case branch".to_string(),
                })
            }
        };
        let mut cases = Vec::new();
        loop {
            let pattern = self.parse_pattern(min_indent)?;
            self.expect(TokenKind::Arrow, "`->`")?;
            let body = self.parse_expression(arm_column)?;
            cases.push((pattern, body));
            match self.peek() {
                Some(token)
                    if token.range.start.column == arm_column
                        && token.range.start.column > min_indent =>
                {
                    continue;
                }
                _ => break,
            }
        }
        let range = Range::new(keyword.range.start, self.prev_end());
        Ok(Node::new(
            range,
            Expression::Case(CaseBlock {
                expression: Box::new(scrutinee),
                cases,
            }),
        ))
    }
}
