//! Recursive-descent parser for Elm source files.
//!
//! Layout is enforced with a single rule: every construct owns a boundary
//! column (`min_indent`), and a token at or left of that boundary ends the
//! construct. Declarations sit at column 1, `let` bindings and `case` arms
//! align on the column of the first one, and bracketed constructs reset
//! the boundary to zero.

mod error;
mod expression;
mod pattern;

pub use error::ParseError;

use crate::ast::{
    CustomType, Declaration, DefaultModuleData, EffectModuleData, Exposing, File,
    FunctionDeclaration, FunctionImplementation, Import, Infix, InfixDirection, Module, ModuleName,
    Node, Signature, TopLevelExpose, TypeAlias, TypeAnnotation, ValueConstructor,
};
use crate::lexer::{Token, TokenKind};
use crate::range::{Position, Range};

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    // ── token plumbing ──────────────────────────────────────────────

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    /// The next token, but only if it sits right of the boundary column.
    fn peek_in(&self, min_indent: usize) -> Option<&Token> {
        self.peek().filter(|t| t.range.start.column > min_indent)
    }

    fn bump(&mut self, expected: &str) -> Result<Token, ParseError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof {
                expected: expected.to_string(),
            })?;
        self.pos += 1;
        Ok(token)
    }

    /// End position of the most recently consumed token.
    fn prev_end(&self) -> Position {
        if self.pos == 0 {
            Position::new(1, 1)
        } else {
            self.tokens[self.pos - 1].range.end
        }
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|t| &t.kind == kind)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.at(&kind) {
            self.bump(expected)
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_lower(&mut self, expected: &str) -> Result<Node<String>, ParseError> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::LowerName(_),
                ..
            }) => {
                let token = self.bump(expected)?;
                match token.kind {
                    TokenKind::LowerName(name) => Ok(Node::new(token.range, name)),
                    _ => Err(self.unexpected(expected)),
                }
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn expect_upper(&mut self, expected: &str) -> Result<Node<String>, ParseError> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::UpperName(_),
                ..
            }) => {
                let token = self.bump(expected)?;
                match token.kind {
                    TokenKind::UpperName(name) => Ok(Node::new(token.range, name)),
                    _ => Err(self.unexpected(expected)),
                }
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                found: token.kind.describe(),
                expected: expected.to_string(),
                position: token.range.start,
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    /// Parses `Upper(.Upper)*` with strict adjacency, optionally followed
    /// by an adjacent `.lower`. Returns the upper segments, the trailing
    /// lower name if any, and the covered range.
    fn parse_qualified(
        &mut self,
        allow_lower_final: bool,
    ) -> Result<(Vec<String>, Option<String>, Range), ParseError> {
        let first = self.expect_upper("a qualified name")?;
        let start = first.range.start;
        let mut end = first.range.end;
        let mut segments = vec![first.value];
        let mut final_lower = None;
        loop {
            let dot_adjacent = matches!(
                self.peek(),
                Some(Token {
                    kind: TokenKind::Dot,
                    range,
                }) if range.start == end
            );
            if !dot_adjacent {
                break;
            }
            let dot_end = self.tokens[self.pos].range.end;
            match self.peek_at(1) {
                Some(Token {
                    kind: TokenKind::UpperName(_),
                    range,
                }) if range.start == dot_end => {
                    self.bump("`.`")?;
                    let segment = self.expect_upper("a module name segment")?;
                    end = segment.range.end;
                    segments.push(segment.value);
                }
                Some(Token {
                    kind: TokenKind::LowerName(_),
                    range,
                }) if allow_lower_final && range.start == dot_end => {
                    self.bump("`.`")?;
                    let name = self.expect_lower("a name")?;
                    end = name.range.end;
                    final_lower = Some(name.value);
                    break;
                }
                _ => break,
            }
        }
        Ok((segments, final_lower, Range::new(start, end)))
    }

    // ── file structure ──────────────────────────────────────────────

    pub(crate) fn parse_file(mut self) -> Result<File, ParseError> {
        let module_definition = self.parse_module_definition()?;
        let mut imports = Vec::new();
        while self.at(&TokenKind::Import) {
            imports.push(self.parse_import()?);
        }
        let mut declarations = Vec::new();
        while self.peek().is_some() {
            declarations.push(self.parse_declaration()?);
        }
        Ok(File {
            module_definition,
            imports,
            declarations,
        })
    }

    fn parse_module_definition(&mut self) -> Result<Node<Module>, ParseError> {
        let start = match self.peek() {
            Some(token) => token.range.start,
            None => {
                return Err(ParseError::UnexpectedEof {
                    expected: "a module definition".to_string(),
                })
            }
        };
        let module = if self.eat(&TokenKind::Port) {
            self.expect(TokenKind::Module, "`module`")?;
            Module::Port(self.parse_default_module_data()?)
        } else if self.at(&TokenKind::LowerName("effect".to_string())) {
            self.bump("`effect`")?;
            self.expect(TokenKind::Module, "`module`")?;
            let module_name = self.parse_module_name()?;
            let (command, subscription) = self.parse_effect_where_block()?;
            let exposing_list = self.parse_exposing()?;
            Module::Effect(EffectModuleData {
                module_name,
                exposing_list,
                command,
                subscription,
            })
        } else {
            self.expect(TokenKind::Module, "`module`")?;
            Module::Normal(self.parse_default_module_data()?)
        };
        Ok(Node::new(Range::new(start, self.prev_end()), module))
    }

    fn parse_default_module_data(&mut self) -> Result<DefaultModuleData, ParseError> {
        let module_name = self.parse_module_name()?;
        let exposing_list = self.parse_exposing()?;
        Ok(DefaultModuleData {
            module_name,
            exposing_list,
        })
    }

    fn parse_module_name(&mut self) -> Result<Node<ModuleName>, ParseError> {
        let (segments, _, range) = self.parse_qualified(false)?;
        Ok(Node::new(range, segments))
    }

    fn parse_effect_where_block(
        &mut self,
    ) -> Result<(Option<Node<String>>, Option<Node<String>>), ParseError> {
        self.expect(TokenKind::LowerName("where".to_string()), "`where`")?;
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut command = None;
        let mut subscription = None;
        loop {
            let key = self.expect_lower("`command` or `subscription`")?;
            self.expect(TokenKind::Eq, "`=`")?;
            let value = self.expect_upper("a type name")?;
            match key.value.as_str() {
                "command" => command = Some(value),
                "subscription" => subscription = Some(value),
                _ => {
                    return Err(ParseError::UnexpectedToken {
                        found: format!("`{}`", key.value),
                        expected: "`command` or `subscription`".to_string(),
                        position: key.range.start,
                    })
                }
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}`")?;
        Ok((command, subscription))
    }

    fn parse_exposing(&mut self) -> Result<Node<Exposing>, ParseError> {
        let keyword = self.expect(TokenKind::Exposing, "`exposing`")?;
        self.expect(TokenKind::LParen, "`(`")?;
        let exposing = if self.at(&TokenKind::DotDot) {
            let dotdot = self.bump("`..`")?;
            Exposing::All(dotdot.range)
        } else {
            let mut items = vec![self.parse_expose_item()?];
            while self.eat(&TokenKind::Comma) {
                items.push(self.parse_expose_item()?);
            }
            Exposing::Explicit(items)
        };
        self.expect(TokenKind::RParen, "`)`")?;
        Ok(Node::new(
            Range::new(keyword.range.start, self.prev_end()),
            exposing,
        ))
    }

    fn parse_expose_item(&mut self) -> Result<Node<TopLevelExpose>, ParseError> {
        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::LowerName(_)) => {
                let name = self.expect_lower("an exposed name")?;
                Ok(Node::new(name.range, TopLevelExpose::Function(name.value)))
            }
            Some(TokenKind::LParen) => {
                let lparen = self.bump("`(`")?;
                let op = match self.bump("an operator")? {
                    Token {
                        kind: TokenKind::Operator(op),
                        ..
                    } => op,
                    token => {
                        return Err(ParseError::UnexpectedToken {
                            found: token.kind.describe(),
                            expected: "an operator".to_string(),
                            position: token.range.start,
                        })
                    }
                };
                let rparen = self.expect(TokenKind::RParen, "`)`")?;
                Ok(Node::new(
                    Range::new(lparen.range.start, rparen.range.end),
                    TopLevelExpose::Operator(op),
                ))
            }
            Some(TokenKind::UpperName(_)) => {
                let name = self.expect_upper("an exposed type")?;
                if self.at(&TokenKind::LParen)
                    && self.peek_at(1).is_some_and(|t| t.kind == TokenKind::DotDot)
                {
                    let lparen = self.bump("`(`")?;
                    self.bump("`..`")?;
                    let rparen = self.expect(TokenKind::RParen, "`)`")?;
                    let open = Range::new(lparen.range.start, rparen.range.end);
                    Ok(Node::new(
                        Range::new(name.range.start, rparen.range.end),
                        TopLevelExpose::TypeExpose {
                            name: name.value,
                            open: Some(open),
                        },
                    ))
                } else {
                    Ok(Node::new(
                        name.range,
                        TopLevelExpose::TypeOrAlias(name.value),
                    ))
                }
            }
            _ => Err(self.unexpected("an exposed name")),
        }
    }

    fn parse_import(&mut self) -> Result<Node<Import>, ParseError> {
        let keyword = self.expect(TokenKind::Import, "`import`")?;
        let module_name = self.parse_module_name()?;
        let module_alias = if self.eat(&TokenKind::As) {
            let alias = self.expect_upper("an import alias")?;
            Some(Node::new(alias.range, vec![alias.value]))
        } else {
            None
        };
        let exposing_list = if self.at(&TokenKind::Exposing) {
            Some(self.parse_exposing()?)
        } else {
            None
        };
        Ok(Node::new(
            Range::new(keyword.range.start, self.prev_end()),
            Import {
                module_name,
                module_alias,
                exposing_list,
            },
        ))
    }

    // ── declarations ────────────────────────────────────────────────

    fn parse_declaration(&mut self) -> Result<Node<Declaration>, ParseError> {
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => {
                return Err(ParseError::UnexpectedEof {
                    expected: "a declaration".to_string(),
                })
            }
        };
        match &token.kind {
            TokenKind::Type => self.parse_type_declaration(),
            TokenKind::Port => {
                let keyword = self.bump("`port`")?;
                let name = self.expect_lower("a port name")?;
                self.expect(TokenKind::Colon, "`:`")?;
                let type_annotation = self.parse_type(1)?;
                let range = Range::new(keyword.range.start, type_annotation.range.end);
                Ok(Node::new(
                    range,
                    Declaration::Port(Signature {
                        name,
                        type_annotation,
                    }),
                ))
            }
            TokenKind::LowerName(name) if name == "infix" && self.starts_infix_declaration() => {
                self.parse_infix_declaration()
            }
            TokenKind::LowerName(_) => {
                let (function, range) = self.parse_function(1)?;
                Ok(Node::new(range, Declaration::Function(function)))
            }
            TokenKind::LParen | TokenKind::LBrace | TokenKind::Underscore => {
                let pattern = self.parse_pattern(1)?;
                self.expect(TokenKind::Eq, "`=`")?;
                let expression = self.parse_expression(1)?;
                let range = pattern.range.merge(&expression.range);
                Ok(Node::new(
                    range,
                    Declaration::Destructuring(pattern, expression),
                ))
            }
            _ => Err(self.unexpected("a declaration")),
        }
    }

    fn starts_infix_declaration(&self) -> bool {
        matches!(
            self.peek_at(1),
            Some(Token {
                kind: TokenKind::LowerName(dir),
                ..
            }) if matches!(dir.as_str(), "left" | "right" | "non")
        )
    }

    fn parse_infix_declaration(&mut self) -> Result<Node<Declaration>, ParseError> {
        let keyword = self.bump("`infix`")?;
        let dir = self.expect_lower("`left`, `right` or `non`")?;
        let direction = match dir.value.as_str() {
            "left" => InfixDirection::Left,
            "right" => InfixDirection::Right,
            _ => InfixDirection::Non,
        };
        let precedence = match self.bump("a precedence")? {
            Token {
                kind: TokenKind::Int(n),
                range,
            } if (0..=9).contains(&n) => Node::new(range, n as u8),
            token => {
                return Err(ParseError::UnexpectedToken {
                    found: token.kind.describe(),
                    expected: "a precedence between 0 and 9".to_string(),
                    position: token.range.start,
                })
            }
        };
        self.expect(TokenKind::LParen, "`(`")?;
        let operator = match self.bump("an operator")? {
            Token {
                kind: TokenKind::Operator(op),
                range,
            } => Node::new(range, op),
            token => {
                return Err(ParseError::UnexpectedToken {
                    found: token.kind.describe(),
                    expected: "an operator".to_string(),
                    position: token.range.start,
                })
            }
        };
        self.expect(TokenKind::RParen, "`)`")?;
        self.expect(TokenKind::Eq, "`=`")?;
        let function = self.expect_lower("a function name")?;
        let range = Range::new(keyword.range.start, function.range.end);
        Ok(Node::new(
            range,
            Declaration::Infix(Infix {
                direction: Node::new(dir.range, direction),
                precedence,
                operator,
                function,
            }),
        ))
    }

    /// Parses an optional signature plus the implementation line. Shared
    /// between top-level declarations (`min_indent` 1) and `let` bindings.
    pub(crate) fn parse_function(
        &mut self,
        min_indent: usize,
    ) -> Result<(FunctionDeclaration, Range), ParseError> {
        let first_name = self.expect_lower("a function name")?;
        let (signature, impl_name) = if self.at(&TokenKind::Colon) {
            self.bump("`:`")?;
            let type_annotation = self.parse_type(min_indent)?;
            let sig_range = first_name.range.merge(&type_annotation.range);
            let signature = Node::new(
                sig_range,
                Signature {
                    name: first_name.clone(),
                    type_annotation,
                },
            );
            let impl_name = self.expect_lower("the annotated definition")?;
            if impl_name.value != first_name.value {
                return Err(ParseError::UnexpectedToken {
                    found: format!("`{}`", impl_name.value),
                    expected: format!("the definition of `{}`", first_name.value),
                    position: impl_name.range.start,
                });
            }
            (Some(signature), impl_name)
        } else {
            (None, first_name)
        };
        let mut arguments = Vec::new();
        while !self.at(&TokenKind::Eq) && self.peek_in(min_indent).is_some() {
            arguments.push(self.parse_pattern_atom(min_indent)?);
        }
        self.expect(TokenKind::Eq, "`=`")?;
        let expression = self.parse_expression(min_indent)?;
        let impl_range = impl_name.range.merge(&expression.range);
        let start = signature
            .as_ref()
            .map_or(impl_name.range.start, |sig| sig.range.start);
        let whole = Range::new(start, expression.range.end);
        let declaration = FunctionDeclaration {
            signature,
            declaration: Node::new(
                impl_range,
                FunctionImplementation {
                    name: impl_name,
                    arguments,
                    expression,
                },
            ),
        };
        Ok((declaration, whole))
    }

    fn parse_type_declaration(&mut self) -> Result<Node<Declaration>, ParseError> {
        let keyword = self.expect(TokenKind::Type, "`type`")?;
        if self.at(&TokenKind::LowerName("alias".to_string())) {
            self.bump("`alias`")?;
            let name = self.expect_upper("a type alias name")?;
            let generics = self.parse_generics(1)?;
            self.expect(TokenKind::Eq, "`=`")?;
            let type_annotation = self.parse_type(1)?;
            let range = Range::new(keyword.range.start, type_annotation.range.end);
            Ok(Node::new(
                range,
                Declaration::TypeAlias(TypeAlias {
                    name,
                    generics,
                    type_annotation,
                }),
            ))
        } else {
            let name = self.expect_upper("a type name")?;
            let generics = self.parse_generics(1)?;
            self.expect(TokenKind::Eq, "`=`")?;
            let mut constructors = vec![self.parse_value_constructor(1)?];
            while self.peek_in(1).is_some_and(|t| t.kind == TokenKind::Pipe) {
                self.bump("`|`")?;
                constructors.push(self.parse_value_constructor(1)?);
            }
            let range = Range::new(keyword.range.start, self.prev_end());
            Ok(Node::new(
                range,
                Declaration::CustomType(CustomType {
                    name,
                    generics,
                    constructors,
                }),
            ))
        }
    }

    fn parse_generics(&mut self, min_indent: usize) -> Result<Vec<Node<String>>, ParseError> {
        let mut generics = Vec::new();
        while self
            .peek_in(min_indent)
            .is_some_and(|t| matches!(t.kind, TokenKind::LowerName(_)))
        {
            generics.push(self.expect_lower("a type variable")?);
        }
        Ok(generics)
    }

    fn parse_value_constructor(
        &mut self,
        min_indent: usize,
    ) -> Result<Node<ValueConstructor>, ParseError> {
        let name = self.expect_upper("a constructor name")?;
        let mut arguments = Vec::new();
        while self.can_start_type_atom(min_indent) {
            arguments.push(self.parse_type_atom(min_indent)?);
        }
        let range = arguments
            .last()
            .map_or(name.range, |last| name.range.merge(&last.range));
        Ok(Node::new(range, ValueConstructor { name, arguments }))
    }

    // ── type annotations ────────────────────────────────────────────

    fn can_start_type_atom(&self, min_indent: usize) -> bool {
        self.peek_in(min_indent).is_some_and(|t| {
            matches!(
                t.kind,
                TokenKind::LowerName(_)
                    | TokenKind::UpperName(_)
                    | TokenKind::LParen
                    | TokenKind::LBrace
            )
        })
    }

    fn parse_type(&mut self, min_indent: usize) -> Result<Node<TypeAnnotation>, ParseError> {
        let left = self.parse_type_apply(min_indent)?;
        if self
            .peek_in(min_indent)
            .is_some_and(|t| t.kind == TokenKind::Arrow)
        {
            self.bump("`->`")?;
            let right = self.parse_type(min_indent)?;
            let range = left.range.merge(&right.range);
            Ok(Node::new(
                range,
                TypeAnnotation::Function(Box::new(left), Box::new(right)),
            ))
        } else {
            Ok(left)
        }
    }

    fn parse_type_apply(&mut self, min_indent: usize) -> Result<Node<TypeAnnotation>, ParseError> {
        if self
            .peek_in(min_indent)
            .is_some_and(|t| matches!(t.kind, TokenKind::UpperName(_)))
        {
            let (mut segments, _, name_range) = self.parse_qualified(false)?;
            let name = segments.pop().unwrap_or_default();
            let mut arguments = Vec::new();
            while self.can_start_type_atom(min_indent) {
                arguments.push(self.parse_type_atom(min_indent)?);
            }
            let range = arguments
                .last()
                .map_or(name_range, |last| name_range.merge(&last.range));
            Ok(Node::new(
                range,
                TypeAnnotation::Typed(Node::new(name_range, (segments, name)), arguments),
            ))
        } else {
            self.parse_type_atom(min_indent)
        }
    }

    fn parse_type_atom(&mut self, min_indent: usize) -> Result<Node<TypeAnnotation>, ParseError> {
        let token = match self.peek_in(min_indent) {
            Some(token) => token.clone(),
            None => return Err(self.unexpected("a type")),
        };
        match token.kind {
            TokenKind::LowerName(_) => {
                let name = self.expect_lower("a type variable")?;
                Ok(Node::new(name.range, TypeAnnotation::GenericType(name.value)))
            }
            TokenKind::UpperName(_) => {
                let (mut segments, _, range) = self.parse_qualified(false)?;
                let name = segments.pop().unwrap_or_default();
                Ok(Node::new(
                    range,
                    TypeAnnotation::Typed(Node::new(range, (segments, name)), Vec::new()),
                ))
            }
            TokenKind::LParen => {
                let lparen = self.bump("`(`")?;
                if self.at(&TokenKind::RParen) {
                    let rparen = self.bump("`)`")?;
                    return Ok(Node::new(
                        Range::new(lparen.range.start, rparen.range.end),
                        TypeAnnotation::Unit,
                    ));
                }
                let mut items = vec![self.parse_type(0)?];
                while self.eat(&TokenKind::Comma) {
                    items.push(self.parse_type(0)?);
                }
                let rparen = self.expect(TokenKind::RParen, "`)`")?;
                let range = Range::new(lparen.range.start, rparen.range.end);
                if items.len() == 1 {
                    let mut inner = items.remove(0);
                    inner.range = range;
                    Ok(inner)
                } else {
                    Ok(Node::new(range, TypeAnnotation::Tupled(items)))
                }
            }
            TokenKind::LBrace => self.parse_record_type(),
            _ => Err(self.unexpected("a type")),
        }
    }

    fn parse_record_type(&mut self) -> Result<Node<TypeAnnotation>, ParseError> {
        let lbrace = self.bump("`{`")?;
        if self.at(&TokenKind::RBrace) {
            let rbrace = self.bump("`}`")?;
            return Ok(Node::new(
                Range::new(lbrace.range.start, rbrace.range.end),
                TypeAnnotation::Record(Vec::new()),
            ));
        }
        let first_name = self.expect_lower("a field name")?;
        if self.eat(&TokenKind::Pipe) {
            let fields = self.parse_record_type_fields()?;
            let rbrace = self.expect(TokenKind::RBrace, "`}`")?;
            Ok(Node::new(
                Range::new(lbrace.range.start, rbrace.range.end),
                TypeAnnotation::GenericRecord(first_name, fields),
            ))
        } else {
            self.expect(TokenKind::Colon, "`:`")?;
            let first_type = self.parse_type(0)?;
            let first_range = first_name.range.merge(&first_type.range);
            let mut fields = vec![Node::new(first_range, (first_name, first_type))];
            while self.eat(&TokenKind::Comma) {
                let name = self.expect_lower("a field name")?;
                self.expect(TokenKind::Colon, "`:`")?;
                let ty = self.parse_type(0)?;
                let range = name.range.merge(&ty.range);
                fields.push(Node::new(range, (name, ty)));
            }
            let rbrace = self.expect(TokenKind::RBrace, "`}`")?;
            Ok(Node::new(
                Range::new(lbrace.range.start, rbrace.range.end),
                TypeAnnotation::Record(fields),
            ))
        }
    }

    fn parse_record_type_fields(
        &mut self,
    ) -> Result<Vec<Node<crate::ast::RecordTypeField>>, ParseError> {
        let mut fields = Vec::new();
        loop {
            let name = self.expect_lower("a field name")?;
            self.expect(TokenKind::Colon, "`:`")?;
            let ty = self.parse_type(0)?;
            let range = name.range.merge(&ty.range);
            fields.push(Node::new(range, (name, ty)));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(fields)
    }
}
