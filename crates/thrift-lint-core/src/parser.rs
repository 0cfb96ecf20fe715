//! Lexer and recursive-descent parser for Thrift documents.
//!
//! The parser covers the subset of the Thrift grammar the checks exercise:
//! headers, constants, typedefs, enums, structs/unions/exceptions, services,
//! container and base types, annotations, and doc comments.

use crate::ast::{
    Annotation, BaseType, BaseTypeId, Constant, ConstantReference, ConstantValue,
    ConstantValueKind, Definition, Enum, EnumItem, Field, Function, Header, Include, ListType,
    MapType, Namespace, Pos, Program, Requiredness, Service, SetType, Struct, StructureKind, Type,
    TypeReference, Typedef,
};
use thiserror::Error;

/// A positioned parse error record.
#[derive(Debug, Clone)]
pub struct ParseErrorDetail {
    /// Where the error occurred.
    pub pos: Pos,
    /// What went wrong.
    pub message: String,
}

/// A failed parse, carrying one record per syntax error.
#[derive(Debug, Clone, Error)]
#[error("syntax error at line {}: {}", self.errors[0].pos.line, self.errors[0].message)]
pub struct ParseError {
    /// The individual error records.
    pub errors: Vec<ParseErrorDetail>,
}

impl ParseError {
    fn at(pos: Pos, message: impl Into<String>) -> Self {
        Self {
            errors: vec![ParseErrorDetail {
                pos,
                message: message.into(),
            }],
        }
    }
}

/// Parses Thrift document content.
///
/// # Errors
///
/// Returns a [`ParseError`] on the first syntax error encountered.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse_program()
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Identifier(String),
    IntLiteral(i64),
    DoubleLiteral(f64),
    StringLiteral(String),
    DocComment(String),
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LAngle,
    RAngle,
    Comma,
    Semicolon,
    Colon,
    Equals,
    Star,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            Self::Identifier(name) => format!("identifier {name:?}"),
            Self::IntLiteral(v) => format!("integer {v}"),
            Self::DoubleLiteral(v) => format!("double {v}"),
            Self::StringLiteral(_) => "string literal".to_string(),
            Self::DocComment(_) => "doc comment".to_string(),
            Self::LBrace => "'{'".to_string(),
            Self::RBrace => "'}'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::LBracket => "'['".to_string(),
            Self::RBracket => "']'".to_string(),
            Self::LAngle => "'<'".to_string(),
            Self::RAngle => "'>'".to_string(),
            Self::Comma => "','".to_string(),
            Self::Semicolon => "';'".to_string(),
            Self::Colon => "':'".to_string(),
            Self::Equals => "'='".to_string(),
            Self::Star => "'*'".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    pos: Pos,
}

struct Lexer<'s> {
    chars: std::iter::Peekable<std::str::Chars<'s>>,
    line: usize,
    column: usize,
}

impl<'s> Lexer<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn pos(&self) -> Pos {
        Pos::new(self.line, self.column)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(&c) = self.chars.peek() {
            let pos = self.pos();
            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    self.bump();
                }
                '#' => self.skip_line(),
                '/' => {
                    self.bump();
                    match self.chars.peek() {
                        Some('/') => self.skip_line(),
                        Some('*') => {
                            if let Some(doc) = self.block_comment(pos)? {
                                tokens.push(Token {
                                    kind: TokenKind::DocComment(doc),
                                    pos,
                                });
                            }
                        }
                        _ => return Err(ParseError::at(pos, "unexpected character '/'")),
                    }
                }
                '"' | '\'' => {
                    let value = self.string_literal(c, pos)?;
                    tokens.push(Token {
                        kind: TokenKind::StringLiteral(value),
                        pos,
                    });
                }
                '0'..='9' | '+' | '-' => {
                    let kind = self.number(pos)?;
                    tokens.push(Token { kind, pos });
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let mut name = String::new();
                    while let Some(&c) = self.chars.peek() {
                        if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                            name.push(c);
                            self.bump();
                        } else {
                            break;
                        }
                    }
                    tokens.push(Token {
                        kind: TokenKind::Identifier(name),
                        pos,
                    });
                }
                _ => {
                    self.bump();
                    let kind = match c {
                        '{' => TokenKind::LBrace,
                        '}' => TokenKind::RBrace,
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '[' => TokenKind::LBracket,
                        ']' => TokenKind::RBracket,
                        '<' => TokenKind::LAngle,
                        '>' => TokenKind::RAngle,
                        ',' => TokenKind::Comma,
                        ';' => TokenKind::Semicolon,
                        ':' => TokenKind::Colon,
                        '=' => TokenKind::Equals,
                        '*' => TokenKind::Star,
                        other => {
                            return Err(ParseError::at(
                                pos,
                                format!("unexpected character {other:?}"),
                            ));
                        }
                    };
                    tokens.push(Token { kind, pos });
                }
            }
        }
        Ok(tokens)
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Consumes a `/* ... */` comment, returning its body when it is a
    /// `/** ... */` doc comment.
    fn block_comment(&mut self, start: Pos) -> Result<Option<String>, ParseError> {
        self.bump(); // consume '*'
        let is_doc = self.chars.peek() == Some(&'*');
        let mut body = String::new();
        let mut prev = '\0';
        loop {
            let Some(c) = self.bump() else {
                return Err(ParseError::at(start, "unterminated block comment"));
            };
            if prev == '*' && c == '/' {
                body.pop(); // drop the trailing '*'
                break;
            }
            body.push(c);
            prev = c;
        }
        if is_doc {
            // "/**/" lexes as a doc comment with an empty body.
            let body = body.strip_prefix('*').unwrap_or(&body);
            Ok(Some(body.trim().to_string()))
        } else {
            Ok(None)
        }
    }

    fn string_literal(&mut self, quote: char, start: Pos) -> Result<String, ParseError> {
        self.bump(); // consume the opening quote
        let mut value = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(ParseError::at(start, "unterminated string literal"));
            };
            if c == quote {
                return Ok(value);
            }
            if c == '\\' {
                let Some(escaped) = self.bump() else {
                    return Err(ParseError::at(start, "unterminated string literal"));
                };
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
            } else {
                value.push(c);
            }
        }
    }

    fn number(&mut self, start: Pos) -> Result<TokenKind, ParseError> {
        let mut text = String::new();
        if matches!(self.chars.peek(), Some('+' | '-')) {
            if let Some(sign) = self.bump() {
                text.push(sign);
            }
        }
        let mut is_double = false;
        while let Some(&c) = self.chars.peek() {
            match c {
                '0'..='9' => {
                    text.push(c);
                    self.bump();
                }
                '.' | 'e' | 'E' => {
                    is_double = true;
                    text.push(c);
                    self.bump();
                    if matches!(self.chars.peek(), Some('+' | '-')) {
                        if let Some(sign) = self.bump() {
                            text.push(sign);
                        }
                    }
                }
                'x' | 'X' if text == "0" => {
                    self.bump();
                    let mut hex = String::new();
                    while let Some(&h) = self.chars.peek() {
                        if h.is_ascii_hexdigit() {
                            hex.push(h);
                            self.bump();
                        } else {
                            break;
                        }
                    }
                    let value = i64::from_str_radix(&hex, 16)
                        .map_err(|_| ParseError::at(start, "malformed hex literal"))?;
                    return Ok(TokenKind::IntLiteral(value));
                }
                _ => break,
            }
        }
        if is_double {
            let value: f64 = text
                .parse()
                .map_err(|_| ParseError::at(start, format!("malformed number {text:?}")))?;
            Ok(TokenKind::DoubleLiteral(value))
        } else {
            let value: i64 = text
                .parse()
                .map_err(|_| ParseError::at(start, format!("malformed number {text:?}")))?;
            Ok(TokenKind::IntLiteral(value))
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    pending_doc: Option<String>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            index: 0,
            pending_doc: None,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn eof_pos(&self) -> Pos {
        self.tokens.last().map_or(Pos::new(1, 1), |t| t.pos)
    }

    /// Consumes doc-comment tokens, remembering the last one for the next
    /// declaration.
    fn skip_docs(&mut self) {
        while let Some(token) = self.peek() {
            if let TokenKind::DocComment(text) = &token.kind {
                self.pending_doc = Some(text.clone());
                self.index += 1;
            } else {
                break;
            }
        }
    }

    fn take_doc(&mut self) -> Option<String> {
        self.pending_doc.take()
    }

    fn expect(&mut self, expected: &TokenKind) -> Result<Token, ParseError> {
        match self.advance() {
            Some(token) if token.kind == *expected => Ok(token),
            Some(token) => Err(ParseError::at(
                token.pos,
                format!(
                    "expected {}, found {}",
                    expected.describe(),
                    token.kind.describe()
                ),
            )),
            None => Err(ParseError::at(
                self.eof_pos(),
                format!("expected {}, found end of input", expected.describe()),
            )),
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Result<(String, Pos), ParseError> {
        match self.advance() {
            Some(Token {
                kind: TokenKind::Identifier(name),
                pos,
            }) => Ok((name, pos)),
            Some(token) => Err(ParseError::at(
                token.pos,
                format!("expected {what}, found {}", token.kind.describe()),
            )),
            None => Err(ParseError::at(
                self.eof_pos(),
                format!("expected {what}, found end of input"),
            )),
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().is_some_and(|t| t.kind == *kind) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn eat_separator(&mut self) {
        while self.eat(&TokenKind::Comma) || self.eat(&TokenKind::Semicolon) {}
    }

    fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut program = Program::default();
        loop {
            self.skip_docs();
            let Some(token) = self.peek() else { break };
            let pos = token.pos;
            let TokenKind::Identifier(keyword) = token.kind.clone() else {
                return Err(ParseError::at(
                    pos,
                    format!("unexpected {}", token.kind.describe()),
                ));
            };
            self.index += 1;
            match keyword.as_str() {
                "include" => {
                    let path = self.expect_string("include path")?;
                    program.headers.push(Header::Include(Include { path, pos }));
                }
                "namespace" => {
                    let scope = match self.advance() {
                        Some(Token {
                            kind: TokenKind::Identifier(scope),
                            ..
                        }) => scope,
                        Some(Token {
                            kind: TokenKind::Star,
                            ..
                        }) => "*".to_string(),
                        other => {
                            let pos = other.map_or_else(|| self.eof_pos(), |t| t.pos);
                            return Err(ParseError::at(pos, "expected namespace scope"));
                        }
                    };
                    let (name, _) = self.expect_identifier("namespace name")?;
                    program
                        .headers
                        .push(Header::Namespace(Namespace { scope, name, pos }));
                }
                "const" => program
                    .definitions
                    .push(Definition::Constant(self.parse_constant(pos)?)),
                "typedef" => program
                    .definitions
                    .push(Definition::Typedef(self.parse_typedef(pos)?)),
                "enum" => program
                    .definitions
                    .push(Definition::Enum(self.parse_enum(pos)?)),
                "struct" => program.definitions.push(Definition::Struct(
                    self.parse_struct(StructureKind::Struct, pos)?,
                )),
                "union" => program.definitions.push(Definition::Struct(
                    self.parse_struct(StructureKind::Union, pos)?,
                )),
                "exception" => program.definitions.push(Definition::Struct(
                    self.parse_struct(StructureKind::Exception, pos)?,
                )),
                "service" => program
                    .definitions
                    .push(Definition::Service(self.parse_service(pos)?)),
                other => {
                    return Err(ParseError::at(pos, format!("unexpected keyword {other:?}")));
                }
            }
        }
        Ok(program)
    }

    fn expect_string(&mut self, what: &str) -> Result<String, ParseError> {
        match self.advance() {
            Some(Token {
                kind: TokenKind::StringLiteral(value),
                ..
            }) => Ok(value),
            Some(token) => Err(ParseError::at(
                token.pos,
                format!("expected {what}, found {}", token.kind.describe()),
            )),
            None => Err(ParseError::at(
                self.eof_pos(),
                format!("expected {what}, found end of input"),
            )),
        }
    }

    fn parse_constant(&mut self, pos: Pos) -> Result<Constant, ParseError> {
        let doc = self.take_doc();
        let value_type = self.parse_type()?;
        let (name, _) = self.expect_identifier("constant name")?;
        self.expect(&TokenKind::Equals)?;
        let value = self.parse_constant_value()?;
        let annotations = self.parse_annotations()?;
        self.eat_separator();
        Ok(Constant {
            name,
            value_type,
            value,
            doc,
            annotations,
            pos,
        })
    }

    fn parse_typedef(&mut self, pos: Pos) -> Result<Typedef, ParseError> {
        let doc = self.take_doc();
        let target = self.parse_type()?;
        let (name, _) = self.expect_identifier("typedef name")?;
        let annotations = self.parse_annotations()?;
        self.eat_separator();
        Ok(Typedef {
            name,
            target,
            doc,
            annotations,
            pos,
        })
    }

    fn parse_enum(&mut self, pos: Pos) -> Result<Enum, ParseError> {
        let doc = self.take_doc();
        let (name, _) = self.expect_identifier("enum name")?;
        self.expect(&TokenKind::LBrace)?;
        let mut items = Vec::new();
        loop {
            self.skip_docs();
            if self.eat(&TokenKind::RBrace) {
                break;
            }
            let item_doc = self.take_doc();
            let (item_name, item_pos) = self.expect_identifier("enum item name")?;
            let value = if self.eat(&TokenKind::Equals) {
                match self.advance() {
                    Some(Token {
                        kind: TokenKind::IntLiteral(v),
                        ..
                    }) => Some(v),
                    other => {
                        let pos = other.map_or_else(|| self.eof_pos(), |t| t.pos);
                        return Err(ParseError::at(pos, "expected integer enum value"));
                    }
                }
            } else {
                None
            };
            let annotations = self.parse_annotations()?;
            self.eat_separator();
            items.push(EnumItem {
                name: item_name,
                value,
                doc: item_doc,
                annotations,
                pos: item_pos,
            });
        }
        let annotations = self.parse_annotations()?;
        Ok(Enum {
            name,
            items,
            doc,
            annotations,
            pos,
        })
    }

    fn parse_struct(&mut self, kind: StructureKind, pos: Pos) -> Result<Struct, ParseError> {
        let doc = self.take_doc();
        let (name, _) = self.expect_identifier("structure name")?;
        self.expect(&TokenKind::LBrace)?;
        let fields = self.parse_field_block(&TokenKind::RBrace)?;
        let annotations = self.parse_annotations()?;
        Ok(Struct {
            name,
            kind,
            fields,
            doc,
            annotations,
            pos,
        })
    }

    fn parse_service(&mut self, pos: Pos) -> Result<Service, ParseError> {
        let doc = self.take_doc();
        let (name, _) = self.expect_identifier("service name")?;
        let extends = if self
            .peek()
            .is_some_and(|t| t.kind == TokenKind::Identifier("extends".to_string()))
        {
            self.index += 1;
            Some(self.expect_identifier("service name")?.0)
        } else {
            None
        };
        self.expect(&TokenKind::LBrace)?;
        let mut functions = Vec::new();
        loop {
            self.skip_docs();
            if self.eat(&TokenKind::RBrace) {
                break;
            }
            functions.push(self.parse_function()?);
        }
        let annotations = self.parse_annotations()?;
        Ok(Service {
            name,
            extends,
            functions,
            doc,
            annotations,
            pos,
        })
    }

    fn parse_function(&mut self) -> Result<Function, ParseError> {
        let doc = self.take_doc();
        let mut oneway = false;
        if self
            .peek()
            .is_some_and(|t| t.kind == TokenKind::Identifier("oneway".to_string()))
        {
            oneway = true;
            self.index += 1;
        }
        let is_void = self
            .peek()
            .is_some_and(|t| t.kind == TokenKind::Identifier("void".to_string()));
        let return_type = if is_void {
            self.index += 1;
            None
        } else {
            Some(self.parse_type()?)
        };
        let (name, pos) = self.expect_identifier("function name")?;
        self.expect(&TokenKind::LParen)?;
        let params = self.parse_field_block(&TokenKind::RParen)?;
        let throws = if self
            .peek()
            .is_some_and(|t| t.kind == TokenKind::Identifier("throws".to_string()))
        {
            self.index += 1;
            self.expect(&TokenKind::LParen)?;
            self.parse_field_block(&TokenKind::RParen)?
        } else {
            Vec::new()
        };
        let annotations = self.parse_annotations()?;
        self.eat_separator();
        Ok(Function {
            name,
            oneway,
            return_type,
            params,
            throws,
            doc,
            annotations,
            pos,
        })
    }

    fn parse_field_block(&mut self, close: &TokenKind) -> Result<Vec<Field>, ParseError> {
        let mut fields = Vec::new();
        loop {
            self.skip_docs();
            if self.eat(close) {
                break;
            }
            fields.push(self.parse_field()?);
        }
        Ok(fields)
    }

    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let doc = self.take_doc();
        let start = self.peek().map_or_else(|| self.eof_pos(), |t| t.pos);

        let id = if matches!(
            self.peek().map(|t| &t.kind),
            Some(TokenKind::IntLiteral(_))
        ) {
            let Some(Token {
                kind: TokenKind::IntLiteral(id),
                ..
            }) = self.advance()
            else {
                unreachable!("peeked an integer literal");
            };
            self.expect(&TokenKind::Colon)?;
            Some(id)
        } else {
            None
        };

        let mut requiredness = Requiredness::Unspecified;
        if let Some(Token {
            kind: TokenKind::Identifier(word),
            ..
        }) = self.peek()
        {
            match word.as_str() {
                "required" => {
                    requiredness = Requiredness::Required;
                    self.index += 1;
                }
                "optional" => {
                    requiredness = Requiredness::Optional;
                    self.index += 1;
                }
                _ => {}
            }
        }

        let field_type = self.parse_type()?;
        let (name, _) = self.expect_identifier("field name")?;
        let default = if self.eat(&TokenKind::Equals) {
            Some(self.parse_constant_value()?)
        } else {
            None
        };
        let annotations = self.parse_annotations()?;
        self.eat_separator();
        Ok(Field {
            id,
            requiredness,
            field_type,
            name,
            default,
            doc,
            annotations,
            pos: start,
        })
    }

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let (name, pos) = self.expect_identifier("type")?;
        let mut ty = match name.as_str() {
            "map" => {
                self.expect(&TokenKind::LAngle)?;
                let key = self.parse_type()?;
                self.expect(&TokenKind::Comma)?;
                let value = self.parse_type()?;
                self.expect(&TokenKind::RAngle)?;
                Type::Map(Box::new(MapType {
                    key,
                    value,
                    annotations: Vec::new(),
                    pos,
                }))
            }
            "list" => {
                self.expect(&TokenKind::LAngle)?;
                let value = self.parse_type()?;
                self.expect(&TokenKind::RAngle)?;
                Type::List(Box::new(ListType {
                    value,
                    annotations: Vec::new(),
                    pos,
                }))
            }
            "set" => {
                self.expect(&TokenKind::LAngle)?;
                let value = self.parse_type()?;
                self.expect(&TokenKind::RAngle)?;
                Type::Set(Box::new(SetType {
                    value,
                    annotations: Vec::new(),
                    pos,
                }))
            }
            other => {
                let id = match other {
                    "bool" => Some(BaseTypeId::Bool),
                    "byte" | "i8" => Some(BaseTypeId::I8),
                    "i16" => Some(BaseTypeId::I16),
                    "i32" => Some(BaseTypeId::I32),
                    "i64" => Some(BaseTypeId::I64),
                    "double" => Some(BaseTypeId::Double),
                    "string" => Some(BaseTypeId::String),
                    "binary" => Some(BaseTypeId::Binary),
                    _ => None,
                };
                match id {
                    Some(id) => Type::Base(BaseType {
                        id,
                        annotations: Vec::new(),
                        pos,
                    }),
                    None => Type::Reference(TypeReference { name, pos }),
                }
            }
        };

        // Type annotations sit between the type and the following name.
        if self.peek().is_some_and(|t| t.kind == TokenKind::LParen) {
            let annotations = self.parse_annotations()?;
            match &mut ty {
                Type::Base(b) => b.annotations = annotations,
                Type::Map(m) => m.annotations = annotations,
                Type::List(l) => l.annotations = annotations,
                Type::Set(s) => s.annotations = annotations,
                Type::Reference(_) => {}
            }
        }

        Ok(ty)
    }

    fn parse_constant_value(&mut self) -> Result<ConstantValue, ParseError> {
        let token = self.advance().ok_or_else(|| {
            ParseError::at(self.eof_pos(), "expected constant value, found end of input")
        })?;
        let pos = token.pos;
        let kind = match token.kind {
            TokenKind::IntLiteral(v) => ConstantValueKind::Integer(v),
            TokenKind::DoubleLiteral(v) => ConstantValueKind::Double(v),
            TokenKind::StringLiteral(v) => ConstantValueKind::String(v),
            TokenKind::Identifier(name) => match name.as_str() {
                "true" => ConstantValueKind::Bool(true),
                "false" => ConstantValueKind::Bool(false),
                _ => ConstantValueKind::Reference(ConstantReference { name, pos }),
            },
            TokenKind::LBracket => {
                let mut values = Vec::new();
                loop {
                    if self.eat(&TokenKind::RBracket) {
                        break;
                    }
                    values.push(self.parse_constant_value()?);
                    self.eat_separator();
                }
                ConstantValueKind::List(values)
            }
            TokenKind::LBrace => {
                let mut entries = Vec::new();
                loop {
                    if self.eat(&TokenKind::RBrace) {
                        break;
                    }
                    let key = self.parse_constant_value()?;
                    self.expect(&TokenKind::Colon)?;
                    let value = self.parse_constant_value()?;
                    self.eat_separator();
                    entries.push((key, value));
                }
                ConstantValueKind::Map(entries)
            }
            other => {
                return Err(ParseError::at(
                    pos,
                    format!("expected constant value, found {}", other.describe()),
                ));
            }
        };
        Ok(ConstantValue { kind, pos })
    }

    fn parse_annotations(&mut self) -> Result<Vec<Annotation>, ParseError> {
        let mut annotations = Vec::new();
        if !self.eat(&TokenKind::LParen) {
            return Ok(annotations);
        }
        loop {
            if self.eat(&TokenKind::RParen) {
                break;
            }
            let (name, pos) = self.expect_identifier("annotation name")?;
            let value = if self.eat(&TokenKind::Equals) {
                match self.advance() {
                    Some(Token {
                        kind: TokenKind::StringLiteral(v),
                        ..
                    }) => v,
                    Some(Token {
                        kind: TokenKind::IntLiteral(v),
                        ..
                    }) => v.to_string(),
                    Some(Token {
                        kind: TokenKind::Identifier(v),
                        ..
                    }) => v,
                    other => {
                        let pos = other.map_or_else(|| self.eof_pos(), |t| t.pos);
                        return Err(ParseError::at(pos, "expected annotation value"));
                    }
                }
            } else {
                String::new()
            };
            annotations.push(Annotation { name, value, pos });
            self.eat_separator();
        }
        Ok(annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeRef;

    #[test]
    fn parses_struct_and_enum() {
        let program = parse(
            r"
            struct TestStruct {
                1: string field1
                2: bool field2
            }

            enum TestEnum {
                ONE = 1
                TWO = 2
            }
            ",
        )
        .unwrap();

        assert_eq!(program.definitions.len(), 2);
        let Definition::Struct(s) = &program.definitions[0] else {
            panic!("expected a struct");
        };
        assert_eq!(s.name, "TestStruct");
        assert_eq!(s.fields.len(), 2);
        assert_eq!(s.fields[0].id, Some(1));
        assert_eq!(s.fields[1].name, "field2");

        let Definition::Enum(e) = &program.definitions[1] else {
            panic!("expected an enum");
        };
        assert_eq!(e.items.len(), 2);
        assert_eq!(e.items[1].value, Some(2));
    }

    #[test]
    fn parses_headers() {
        let program = parse(
            r#"
            include "shared/common.thrift"
            namespace py idl.test
            namespace * all
            "#,
        )
        .unwrap();
        assert_eq!(program.headers.len(), 3);
        assert_eq!(program.includes().count(), 1);
        let Header::Namespace(ns) = &program.headers[2] else {
            panic!("expected a namespace");
        };
        assert_eq!(ns.scope, "*");
    }

    #[test]
    fn parses_nested_containers() {
        let program = parse("struct S { 1: map<string, list<set<i32>>> m }").unwrap();
        let Definition::Struct(s) = &program.definitions[0] else {
            panic!("expected a struct");
        };
        let Type::Map(m) = &s.fields[0].field_type else {
            panic!("expected a map");
        };
        assert!(matches!(&m.value, Type::List(_)));
    }

    #[test]
    fn parses_annotations_and_docs() {
        let program = parse(
            r#"
            /** Widget holds things. */
            struct Widget {
                1: optional i64 id (deprecated = "true")
            } (nolint)
            "#,
        )
        .unwrap();
        let Definition::Struct(s) = &program.definitions[0] else {
            panic!("expected a struct");
        };
        assert_eq!(s.doc.as_deref(), Some("Widget holds things."));
        assert_eq!(s.annotations[0].name, "nolint");
        assert_eq!(s.fields[0].annotations[0].value, "true");
        assert_eq!(s.fields[0].requiredness, Requiredness::Optional);
    }

    #[test]
    fn parses_constants_and_typedefs() {
        let program = parse(
            r#"
            const i32 MAX = 0x10
            const list<string> NAMES = ["a", "b"]
            const map<string, i32> AGES = {"a": 1}
            const Level DEFAULT_LEVEL = Level.LOW
            typedef map<string, string> Tags
            "#,
        )
        .unwrap();
        assert_eq!(program.definitions.len(), 5);
        let Definition::Constant(c) = &program.definitions[0] else {
            panic!("expected a constant");
        };
        assert!(matches!(c.value.kind, ConstantValueKind::Integer(16)));
        let Definition::Constant(c) = &program.definitions[3] else {
            panic!("expected a constant");
        };
        assert!(matches!(&c.value.kind, ConstantValueKind::Reference(r) if r.name == "Level.LOW"));
    }

    #[test]
    fn parses_services() {
        let program = parse(
            r"
            service Lookup extends Base {
                list<string> find(1: string key) throws (1: NotFound nf)
                oneway void ping()
            }
            ",
        )
        .unwrap();
        let Definition::Service(s) = &program.definitions[0] else {
            panic!("expected a service");
        };
        assert_eq!(s.extends.as_deref(), Some("Base"));
        assert_eq!(s.functions.len(), 2);
        assert_eq!(s.functions[0].throws.len(), 1);
        assert!(s.functions[1].oneway);
        assert!(s.functions[1].return_type.is_none());
    }

    #[test]
    fn reports_positioned_errors() {
        let err = parse("struct S {").unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert!(err.errors[0].pos.line >= 1);

        let err = parse("struct S }").unwrap_err();
        assert!(err.errors[0].message.contains("expected"));
    }

    #[test]
    fn walks_expected_node_count() {
        let program = parse(
            r"
            struct TestStruct {
                1: string field1
                2: bool field2
            }

            enum TestEnum {
                ONE = 1
                TWO = 2
            }
            ",
        )
        .unwrap();

        fn count(node: NodeRef<'_>) -> usize {
            1 + node.children().iter().map(|c| count(*c)).sum::<usize>()
        }
        // program + struct + 2 fields + 2 base types + enum + 2 items
        assert_eq!(count(NodeRef::Program(&program)), 9);
    }
}
