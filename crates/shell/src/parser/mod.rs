// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation request parser.
//!
//! Turns a command line such as
//! `/subsystem=logging/logger=app:write-attribute(name=level,value=DEBUG){blocking-timeout=5}`
//! into an [`Operation`]. The grammar is:
//!
//! ```text
//! line     := address? ( ':' opname params? headers? )?
//! address  := '/' | ('/'? segment ('/' segment)*)
//! segment  := word '=' word
//! params   := '(' ( param (',' param)* )? ')'
//! param    := word ('=' value)?
//! value    := quoted | '[' values ']' | '{' entries '}' | literal
//! headers  := '{' ( word '=' value (';' word '=' value)* )? '}'
//! ```
//!
//! A parameter without a value is `true`. Unquoted literals are typed:
//! `true`/`false` become booleans, integers become longs, anything holding
//! `${...}` stays an unresolved expression. Quoted text is always a string.

mod words;

pub use words::{is_skippable, split_args, split_command, split_top_level};

use indexmap::IndexMap;
use mgmt_core::{Address, ModelValue, Operation, Segment};

use crate::parse_error::ParseError;
use crate::span::Span;
use mgmt_core::value::SYNTAX_CHARS;

/// Parse a full operation request line.
pub fn parse_operation(line: &str) -> Result<Operation, ParseError> {
    Parser::new(line).operation()
}

/// Parse a standalone header block: `{rollback-on-runtime-failure=false;blocking-timeout=5}`.
pub fn parse_headers(text: &str) -> Result<IndexMap<String, ModelValue>, ParseError> {
    let mut parser = Parser::new(text);
    parser.skip_ws();
    let headers = parser.headers()?;
    parser.expect_end()?;
    Ok(headers)
}

/// Parse a single value the way it would be written as a parameter.
pub fn parse_value(text: &str) -> Result<ModelValue, ParseError> {
    let mut parser = Parser::new(text);
    let value = parser.value(&[])?;
    parser.expect_end()?;
    Ok(value)
}

/// Cursor over one command line. Positions are byte offsets.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::UnexpectedChar {
                found,
                expected: expected.to_string(),
                span: Span::new(self.pos, self.pos + found.len_utf8()),
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    fn expect(&mut self, c: char, expected: &str) -> Result<(), ParseError> {
        if self.peek() == Some(c) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        self.skip_ws();
        if self.at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    fn operation(mut self) -> Result<Operation, ParseError> {
        self.skip_ws();
        if self.at_end() {
            return Err(ParseError::Empty);
        }
        let address = self.address()?;
        self.skip_ws();
        if self.at_end() {
            return Err(ParseError::MissingOperation {
                span: Span::new(0, self.input.len()),
            });
        }
        self.expect(':', "':' before the operation name")?;
        self.skip_ws();
        let name = self.word("operation name")?;
        let mut op = Operation::new(address, name);
        self.skip_ws();
        if self.peek() == Some('(') {
            op.params = self.params()?;
            self.skip_ws();
        }
        if self.peek() == Some('{') {
            op.headers = self.headers()?;
        }
        self.expect_end()?;
        Ok(op)
    }

    fn address(&mut self) -> Result<Address, ParseError> {
        let mut segments = Vec::new();
        if self.peek() == Some('/') {
            self.bump();
        }
        loop {
            self.skip_ws();
            if matches!(self.peek(), None | Some(':')) {
                break;
            }
            let kind = self.word("resource type")?;
            self.skip_ws();
            self.expect('=', "'=' between resource type and name")?;
            self.skip_ws();
            let name = self.word("resource name")?;
            segments.push(Segment::new(kind, name));
            self.skip_ws();
            if self.peek() != Some('/') {
                break;
            }
            self.bump();
        }
        Ok(Address::new(segments))
    }

    /// A name: quoted, or unquoted up to whitespace or a syntax character.
    fn word(&mut self, expected: &str) -> Result<String, ParseError> {
        if self.peek() == Some('"') {
            return self.quoted();
        }
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && !SYNTAX_CHARS.contains(&c))
        {
            self.bump();
        }
        if self.pos == start {
            return Err(self.unexpected(expected));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn quoted(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some(c) => out.push(c),
                    None => break,
                },
                Some(c) => out.push(c),
                None => break,
            }
        }
        Err(ParseError::UnterminatedQuote {
            span: Span::new(start, self.input.len()),
        })
    }

    fn params(&mut self) -> Result<IndexMap<String, ModelValue>, ParseError> {
        self.expect('(', "'('")?;
        let mut params = IndexMap::new();
        self.skip_ws();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(params);
        }
        loop {
            self.skip_ws();
            let start = self.pos;
            let key = self.word("parameter name")?;
            let key_span = Span::new(start, self.pos);
            self.skip_ws();
            let value = if self.peek() == Some('=') {
                self.bump();
                self.value(&[',', ')'])?
            } else {
                ModelValue::Boolean(true)
            };
            if params.contains_key(&key) {
                return Err(ParseError::DuplicateParameter {
                    name: key,
                    span: key_span,
                });
            }
            params.insert(key, value);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(')') => {
                    self.bump();
                    return Ok(params);
                }
                _ => return Err(self.unexpected("',' or ')'")),
            }
        }
    }

    fn headers(&mut self) -> Result<IndexMap<String, ModelValue>, ParseError> {
        self.expect('{', "'{' opening the headers")?;
        let mut headers = IndexMap::new();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(headers);
        }
        loop {
            self.skip_ws();
            let key = self.word("header name")?;
            self.skip_ws();
            self.expect('=', "'=' after header name")?;
            let value = self.value(&[';', '}'])?;
            headers.insert(key, value);
            self.skip_ws();
            match self.peek() {
                Some(';') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    return Ok(headers);
                }
                _ => return Err(self.unexpected("';' or '}'")),
            }
        }
    }

    fn value(&mut self, terminators: &[char]) -> Result<ModelValue, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some('"') => self.quoted().map(ModelValue::String),
            Some('[') => self.list(),
            Some('{') => self.object(),
            _ => self.literal(terminators),
        }
    }

    fn list(&mut self) -> Result<ModelValue, ParseError> {
        self.bump();
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(']') {
            self.bump();
            return Ok(ModelValue::List(items));
        }
        loop {
            items.push(self.value(&[',', ']'])?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {
                    self.bump();
                    return Ok(ModelValue::List(items));
                }
                _ => return Err(self.unexpected("',' or ']'")),
            }
        }
    }

    /// `{k=v,...}`; `=>` is accepted as the key separator too.
    fn object(&mut self) -> Result<ModelValue, ParseError> {
        self.bump();
        let mut map = IndexMap::new();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(ModelValue::Object(map));
        }
        loop {
            self.skip_ws();
            let key = self.word("object key")?;
            self.skip_ws();
            self.expect('=', "'=' after object key")?;
            if self.peek() == Some('>') {
                self.bump();
            }
            let value = self.value(&[',', '}'])?;
            map.insert(key, value);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    return Ok(ModelValue::Object(map));
                }
                _ => return Err(self.unexpected("',' or '}'")),
            }
        }
    }

    fn literal(&mut self, terminators: &[char]) -> Result<ModelValue, ParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if terminators.contains(&c) {
                break;
            }
            if c == '$' && self.peek_second() == Some('{') {
                self.expression_body()?;
                continue;
            }
            self.bump();
        }
        let text = self.input[start..self.pos].trim_end();
        if text.is_empty() {
            return Err(self.unexpected("a value"));
        }
        Ok(typed_literal(text))
    }

    /// Consume `${...}`, including nested braces.
    fn expression_body(&mut self) -> Result<(), ParseError> {
        self.bump();
        self.bump();
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump() {
                Some('{') => depth += 1,
                Some('}') => depth -= 1,
                Some(_) => {}
                None => {
                    return Err(ParseError::UnexpectedEof {
                        expected: "'}' closing the expression".to_string(),
                    })
                }
            }
        }
        Ok(())
    }
}

fn typed_literal(text: &str) -> ModelValue {
    match text {
        "true" => ModelValue::Boolean(true),
        "false" => ModelValue::Boolean(false),
        _ => {
            if let Ok(n) = text.parse::<i64>() {
                ModelValue::Long(n)
            } else if text.contains("${") {
                ModelValue::Expression(text.to_string())
            } else {
                ModelValue::String(text.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "../parser_tests/mod.rs"]
mod tests;
