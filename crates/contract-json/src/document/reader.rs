// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Forward-only token reader over a parsed JSON document.

use super::{DocumentError, Token};
use serde_json::Value as JsonValue;

type DocResult<T> = Result<T, DocumentError>;

/// Forward-only reader over a flattened token stream.
#[derive(Debug, Clone)]
pub struct DocumentReader {
    tokens: Vec<Token>,
    position: usize,
}

impl DocumentReader {
    /// Parse JSON text.
    pub fn parse(text: &str) -> DocResult<Self> {
        let json: JsonValue = serde_json::from_str(text)?;
        Ok(Self::from_json(&json))
    }

    /// Flatten an already parsed JSON value.
    pub fn from_json(json: &JsonValue) -> Self {
        let mut tokens = Vec::new();
        flatten(json, &mut tokens);
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// True once every token has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub fn next_token(&mut self) -> DocResult<Token> {
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or(DocumentError::UnexpectedEnd)?;
        self.position += 1;
        Ok(token)
    }

    /// Next token is an element end (`]` or `}`).
    pub fn is_end_element(&self) -> bool {
        self.peek().is_some_and(Token::is_end)
    }

    /// Next token opens an array.
    pub fn is_start_array(&self) -> bool {
        matches!(self.peek(), Some(Token::StartArray))
    }

    /// Next token is a JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self.peek(), Some(Token::Scalar(JsonValue::Null)))
    }

    /// Advance past an opening array or object token.
    pub fn read_start_element(&mut self) -> DocResult<()> {
        match self.peek() {
            Some(t) if t.is_start() => {
                self.position += 1;
                Ok(())
            }
            _ => Err(self.unexpected("start of element")),
        }
    }

    /// Advance past a closing array or object token.
    pub fn read_end_element(&mut self) -> DocResult<()> {
        match self.peek() {
            Some(t) if t.is_end() => {
                self.position += 1;
                Ok(())
            }
            _ => Err(self.unexpected("end of element")),
        }
    }

    /// Read a scalar value.
    pub fn read_scalar(&mut self) -> DocResult<JsonValue> {
        match self.peek() {
            Some(Token::Scalar(_)) => match self.next_token()? {
                Token::Scalar(v) => Ok(v),
                _ => Err(DocumentError::UnexpectedEnd),
            },
            _ => Err(self.unexpected("scalar")),
        }
    }

    /// Read an object member name.
    pub fn read_member_name(&mut self) -> DocResult<String> {
        match self.peek() {
            Some(Token::Member(_)) => match self.next_token()? {
                Token::Member(name) => Ok(name),
                _ => Err(DocumentError::UnexpectedEnd),
            },
            _ => Err(self.unexpected("member name")),
        }
    }

    /// Skip one complete value (scalar or nested element).
    pub fn skip_element(&mut self) -> DocResult<()> {
        let mut depth = 0usize;
        loop {
            let token = self.next_token()?;
            if token.is_start() {
                depth += 1;
            } else if token.is_end() {
                depth = depth
                    .checked_sub(1)
                    .ok_or(DocumentError::Unbalanced("end element while skipping"))?;
            }
            if depth == 0 && !matches!(token, Token::Member(_)) {
                return Ok(());
            }
        }
    }

    fn unexpected(&self, expected: &'static str) -> DocumentError {
        match self.peek() {
            Some(found) => DocumentError::UnexpectedToken {
                position: self.position,
                expected,
                found: found.to_string(),
            },
            None => DocumentError::UnexpectedEnd,
        }
    }
}

fn flatten(json: &JsonValue, out: &mut Vec<Token>) {
    match json {
        JsonValue::Array(items) => {
            out.push(Token::StartArray);
            for item in items {
                flatten(item, out);
            }
            out.push(Token::EndArray);
        }
        JsonValue::Object(members) => {
            out.push(Token::StartObject);
            for (name, value) in members {
                out.push(Token::Member(name.clone()));
                flatten(value, out);
            }
            out.push(Token::EndObject);
        }
        scalar => out.push(Token::Scalar(scalar.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_nested() {
        let mut reader = DocumentReader::parse(r#"[1, {"Key": "a"}, [true]]"#).expect("parse");
        reader.read_start_element().expect("start");
        assert_eq!(reader.read_scalar().expect("scalar"), JsonValue::from(1));
        reader.read_start_element().expect("object");
        assert_eq!(reader.read_member_name().expect("member"), "Key");
        assert_eq!(reader.read_scalar().expect("scalar"), JsonValue::from("a"));
        assert!(reader.is_end_element());
        reader.read_end_element().expect("end object");
        reader.skip_element().expect("skip nested array");
        reader.read_end_element().expect("end");
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_unexpected_token() {
        let mut reader = DocumentReader::parse("42").expect("parse");
        let err = reader.read_start_element().unwrap_err();
        assert!(matches!(
            err,
            DocumentError::UnexpectedToken { position: 0, .. }
        ));
    }

    #[test]
    fn test_unexpected_end() {
        let mut reader = DocumentReader::parse("[]").expect("parse");
        reader.read_start_element().expect("start");
        reader.read_end_element().expect("end");
        assert!(matches!(
            reader.read_end_element(),
            Err(DocumentError::UnexpectedEnd)
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            DocumentReader::parse("[1,"),
            Err(DocumentError::Parse(_))
        ));
    }
}
