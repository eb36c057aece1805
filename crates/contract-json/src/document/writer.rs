// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Token writer building a JSON document.

use super::DocumentError;
use serde_json::{Map, Value as JsonValue};

type DocResult<T> = Result<T, DocumentError>;

#[derive(Debug)]
enum Frame {
    Array(Vec<JsonValue>),
    Object {
        members: Map<String, JsonValue>,
        pending: Option<String>,
    },
}

/// Streaming writer; call order mirrors the tokens of [`super::DocumentReader`].
#[derive(Debug, Default)]
pub struct DocumentWriter {
    stack: Vec<Frame>,
    root: Option<JsonValue>,
}

impl DocumentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_start_array(&mut self) -> DocResult<()> {
        self.check_open()?;
        self.stack.push(Frame::Array(Vec::new()));
        Ok(())
    }

    pub fn write_start_object(&mut self) -> DocResult<()> {
        self.check_open()?;
        self.stack.push(Frame::Object {
            members: Map::new(),
            pending: None,
        });
        Ok(())
    }

    /// Close the innermost array or object.
    pub fn write_end_element(&mut self) -> DocResult<()> {
        let value = match self.stack.pop() {
            Some(Frame::Array(items)) => JsonValue::Array(items),
            Some(Frame::Object { pending: Some(_), .. }) => {
                return Err(DocumentError::Unbalanced("member name without value"))
            }
            Some(Frame::Object { members, .. }) => JsonValue::Object(members),
            None => return Err(DocumentError::Unbalanced("end element without start")),
        };
        self.emit(value)
    }

    /// Name the next value of the current object.
    pub fn write_member(&mut self, name: &str) -> DocResult<()> {
        match self.stack.last_mut() {
            Some(Frame::Object { pending, .. }) if pending.is_none() => {
                *pending = Some(name.to_string());
                Ok(())
            }
            Some(Frame::Object { .. }) => Err(DocumentError::Unbalanced("two member names in a row")),
            _ => Err(DocumentError::Unbalanced("member name outside an object")),
        }
    }

    pub fn write_scalar(&mut self, value: JsonValue) -> DocResult<()> {
        if value.is_array() || value.is_object() {
            return Err(DocumentError::Unbalanced("scalar expected"));
        }
        self.check_open()?;
        self.emit(value)
    }

    pub fn write_null(&mut self) -> DocResult<()> {
        self.write_scalar(JsonValue::Null)
    }

    /// Finish and return the document.
    pub fn into_json(self) -> DocResult<JsonValue> {
        if !self.stack.is_empty() {
            return Err(DocumentError::Unbalanced("unclosed element"));
        }
        self.root.ok_or(DocumentError::Unbalanced("empty document"))
    }

    /// Finish and render compact JSON text.
    pub fn into_string(self) -> DocResult<String> {
        let json = self.into_json()?;
        Ok(serde_json::to_string(&json)?)
    }

    fn check_open(&self) -> DocResult<()> {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(DocumentError::Unbalanced("document already complete"));
        }
        Ok(())
    }

    fn emit(&mut self, value: JsonValue) -> DocResult<()> {
        match self.stack.last_mut() {
            Some(Frame::Array(items)) => {
                items.push(value);
                Ok(())
            }
            Some(Frame::Object { members, pending }) => {
                let name = pending
                    .take()
                    .ok_or(DocumentError::Unbalanced("object value without member name"))?;
                members.insert(name, value);
                Ok(())
            }
            None => {
                self.root = Some(value);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_entries() {
        let mut w = DocumentWriter::new();
        w.write_start_array().unwrap();
        w.write_start_object().unwrap();
        w.write_member("Key").unwrap();
        w.write_scalar("a".into()).unwrap();
        w.write_member("Value").unwrap();
        w.write_start_array().unwrap();
        w.write_null().unwrap();
        w.write_end_element().unwrap();
        w.write_end_element().unwrap();
        w.write_end_element().unwrap();

        assert_eq!(w.into_string().unwrap(), r#"[{"Key":"a","Value":[null]}]"#);
    }

    #[test]
    fn test_unbalanced() {
        let mut w = DocumentWriter::new();
        assert!(w.write_end_element().is_err());

        let mut w = DocumentWriter::new();
        w.write_start_array().unwrap();
        assert!(w.write_member("x").is_err());
        assert!(matches!(
            w.into_json(),
            Err(DocumentError::Unbalanced("unclosed element"))
        ));
    }

    #[test]
    fn test_single_root() {
        let mut w = DocumentWriter::new();
        w.write_scalar(1.into()).unwrap();
        assert!(w.write_scalar(2.into()).is_err());
    }
}
