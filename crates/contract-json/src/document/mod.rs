// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Token-level document reader and writer.
//!
//! Documents are JSON text handled by `serde_json`; contracts and procedures
//! only see a flat token stream of element boundaries, member names and
//! scalars.

mod reader;
mod writer;

pub use reader::DocumentReader;
pub use writer::DocumentWriter;

use std::fmt;
use thiserror::Error;

/// Errors raised by the document layer.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected token at position {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        position: usize,
        expected: &'static str,
        found: String,
    },

    #[error("Unexpected end of document")]
    UnexpectedEnd,

    #[error("Unbalanced document: {0}")]
    Unbalanced(&'static str),
}

/// One token of a flattened document.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartArray,
    EndArray,
    StartObject,
    EndObject,
    /// Object member name; the member's value follows.
    Member(String),
    /// Null, bool, number or string.
    Scalar(serde_json::Value),
}

impl Token {
    pub fn is_start(&self) -> bool {
        matches!(self, Self::StartArray | Self::StartObject)
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::EndArray | Self::EndObject)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartArray => f.write_str("'['"),
            Self::EndArray => f.write_str("']'"),
            Self::StartObject => f.write_str("'{'"),
            Self::EndObject => f.write_str("'}'"),
            Self::Member(name) => write!(f, "member '{}'", name),
            Self::Scalar(v) => write!(f, "scalar {}", v),
        }
    }
}
