// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types shared by contracts, strategies and the serializer engine.

use crate::document::DocumentError;
use thiserror::Error;

/// Errors raised while building or running collection procedures.
#[derive(Debug, Error)]
pub enum ContractError {
    /// The contract can never serve the requested operation for this type.
    #[error("Invalid contract for '{type_name}': {reason}")]
    InvalidContract { type_name: String, reason: String },

    /// The descriptor handed to a strategy provider is not self-consistent.
    #[error("Malformed descriptor for '{type_name}': {reason}")]
    MalformedDescriptor { type_name: String, reason: String },

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Maximum number of items in object graph exceeded ({max})")]
    QuotaExceeded { max: usize },

    #[error("Get-only collection of type '{type_name}' returned null")]
    NullGetOnlyCollection { type_name: String },

    #[error("Get-only array of type '{type_name}' cannot hold more than {length} items")]
    ArrayExceededSize { type_name: String, length: usize },

    #[error("Duplicate key {key} in dictionary of type '{type_name}'")]
    DuplicateKey { type_name: String, key: String },

    #[error("Missing member '{name}'")]
    MissingMember { name: String },

    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl ContractError {
    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

pub type Result<T> = core::result::Result<T, ContractError>;
