// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Procedure providers.
//!
//! Two interchangeable strategies produce the reader, get-only reader and
//! writer procedures of a collection contract:
//!
//! - [`ReflectiveProvider`]: generic procedures that interpret the descriptor
//!   on every call.
//! - [`CompiledProvider`]: lowers the descriptor once into a tree of
//!   specialized closures.
//!
//! Both go through the same scalar and entry codec, so the chosen mode is a
//! latency trade-off only: documents and values are identical.

mod codec;
mod compiled;
mod reflective;

pub use compiled::CompiledProvider;
pub use reflective::ReflectiveProvider;

use crate::context::SerializationContext;
use crate::descriptor::CollectionDescriptor;
use crate::document::{DocumentReader, DocumentWriter};
use crate::error::Result;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Reads the items of a collection element and returns a new value.
///
/// Arguments: reader, context, namespace hint, item local name, descriptor.
pub type CollectionReader = Arc<
    dyn Fn(
            &mut DocumentReader,
            &mut SerializationContext<'_>,
            &str,
            &str,
            &CollectionDescriptor,
        ) -> Result<Value>
        + Send
        + Sync,
>;

/// Reads the items of a collection element into an existing value.
pub type GetOnlyCollectionReader = Arc<
    dyn Fn(
            &mut DocumentReader,
            &mut SerializationContext<'_>,
            &str,
            &str,
            &CollectionDescriptor,
            &mut Value,
        ) -> Result<()>
        + Send
        + Sync,
>;

/// Writes the items of a collection value.
pub type CollectionWriter = Arc<
    dyn Fn(&mut DocumentWriter, &Value, &mut SerializationContext<'_>, &CollectionDescriptor) -> Result<()>
        + Send
        + Sync,
>;

/// Builds the three procedure kinds for a descriptor.
///
/// Building must be a pure function of the descriptor: no side effects
/// besides returning the procedure.
pub trait ProcedureProvider: Send + Sync {
    fn reader(&self, descriptor: &CollectionDescriptor) -> Result<CollectionReader>;

    fn get_only_reader(&self, descriptor: &CollectionDescriptor)
        -> Result<GetOnlyCollectionReader>;

    fn writer(&self, descriptor: &CollectionDescriptor) -> Result<CollectionWriter>;
}

static REFLECTIVE: ReflectiveProvider = ReflectiveProvider;
static COMPILED: CompiledProvider = CompiledProvider;

/// Which provider builds procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    /// Interpret descriptors at call time.
    ReflectionOnly,
    /// Specialize procedures ahead of use.
    #[default]
    Compiled,
}

impl StrategyMode {
    pub fn provider(self) -> &'static dyn ProcedureProvider {
        match self {
            Self::ReflectionOnly => &REFLECTIVE,
            Self::Compiled => &COMPILED,
        }
    }
}

impl fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReflectionOnly => f.write_str("reflection-only"),
            Self::Compiled => f.write_str("compiled"),
        }
    }
}

// Closures handed to these helpers get their higher-ranked signature from the
// bound, which a bare `Arc::new(|..| ..)` would not.

pub(crate) fn reader_procedure<F>(f: F) -> CollectionReader
where
    F: Fn(
            &mut DocumentReader,
            &mut SerializationContext<'_>,
            &str,
            &str,
            &CollectionDescriptor,
        ) -> Result<Value>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

pub(crate) fn get_only_procedure<F>(f: F) -> GetOnlyCollectionReader
where
    F: Fn(
            &mut DocumentReader,
            &mut SerializationContext<'_>,
            &str,
            &str,
            &CollectionDescriptor,
            &mut Value,
        ) -> Result<()>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

pub(crate) fn writer_procedure<F>(f: F) -> CollectionWriter
where
    F: Fn(&mut DocumentWriter, &Value, &mut SerializationContext<'_>, &CollectionDescriptor) -> Result<()>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}
