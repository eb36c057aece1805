// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # contract-json - memoized collection contracts for JSON documents
//!
//! Converts between in-memory collection values and JSON documents. For each
//! collection type, a [`CollectionContract`] picks one of two interchangeable
//! strategies, builds its reader, get-only reader and writer procedures
//! exactly once on first use, and dispatches to the cached procedures
//! afterwards.
//!
//! ## Quick Start
//!
//! ```rust
//! use contract_json::{
//!     CollectionDescriptor, CollectionSerializer, ContractRegistry, PrimitiveKind, Result, Value,
//! };
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let registry = Arc::new(ContractRegistry::default());
//!     let desc = Arc::new(CollectionDescriptor::list_of("List<int>", PrimitiveKind::Int32));
//!     let serializer = CollectionSerializer::new(registry, desc);
//!
//!     let text = serializer.write_string(&Value::list([1, 2, 3]))?;
//!     assert_eq!(text, "[1,2,3]");
//!     assert_eq!(serializer.read_str(&text)?, Value::list([1, 2, 3]));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  CollectionSerializer   (document root, null handling)        |
//! +---------------------------------------------------------------+
//! |  ContractRegistry       (one contract per type name)          |
//! +---------------------------------------------------------------+
//! |  CollectionContract     (read / write, get-only validation)   |
//! |  +-- DelegateCache      (3 build-once slots, per-type lock)   |
//! +---------------------------------------------------------------+
//! |  ProcedureProvider      ReflectiveProvider | CompiledProvider |
//! +---------------------------------------------------------------+
//! |  DocumentReader / DocumentWriter   (serde_json token stream)  |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CollectionDescriptor`] | Immutable shape of one collection type |
//! | [`CollectionContract`] | Read/write entry points with cached procedures |
//! | [`StrategyMode`] | Reflection-only or compiled procedures |
//! | [`ContractRegistry`] | Shared contracts, resolves nested collections |
//! | [`SerializerConfig`] | Strategy and item quota, from code or TOML |
//!
//! ## Modules Overview
//!
//! - [`contract`] - Contracts and the delegate cache
//! - [`strategy`] - Procedure providers
//! - [`descriptor`] - Collection descriptors
//! - [`document`] - Token-level JSON reader and writer

pub mod config;
pub mod context;
pub mod contract;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod registry;
pub mod serializer;
pub mod strategy;
pub mod value;

pub use config::{ConfigError, SerializerConfig, DEFAULT_MAX_ITEMS_IN_OBJECT_GRAPH};
pub use context::SerializationContext;
pub use contract::{CacheStats, CollectionContract, ProcedureSlot, ReadMode};
pub use descriptor::{
    CollectionDescriptor, CollectionDescriptorBuilder, CollectionKind, ElementType, PrimitiveKind,
    TypeIdentity,
};
pub use document::{DocumentError, DocumentReader, DocumentWriter};
pub use error::{ContractError, Result};
pub use registry::ContractRegistry;
pub use serializer::CollectionSerializer;
pub use strategy::{ProcedureProvider, StrategyMode};
pub use value::Value;
