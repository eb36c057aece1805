// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Collection type descriptors.
//!
//! A descriptor is the immutable, already-introspected shape of one
//! collection type: its kind, element and key types, entry member names and
//! whether the type exposes an add operation. Contracts and strategy
//! providers only read descriptors; they never decide a collection's shape.
//!
//! # Example
//!
//! ```rust
//! use contract_json::descriptor::{CollectionDescriptorBuilder, CollectionKind, PrimitiveKind};
//!
//! let desc = CollectionDescriptorBuilder::new("List<int>", CollectionKind::GenericList)
//!     .primitive_element(PrimitiveKind::Int32)
//!     .build()
//!     .unwrap();
//! assert!(desc.supports_get_only_population());
//! ```

mod builder;
mod collection;

pub use builder::CollectionDescriptorBuilder;
pub use collection::{
    CollectionDescriptor, CollectionKind, ElementType, PrimitiveKind, TypeIdentity, ITEM_NAME,
    KEY_NAME, VALUE_NAME,
};
