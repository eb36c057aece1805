// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Collection contracts.
//!
//! A [`CollectionContract`] is the entry point the serializer engine calls to
//! read or write one collection type. It picks the procedure provider from
//! its [`StrategyMode`], builds each procedure on first use through its
//! [`DelegateCache`], and afterwards only dispatches.
//!
//! Contracts are shared across threads; the registry hands out one per
//! collection type.

mod delegate_cache;

pub use delegate_cache::{CacheStats, DelegateCache, ProcedureSlot};

use crate::context::SerializationContext;
use crate::descriptor::CollectionDescriptor;
use crate::document::{DocumentReader, DocumentWriter};
use crate::error::{ContractError, Result};
use crate::strategy::{CollectionReader, CollectionWriter, GetOnlyCollectionReader, StrategyMode};
use crate::value::Value;
use std::sync::Arc;

/// Namespace hint handed to reader procedures; JSON has none.
const NAMESPACE_HINT: &str = "";

/// How a read materializes the collection.
#[derive(Debug)]
pub enum ReadMode<'a> {
    /// Build and return a new collection value.
    Construct,
    /// Add the items to a caller-supplied collection (a property with a
    /// getter and no setter).
    PopulateExisting(&'a mut Value),
}

/// Read/write entry points for one collection type.
#[derive(Debug)]
pub struct CollectionContract {
    cache: DelegateCache,
    strategy: StrategyMode,
}

impl CollectionContract {
    /// Contract whose own procedures come from `strategy`.
    ///
    /// Nested collection elements are read and written through the contracts
    /// of the registry held by the [`SerializationContext`], so they follow
    /// the registry's strategy, not this one. Output is identical in both
    /// modes.
    pub fn new(descriptor: Arc<CollectionDescriptor>, strategy: StrategyMode) -> Self {
        Self {
            cache: DelegateCache::new(descriptor),
            strategy,
        }
    }

    pub fn descriptor(&self) -> &Arc<CollectionDescriptor> {
        self.cache.descriptor()
    }

    pub fn strategy(&self) -> StrategyMode {
        self.strategy
    }

    /// Local name hint handed to reader procedures.
    pub fn local_name_hint(&self) -> &str {
        &self.descriptor().item_name
    }

    pub fn is_built(&self, slot: ProcedureSlot) -> bool {
        self.cache.is_built(slot)
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Reader procedure, built on first use.
    pub fn reader_procedure(&self) -> Result<&CollectionReader> {
        let strategy = self.strategy;
        self.cache
            .get_or_build_reader(|descriptor| strategy.provider().reader(descriptor))
    }

    /// Get-only reader procedure, built on first use.
    ///
    /// Fails with [`ContractError::InvalidContract`] when the collection is a
    /// bare enumerable/collection interface: there is no way to add items to
    /// whatever instance the caller supplies.
    pub fn get_only_reader_procedure(&self) -> Result<&GetOnlyCollectionReader> {
        let strategy = self.strategy;
        self.cache.get_or_build_get_only_reader(|descriptor| {
            if !descriptor.supports_get_only_population() {
                return Err(ContractError::InvalidContract {
                    type_name: descriptor.type_name().to_string(),
                    reason: "a get-only collection must expose an add capability".into(),
                });
            }
            strategy.provider().get_only_reader(descriptor)
        })
    }

    /// Writer procedure, built on first use.
    pub fn writer_procedure(&self) -> Result<&CollectionWriter> {
        let strategy = self.strategy;
        self.cache
            .get_or_build_writer(|descriptor| strategy.provider().writer(descriptor))
    }

    /// Read one collection element.
    ///
    /// Returns the new value in [`ReadMode::Construct`] and `None` when the
    /// items were added to an existing collection.
    pub fn read(
        &self,
        reader: &mut DocumentReader,
        ctx: &mut SerializationContext<'_>,
        mode: ReadMode<'_>,
    ) -> Result<Option<Value>> {
        // Build before consuming any token so a failed build leaves the
        // reader untouched.
        let descriptor = self.descriptor();
        let value = match mode {
            ReadMode::PopulateExisting(target) => {
                let procedure = self.get_only_reader_procedure()?;
                reader.read_start_element()?;
                procedure(
                    reader,
                    ctx,
                    NAMESPACE_HINT,
                    self.local_name_hint(),
                    descriptor,
                    target,
                )?;
                None
            }
            ReadMode::Construct => {
                let procedure = self.reader_procedure()?;
                reader.read_start_element()?;
                Some(procedure(
                    reader,
                    ctx,
                    NAMESPACE_HINT,
                    self.local_name_hint(),
                    descriptor,
                )?)
            }
        };
        reader.read_end_element()?;
        Ok(value)
    }

    /// Write the items of a collection value into the current element.
    pub fn write(
        &self,
        writer: &mut DocumentWriter,
        value: &Value,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        let procedure = self.writer_procedure()?;
        procedure(writer, value, ctx, self.descriptor())
    }
}
