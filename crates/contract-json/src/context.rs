// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-operation serialization state.

use crate::error::{ContractError, Result};
use crate::registry::ContractRegistry;

/// State carried through one top-level read or write.
///
/// Holds the registry used to resolve nested collection contracts and the
/// item quota shared by every nested procedure of the operation.
#[derive(Debug)]
pub struct SerializationContext<'r> {
    registry: &'r ContractRegistry,
    max_items: usize,
    items: usize,
}

impl<'r> SerializationContext<'r> {
    pub fn new(registry: &'r ContractRegistry) -> Self {
        Self {
            registry,
            max_items: registry.config().max_items_in_object_graph,
            items: 0,
        }
    }

    /// Override the item quota for this operation only.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn registry(&self) -> &'r ContractRegistry {
        self.registry
    }

    pub fn items_processed(&self) -> usize {
        self.items
    }

    /// Account for `count` more items; fails once the quota is exceeded.
    pub fn increment_item_count(&mut self, count: usize) -> Result<()> {
        let total = self.items.saturating_add(count);
        if total > self.max_items {
            return Err(ContractError::QuotaExceeded {
                max: self.max_items,
            });
        }
        self.items = total;
        Ok(())
    }
}
