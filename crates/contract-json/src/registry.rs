// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Contract registry.
//!
//! One [`CollectionContract`] per collection type name, created on first
//! lookup and shared afterwards. Nested collection elements resolve their
//! contract here, so every procedure of a type is built once per registry
//! whatever path reaches it.
//!
//! # Performance
//!
//! - Lookup: one `DashMap` shard read lock plus an `Arc` clone
//! - First lookup of a type: shard write lock, no procedure is built yet

use crate::config::SerializerConfig;
use crate::contract::CollectionContract;
use crate::descriptor::CollectionDescriptor;
use crate::strategy::StrategyMode;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// Shared map from collection type name to its contract.
pub struct ContractRegistry {
    config: SerializerConfig,
    /// `DashMap`: sharded, so unrelated types never contend on registration.
    contracts: DashMap<String, Arc<CollectionContract>>,
}

impl ContractRegistry {
    pub fn new(config: SerializerConfig) -> Self {
        log::debug!(
            "[registry] created strategy={} max_items={}",
            config.strategy,
            config.max_items_in_object_graph
        );
        Self {
            config,
            contracts: DashMap::new(),
        }
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Strategy every contract of this registry is created with.
    pub fn strategy(&self) -> StrategyMode {
        self.config.strategy
    }

    /// Contract for `descriptor`, created on first use.
    ///
    /// Types are identified by name; the descriptor of the first lookup wins
    /// and a differing descriptor under the same name is logged.
    pub fn contract_for(&self, descriptor: &Arc<CollectionDescriptor>) -> Arc<CollectionContract> {
        if let Some(existing) = self.contracts.get(descriptor.type_name()) {
            let stored = existing.descriptor();
            if !Arc::ptr_eq(stored, descriptor) && **stored != **descriptor {
                log::warn!(
                    "[registry] descriptor mismatch for '{}': keeping the first registration",
                    descriptor.type_name()
                );
            }
            return Arc::clone(existing.value());
        }

        let entry = self
            .contracts
            .entry(descriptor.type_name().to_string())
            .or_insert_with(|| {
                log::debug!(
                    "[registry] new contract for '{}' ({})",
                    descriptor.type_name(),
                    descriptor.kind
                );
                Arc::new(CollectionContract::new(
                    Arc::clone(descriptor),
                    self.config.strategy,
                ))
            });
        Arc::clone(entry.value())
    }

    /// Already registered contract, if any.
    pub fn get(&self, type_name: &str) -> Option<Arc<CollectionContract>> {
        self.contracts.get(type_name).map(|c| Arc::clone(c.value()))
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

impl Default for ContractRegistry {
    fn default() -> Self {
        Self::new(SerializerConfig::default())
    }
}

impl fmt::Debug for ContractRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractRegistry")
            .field("config", &self.config)
            .field("contracts", &self.contracts.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PrimitiveKind;

    #[test]
    fn test_same_contract_per_type() {
        let registry = ContractRegistry::default();
        let desc = Arc::new(CollectionDescriptor::list_of("List<int>", PrimitiveKind::Int32));

        let first = registry.contract_for(&desc);
        let second = registry.contract_for(&desc);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);

        let other = Arc::new(CollectionDescriptor::list_of("List<string>", PrimitiveKind::String));
        registry.contract_for(&other);
        assert_eq!(registry.len(), 2);
        assert!(registry.get("List<string>").is_some());
        assert!(registry.get("List<bool>").is_none());
    }

    #[test]
    fn test_first_descriptor_wins_on_name_clash() {
        let registry = ContractRegistry::default();
        let ints = Arc::new(CollectionDescriptor::list_of("Items", PrimitiveKind::Int32));
        let first = registry.contract_for(&ints);

        // Equal shape behind another Arc: same contract.
        let same = Arc::new(CollectionDescriptor::list_of("Items", PrimitiveKind::Int32));
        assert!(Arc::ptr_eq(&first, &registry.contract_for(&same)));

        let strings = Arc::new(CollectionDescriptor::list_of("Items", PrimitiveKind::String));
        let clash = registry.contract_for(&strings);
        assert!(Arc::ptr_eq(&first, &clash));
        assert_eq!(**clash.descriptor(), *ints);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_contracts_follow_config_strategy() {
        let registry =
            ContractRegistry::new(SerializerConfig::default().with_strategy(StrategyMode::ReflectionOnly));
        let desc = Arc::new(CollectionDescriptor::array_of("int[]", PrimitiveKind::Int32));
        assert_eq!(
            registry.contract_for(&desc).strategy(),
            StrategyMode::ReflectionOnly
        );
        assert!(!registry.is_empty());
    }
}
