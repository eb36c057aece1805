// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for CollectionDescriptor.

use crate::descriptor::{
    CollectionDescriptor, CollectionKind, ElementType, PrimitiveKind, TypeIdentity, ITEM_NAME,
    KEY_NAME, VALUE_NAME,
};
use crate::error::Result;
use std::sync::Arc;

/// Builder for creating CollectionDescriptor instances.
#[derive(Debug)]
pub struct CollectionDescriptorBuilder {
    name: String,
    kind: CollectionKind,
    is_interface: bool,
    element: ElementType,
    key: Option<ElementType>,
    item_name: String,
    key_name: String,
    value_name: String,
    add_capability: Option<bool>,
}

impl CollectionDescriptorBuilder {
    /// Create a new builder for a concrete collection type.
    pub fn new(name: impl Into<String>, kind: CollectionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_interface: false,
            element: ElementType::Any,
            key: None,
            item_name: ITEM_NAME.to_string(),
            key_name: KEY_NAME.to_string(),
            value_name: VALUE_NAME.to_string(),
            add_capability: None,
        }
    }

    /// Mark the underlying type as an interface.
    pub fn interface(mut self) -> Self {
        self.is_interface = true;
        self
    }

    /// Set the element type.
    pub fn element(mut self, element: impl Into<ElementType>) -> Self {
        self.element = element.into();
        self
    }

    /// Primitive element shorthand.
    pub fn primitive_element(self, kind: PrimitiveKind) -> Self {
        self.element(ElementType::Primitive(kind))
    }

    /// Nested collection element shorthand.
    pub fn nested_element(self, desc: Arc<CollectionDescriptor>) -> Self {
        self.element(ElementType::Collection(desc))
    }

    /// Set the dictionary key type.
    pub fn key(mut self, key: impl Into<ElementType>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn item_name(mut self, name: impl Into<String>) -> Self {
        self.item_name = name.into();
        self
    }

    /// Override the dictionary entry member names.
    pub fn entry_names(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.key_name = key.into();
        self.value_name = value.into();
        self
    }

    /// Force the add capability instead of deriving it from kind/interface.
    pub fn add_capability(mut self, add: bool) -> Self {
        self.add_capability = Some(add);
        self
    }

    fn default_add_capability(&self) -> bool {
        match self.kind {
            CollectionKind::Array => false,
            kind if self.is_interface => !kind.needs_add_for_get_only(),
            _ => true,
        }
    }

    /// Build and validate the descriptor.
    pub fn build(self) -> Result<CollectionDescriptor> {
        let add_capability = self
            .add_capability
            .unwrap_or_else(|| self.default_add_capability());
        let desc = CollectionDescriptor {
            underlying: TypeIdentity {
                name: self.name,
                is_interface: self.is_interface,
            },
            kind: self.kind,
            element: self.element,
            key: self.key,
            item_name: self.item_name,
            key_name: self.key_name,
            value_name: self.value_name,
            add_capability,
        };
        desc.validate()?;
        Ok(desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContractError;

    #[test]
    fn test_builder_defaults() {
        let desc = CollectionDescriptorBuilder::new("ArrayList", CollectionKind::List)
            .build()
            .expect("build");
        assert_eq!(desc.element, ElementType::Any);
        assert_eq!(desc.item_name, "item");
        assert!(desc.add_capability);
        assert!(!desc.underlying.is_interface);
    }

    #[test]
    fn test_interface_add_capability() {
        let enumerable = CollectionDescriptorBuilder::new("IEnumerable", CollectionKind::Enumerable)
            .interface()
            .build()
            .expect("build");
        assert!(!enumerable.add_capability);

        let ilist = CollectionDescriptorBuilder::new("IList<int>", CollectionKind::GenericList)
            .interface()
            .primitive_element(PrimitiveKind::Int32)
            .build()
            .expect("build");
        assert!(ilist.add_capability);
    }

    #[test]
    fn test_nested_dictionary() {
        let inner = Arc::new(CollectionDescriptor::list_of("List<string>", PrimitiveKind::String));
        let desc = CollectionDescriptorBuilder::new(
            "Dictionary<string,List<string>>",
            CollectionKind::GenericDictionary,
        )
        .key(PrimitiveKind::String)
        .nested_element(inner.clone())
        .entry_names("k", "v")
        .build()
        .expect("build");

        assert_eq!(desc.element, ElementType::Collection(inner));
        assert_eq!(desc.key_name, "k");
    }

    #[test]
    fn test_builder_rejects_missing_key() {
        let err = CollectionDescriptorBuilder::new("Hashtable", CollectionKind::Dictionary)
            .build()
            .unwrap_err();
        assert!(matches!(err, ContractError::MalformedDescriptor { .. }));
    }
}
