// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Collection descriptors.

use crate::error::{ContractError, Result};
use std::fmt;
use std::sync::Arc;

/// Default local name of a collection item.
pub const ITEM_NAME: &str = "item";
/// Default member name of a dictionary entry key.
pub const KEY_NAME: &str = "Key";
/// Default member name of a dictionary entry value.
pub const VALUE_NAME: &str = "Value";

/// Shape of a collection type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    GenericDictionary,
    Dictionary,
    GenericList,
    GenericCollection,
    List,
    GenericEnumerable,
    Collection,
    Enumerable,
    Array,
}

impl CollectionKind {
    /// Dictionaries are written as key/value entry objects.
    pub fn is_dictionary(self) -> bool {
        matches!(self, Self::GenericDictionary | Self::Dictionary)
    }

    /// Generic kinds carry a typed element; the others hold `Any`.
    pub fn is_generic(self) -> bool {
        matches!(
            self,
            Self::GenericDictionary
                | Self::GenericList
                | Self::GenericCollection
                | Self::GenericEnumerable
                | Self::Array
        )
    }

    /// Kinds whose interface form exposes no way to add items.
    pub fn needs_add_for_get_only(self) -> bool {
        matches!(
            self,
            Self::GenericEnumerable | Self::Enumerable | Self::Collection
        )
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GenericDictionary => "generic-dictionary",
            Self::Dictionary => "dictionary",
            Self::GenericList => "generic-list",
            Self::GenericCollection => "generic-collection",
            Self::List => "list",
            Self::GenericEnumerable => "generic-enumerable",
            Self::Collection => "collection",
            Self::Enumerable => "enumerable",
            Self::Array => "array",
        };
        f.write_str(name)
    }
}

/// Primitive element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float64,
    String,
}

impl PrimitiveKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float64 => "float64",
            Self::String => "string",
        }
    }
}

/// Type of the items held by a collection (or of a dictionary key).
#[derive(Debug, Clone, PartialEq)]
pub enum ElementType {
    /// Untyped element: JSON scalars and nested arrays.
    Any,
    Primitive(PrimitiveKind),
    /// Element that is itself a collection with its own contract.
    Collection(Arc<CollectionDescriptor>),
}

impl From<PrimitiveKind> for ElementType {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl From<Arc<CollectionDescriptor>> for ElementType {
    fn from(desc: Arc<CollectionDescriptor>) -> Self {
        Self::Collection(desc)
    }
}

/// Identity of the concrete or interface type behind a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeIdentity {
    /// Fully qualified type name.
    pub name: String,
    /// Interface types cannot be instantiated and guarantee no mutation.
    pub is_interface: bool,
}

impl TypeIdentity {
    pub fn concrete(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_interface: false,
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_interface: true,
        }
    }
}

/// Immutable description of one collection type.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionDescriptor {
    pub underlying: TypeIdentity,
    pub kind: CollectionKind,
    /// Item type (the entry value type for dictionaries).
    pub element: ElementType,
    /// Key type, dictionaries only.
    pub key: Option<ElementType>,
    pub item_name: String,
    pub key_name: String,
    pub value_name: String,
    /// Whether the type exposes an add operation.
    pub add_capability: bool,
}

impl CollectionDescriptor {
    /// Concrete generic list of primitives.
    pub fn list_of(name: impl Into<String>, element: impl Into<ElementType>) -> Self {
        Self::plain(
            TypeIdentity::concrete(name),
            CollectionKind::GenericList,
            element.into(),
            None,
            true,
        )
    }

    /// Fixed-size array of primitives.
    pub fn array_of(name: impl Into<String>, element: impl Into<ElementType>) -> Self {
        Self::plain(
            TypeIdentity::concrete(name),
            CollectionKind::Array,
            element.into(),
            None,
            false,
        )
    }

    /// Concrete generic dictionary.
    pub fn dictionary_of(
        name: impl Into<String>,
        key: impl Into<ElementType>,
        value: impl Into<ElementType>,
    ) -> Self {
        Self::plain(
            TypeIdentity::concrete(name),
            CollectionKind::GenericDictionary,
            value.into(),
            Some(key.into()),
            true,
        )
    }

    /// Bare generic enumerable interface (no add capability).
    pub fn enumerable_interface(name: impl Into<String>, element: impl Into<ElementType>) -> Self {
        Self::plain(
            TypeIdentity::interface(name),
            CollectionKind::GenericEnumerable,
            element.into(),
            None,
            false,
        )
    }

    fn plain(
        underlying: TypeIdentity,
        kind: CollectionKind,
        element: ElementType,
        key: Option<ElementType>,
        add_capability: bool,
    ) -> Self {
        Self {
            underlying,
            kind,
            element,
            key,
            item_name: ITEM_NAME.to_string(),
            key_name: KEY_NAME.to_string(),
            value_name: VALUE_NAME.to_string(),
            add_capability,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.underlying.name
    }

    pub fn is_dictionary(&self) -> bool {
        self.kind.is_dictionary()
    }

    /// Whether a get-only property of this type can be populated in place.
    ///
    /// A bare enumerable/collection interface offers no way to add items to
    /// whatever instance the caller supplies.
    pub fn supports_get_only_population(&self) -> bool {
        !(self.underlying.is_interface && self.kind.needs_add_for_get_only())
    }

    /// Check that the descriptor is self-consistent.
    pub fn validate(&self) -> Result<()> {
        let malformed = |reason: &str| ContractError::MalformedDescriptor {
            type_name: self.underlying.name.clone(),
            reason: reason.to_string(),
        };

        if self.underlying.name.is_empty() {
            return Err(malformed("empty type name"));
        }
        if self.item_name.is_empty() {
            return Err(malformed("empty item name"));
        }
        match (self.kind.is_dictionary(), &self.key) {
            (true, None) => return Err(malformed("dictionary without key type")),
            (false, Some(_)) => return Err(malformed("key type on a non-dictionary")),
            _ => {}
        }
        if !self.kind.is_generic()
            && (self.element != ElementType::Any
                || self.key.as_ref().is_some_and(|k| *k != ElementType::Any))
        {
            return Err(malformed("typed element on a non-generic collection"));
        }
        if self.kind.is_dictionary() && (self.key_name.is_empty() || self.value_name.is_empty()) {
            return Err(malformed("empty dictionary member name"));
        }
        if self.kind.is_dictionary() && self.key_name == self.value_name {
            return Err(malformed("dictionary key and value share a member name"));
        }
        if !self.underlying.is_interface
            && self.kind != CollectionKind::Array
            && !self.add_capability
        {
            return Err(malformed("concrete collection without add capability"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(CollectionKind::GenericDictionary.is_dictionary());
        assert!(!CollectionKind::GenericList.is_dictionary());
        assert!(CollectionKind::Array.is_generic());
        assert!(!CollectionKind::Enumerable.is_generic());
        assert!(CollectionKind::Collection.needs_add_for_get_only());
        assert!(!CollectionKind::GenericCollection.needs_add_for_get_only());
    }

    #[test]
    fn test_get_only_support() {
        let iface = CollectionDescriptor::enumerable_interface("IEnumerable<int>", PrimitiveKind::Int32);
        assert!(!iface.supports_get_only_population());

        let list = CollectionDescriptor::list_of("List<int>", PrimitiveKind::Int32);
        assert!(list.supports_get_only_population());

        // A concrete enumerable is fine; only interfaces are rejected.
        let mut concrete = iface.clone();
        concrete.underlying.is_interface = false;
        concrete.add_capability = true;
        assert!(concrete.supports_get_only_population());
    }

    #[test]
    fn test_validate_dictionary_key() {
        let mut dict = CollectionDescriptor::dictionary_of(
            "Dictionary<string,int>",
            PrimitiveKind::String,
            PrimitiveKind::Int32,
        );
        assert!(dict.validate().is_ok());

        dict.key = None;
        assert!(matches!(
            dict.validate(),
            Err(ContractError::MalformedDescriptor { .. })
        ));
    }

    #[test]
    fn test_validate_concrete_without_add() {
        let mut list = CollectionDescriptor::list_of("List<int>", PrimitiveKind::Int32);
        list.add_capability = false;
        assert!(list.validate().is_err());

        let array = CollectionDescriptor::array_of("int[]", PrimitiveKind::Int32);
        assert!(array.validate().is_ok());
    }

    #[test]
    fn test_validate_non_generic_holds_any() {
        let mut list = CollectionDescriptor::list_of("ArrayList", PrimitiveKind::Int32);
        list.kind = CollectionKind::List;
        assert!(matches!(
            list.validate(),
            Err(ContractError::MalformedDescriptor { .. })
        ));
        list.element = ElementType::Any;
        assert!(list.validate().is_ok());

        let mut table = CollectionDescriptor::dictionary_of(
            "Hashtable",
            ElementType::Any,
            PrimitiveKind::String,
        );
        table.kind = CollectionKind::Dictionary;
        assert!(table.validate().is_err());
        table.element = ElementType::Any;
        assert!(table.validate().is_ok());
        table.key = Some(PrimitiveKind::String.into());
        assert!(table.validate().is_err());
    }
}
