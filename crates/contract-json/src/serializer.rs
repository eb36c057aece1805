// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Document-level serializer engine.
//!
//! Drives one collection contract over a whole JSON document: handles the
//! top-level `null`, opens the root array around the contract's items and
//! creates a fresh [`SerializationContext`] per operation.

use crate::context::SerializationContext;
use crate::contract::{CollectionContract, ReadMode};
use crate::descriptor::CollectionDescriptor;
use crate::document::{DocumentError, DocumentReader, DocumentWriter};
use crate::error::{ContractError, Result};
use crate::registry::ContractRegistry;
use crate::value::Value;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Reads and writes documents of one collection type.
///
/// Cheap to clone; clones share the registry and the contract.
#[derive(Debug, Clone)]
pub struct CollectionSerializer {
    registry: Arc<ContractRegistry>,
    contract: Arc<CollectionContract>,
}

impl CollectionSerializer {
    pub fn new(registry: Arc<ContractRegistry>, descriptor: Arc<CollectionDescriptor>) -> Self {
        let contract = registry.contract_for(&descriptor);
        Self { registry, contract }
    }

    pub fn contract(&self) -> &Arc<CollectionContract> {
        &self.contract
    }

    pub fn registry(&self) -> &Arc<ContractRegistry> {
        &self.registry
    }

    pub fn write_json(&self, value: &Value) -> Result<JsonValue> {
        Ok(self.write_document(value)?.into_json()?)
    }

    pub fn write_string(&self, value: &Value) -> Result<String> {
        Ok(self.write_document(value)?.into_string()?)
    }

    pub fn read_json(&self, json: &JsonValue) -> Result<Value> {
        self.read_document(DocumentReader::from_json(json))
    }

    pub fn read_str(&self, text: &str) -> Result<Value> {
        self.read_document(DocumentReader::parse(text)?)
    }

    /// Add the items of `text` to an existing collection.
    ///
    /// A `null` document leaves `target` untouched.
    pub fn populate_str(&self, text: &str, target: &mut Value) -> Result<()> {
        let mut reader = DocumentReader::parse(text)?;
        if reader.is_null() {
            reader.read_scalar()?;
            return Self::finish(&reader);
        }
        self.expect_root_array(&reader)?;
        let mut ctx = SerializationContext::new(&self.registry);
        self.contract
            .read(&mut reader, &mut ctx, ReadMode::PopulateExisting(target))?;
        Self::finish(&reader)
    }

    fn write_document(&self, value: &Value) -> Result<DocumentWriter> {
        let mut writer = DocumentWriter::new();
        if value.is_null() {
            writer.write_null()?;
            return Ok(writer);
        }
        let mut ctx = SerializationContext::new(&self.registry);
        writer.write_start_array()?;
        self.contract.write(&mut writer, value, &mut ctx)?;
        writer.write_end_element()?;
        log::trace!(
            "[contract] wrote '{}' items={}",
            self.contract.descriptor().type_name(),
            ctx.items_processed()
        );
        Ok(writer)
    }

    fn read_document(&self, mut reader: DocumentReader) -> Result<Value> {
        if reader.is_null() {
            reader.read_scalar()?;
            Self::finish(&reader)?;
            return Ok(Value::Null);
        }
        self.expect_root_array(&reader)?;
        let mut ctx = SerializationContext::new(&self.registry);
        let value = self
            .contract
            .read(&mut reader, &mut ctx, ReadMode::Construct)?
            .unwrap_or_default();
        Self::finish(&reader)?;
        Ok(value)
    }

    fn expect_root_array(&self, reader: &DocumentReader) -> Result<()> {
        if reader.is_start_array() {
            return Ok(());
        }
        let found = reader
            .peek()
            .map_or_else(|| "end of document".to_string(), ToString::to_string);
        Err(ContractError::mismatch(
            format!("array for '{}'", self.contract.descriptor().type_name()),
            found,
        ))
    }

    fn finish(reader: &DocumentReader) -> Result<()> {
        if !reader.is_exhausted() {
            return Err(DocumentError::Unbalanced("trailing tokens after document").into());
        }
        Ok(())
    }
}
