// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compiled provider: descriptor lowered once into specialized closures.
//!
//! Element dispatch (scalar codec selection, nested descriptor lookup,
//! dictionary vs sequence vs fixed array) is resolved while building, so the
//! returned procedure never inspects the descriptor it is called with.

use super::codec;
use super::{
    get_only_procedure, reader_procedure, writer_procedure, CollectionReader, CollectionWriter,
    GetOnlyCollectionReader, ProcedureProvider,
};
use crate::context::SerializationContext;
use crate::descriptor::{CollectionDescriptor, CollectionKind, ElementType};
use crate::document::{DocumentReader, DocumentWriter};
use crate::error::Result;
use crate::value::Value;
use std::sync::Arc;

type ElementReader =
    Arc<dyn Fn(&mut DocumentReader, &mut SerializationContext<'_>) -> Result<Value> + Send + Sync>;
type ElementWriter = Arc<
    dyn Fn(&mut DocumentWriter, &Value, &mut SerializationContext<'_>) -> Result<()> + Send + Sync,
>;

fn element_reader<F>(f: F) -> ElementReader
where
    F: Fn(&mut DocumentReader, &mut SerializationContext<'_>) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn element_writer<F>(f: F) -> ElementWriter
where
    F: Fn(&mut DocumentWriter, &Value, &mut SerializationContext<'_>) -> Result<()>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

fn compile_element_reader(element: &ElementType) -> ElementReader {
    match element {
        ElementType::Any => element_reader(codec::read_any),
        ElementType::Primitive(kind) => {
            let read = codec::scalar_reader(*kind);
            element_reader(move |reader, _ctx| read(reader))
        }
        ElementType::Collection(nested) => {
            let nested = Arc::clone(nested);
            element_reader(move |reader, ctx| codec::read_nested(reader, ctx, &nested))
        }
    }
}

fn compile_element_writer(element: &ElementType) -> ElementWriter {
    match element {
        ElementType::Any => element_writer(codec::write_any),
        ElementType::Primitive(kind) => {
            let write = codec::scalar_writer(*kind);
            element_writer(move |writer, value, _ctx| write(writer, value))
        }
        ElementType::Collection(nested) => {
            let nested = Arc::clone(nested);
            element_writer(move |writer, value, ctx| codec::write_nested(writer, value, ctx, &nested))
        }
    }
}

/// Entry reader: reads one dictionary entry and inserts it.
struct EntryPlan {
    type_name: String,
    key_name: String,
    value_name: String,
    read_key: ElementReader,
    read_value: ElementReader,
}

impl EntryPlan {
    fn compile(descriptor: &CollectionDescriptor) -> Result<Self> {
        Ok(Self {
            type_name: descriptor.type_name().to_string(),
            key_name: descriptor.key_name.clone(),
            value_name: descriptor.value_name.clone(),
            read_key: compile_element_reader(codec::key_type(descriptor)?),
            read_value: compile_element_reader(&descriptor.element),
        })
    }

    fn read_all(
        &self,
        reader: &mut DocumentReader,
        ctx: &mut SerializationContext<'_>,
        entries: &mut Vec<(Value, Value)>,
    ) -> Result<()> {
        let mut index = codec::KeyIndex::with_entries(entries);
        while !reader.is_end_element() {
            ctx.increment_item_count(1)?;
            let (key, value) = codec::read_entry(
                reader,
                ctx,
                &self.key_name,
                &self.value_name,
                |r, c| (self.read_key)(r, c),
                |r, c| (self.read_value)(r, c),
            )?;
            codec::insert_entry(entries, &mut index, key, value, &self.type_name)?;
        }
        Ok(())
    }
}

/// Provider that specializes procedures ahead of use.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompiledProvider;

impl ProcedureProvider for CompiledProvider {
    fn reader(&self, descriptor: &CollectionDescriptor) -> Result<CollectionReader> {
        descriptor.validate()?;
        log::debug!("[strategy] compiling reader for '{}'", descriptor.type_name());

        if descriptor.is_dictionary() {
            let plan = EntryPlan::compile(descriptor)?;
            return Ok(reader_procedure(move |reader, ctx, _, _, _| {
                let mut entries = Vec::new();
                plan.read_all(reader, ctx, &mut entries)?;
                Ok(Value::Map(entries))
            }));
        }

        let read_item = compile_element_reader(&descriptor.element);
        Ok(reader_procedure(move |reader, ctx, _, _, _| {
            let mut items = Vec::new();
            while !reader.is_end_element() {
                ctx.increment_item_count(1)?;
                items.push(read_item(reader, ctx)?);
            }
            Ok(Value::List(items))
        }))
    }

    fn get_only_reader(&self, descriptor: &CollectionDescriptor) -> Result<GetOnlyCollectionReader> {
        descriptor.validate()?;
        log::debug!(
            "[strategy] compiling get-only reader for '{}'",
            descriptor.type_name()
        );
        let type_name = descriptor.type_name().to_string();

        if descriptor.is_dictionary() {
            let plan = EntryPlan::compile(descriptor)?;
            return Ok(get_only_procedure(move |reader, ctx, _, _, _, target| {
                let entries = codec::entries_target(target, &type_name)?;
                plan.read_all(reader, ctx, entries)
            }));
        }

        let read_item = compile_element_reader(&descriptor.element);
        if descriptor.kind == CollectionKind::Array {
            return Ok(get_only_procedure(move |reader, ctx, _, _, _, target| {
                let items = codec::sequence_target(target, &type_name)?;
                let mut index = 0;
                while !reader.is_end_element() {
                    ctx.increment_item_count(1)?;
                    let item = read_item(reader, ctx)?;
                    codec::store_array_item(items, index, item, &type_name)?;
                    index += 1;
                }
                Ok(())
            }));
        }

        Ok(get_only_procedure(move |reader, ctx, _, _, _, target| {
            let items = codec::sequence_target(target, &type_name)?;
            while !reader.is_end_element() {
                ctx.increment_item_count(1)?;
                items.push(read_item(reader, ctx)?);
            }
            Ok(())
        }))
    }

    fn writer(&self, descriptor: &CollectionDescriptor) -> Result<CollectionWriter> {
        descriptor.validate()?;
        log::debug!("[strategy] compiling writer for '{}'", descriptor.type_name());
        let type_name = descriptor.type_name().to_string();

        if descriptor.is_dictionary() {
            let write_key = compile_element_writer(codec::key_type(descriptor)?);
            let write_value = compile_element_writer(&descriptor.element);
            let key_name = descriptor.key_name.clone();
            let value_name = descriptor.value_name.clone();
            return Ok(writer_procedure(move |writer, value, ctx, _| {
                let mut index = codec::KeyIndex::default();
                for (key, item) in codec::expect_map(value, &type_name)? {
                    ctx.increment_item_count(1)?;
                    index.admit(key, &type_name)?;
                    codec::write_entry(
                        writer,
                        ctx,
                        &key_name,
                        &value_name,
                        key,
                        item,
                        |w, v, c| write_key(w, v, c),
                        |w, v, c| write_value(w, v, c),
                    )?;
                }
                Ok(())
            }));
        }

        let write_item = compile_element_writer(&descriptor.element);
        Ok(writer_procedure(move |writer, value, ctx, _| {
            for item in codec::expect_list(value, &type_name)? {
                ctx.increment_item_count(1)?;
                write_item(writer, item, ctx)?;
            }
            Ok(())
        }))
    }
}
