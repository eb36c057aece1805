// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reflective provider: generic procedures driven by the descriptor.
//!
//! Every call walks the descriptor it is given (kind, element type, entry
//! names), so one set of functions serves every collection type.

use super::codec;
use super::{
    get_only_procedure, reader_procedure, writer_procedure, CollectionReader, CollectionWriter,
    GetOnlyCollectionReader, ProcedureProvider,
};
use crate::context::SerializationContext;
use crate::descriptor::{CollectionDescriptor, CollectionKind, ElementType, PrimitiveKind};
use crate::document::{DocumentReader, DocumentWriter};
use crate::error::Result;
use crate::value::Value;

/// Provider whose procedures interpret the descriptor at call time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectiveProvider;

impl ProcedureProvider for ReflectiveProvider {
    fn reader(&self, descriptor: &CollectionDescriptor) -> Result<CollectionReader> {
        descriptor.validate()?;
        Ok(reader_procedure(reflection_read_collection))
    }

    fn get_only_reader(&self, descriptor: &CollectionDescriptor) -> Result<GetOnlyCollectionReader> {
        descriptor.validate()?;
        Ok(get_only_procedure(reflection_read_get_only_collection))
    }

    fn writer(&self, descriptor: &CollectionDescriptor) -> Result<CollectionWriter> {
        descriptor.validate()?;
        Ok(writer_procedure(reflection_write_collection))
    }
}

fn read_element(
    reader: &mut DocumentReader,
    ctx: &mut SerializationContext<'_>,
    element: &ElementType,
) -> Result<Value> {
    match element {
        ElementType::Any => codec::read_any(reader, ctx),
        ElementType::Primitive(kind) => match kind {
            PrimitiveKind::Bool => codec::read_bool(reader),
            PrimitiveKind::Int32 => codec::read_int32(reader),
            PrimitiveKind::Int64 => codec::read_int64(reader),
            PrimitiveKind::UInt32 => codec::read_uint32(reader),
            PrimitiveKind::UInt64 => codec::read_uint64(reader),
            PrimitiveKind::Float64 => codec::read_float64(reader),
            PrimitiveKind::String => codec::read_string(reader),
        },
        ElementType::Collection(nested) => codec::read_nested(reader, ctx, nested),
    }
}

fn write_element(
    writer: &mut DocumentWriter,
    value: &Value,
    ctx: &mut SerializationContext<'_>,
    element: &ElementType,
) -> Result<()> {
    match element {
        ElementType::Any => codec::write_any(writer, value, ctx),
        ElementType::Primitive(kind) => match kind {
            PrimitiveKind::Bool => codec::write_bool(writer, value),
            PrimitiveKind::Int32 => codec::write_int32(writer, value),
            PrimitiveKind::Int64 => codec::write_int64(writer, value),
            PrimitiveKind::UInt32 => codec::write_uint32(writer, value),
            PrimitiveKind::UInt64 => codec::write_uint64(writer, value),
            PrimitiveKind::Float64 => codec::write_float64(writer, value),
            PrimitiveKind::String => codec::write_string(writer, value),
        },
        ElementType::Collection(nested) => codec::write_nested(writer, value, ctx, nested),
    }
}

fn read_entries(
    reader: &mut DocumentReader,
    ctx: &mut SerializationContext<'_>,
    descriptor: &CollectionDescriptor,
    entries: &mut Vec<(Value, Value)>,
) -> Result<()> {
    let key_type = codec::key_type(descriptor)?;
    let mut index = codec::KeyIndex::with_entries(entries);
    while !reader.is_end_element() {
        ctx.increment_item_count(1)?;
        let (key, value) = codec::read_entry(
            reader,
            ctx,
            &descriptor.key_name,
            &descriptor.value_name,
            |r, c| read_element(r, c, key_type),
            |r, c| read_element(r, c, &descriptor.element),
        )?;
        codec::insert_entry(entries, &mut index, key, value, descriptor.type_name())?;
    }
    Ok(())
}

fn reflection_read_collection(
    reader: &mut DocumentReader,
    ctx: &mut SerializationContext<'_>,
    _namespace: &str,
    _item_name: &str,
    descriptor: &CollectionDescriptor,
) -> Result<Value> {
    if descriptor.is_dictionary() {
        let mut entries = Vec::new();
        read_entries(reader, ctx, descriptor, &mut entries)?;
        return Ok(Value::Map(entries));
    }

    let mut items = Vec::new();
    while !reader.is_end_element() {
        ctx.increment_item_count(1)?;
        items.push(read_element(reader, ctx, &descriptor.element)?);
    }
    Ok(Value::List(items))
}

fn reflection_read_get_only_collection(
    reader: &mut DocumentReader,
    ctx: &mut SerializationContext<'_>,
    _namespace: &str,
    _item_name: &str,
    descriptor: &CollectionDescriptor,
    target: &mut Value,
) -> Result<()> {
    let type_name = descriptor.type_name();
    if descriptor.is_dictionary() {
        let entries = codec::entries_target(target, type_name)?;
        return read_entries(reader, ctx, descriptor, entries);
    }

    let items = codec::sequence_target(target, type_name)?;
    let mut index = 0;
    while !reader.is_end_element() {
        ctx.increment_item_count(1)?;
        let item = read_element(reader, ctx, &descriptor.element)?;
        if descriptor.kind == CollectionKind::Array {
            codec::store_array_item(items, index, item, type_name)?;
            index += 1;
        } else {
            items.push(item);
        }
    }
    Ok(())
}

fn reflection_write_collection(
    writer: &mut DocumentWriter,
    value: &Value,
    ctx: &mut SerializationContext<'_>,
    descriptor: &CollectionDescriptor,
) -> Result<()> {
    let type_name = descriptor.type_name();
    if descriptor.is_dictionary() {
        let key_type = codec::key_type(descriptor)?;
        let mut index = codec::KeyIndex::default();
        for (key, item) in codec::expect_map(value, type_name)? {
            ctx.increment_item_count(1)?;
            index.admit(key, type_name)?;
            codec::write_entry(
                writer,
                ctx,
                &descriptor.key_name,
                &descriptor.value_name,
                key,
                item,
                |w, v, c| write_element(w, v, c, key_type),
                |w, v, c| write_element(w, v, c, &descriptor.element),
            )?;
        }
        return Ok(());
    }

    for item in codec::expect_list(value, type_name)? {
        ctx.increment_item_count(1)?;
        write_element(writer, item, ctx, &descriptor.element)?;
    }
    Ok(())
}
