// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Element codec shared by both providers.

use crate::contract::ReadMode;
use crate::context::SerializationContext;
use crate::descriptor::{CollectionDescriptor, ElementType, PrimitiveKind};
use crate::document::{DocumentReader, DocumentWriter, Token};
use crate::error::{ContractError, Result};
use crate::value::Value;
use serde_json::{Number, Value as JsonValue};
use std::collections::HashSet;

pub(crate) type ScalarReadFn = fn(&mut DocumentReader) -> Result<Value>;
pub(crate) type ScalarWriteFn = fn(&mut DocumentWriter, &Value) -> Result<()>;

fn json_kind(json: &JsonValue) -> String {
    match json {
        JsonValue::Null => "null".into(),
        JsonValue::Bool(_) => "bool".into(),
        JsonValue::Number(n) => format!("number {}", n),
        JsonValue::String(_) => "string".into(),
        JsonValue::Array(_) => "array".into(),
        JsonValue::Object(_) => "object".into(),
    }
}

fn read_number(reader: &mut DocumentReader, expected: &'static str) -> Result<Number> {
    match reader.read_scalar()? {
        JsonValue::Number(n) => Ok(n),
        other => Err(ContractError::mismatch(expected, json_kind(&other))),
    }
}

pub(crate) fn read_bool(reader: &mut DocumentReader) -> Result<Value> {
    match reader.read_scalar()? {
        JsonValue::Bool(b) => Ok(Value::Bool(b)),
        other => Err(ContractError::mismatch("bool", json_kind(&other))),
    }
}

pub(crate) fn read_int32(reader: &mut DocumentReader) -> Result<Value> {
    let n = read_number(reader, "int32")?;
    n.as_i64()
        .and_then(|i| i32::try_from(i).ok())
        .map(|i| Value::Int(i64::from(i)))
        .ok_or_else(|| ContractError::mismatch("int32", n.to_string()))
}

pub(crate) fn read_int64(reader: &mut DocumentReader) -> Result<Value> {
    let n = read_number(reader, "int64")?;
    n.as_i64()
        .map(Value::Int)
        .ok_or_else(|| ContractError::mismatch("int64", n.to_string()))
}

pub(crate) fn read_uint32(reader: &mut DocumentReader) -> Result<Value> {
    let n = read_number(reader, "uint32")?;
    n.as_u64()
        .and_then(|u| u32::try_from(u).ok())
        .map(|u| Value::UInt(u64::from(u)))
        .ok_or_else(|| ContractError::mismatch("uint32", n.to_string()))
}

pub(crate) fn read_uint64(reader: &mut DocumentReader) -> Result<Value> {
    let n = read_number(reader, "uint64")?;
    n.as_u64()
        .map(Value::UInt)
        .ok_or_else(|| ContractError::mismatch("uint64", n.to_string()))
}

pub(crate) fn read_float64(reader: &mut DocumentReader) -> Result<Value> {
    let n = read_number(reader, "float64")?;
    n.as_f64()
        .map(Value::Float)
        .ok_or_else(|| ContractError::mismatch("float64", n.to_string()))
}

pub(crate) fn read_string(reader: &mut DocumentReader) -> Result<Value> {
    match reader.read_scalar()? {
        JsonValue::String(s) => Ok(Value::String(s)),
        JsonValue::Null => Ok(Value::Null),
        other => Err(ContractError::mismatch("string", json_kind(&other))),
    }
}

/// Resolve the reader of a primitive kind once.
pub(crate) fn scalar_reader(kind: PrimitiveKind) -> ScalarReadFn {
    match kind {
        PrimitiveKind::Bool => read_bool,
        PrimitiveKind::Int32 => read_int32,
        PrimitiveKind::Int64 => read_int64,
        PrimitiveKind::UInt32 => read_uint32,
        PrimitiveKind::UInt64 => read_uint64,
        PrimitiveKind::Float64 => read_float64,
        PrimitiveKind::String => read_string,
    }
}

fn expect_value<T>(value: &Value, kind: PrimitiveKind, got: Option<T>) -> Result<T> {
    got.ok_or_else(|| ContractError::mismatch(kind.name(), value.kind_name()))
}

pub(crate) fn write_bool(writer: &mut DocumentWriter, value: &Value) -> Result<()> {
    let b = expect_value(value, PrimitiveKind::Bool, value.as_bool())?;
    Ok(writer.write_scalar(JsonValue::Bool(b))?)
}

pub(crate) fn write_int32(writer: &mut DocumentWriter, value: &Value) -> Result<()> {
    let i = expect_value(
        value,
        PrimitiveKind::Int32,
        value.as_i64().and_then(|i| i32::try_from(i).ok()),
    )?;
    Ok(writer.write_scalar(JsonValue::from(i))?)
}

pub(crate) fn write_int64(writer: &mut DocumentWriter, value: &Value) -> Result<()> {
    let i = expect_value(value, PrimitiveKind::Int64, value.as_i64())?;
    Ok(writer.write_scalar(JsonValue::from(i))?)
}

pub(crate) fn write_uint32(writer: &mut DocumentWriter, value: &Value) -> Result<()> {
    let u = expect_value(
        value,
        PrimitiveKind::UInt32,
        value.as_u64().and_then(|u| u32::try_from(u).ok()),
    )?;
    Ok(writer.write_scalar(JsonValue::from(u))?)
}

pub(crate) fn write_uint64(writer: &mut DocumentWriter, value: &Value) -> Result<()> {
    let u = expect_value(value, PrimitiveKind::UInt64, value.as_u64())?;
    Ok(writer.write_scalar(JsonValue::from(u))?)
}

pub(crate) fn write_float64(writer: &mut DocumentWriter, value: &Value) -> Result<()> {
    let f = expect_value(value, PrimitiveKind::Float64, value.as_f64())?;
    let n = Number::from_f64(f)
        .ok_or_else(|| ContractError::mismatch("finite float64", f.to_string()))?;
    Ok(writer.write_scalar(JsonValue::Number(n))?)
}

pub(crate) fn write_string(writer: &mut DocumentWriter, value: &Value) -> Result<()> {
    match value {
        Value::String(s) => Ok(writer.write_scalar(JsonValue::String(s.clone()))?),
        Value::Null => Ok(writer.write_null()?),
        other => Err(ContractError::mismatch("string", other.kind_name())),
    }
}

/// Resolve the writer of a primitive kind once.
pub(crate) fn scalar_writer(kind: PrimitiveKind) -> ScalarWriteFn {
    match kind {
        PrimitiveKind::Bool => write_bool,
        PrimitiveKind::Int32 => write_int32,
        PrimitiveKind::Int64 => write_int64,
        PrimitiveKind::UInt32 => write_uint32,
        PrimitiveKind::UInt64 => write_uint64,
        PrimitiveKind::Float64 => write_float64,
        PrimitiveKind::String => write_string,
    }
}

/// Read an untyped element: a scalar or a nested array of untyped elements.
pub(crate) fn read_any(reader: &mut DocumentReader, ctx: &mut SerializationContext<'_>) -> Result<Value> {
    match reader.peek() {
        Some(Token::StartArray) => {
            reader.read_start_element()?;
            let mut items = Vec::new();
            while !reader.is_end_element() {
                ctx.increment_item_count(1)?;
                items.push(read_any(reader, ctx)?);
            }
            reader.read_end_element()?;
            Ok(Value::List(items))
        }
        Some(Token::StartObject) => Err(ContractError::Unsupported(
            "object in an untyped collection element".into(),
        )),
        _ => Ok(match reader.read_scalar()? {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Value::String(s),
            other => return Err(ContractError::mismatch("scalar", json_kind(&other))),
        }),
    }
}

pub(crate) fn write_any(
    writer: &mut DocumentWriter,
    value: &Value,
    ctx: &mut SerializationContext<'_>,
) -> Result<()> {
    match value {
        Value::Null => writer.write_null()?,
        Value::Bool(b) => writer.write_scalar(JsonValue::Bool(*b))?,
        Value::Int(i) => writer.write_scalar(JsonValue::from(*i))?,
        Value::UInt(u) => writer.write_scalar(JsonValue::from(*u))?,
        Value::Float(_) => return write_float64(writer, value),
        Value::String(s) => writer.write_scalar(JsonValue::String(s.clone()))?,
        Value::List(items) => {
            writer.write_start_array()?;
            for item in items {
                ctx.increment_item_count(1)?;
                write_any(writer, item, ctx)?;
            }
            writer.write_end_element()?;
        }
        Value::Map(_) => {
            return Err(ContractError::Unsupported(
                "map in an untyped collection element".into(),
            ))
        }
    }
    Ok(())
}

/// Read a nested collection element through its own contract.
///
/// Nested elements always construct a new value, whatever mode the
/// enclosing read runs in.
pub(crate) fn read_nested(
    reader: &mut DocumentReader,
    ctx: &mut SerializationContext<'_>,
    descriptor: &std::sync::Arc<CollectionDescriptor>,
) -> Result<Value> {
    if reader.is_null() {
        reader.read_scalar()?;
        return Ok(Value::Null);
    }
    if !reader.is_start_array() {
        return Err(ContractError::mismatch(
            format!("array for '{}'", descriptor.type_name()),
            describe_next(reader),
        ));
    }
    let contract = ctx.registry().contract_for(descriptor);
    Ok(contract.read(reader, ctx, ReadMode::Construct)?.unwrap_or_default())
}

pub(crate) fn write_nested(
    writer: &mut DocumentWriter,
    value: &Value,
    ctx: &mut SerializationContext<'_>,
    descriptor: &std::sync::Arc<CollectionDescriptor>,
) -> Result<()> {
    if value.is_null() {
        return Ok(writer.write_null()?);
    }
    let contract = ctx.registry().contract_for(descriptor);
    writer.write_start_array()?;
    contract.write(writer, value, ctx)?;
    Ok(writer.write_end_element()?)
}

pub(crate) fn key_type(descriptor: &CollectionDescriptor) -> Result<&ElementType> {
    descriptor
        .key
        .as_ref()
        .ok_or_else(|| ContractError::MalformedDescriptor {
            type_name: descriptor.type_name().to_string(),
            reason: "dictionary without key type".into(),
        })
}

/// Read one `{key_name: k, value_name: v}` entry; member order is free and
/// unknown members are skipped.
pub(crate) fn read_entry<K, V>(
    reader: &mut DocumentReader,
    ctx: &mut SerializationContext<'_>,
    key_name: &str,
    value_name: &str,
    read_key: K,
    read_value: V,
) -> Result<(Value, Value)>
where
    K: Fn(&mut DocumentReader, &mut SerializationContext<'_>) -> Result<Value>,
    V: Fn(&mut DocumentReader, &mut SerializationContext<'_>) -> Result<Value>,
{
    if reader.peek() != Some(&Token::StartObject) {
        return Err(ContractError::mismatch(
            "dictionary entry object",
            describe_next(reader),
        ));
    }
    reader.read_start_element()?;
    let mut key = None;
    let mut value = None;
    while !reader.is_end_element() {
        let name = reader.read_member_name()?;
        if name == key_name {
            key = Some(read_key(reader, ctx)?);
        } else if name == value_name {
            value = Some(read_value(reader, ctx)?);
        } else {
            reader.skip_element()?;
        }
    }
    reader.read_end_element()?;

    let key = key.ok_or_else(|| ContractError::MissingMember {
        name: key_name.to_string(),
    })?;
    let value = value.ok_or_else(|| ContractError::MissingMember {
        name: value_name.to_string(),
    })?;
    Ok((key, value))
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn write_entry<K, V>(
    writer: &mut DocumentWriter,
    ctx: &mut SerializationContext<'_>,
    key_name: &str,
    value_name: &str,
    key: &Value,
    value: &Value,
    write_key: K,
    write_value: V,
) -> Result<()>
where
    K: Fn(&mut DocumentWriter, &Value, &mut SerializationContext<'_>) -> Result<()>,
    V: Fn(&mut DocumentWriter, &Value, &mut SerializationContext<'_>) -> Result<()>,
{
    writer.write_start_object()?;
    writer.write_member(key_name)?;
    write_key(writer, key, ctx)?;
    writer.write_member(value_name)?;
    write_value(writer, value, ctx)?;
    Ok(writer.write_end_element()?)
}

fn describe_next(reader: &DocumentReader) -> String {
    reader
        .peek()
        .map_or_else(|| "end of document".to_string(), ToString::to_string)
}

fn describe_key(key: &Value) -> String {
    match key {
        Value::String(s) => format!("\"{}\"", s),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.kind_name().to_string(),
    }
}

/// Hashable projection of a dictionary key.
///
/// Variants stay distinct the way `Value` equality keeps them distinct, so
/// `Int(1)` and `UInt(1)` are different keys. Both float zeros share a slot.
#[derive(Debug, PartialEq, Eq, Hash)]
enum KeyFingerprint {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(u64),
    String(String),
    Composite(String),
}

impl KeyFingerprint {
    fn of(key: &Value) -> Self {
        match key {
            Value::Bool(b) => Self::Bool(*b),
            Value::Int(i) => Self::Int(*i),
            Value::UInt(u) => Self::UInt(*u),
            Value::Float(f) if *f == 0.0 => Self::Float(0.0f64.to_bits()),
            Value::Float(f) => Self::Float(f.to_bits()),
            Value::String(s) => Self::String(s.clone()),
            other => Self::Composite(format!("{:?}", other)),
        }
    }
}

/// Keys seen so far in one dictionary.
#[derive(Debug, Default)]
pub(crate) struct KeyIndex {
    seen: HashSet<KeyFingerprint>,
}

impl KeyIndex {
    /// Index seeded with the keys of an existing dictionary.
    pub(crate) fn with_entries(entries: &[(Value, Value)]) -> Self {
        Self {
            seen: entries.iter().map(|(k, _)| KeyFingerprint::of(k)).collect(),
        }
    }

    /// Record `key`, rejecting null and repeated keys.
    pub(crate) fn admit(&mut self, key: &Value, type_name: &str) -> Result<()> {
        if key.is_null() {
            return Err(ContractError::mismatch("non-null dictionary key", "null"));
        }
        if !self.seen.insert(KeyFingerprint::of(key)) {
            return Err(ContractError::DuplicateKey {
                type_name: type_name.to_string(),
                key: describe_key(key),
            });
        }
        Ok(())
    }
}

/// Add a dictionary entry, rejecting null and duplicate keys.
pub(crate) fn insert_entry(
    entries: &mut Vec<(Value, Value)>,
    index: &mut KeyIndex,
    key: Value,
    value: Value,
    type_name: &str,
) -> Result<()> {
    index.admit(&key, type_name)?;
    entries.push((key, value));
    Ok(())
}

fn null_target(type_name: &str) -> ContractError {
    ContractError::NullGetOnlyCollection {
        type_name: type_name.to_string(),
    }
}

/// Items of a caller-supplied list or array.
pub(crate) fn sequence_target<'a>(target: &'a mut Value, type_name: &str) -> Result<&'a mut Vec<Value>> {
    match target {
        Value::List(items) => Ok(items),
        Value::Null => Err(null_target(type_name)),
        other => Err(ContractError::mismatch("list", other.kind_name())),
    }
}

/// Entries of a caller-supplied dictionary.
pub(crate) fn entries_target<'a>(
    target: &'a mut Value,
    type_name: &str,
) -> Result<&'a mut Vec<(Value, Value)>> {
    match target {
        Value::Map(entries) => Ok(entries),
        Value::Null => Err(null_target(type_name)),
        other => Err(ContractError::mismatch("map", other.kind_name())),
    }
}

/// Overwrite slot `index` of an existing array; arrays never grow.
pub(crate) fn store_array_item(
    items: &mut [Value],
    index: usize,
    item: Value,
    type_name: &str,
) -> Result<()> {
    let length = items.len();
    let slot = items
        .get_mut(index)
        .ok_or_else(|| ContractError::ArrayExceededSize {
            type_name: type_name.to_string(),
            length,
        })?;
    *slot = item;
    Ok(())
}

/// Value passed to a writer must match the collection shape.
pub(crate) fn expect_list<'a>(value: &'a Value, type_name: &str) -> Result<&'a [Value]> {
    value
        .as_list()
        .ok_or_else(|| ContractError::mismatch(format!("list for '{}'", type_name), value.kind_name()))
}

pub(crate) fn expect_map<'a>(value: &'a Value, type_name: &str) -> Result<&'a [(Value, Value)]> {
    value
        .as_map()
        .ok_or_else(|| ContractError::mismatch(format!("map for '{}'", type_name), value.kind_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ContractRegistry;

    #[test]
    fn test_int32_range() {
        let mut reader = DocumentReader::parse("[1, 3000000000]").unwrap();
        reader.read_start_element().unwrap();
        assert_eq!(read_int32(&mut reader).unwrap(), Value::Int(1));
        assert!(matches!(
            read_int32(&mut reader),
            Err(ContractError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_string_accepts_null() {
        let mut reader = DocumentReader::parse("[null, 1]").unwrap();
        reader.read_start_element().unwrap();
        assert_eq!(read_string(&mut reader).unwrap(), Value::Null);
        assert!(read_string(&mut reader).is_err());
    }

    #[test]
    fn test_float_rejects_nan() {
        let mut writer = DocumentWriter::new();
        writer.write_start_array().unwrap();
        assert!(write_float64(&mut writer, &Value::Float(f64::NAN)).is_err());
        write_float64(&mut writer, &Value::Float(2.5)).unwrap();
        writer.write_end_element().unwrap();
        assert_eq!(writer.into_string().unwrap(), "[2.5]");
    }

    #[test]
    fn test_any_nested() {
        let registry = ContractRegistry::default();
        let mut ctx = SerializationContext::new(&registry);
        let mut reader = DocumentReader::parse(r#"[1, "a", [true, null], 1.5]"#).unwrap();
        let value = read_any(&mut reader, &mut ctx).unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::Int(1),
                Value::from("a"),
                Value::List(vec![Value::Bool(true), Value::Null]),
                Value::Float(1.5),
            ])
        );
        assert_eq!(ctx.items_processed(), 6);
    }

    #[test]
    fn test_entry_member_order_and_unknown() {
        let registry = ContractRegistry::default();
        let mut ctx = SerializationContext::new(&registry);
        let mut reader =
            DocumentReader::parse(r#"{"Value": 2, "Extra": [1, 2], "Key": "k"}"#).unwrap();
        let (k, v) = read_entry(
            &mut reader,
            &mut ctx,
            "Key",
            "Value",
            |r, _| read_string(r),
            |r, _| read_int32(r),
        )
        .unwrap();
        assert_eq!(k, Value::from("k"));
        assert_eq!(v, Value::Int(2));
    }

    #[test]
    fn test_entry_missing_member() {
        let registry = ContractRegistry::default();
        let mut ctx = SerializationContext::new(&registry);
        let mut reader = DocumentReader::parse(r#"{"Key": "k"}"#).unwrap();
        let err = read_entry(
            &mut reader,
            &mut ctx,
            "Key",
            "Value",
            |r, _| read_string(r),
            |r, _| read_int32(r),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::MissingMember { name } if name == "Value"));
    }

    #[test]
    fn test_insert_entry_duplicate() {
        let mut entries = Vec::new();
        let mut index = KeyIndex::default();
        insert_entry(&mut entries, &mut index, "a".into(), 1.into(), "Dict").unwrap();
        let err = insert_entry(&mut entries, &mut index, "a".into(), 2.into(), "Dict").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Duplicate key \"a\" in dictionary of type 'Dict'"
        );
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_key_index_follows_value_equality() {
        let mut index = KeyIndex::default();
        index.admit(&Value::Int(1), "Dict").unwrap();
        index.admit(&Value::UInt(1), "Dict").unwrap();
        index.admit(&Value::Float(0.0), "Dict").unwrap();
        assert!(index.admit(&Value::Float(-0.0), "Dict").is_err());
        index.admit(&Value::list([1]), "Dict").unwrap();
        assert!(index.admit(&Value::list([1]), "Dict").is_err());
        assert!(matches!(
            index.admit(&Value::Null, "Dict"),
            Err(ContractError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_key_index_seeded_from_existing_entries() {
        let existing = vec![(Value::from("x"), Value::Int(0))];
        let mut index = KeyIndex::with_entries(&existing);
        assert!(matches!(
            index.admit(&"x".into(), "Dict"),
            Err(ContractError::DuplicateKey { .. })
        ));
        index.admit(&"y".into(), "Dict").unwrap();
    }

    #[test]
    fn test_store_array_item_bounds() {
        let mut items = vec![Value::Null; 2];
        store_array_item(&mut items, 1, 5.into(), "int[]").unwrap();
        assert_eq!(items[1], Value::Int(5));
        assert!(matches!(
            store_array_item(&mut items, 2, 6.into(), "int[]"),
            Err(ContractError::ArrayExceededSize { length: 2, .. })
        ));
    }
}
