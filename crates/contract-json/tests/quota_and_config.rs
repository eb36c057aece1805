// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic

//! Item quota and file configuration integration tests

use contract_json::{
    CollectionDescriptor, CollectionSerializer, ContractError, ContractRegistry, PrimitiveKind,
    SerializerConfig, StrategyMode, Value,
};
use std::io::Write;
use std::sync::Arc;

fn nested_serializer(config: SerializerConfig) -> CollectionSerializer {
    let inner = Arc::new(CollectionDescriptor::list_of("List<int>", PrimitiveKind::Int32));
    CollectionSerializer::new(
        Arc::new(ContractRegistry::new(config)),
        Arc::new(CollectionDescriptor::list_of("List<List<int>>", inner)),
    )
}

#[test]
fn test_quota_counts_nested_items() {
    for mode in [StrategyMode::ReflectionOnly, StrategyMode::Compiled] {
        let s = nested_serializer(SerializerConfig::default().with_strategy(mode).with_max_items(5));

        // 2 outer + 3 inner items.
        assert!(s.read_str("[[1,2],[3]]").is_ok());
        let err = s.read_str("[[1,2],[3,4]]").unwrap_err();
        assert!(
            matches!(err, ContractError::QuotaExceeded { max: 5 }),
            "{}: {}",
            mode,
            err
        );

        let too_many = Value::List(vec![Value::list([1, 2, 3]), Value::list([4])]);
        assert!(matches!(
            s.write_string(&too_many),
            Err(ContractError::QuotaExceeded { max: 5 })
        ));
    }
}

#[test]
fn test_quota_is_per_operation() {
    let s = nested_serializer(SerializerConfig::default().with_max_items(3));
    for _ in 0..10 {
        assert_eq!(
            s.read_str("[[1,2]]").expect("read"),
            Value::List(vec![Value::list([1, 2])])
        );
    }
}

#[test]
fn test_populate_counts_against_quota() {
    let s = CollectionSerializer::new(
        Arc::new(ContractRegistry::new(SerializerConfig::default().with_max_items(2))),
        Arc::new(CollectionDescriptor::list_of("List<int>", PrimitiveKind::Int32)),
    );
    let mut target = Value::list([0, 0, 0]);
    assert!(matches!(
        s.populate_str("[1,2,3]", &mut target),
        Err(ContractError::QuotaExceeded { max: 2 })
    ));
}

#[test]
fn test_registry_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "strategy = \"reflection_only\"").expect("write");
    writeln!(file, "max_items_in_object_graph = 4").expect("write");

    let config = SerializerConfig::from_file(file.path()).expect("load");
    assert_eq!(config.strategy, StrategyMode::ReflectionOnly);

    let s = nested_serializer(config);
    assert_eq!(s.contract().strategy(), StrategyMode::ReflectionOnly);
    assert!(s.read_str("[[1],[2]]").is_ok());
    assert!(s.read_str("[[1,2],[3]]").is_err());
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    assert!(SerializerConfig::from_file(dir.path().join("absent.toml")).is_err());
}
