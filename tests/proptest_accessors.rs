//! Property-based tests for getter/updater correctness
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use recordpath::jsonpath::{MapGetter, MapUpdater, PathMap};
use recordpath::record::{Map, Value};

// ============================================================================
// Test Strategies
// ============================================================================

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

/// Keys that need bracket quoting in canonical paths.
fn odd_key_strategy() -> impl Strategy<Value = String> {
    "[a-z '.\\\\\\[\\]]{0,8}"
}

fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int64),
        any::<bool>().prop_map(Value::Boolean),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
        (-1.0e6f64..1.0e6).prop_map(Value::Float64),
    ]
}

fn flat_map_strategy(keys: BoxedStrategy<String>) -> impl Strategy<Value = Map> {
    prop::collection::vec((keys, leaf_strategy()), 0..6)
        .prop_map(|entries| entries.into_iter().collect::<Map>())
}

/// A record with top-level leaves plus an `items` array of flat maps.
fn record_strategy() -> impl Strategy<Value = Map> {
    (
        flat_map_strategy(key_strategy().boxed()),
        prop::collection::vec(flat_map_strategy(key_strategy().boxed()), 0..4),
    )
        .prop_map(|(mut record, items)| {
            record.insert(
                "items".to_string(),
                Value::Array(items.into_iter().map(Value::Map).collect()),
            );
            record
        })
}

const EXPRESSIONS: &[&str] = &["$.*", "$.items[*].*", "$.items[0:2].*", "$.items[-1:].*"];

fn expression_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(EXPRESSIONS)
}

/// The getter result with every leaf path mapped to `value`.
fn selective_for(record: &Map, expression: &str, value: &Value) -> PathMap {
    MapGetter::new(expression)
        .unwrap()
        .run(record)
        .unwrap()
        .into_keys()
        .map(|path| (path, value.clone()))
        .collect()
}

// ============================================================================
// Update Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Writing one leaf changes that leaf and nothing else.
    #[test]
    fn prop_get_update_round_trip(
        record in record_strategy(),
        replacement in leaf_strategy(),
    ) {
        let leaves = MapGetter::new("$.items[*].*").unwrap().run(&record).unwrap();
        for path in leaves.keys() {
            let mut values = PathMap::new();
            values.insert(path.clone(), replacement.clone());
            let updated = MapUpdater::new(path).unwrap().run(&record, &values).unwrap();

            let after = MapGetter::new("$.items[*].*").unwrap().run(&updated).unwrap();
            prop_assert_eq!(after.len(), leaves.len());
            for (other, value) in &after {
                if other == path {
                    prop_assert_eq!(value, &replacement);
                } else {
                    prop_assert_eq!(value, &leaves[other]);
                }
            }
        }
    }

    /// Updates never touch the input record.
    #[test]
    fn prop_update_is_immutable(
        record in record_strategy(),
        expression in expression_strategy(),
        replacement in leaf_strategy(),
    ) {
        let before = record.clone();
        let _ = MapUpdater::new(expression).unwrap().run(&record, &replacement);
        let selective = selective_for(&record, expression, &replacement);
        let _ = MapUpdater::new(expression).unwrap().run(&record, &selective);
        prop_assert_eq!(record, before);
    }

    /// An empty selective update is a plain copy.
    #[test]
    fn prop_empty_update_is_copy(
        record in record_strategy(),
        expression in expression_strategy(),
    ) {
        let updated = MapUpdater::new(expression).unwrap().run(&record, &PathMap::new()).unwrap();
        prop_assert_eq!(updated, record);
    }

    /// Broadcasting a value equals selecting every resolved path with it.
    #[test]
    fn prop_broadcast_matches_selective(
        record in record_strategy(),
        expression in expression_strategy(),
        replacement in leaf_strategy(),
    ) {
        let updater = MapUpdater::new(expression).unwrap();
        let broadcast = updater.run(&record, &replacement);
        let selective = updater.run(&record, &selective_for(&record, expression, &replacement));
        prop_assert_eq!(broadcast.ok(), selective.ok());
    }
}

// ============================================================================
// Canonical Path Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every resolved path is itself an expression resolving to exactly
    /// that location.
    #[test]
    fn prop_resolved_paths_resolve_to_themselves(
        record in flat_map_strategy(odd_key_strategy().boxed()),
    ) {
        let found = MapGetter::new("$.*").unwrap().run(&record).unwrap();
        prop_assert_eq!(found.len(), record.len());
        for (path, value) in &found {
            let again = MapGetter::new(path).unwrap().run(&record).unwrap();
            prop_assert_eq!(again.len(), 1);
            prop_assert_eq!(&again[path.as_str()], value);
        }
    }
}
