//! Record transformation: ordered update rules applied to each record.
//!
//! # Example
//!
//! ```
//! use recordpath::record::{Map, Value};
//! use recordpath::transform::MapTransform;
//!
//! let mut record = Map::new();
//! record.insert("password".to_string(), Value::from("hunter2"));
//!
//! let transform = MapTransform::new(vec![("$.password", Value::from("***"))]).unwrap();
//! let masked = transform.apply(&record).unwrap();
//! assert_eq!(masked["password"], Value::from("***"));
//! assert_eq!(record["password"], Value::from("hunter2"));
//! ```

use tracing::debug;

use crate::config::Config;
use crate::jsonpath::{Backend, MapBackend, PathError, StructBackend, Updater};
use crate::record::Value;

/// A compiled list of update rules.
#[derive(Debug)]
pub struct Transform<B: Backend> {
    rules: Vec<(Updater<B>, Value)>,
}

pub type MapTransform = Transform<MapBackend>;
pub type StructTransform = Transform<StructBackend>;

impl<B: Backend> Transform<B> {
    /// Compiles `(expression, value)` rules, failing on the first malformed
    /// expression.
    pub fn new<I, S>(rules: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        let rules = rules
            .into_iter()
            .map(|(expression, value)| Ok((Updater::new(expression.as_ref())?, value)))
            .collect::<Result<Vec<_>, PathError>>()?;
        debug!(rules = rules.len(), "compiled transform");
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs every rule in order, each on the previous rule's output.
    /// `record` itself is left as is.
    pub fn apply(&self, record: &B::Object) -> Result<B::Object, PathError> {
        let mut current = B::clone_record(record)?;
        for (updater, value) in &self.rules {
            current = updater.run(&current, value)?;
        }
        Ok(current)
    }
}

impl Transform<MapBackend> {
    /// Compiles the rules listed in `config`.
    pub fn from_config(config: &Config) -> Result<Self, PathError> {
        Self::new(
            config
                .rules
                .iter()
                .map(|rule| (rule.path.as_str(), Value::from(rule.value.clone()))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::record::{Map, Schema, Struct};

    fn record() -> Map {
        let mut map = Map::new();
        map.insert("a".to_string(), Value::Int64(1));
        map.insert(
            "b".to_string(),
            Value::Array(vec![Value::Int64(2), Value::Int64(3)]),
        );
        map
    }

    #[test]
    fn test_rules_apply_in_order() {
        let transform = MapTransform::new(vec![
            ("$.a", Value::Int64(10)),
            ("$.a", Value::Int64(20)),
            ("$.b[-1]", Value::Int64(30)),
        ])
        .unwrap();
        let out = transform.apply(&record()).unwrap();
        assert_eq!(out["a"], Value::Int64(20));
        assert_eq!(
            out["b"],
            Value::Array(vec![Value::Int64(2), Value::Int64(30)])
        );
    }

    #[test]
    fn test_empty_transform_copies() {
        let transform = MapTransform::new(Vec::<(&str, Value)>::new()).unwrap();
        assert!(transform.is_empty());
        assert_eq!(transform.apply(&record()).unwrap(), record());
    }

    #[test]
    fn test_bad_rule_fails_compile() {
        let err = MapTransform::new(vec![("a.b", Value::Null)]).unwrap_err();
        assert!(matches!(err, PathError::Parse { .. }));
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            rules: vec![RuleConfig {
                path: "$.a".to_string(),
                value: serde_json::json!("x"),
            }],
            ..Config::default()
        };
        let transform = MapTransform::from_config(&config).unwrap();
        assert_eq!(transform.len(), 1);
        assert_eq!(transform.apply(&record()).unwrap()["a"], Value::from("x"));
    }

    #[test]
    fn test_struct_rule_error_aborts() {
        let schema = Schema::builder().field("age", Schema::int32()).build();
        let mut person = Struct::new(schema).unwrap();
        person.put("age", 30).unwrap();

        let transform = StructTransform::new(vec![("$.age", Value::from("old"))]).unwrap();
        let err = transform.apply(&person).unwrap_err();
        assert!(matches!(err, PathError::Access { .. }));
        assert_eq!(err.path(), "$.age");
    }
}
