//! Dynamic value representation shared by both record models.
//!
//! A `Value` is either a leaf (integers, floats, booleans, text, bytes), an
//! ordered sequence, a dynamically-typed `Map`, or a schema-carrying
//! [`Struct`]. Which containers a record model accepts is decided by its
//! backend, not by `Value` itself.
//!
//! # Example
//!
//! ```
//! use recordpath::record::value::{Kind, Map, Value};
//!
//! let mut map = Map::new();
//! map.insert("name".to_string(), Value::from("alice"));
//! map.insert("age".to_string(), Value::from(42));
//!
//! let record = Value::Map(map);
//! assert_eq!(record.kind(), Kind::Map);
//! assert!(Kind::Int32.is_leaf());
//! ```

use std::fmt;

use indexmap::IndexMap;

use super::structure::Struct;

/// Dynamically-typed keyed container.
pub type Map = IndexMap<String, Value>;

/// A value stored in a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value. Record models treat this as absence.
    Null,
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Boolean(bool),
    String(String),
    Bytes(Vec<u8>),
    /// An ordered sequence of values
    Array(Vec<Value>),
    /// A dynamically-typed nested map
    Map(Map),
    /// A schema-carrying nested record
    Struct(Struct),
}

/// The concrete kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Boolean,
    String,
    Bytes,
    Array,
    Map,
    Struct,
}

impl Kind {
    /// Returns true for the scalar kinds every record model can hold.
    ///
    /// # Example
    ///
    /// ```
    /// use recordpath::record::value::Kind;
    ///
    /// assert!(Kind::Bytes.is_leaf());
    /// assert!(!Kind::Array.is_leaf());
    /// assert!(!Kind::Null.is_leaf());
    /// ```
    pub fn is_leaf(self) -> bool {
        !matches!(self, Kind::Null | Kind::Array | Kind::Map | Kind::Struct)
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "Null",
            Kind::Int8 => "Int8",
            Kind::Int16 => "Int16",
            Kind::Int32 => "Int32",
            Kind::Int64 => "Int64",
            Kind::Float32 => "Float32",
            Kind::Float64 => "Float64",
            Kind::Boolean => "Boolean",
            Kind::String => "String",
            Kind::Bytes => "Bytes",
            Kind::Array => "Array",
            Kind::Map => "Map",
            Kind::Struct => "Struct",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Returns the concrete kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Int8(_) => Kind::Int8,
            Value::Int16(_) => Kind::Int16,
            Value::Int32(_) => Kind::Int32,
            Value::Int64(_) => Kind::Int64,
            Value::Float32(_) => Kind::Float32,
            Value::Float64(_) => Kind::Float64,
            Value::Boolean(_) => Kind::Boolean,
            Value::String(_) => Kind::String,
            Value::Bytes(_) => Kind::Bytes,
            Value::Array(_) => Kind::Array,
            Value::Map(_) => Kind::Map,
            Value::Struct(_) => Kind::Struct,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut Struct> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an `i64` if it is any integer kind.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int8(i) => Some(i64::from(*i)),
            Value::Int16(i) => Some(i64::from(*i)),
            Value::Int32(i) => Some(i64::from(*i)),
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Int8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Map(v)
    }
}

impl From<Struct> for Value {
    fn from(v: Struct) -> Self {
        Value::Struct(v)
    }
}

impl From<serde_json::Value> for Value {
    /// Integers that fit in `i64` become `Int64`, every other number `Float64`.
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int64(i),
                None => Value::Float64(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Map(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

fn float_to_json(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl From<&Value> for serde_json::Value {
    /// Bytes become an array of numbers and non-finite floats become `null`.
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Int8(i) => serde_json::Value::from(*i),
            Value::Int16(i) => serde_json::Value::from(*i),
            Value::Int32(i) => serde_json::Value::from(*i),
            Value::Int64(i) => serde_json::Value::from(*i),
            Value::Float32(f) => float_to_json(f64::from(*f)),
            Value::Float64(f) => float_to_json(*f),
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(bytes) => {
                serde_json::Value::Array(bytes.iter().map(|b| serde_json::Value::from(*b)).collect())
            }
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), serde_json::Value::from(value)))
                    .collect(),
            ),
            Value::Struct(s) => serde_json::Value::Object(
                s.fields()
                    .map(|(field, value)| (field.name().to_string(), serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_of_each_variant() {
        assert_eq!(Value::Null.kind(), Kind::Null);
        assert_eq!(Value::from(1i8).kind(), Kind::Int8);
        assert_eq!(Value::from(1i16).kind(), Kind::Int16);
        assert_eq!(Value::from(1).kind(), Kind::Int32);
        assert_eq!(Value::from(1i64).kind(), Kind::Int64);
        assert_eq!(Value::from(1.5f32).kind(), Kind::Float32);
        assert_eq!(Value::from(1.5).kind(), Kind::Float64);
        assert_eq!(Value::from(true).kind(), Kind::Boolean);
        assert_eq!(Value::from("x").kind(), Kind::String);
        assert_eq!(Value::from(vec![1u8, 2]).kind(), Kind::Bytes);
        assert_eq!(Value::Array(vec![]).kind(), Kind::Array);
        assert_eq!(Value::Map(Map::new()).kind(), Kind::Map);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(Kind::Int32.to_string(), "Int32");
        assert_eq!(format!("{}", Kind::Struct), "Struct");
    }

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(Value::from(json!(7)), Value::Int64(7));
        assert_eq!(Value::from(json!(2.5)), Value::Float64(2.5));
        assert_eq!(Value::from(json!(u64::MAX)), Value::Float64(u64::MAX as f64));
    }

    #[test]
    fn test_from_json_object_keeps_order() {
        let value = Value::from(json!({"b": 1, "a": [true, null]}));
        let map = value.as_map().unwrap();
        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(
            map["a"],
            Value::Array(vec![Value::Boolean(true), Value::Null])
        );
    }

    #[test]
    fn test_to_json() {
        let mut map = Map::new();
        map.insert("bytes".to_string(), Value::Bytes(vec![1, 2]));
        map.insert("nan".to_string(), Value::Float64(f64::NAN));
        map.insert("small".to_string(), Value::Int8(-3));
        let json = serde_json::Value::from(&Value::Map(map));
        assert_eq!(json, json!({"bytes": [1, 2], "nan": null, "small": -3}));
    }

    #[test]
    fn test_as_i64_widens() {
        assert_eq!(Value::Int16(-4).as_i64(), Some(-4));
        assert_eq!(Value::from("4").as_i64(), None);
    }
}
