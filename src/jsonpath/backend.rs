//! Record model adapters.
//!
//! The evaluator is written once against the [`Backend`] trait. Two
//! implementations exist: [`MapBackend`] for dynamically-typed maps and
//! [`StructBackend`] for schema-carrying structs. They share the sequence
//! type (`Vec<Value>`) and differ in their keyed container.

use std::fmt;

use crate::record::{DataError, Kind, Map, Struct, Value};

use super::clone;
use super::error::PathError;

/// How a record model treats a value of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// No value (`Null`).
    Absent,
    /// A scalar the model stores by value.
    Leaf,
    /// The model's keyed container.
    Object,
    /// An ordered sequence.
    Sequence,
    /// A kind the model cannot represent.
    Unsupported,
}

/// Classifies `kind` for the record model `B`.
///
/// # Example
///
/// ```
/// use recordpath::jsonpath::backend::{classify, MapBackend, Shape, StructBackend};
/// use recordpath::record::Kind;
///
/// assert_eq!(classify::<MapBackend>(Kind::Map), Shape::Object);
/// assert_eq!(classify::<StructBackend>(Kind::Map), Shape::Unsupported);
/// assert_eq!(classify::<StructBackend>(Kind::Int8), Shape::Leaf);
/// ```
pub fn classify<B: Backend>(kind: Kind) -> Shape {
    match kind {
        Kind::Null => Shape::Absent,
        Kind::Array => Shape::Sequence,
        k if k == B::OBJECT_KIND => Shape::Object,
        k if k.is_leaf() => Shape::Leaf,
        _ => Shape::Unsupported,
    }
}

/// Container capabilities the evaluator needs from a record model.
pub trait Backend: fmt::Debug + 'static {
    /// The keyed container, which is also the record type.
    type Object: Clone + fmt::Debug + PartialEq;

    /// Kind of the keyed container when nested inside a [`Value`].
    const OBJECT_KIND: Kind;

    fn as_object(value: &Value) -> Option<&Self::Object>;

    fn as_object_mut(value: &mut Value) -> Option<&mut Self::Object>;

    fn into_value(object: Self::Object) -> Value;

    fn has_key(object: &Self::Object, key: &str) -> bool;

    /// Returns the value under `key`, `None` when the key does not exist.
    fn get_key<'a>(object: &'a Self::Object, key: &str) -> Option<&'a Value>;

    /// Mutable access to the value under `key`, used to descend into nested
    /// containers. Leaf writes go through [`Backend::put_key`].
    fn get_key_mut<'a>(object: &'a mut Self::Object, key: &str) -> Option<&'a mut Value>;

    fn put_key(object: &mut Self::Object, key: &str, value: Value) -> Result<(), DataError>;

    /// Keys holding a non-null value, in container order.
    fn keys(object: &Self::Object) -> Vec<&str>;

    /// Replaces element `index` of the array held under `key`. Arrays only
    /// ever sit directly under a key, so the owning object is passed in and
    /// the model can check the element against what the key declares.
    fn set_index(
        object: &mut Self::Object,
        key: &str,
        index: usize,
        value: Value,
    ) -> Result<(), DataError>;

    /// Deep-copies a record, rejecting kinds the model cannot represent.
    fn clone_record(object: &Self::Object) -> Result<Self::Object, PathError>;
}

/// Dynamically-typed records: [`Map`]s of [`Value`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapBackend;

impl MapBackend {
    /// Accepts exactly the values [`clone::clone_map`] can copy.
    fn check_storable(value: &Value) -> Result<(), DataError> {
        match (classify::<Self>(value.kind()), value) {
            (Shape::Absent | Shape::Leaf, _) => Ok(()),
            (Shape::Object, Value::Map(map)) => map.values().try_for_each(Self::check_storable),
            (Shape::Sequence, Value::Array(items)) => items.iter().try_for_each(Self::check_element),
            _ => Err(Self::unstorable(value)),
        }
    }

    fn check_element(item: &Value) -> Result<(), DataError> {
        match (classify::<Self>(item.kind()), item) {
            (Shape::Absent | Shape::Leaf, _) => Ok(()),
            (Shape::Object, Value::Map(map)) => map.values().try_for_each(Self::check_storable),
            _ => Err(Self::unstorable(item)),
        }
    }

    fn unstorable(value: &Value) -> DataError {
        DataError::Unstorable {
            container: "Map",
            found: value.kind(),
        }
    }
}

impl Backend for MapBackend {
    type Object = Map;

    const OBJECT_KIND: Kind = Kind::Map;

    fn as_object(value: &Value) -> Option<&Map> {
        value.as_map()
    }

    fn as_object_mut(value: &mut Value) -> Option<&mut Map> {
        value.as_map_mut()
    }

    fn into_value(object: Map) -> Value {
        Value::Map(object)
    }

    fn has_key(object: &Map, key: &str) -> bool {
        object.contains_key(key)
    }

    fn get_key<'a>(object: &'a Map, key: &str) -> Option<&'a Value> {
        object.get(key)
    }

    fn get_key_mut<'a>(object: &'a mut Map, key: &str) -> Option<&'a mut Value> {
        object.get_mut(key)
    }

    fn put_key(object: &mut Map, key: &str, value: Value) -> Result<(), DataError> {
        Self::check_storable(&value)?;
        object.insert(key.to_string(), value);
        Ok(())
    }

    fn keys(object: &Map) -> Vec<&str> {
        object
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, _)| key.as_str())
            .collect()
    }

    fn set_index(object: &mut Map, key: &str, index: usize, value: Value) -> Result<(), DataError> {
        Self::check_element(&value)?;
        let slot = object
            .get_mut(key)
            .and_then(Value::as_array_mut)
            .and_then(|items| items.get_mut(index));
        if let Some(slot) = slot {
            *slot = value;
        }
        Ok(())
    }

    fn clone_record(object: &Map) -> Result<Map, PathError> {
        clone::clone_map(object)
    }
}

/// Schema-carrying records: [`Struct`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructBackend;

impl Backend for StructBackend {
    type Object = Struct;

    const OBJECT_KIND: Kind = Kind::Struct;

    fn as_object(value: &Value) -> Option<&Struct> {
        value.as_struct()
    }

    fn as_object_mut(value: &mut Value) -> Option<&mut Struct> {
        value.as_struct_mut()
    }

    fn into_value(object: Struct) -> Value {
        Value::Struct(object)
    }

    fn has_key(object: &Struct, key: &str) -> bool {
        object.has_field(key)
    }

    fn get_key<'a>(object: &'a Struct, key: &str) -> Option<&'a Value> {
        object.get(key).ok()
    }

    fn get_key_mut<'a>(object: &'a mut Struct, key: &str) -> Option<&'a mut Value> {
        object.get_mut(key)
    }

    fn put_key(object: &mut Struct, key: &str, value: Value) -> Result<(), DataError> {
        object.put(key, value).map(|_| ())
    }

    fn keys(object: &Struct) -> Vec<&str> {
        object
            .fields()
            .filter(|(_, value)| !value.is_null())
            .map(|(field, _)| field.name())
            .collect()
    }

    /// Validates against the field's declared element schema.
    fn set_index(object: &mut Struct, key: &str, index: usize, value: Value) -> Result<(), DataError> {
        object.set_element(key, index, value).map(|_| ())
    }

    fn clone_record(object: &Struct) -> Result<Struct, PathError> {
        clone::clone_struct(object)
    }
}
