//! Deep copies of records ahead of an update.
//!
//! Cloning walks every entry and classifies it with the record model's
//! [`classify`]. Leaves are copied, nested containers recurse, `Null`
//! entries are dropped, and anything else fails with
//! [`PathError::UnsupportedKind`] naming the offending path. A failed clone
//! never yields a partial record.

use std::sync::Arc;

use crate::record::{Map, Schema, Struct, Value};

use super::ast::{index_path, key_path, ROOT};
use super::backend::{classify, Backend, MapBackend, Shape, StructBackend};
use super::error::PathError;

const FIELD: &str = "field";
const ELEMENT: &str = "the element of array field";

/// Deep-copies a dynamically-typed record.
///
/// # Errors
///
/// Fails on values a map record cannot hold: nested structs and arrays
/// nested directly inside arrays.
pub fn clone_map(map: &Map) -> Result<Map, PathError> {
    clone_map_at(ROOT, map)
}

fn clone_map_at(path: &str, map: &Map) -> Result<Map, PathError> {
    let mut copy = Map::with_capacity(map.len());
    for (key, value) in map {
        let child = key_path(path, key);
        let cloned = match (classify::<MapBackend>(value.kind()), value) {
            (Shape::Absent, _) => continue,
            (Shape::Leaf, _) => value.clone(),
            (Shape::Object, Value::Map(inner)) => Value::Map(clone_map_at(&child, inner)?),
            (Shape::Sequence, Value::Array(items)) => Value::Array(clone_map_array(&child, items)?),
            _ => return Err(PathError::unsupported(child, value.kind(), FIELD)),
        };
        copy.insert(key.clone(), cloned);
    }
    Ok(copy)
}

fn clone_map_array(path: &str, items: &[Value]) -> Result<Vec<Value>, PathError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match (classify::<MapBackend>(item.kind()), item) {
            (Shape::Absent | Shape::Leaf, _) => Ok(item.clone()),
            (Shape::Object, Value::Map(inner)) => {
                clone_map_at(&index_path(path, i), inner).map(Value::Map)
            }
            _ => Err(PathError::unsupported(index_path(path, i), item.kind(), ELEMENT)),
        })
        .collect()
}

/// Deep-copies a schema-carrying record.
///
/// Entries are classified by their declared schema rather than by the
/// value they hold.
///
/// # Errors
///
/// Fails on set fields declared as maps and on arrays whose declared
/// element kind is neither a leaf nor a struct.
pub fn clone_struct(record: &Struct) -> Result<Struct, PathError> {
    clone_struct_at(ROOT, record)
}

fn clone_struct_at(path: &str, record: &Struct) -> Result<Struct, PathError> {
    let mut copy = Struct::new(Arc::clone(record.schema_arc()))
        .map_err(|source| PathError::access(path, StructBackend::OBJECT_KIND.name(), source))?;

    for (field, value) in record.fields() {
        if value.is_null() {
            continue;
        }
        let child = key_path(path, field.name());
        let declared = field.schema();
        let cloned = match (classify::<StructBackend>(declared.kind()), value) {
            (Shape::Leaf, _) => value.clone(),
            (Shape::Object, Value::Struct(inner)) => Value::Struct(clone_struct_at(&child, inner)?),
            (Shape::Sequence, Value::Array(items)) => {
                Value::Array(clone_struct_array(&child, declared, items)?)
            }
            _ => return Err(PathError::unsupported(child, declared.kind(), FIELD)),
        };
        copy.put_unchecked(field.index(), cloned);
    }
    Ok(copy)
}

fn clone_struct_array(path: &str, schema: &Schema, items: &[Value]) -> Result<Vec<Value>, PathError> {
    let Some(element) = schema.value_schema() else {
        return Err(PathError::unsupported(path, schema.kind(), FIELD));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if item.is_null() {
                return Ok(Value::Null);
            }
            match (classify::<StructBackend>(element.kind()), item) {
                (Shape::Leaf, _) => Ok(item.clone()),
                (Shape::Object, Value::Struct(inner)) => {
                    clone_struct_at(&index_path(path, i), inner).map(Value::Struct)
                }
                _ => Err(PathError::unsupported(index_path(path, i), element.kind(), ELEMENT)),
            }
        })
        .collect()
}
