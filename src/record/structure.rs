//! Schema-carrying records.
//!
//! A [`Struct`] holds one value slot per field of its struct schema. Unset
//! fields hold `Value::Null`. Every write through [`Struct::put`] is checked
//! against the declared field schema.

use std::sync::Arc;

use super::error::DataError;
use super::schema::{Field, Schema, SchemaType};
use super::value::{Kind, Value};

/// A record whose fields are declared by a struct [`Schema`].
///
/// # Example
///
/// ```
/// use recordpath::record::schema::Schema;
/// use recordpath::record::structure::Struct;
/// use recordpath::record::value::Value;
///
/// let schema = Schema::builder()
///     .field("id", Schema::int64())
///     .field("email", Schema::string().optional())
///     .build();
///
/// let mut user = Struct::new(schema).unwrap();
/// user.put("id", 7i64).unwrap();
/// assert_eq!(user.get("id").unwrap(), &Value::Int64(7));
/// assert_eq!(user.get("email").unwrap(), &Value::Null);
/// assert!(user.put("id", "seven").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl Struct {
    /// Creates an empty struct for `schema`.
    ///
    /// # Errors
    ///
    /// Returns `DataError::NotAStruct` when the schema is not a struct schema.
    pub fn new(schema: impl Into<Arc<Schema>>) -> Result<Self, DataError> {
        let schema = schema.into();
        match schema.schema_type() {
            SchemaType::Struct(fields) => {
                let values = vec![Value::Null; fields.len()];
                Ok(Self { schema, values })
            }
            other => Err(DataError::NotAStruct { found: other.kind() }),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the shared schema handle, for building sibling structs.
    pub fn schema_arc(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.schema.field(name).is_some()
    }

    fn lookup(&self, name: &str) -> Result<&Field, DataError> {
        self.schema
            .field(name)
            .ok_or_else(|| DataError::UnknownField {
                name: name.to_string(),
            })
    }

    /// Returns the value of a field, `Value::Null` when unset.
    pub fn get(&self, name: &str) -> Result<&Value, DataError> {
        let index = self.lookup(name)?.index();
        Ok(&self.values[index])
    }

    /// Mutable access to a field slot without schema validation.
    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        let index = self.schema.field(name)?.index();
        self.values.get_mut(index)
    }

    /// Sets a field after validating the value against its schema.
    pub fn put(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, DataError> {
        let value = value.into();
        let field = self.lookup(name)?;
        field
            .schema()
            .validate_as(&format!("field {}", field.name()), &value)?;
        let index = field.index();
        self.values[index] = value;
        Ok(self)
    }

    /// Replaces element `index` of an array field, validating the value
    /// against the field's declared element schema.
    ///
    /// # Errors
    ///
    /// Fails for unknown fields, fields not declared as arrays, unset
    /// arrays, indices past the end, and values the element schema rejects.
    pub fn set_element(
        &mut self,
        name: &str,
        index: usize,
        value: impl Into<Value>,
    ) -> Result<&mut Self, DataError> {
        let value = value.into();
        let field = self.lookup(name)?;
        let target = format!("element {} of field {}", index, field.name());
        let element = match field.schema().schema_type() {
            SchemaType::Array(element) => element,
            _ => {
                return Err(DataError::invalid_value(
                    format!("field {}", field.name()),
                    Kind::Array,
                    field.schema().kind(),
                ))
            }
        };
        element.validate_as(&target, &value)?;

        let slot_index = field.index();
        let items = match &mut self.values[slot_index] {
            Value::Array(items) => items,
            other => return Err(DataError::invalid_value(target, Kind::Array, other.kind())),
        };
        let len = items.len();
        let slot = items
            .get_mut(index)
            .ok_or(DataError::NoSuchElement { target, index, len })?;
        *slot = value;
        Ok(self)
    }

    /// Stores a value that is already known to satisfy the field schema.
    pub(crate) fn put_unchecked(&mut self, index: usize, value: Value) {
        self.values[index] = value;
    }

    /// Iterates over `(field, value)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&Field, &Value)> {
        self.schema.fields().iter().zip(self.values.iter())
    }

    /// Checks that every required field has a value.
    pub fn validate(&self) -> Result<(), DataError> {
        for (field, value) in self.fields() {
            if value.is_null() && !field.schema().is_optional() {
                return Err(DataError::MissingRequired {
                    name: field.name().to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::value::Kind;

    fn address_schema() -> Schema {
        Schema::builder()
            .name("address")
            .field("city", Schema::string())
            .build()
    }

    fn person_schema() -> Schema {
        Schema::builder()
            .name("person")
            .field("name", Schema::string())
            .field("age", Schema::int32().optional())
            .field("address", address_schema().optional())
            .build()
    }

    #[test]
    fn test_set_element_checks_element_schema() {
        let schema = Schema::builder()
            .field("nums", Schema::array(Schema::int32().optional()))
            .field("name", Schema::string())
            .build();
        let mut s = Struct::new(schema).unwrap();
        s.put("nums", vec![Value::Int32(1), Value::Null]).unwrap();

        s.set_element("nums", 1, 5).unwrap();
        assert_eq!(
            s.get("nums").unwrap(),
            &Value::Array(vec![Value::Int32(1), Value::Int32(5)])
        );

        let err = s.set_element("nums", 0, "oops").unwrap_err();
        assert_eq!(
            err,
            DataError::invalid_value("element 0 of field nums", Kind::Int32, Kind::String)
        );
        assert_eq!(
            s.set_element("nums", 2, 3).unwrap_err(),
            DataError::NoSuchElement {
                target: "element 2 of field nums".to_string(),
                index: 2,
                len: 2
            }
        );
        assert!(s.set_element("name", 0, "x").is_err());
    }

    #[test]
    fn test_new_requires_struct_schema() {
        let err = Struct::new(Schema::int32()).unwrap_err();
        assert_eq!(err, DataError::NotAStruct { found: Kind::Int32 });
    }

    #[test]
    fn test_put_and_get() {
        let mut person = Struct::new(person_schema()).unwrap();
        person.put("name", "Ada").unwrap().put("age", 36).unwrap();
        assert_eq!(person.get("name").unwrap(), &Value::from("Ada"));
        assert_eq!(person.get("age").unwrap(), &Value::Int32(36));
        assert_eq!(person.get("address").unwrap(), &Value::Null);
    }

    #[test]
    fn test_put_rejects_wrong_kind() {
        let mut person = Struct::new(person_schema()).unwrap();
        let err = person.put("age", 36i64).unwrap_err();
        assert_eq!(
            err,
            DataError::invalid_value("field age", Kind::Int32, Kind::Int64)
        );
    }

    #[test]
    fn test_put_nested_struct_checks_schema() {
        let mut address = Struct::new(address_schema()).unwrap();
        address.put("city", "Paris").unwrap();

        let mut person = Struct::new(person_schema()).unwrap();
        person.put("address", address).unwrap();

        let other = Struct::new(Schema::builder().name("other").build()).unwrap();
        assert!(matches!(
            person.put("address", other),
            Err(DataError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_field() {
        let person = Struct::new(person_schema()).unwrap();
        assert!(!person.has_field("email"));
        assert_eq!(
            person.get("email").unwrap_err(),
            DataError::UnknownField {
                name: "email".to_string()
            }
        );
    }

    #[test]
    fn test_validate_required_fields() {
        let mut person = Struct::new(person_schema()).unwrap();
        assert!(person.validate().is_err());
        person.put("name", "Ada").unwrap();
        assert!(person.validate().is_ok());
    }
}
