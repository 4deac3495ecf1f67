//! Declared value kinds for schema-carrying records.
//!
//! A [`Schema`] describes one value: its type, an optional name, and whether
//! `Null` is an acceptable value. Struct schemas carry an ordered list of
//! [`Field`]s, each with its own schema.
//!
//! # Example
//!
//! ```
//! use recordpath::record::schema::Schema;
//! use recordpath::record::value::Kind;
//!
//! let schema = Schema::builder()
//!     .name("user")
//!     .field("name", Schema::string())
//!     .field("tags", Schema::array(Schema::string()))
//!     .field("nickname", Schema::string().optional())
//!     .build();
//!
//! assert_eq!(schema.kind(), Kind::Struct);
//! assert_eq!(schema.fields().len(), 3);
//! assert_eq!(schema.field("tags").unwrap().index(), 1);
//! ```

use super::error::DataError;
use super::value::{Kind, Value};

/// The declared type of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaType {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Boolean,
    String,
    Bytes,
    /// Ordered sequence of one element schema
    Array(Box<Schema>),
    /// Keyed container with declared key and value schemas
    Map { key: Box<Schema>, value: Box<Schema> },
    /// Named, ordered fields
    Struct(Vec<Field>),
}

impl SchemaType {
    /// Returns the value kind this type accepts.
    pub fn kind(&self) -> Kind {
        match self {
            SchemaType::Int8 => Kind::Int8,
            SchemaType::Int16 => Kind::Int16,
            SchemaType::Int32 => Kind::Int32,
            SchemaType::Int64 => Kind::Int64,
            SchemaType::Float32 => Kind::Float32,
            SchemaType::Float64 => Kind::Float64,
            SchemaType::Boolean => Kind::Boolean,
            SchemaType::String => Kind::String,
            SchemaType::Bytes => Kind::Bytes,
            SchemaType::Array(_) => Kind::Array,
            SchemaType::Map { .. } => Kind::Map,
            SchemaType::Struct(_) => Kind::Struct,
        }
    }
}

/// A named field of a struct schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    index: usize,
    schema: Schema,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the field in declaration order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// The schema of a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: Option<String>,
    schema_type: SchemaType,
    optional: bool,
}

impl Schema {
    fn of(schema_type: SchemaType) -> Self {
        Self {
            name: None,
            schema_type,
            optional: false,
        }
    }

    pub fn int8() -> Self {
        Self::of(SchemaType::Int8)
    }

    pub fn int16() -> Self {
        Self::of(SchemaType::Int16)
    }

    pub fn int32() -> Self {
        Self::of(SchemaType::Int32)
    }

    pub fn int64() -> Self {
        Self::of(SchemaType::Int64)
    }

    pub fn float32() -> Self {
        Self::of(SchemaType::Float32)
    }

    pub fn float64() -> Self {
        Self::of(SchemaType::Float64)
    }

    pub fn boolean() -> Self {
        Self::of(SchemaType::Boolean)
    }

    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    pub fn bytes() -> Self {
        Self::of(SchemaType::Bytes)
    }

    /// Creates an array schema whose elements all follow `element`.
    pub fn array(element: Schema) -> Self {
        Self::of(SchemaType::Array(Box::new(element)))
    }

    /// Creates a map schema with the given key and value schemas.
    pub fn map(key: Schema, value: Schema) -> Self {
        Self::of(SchemaType::Map {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    /// Starts building a struct schema.
    pub fn builder() -> StructBuilder {
        StructBuilder::default()
    }

    /// Marks this schema as accepting `Null`.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Sets the schema name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn schema_type(&self) -> &SchemaType {
        &self.schema_type
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn kind(&self) -> Kind {
        self.schema_type.kind()
    }

    /// Returns the fields of a struct schema, or an empty slice otherwise.
    pub fn fields(&self) -> &[Field] {
        match &self.schema_type {
            SchemaType::Struct(fields) => fields,
            _ => &[],
        }
    }

    /// Looks up a struct field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().iter().find(|field| field.name == name)
    }

    /// Returns the element schema of an array or the value schema of a map.
    pub fn value_schema(&self) -> Option<&Schema> {
        match &self.schema_type {
            SchemaType::Array(element) => Some(element),
            SchemaType::Map { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Structural equality that ignores the top-level `optional` flag.
    pub fn same_type(&self, other: &Schema) -> bool {
        self.name == other.name && self.schema_type == other.schema_type
    }

    /// Checks that `value` is acceptable for this schema.
    ///
    /// # Errors
    ///
    /// Returns a `DataError` when the value kind differs from the declared
    /// kind, when `Null` is given for a required schema, or when any nested
    /// element fails validation.
    pub fn validate(&self, value: &Value) -> Result<(), DataError> {
        self.validate_as("value", value)
    }

    pub(crate) fn validate_as(&self, target: &str, value: &Value) -> Result<(), DataError> {
        if value.is_null() {
            return if self.optional {
                Ok(())
            } else {
                Err(DataError::invalid_value(target, self.kind(), Kind::Null))
            };
        }
        if value.kind() != self.kind() {
            return Err(DataError::invalid_value(target, self.kind(), value.kind()));
        }

        match (&self.schema_type, value) {
            (SchemaType::Array(element), Value::Array(items)) => {
                for item in items {
                    element.validate_as(target, item)?;
                }
            }
            (SchemaType::Map { key, value: values }, Value::Map(map)) => {
                for (k, v) in map {
                    key.validate_as(target, &Value::String(k.clone()))?;
                    values.validate_as(target, v)?;
                }
            }
            (SchemaType::Struct(_), Value::Struct(s)) => {
                if !s.schema().same_type(self) {
                    return Err(DataError::SchemaMismatch {
                        target: target.to_string(),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Builder for struct schemas.
#[derive(Debug, Clone, Default)]
pub struct StructBuilder {
    name: Option<String>,
    fields: Vec<Field>,
    optional: bool,
}

impl StructBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declares a field. Declaring an existing name replaces its schema and
    /// keeps its position.
    pub fn field(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == name) {
            existing.schema = schema;
        } else {
            let index = self.fields.len();
            self.fields.push(Field {
                name,
                index,
                schema,
            });
        }
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            schema_type: SchemaType::Struct(self.fields),
            optional: self.optional,
        }
    }
}
