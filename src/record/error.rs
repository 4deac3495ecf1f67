//! Host data-model errors.

use thiserror::Error;

use super::value::Kind;

/// Errors raised by the record model itself, independent of any path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// The field name is not declared in the struct's schema.
    #[error("{name} is not a valid field name")]
    UnknownField { name: String },

    /// A struct was built from a schema that is not a struct schema.
    #[error("schema of kind {found} cannot be used to build a Struct")]
    NotAStruct { found: Kind },

    /// A value does not match the declared schema.
    #[error("invalid value for {target}: expected {expected}, found {found}")]
    InvalidValue {
        target: String,
        expected: Kind,
        found: Kind,
    },

    /// A struct value carries a different schema than the one declared.
    #[error("struct schema does not match the schema declared for {target}")]
    SchemaMismatch { target: String },

    /// A value of this kind cannot be stored in the container.
    #[error("{found} values cannot be stored in a {container}")]
    Unstorable {
        container: &'static str,
        found: Kind,
    },

    /// An array element index is past the end of the array.
    #[error("{target} does not exist (len: {len})")]
    NoSuchElement {
        target: String,
        index: usize,
        len: usize,
    },

    /// A required field has no value.
    #[error("required field {name} is missing")]
    MissingRequired { name: String },
}

impl DataError {
    pub fn invalid_value(target: impl Into<String>, expected: Kind, found: Kind) -> Self {
        DataError::InvalidValue {
            target: target.into(),
            expected,
            found,
        }
    }
}
