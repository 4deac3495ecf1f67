//! Record data models.
//!
//! Two record shapes are supported:
//!
//! - dynamically-typed records: a [`Map`] of string keys to [`Value`]s, where
//!   values may nest further maps and arrays;
//! - schema-carrying records: a [`Struct`] whose fields are declared by a
//!   [`Schema`], with nested structs and arrays of one declared element kind.

pub mod error;
pub mod schema;
pub mod structure;
pub mod value;

pub use error::DataError;
pub use schema::{Field, Schema, SchemaType};
pub use structure::Struct;
pub use value::{Kind, Map, Value};
