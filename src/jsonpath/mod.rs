//! JsonPath evaluation over records.
//!
//! An expression is parsed and compiled into tasks once, then replayed
//! against any number of records. The same compiled pipeline serves both
//! record models through the [`Backend`] trait.
//!
//! # Supported Syntax
//!
//! - `$` - Root record
//! - `.property` - Named field
//! - `['property']` - Bracket notation
//! - `['prop1','prop2']` - Multiple fields
//! - `[index]` - Array index (supports negative indices)
//! - `[*]` or `.*` - All children (wildcard)
//! - `[start:end]` - Array slicing
//!
//! Resolved paths are reported in canonical form: `$.store.book[0]`, with
//! bracket quoting for keys that are not plain identifiers (`$['a b']`).
//!
//! # Examples
//!
//! ```
//! use recordpath::jsonpath::{MapGetter, MapUpdater};
//! use recordpath::record::{Map, Value};
//!
//! let mut book = Map::new();
//! book.insert("price".to_string(), Value::Float64(8.95));
//! let mut record = Map::new();
//! record.insert("books".to_string(), Value::Array(vec![Value::Map(book)]));
//!
//! let updated = MapUpdater::new("$.books[*].price")
//!     .unwrap()
//!     .run(&record, &Value::Float64(9.5))
//!     .unwrap();
//! let prices = MapGetter::new("$.books[*].price").unwrap().run(&updated).unwrap();
//! assert_eq!(prices["$.books[0].price"], Value::Float64(9.5));
//! ```

pub mod accessor;
pub mod ast;
pub mod backend;
pub mod clone;
pub mod error;
pub mod parser;
pub mod state;
pub mod task;

pub use accessor::{Getter, MapGetter, MapUpdater, StructGetter, StructUpdater, Updater};
pub use ast::{JsonPath, Step};
pub use backend::{classify, Backend, MapBackend, Shape, StructBackend};
pub use clone::{clone_map, clone_struct};
pub use error::{ParseError, PathError};
pub use parser::Parser;
pub use state::{PathMap, UpdateIntent};
