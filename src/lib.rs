//! recordpath - JsonPath access and update for tree-shaped records.
//!
//! - [`record`]: the two record models, dynamic maps and schema-carrying structs
//! - [`jsonpath`]: expression parsing, compiled getters and updaters
//! - [`transform`]: ordered update rules
//! - [`file`]: loading and saving records
//! - [`config`]: TOML configuration

pub mod config;
pub mod file;
pub mod jsonpath;
pub mod record;
pub mod transform;
