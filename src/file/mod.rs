//! File I/O for records.
//!
//! This module loads records from files or stdin (JSON, JSONL or YAML,
//! optionally gzipped) and saves them back as JSON with atomic writes.

pub mod loader;
pub mod saver;
