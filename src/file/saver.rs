//! Record saving.
//!
//! Records are written back as JSON: a single record as one document,
//! several as JSON Lines. Writes are atomic (temp file, then rename) and
//! gzip-compressed when the target ends in `.gz`.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::record::{Map, Value};

/// Serializes one record to JSON.
///
/// # Examples
///
/// ```
/// use recordpath::file::saver::to_json_string;
/// use recordpath::record::{Map, Value};
///
/// let mut record = Map::new();
/// record.insert("a".to_string(), Value::Int32(1));
/// assert_eq!(to_json_string(&record, false).unwrap(), r#"{"a":1}"#);
/// ```
pub fn to_json_string(record: &Map, pretty: bool) -> Result<String> {
    to_json_value_string(&Value::Map(record.clone()), pretty)
}

/// Serializes any value to JSON.
pub fn to_json_value_string(value: &Value, pretty: bool) -> Result<String> {
    let json = serde_json::Value::from(value);
    let out = if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };
    out.context("Failed to serialize JSON")
}

/// Serializes `records`: a lone record as one document, otherwise one
/// compact record per line. Always ends with a newline.
pub fn serialize_records(records: &[Map], pretty: bool) -> Result<String> {
    let mut out = String::new();
    if let [record] = records {
        out.push_str(&to_json_string(record, pretty)?);
        out.push('\n');
        return Ok(out);
    }
    for record in records {
        out.push_str(&to_json_string(record, false)?);
        out.push('\n');
    }
    Ok(out)
}

/// Saves `records` to `path`.
///
/// # Errors
///
/// Returns an error if:
/// - Serialization fails
/// - Writing to the temp file fails
/// - Renaming the temp file to the target fails
pub fn save_records<P: AsRef<Path>>(path: P, records: &[Map], pretty: bool) -> Result<()> {
    let path = path.as_ref();
    let should_compress = path.to_string_lossy().ends_with(".gz");
    let content = serialize_records(records, pretty)?;
    write_file_atomic(path, content.as_bytes(), should_compress)
        .with_context(|| format!("Failed to save {}", path.display()))
}

/// Writes data to a file atomically, optionally compressing with gzip.
///
/// The target is never left in a partially written state.
fn write_file_atomic(path: &Path, data: &[u8], compress: bool) -> Result<()> {
    let temp_path = path.with_extension("tmp");

    if compress {
        let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(&temp_path, data).context("Failed to write temp file")?;
    }

    fs::rename(&temp_path, path).context("Failed to rename temp file")?;

    Ok(())
}
