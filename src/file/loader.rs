//! Record loading.
//!
//! This module reads records from files or stdin. A record is a JSON or
//! YAML object; a file holds one record, or one per line for JSONL.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

use crate::record::{Map, Value};

/// Input formats, detected from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// A single JSON document.
    Json,
    /// One JSON document per line (`.jsonl`, `.ndjson`).
    JsonLines,
    /// A single YAML document (`.yaml`, `.yml`).
    Yaml,
}

impl Format {
    /// Detects the format from `path`, looking through a trailing `.gz`.
    ///
    /// # Examples
    ///
    /// ```
    /// use recordpath::file::loader::Format;
    ///
    /// assert_eq!(Format::from_path("a.json"), Format::Json);
    /// assert_eq!(Format::from_path("a.ndjson.gz"), Format::JsonLines);
    /// assert_eq!(Format::from_path("a.yml"), Format::Yaml);
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);

        if base.ends_with(".jsonl") || base.ends_with(".ndjson") {
            Format::JsonLines
        } else if base.ends_with(".yaml") || base.ends_with(".yml") {
            Format::Yaml
        } else {
            Format::Json
        }
    }
}

/// Loads every record in the file at `path`.
///
/// A `.gz` suffix is decompressed before parsing.
///
/// # Errors
///
/// Fails if the file cannot be read or decompressed, if it does not parse
/// in its format, or if a record is not an object.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Map>> {
    let path = path.as_ref();

    let is_gzipped = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let content = if is_gzipped {
        read_gzipped_file(path)?
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?
    };

    parse_records(&content, Format::from_path(path))
        .with_context(|| format!("Failed to load records from {}", path.display()))
}

/// Loads records from stdin.
///
/// Gzip input is recognized by its magic bytes. The content is tried as a
/// single JSON record first, then as JSONL, then as YAML.
pub fn load_records_from_stdin() -> Result<Vec<Map>> {
    let mut buffer = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;
    load_records_from_bytes(&buffer)
}

/// Parses records from raw input bytes, as read from stdin.
pub fn load_records_from_bytes(bytes: &[u8]) -> Result<Vec<Map>> {
    // Check for gzip magic bytes (0x1f 0x8b)
    let content = if bytes.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(bytes)?
    } else {
        String::from_utf8(bytes.to_vec()).context("Invalid UTF-8 in input")?
    };

    if let Ok(records) = parse_records(&content, Format::Json) {
        return Ok(records);
    }
    if let Ok(records) = parse_records(&content, Format::JsonLines) {
        return Ok(records);
    }
    parse_records(&content, Format::Yaml)
        .context("Failed to parse input: it is neither JSON, JSONL nor YAML")
}

/// Parses `content` in `format` into records.
pub fn parse_records(content: &str, format: Format) -> Result<Vec<Map>> {
    match format {
        Format::Json => {
            let value: serde_json::Value =
                serde_json::from_str(content).context("Failed to parse JSON")?;
            Ok(vec![into_record(value, 1)?])
        }
        Format::Yaml => {
            let value: serde_json::Value =
                serde_yaml::from_str(content).context("Failed to parse YAML")?;
            Ok(vec![into_record(value, 1)?])
        }
        Format::JsonLines => parse_jsonl_content(content),
    }
}

/// Parses JSONL content (newline-delimited JSON).
///
/// Each non-blank line must be a JSON object.
pub fn parse_jsonl_content(content: &str) -> Result<Vec<Map>> {
    let mut records = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let value: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("Invalid JSON on line {}", line_num + 1))?;
        records.push(into_record(value, line_num + 1)?);
    }

    if records.is_empty() {
        anyhow::bail!("No records found in JSONL content");
    }

    Ok(records)
}

fn into_record(value: serde_json::Value, number: usize) -> Result<Map> {
    match Value::from(value) {
        Value::Map(map) => Ok(map),
        other => anyhow::bail!("Record {} is a {}, not an object", number, other.kind()),
    }
}

fn read_gzipped_file(path: &Path) -> Result<String> {
    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped input")?;
    Ok(content)
}
