//! Abstract syntax tree types for path expressions, and the canonical
//! rendering of resolved paths.

use std::fmt;

/// The root of every path.
pub const ROOT: &str = "$";

/// One step of a path expression, applied after the root (`$`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Named child (.property or ['property'])
    Key(String),
    /// Multiple named children (['prop1','prop2'])
    Keys(Vec<String>),
    /// Array index ([0], [-1])
    Index(isize),
    /// Wildcard (* or [*]) - all children
    Wildcard,
    /// Array slice ([start:end])
    Slice(Option<isize>, Option<isize>),
}

/// A complete path expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JsonPath {
    /// Steps in root-to-leaf order, not including the root itself.
    pub steps: Vec<Step>,
}

impl JsonPath {
    /// Creates a new path with the given steps.
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::from(ROOT);
        for step in &self.steps {
            match step {
                Step::Key(key) => push_key(&mut out, key),
                Step::Keys(keys) => {
                    out.push('[');
                    for (i, key) in keys.iter().enumerate() {
                        if i > 0 {
                            out.push(',');
                        }
                        push_quoted(&mut out, key);
                    }
                    out.push(']');
                }
                Step::Index(index) => out.push_str(&format!("[{}]", index)),
                Step::Wildcard => out.push_str("[*]"),
                Step::Slice(start, end) => {
                    out.push('[');
                    if let Some(s) = start {
                        out.push_str(&s.to_string());
                    }
                    out.push(':');
                    if let Some(e) = end {
                        out.push_str(&e.to_string());
                    }
                    out.push(']');
                }
            }
        }
        f.write_str(&out)
    }
}

/// Returns true if `key` can be written in dot notation.
pub fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '-')
}

fn push_quoted(out: &mut String, key: &str) {
    out.push('\'');
    for ch in key.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
}

fn push_key(out: &mut String, key: &str) {
    if is_plain_key(key) {
        out.push('.');
        out.push_str(key);
    } else {
        out.push('[');
        push_quoted(out, key);
        out.push(']');
    }
}

/// Canonical path of the child `key` under `parent`.
///
/// # Example
///
/// ```
/// use recordpath::jsonpath::ast::key_path;
///
/// assert_eq!(key_path("$", "user"), "$.user");
/// assert_eq!(key_path("$.user", "first name"), "$.user['first name']");
/// ```
pub fn key_path(parent: &str, key: &str) -> String {
    let mut out = String::with_capacity(parent.len() + key.len() + 4);
    out.push_str(parent);
    push_key(&mut out, key);
    out
}

/// Canonical path of the element at `index` under `parent`.
pub fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}
