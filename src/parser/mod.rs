//! Permissive JSON parsing and schema traversal for tag files
//!
//! Tag files are hand-written by package authors, so parsing tolerates a
//! UTF-8 byte order mark and `//` / `/* */` comments. After parsing, the
//! traversal in [`tag_file`] and [`part_file`] is best-effort: members of an
//! unexpected kind are skipped, and only values that cannot be coerced at all
//! produce a [`TraversalError`](crate::error::TraversalError).

pub mod part_file;
pub mod tag_file;

use serde_json::Value;

use crate::error::TraversalError;

pub use part_file::for_each_part_entry;
pub use tag_file::for_each_tag_entry;

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse `bytes` as JSON after removing a BOM and comments
pub fn parse_lenient(bytes: &[u8]) -> serde_json::Result<Value> {
    let bytes = bytes.strip_prefix(BOM).unwrap_or(bytes);
    serde_json::from_slice(&strip_comments(bytes))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    Str,
    StrEscape,
    LineComment,
    BlockComment,
}

/// Blank out comments that sit outside string literals.
///
/// Comment bytes become spaces and newlines are kept, so parse errors still
/// point at the right line and column.
pub fn strip_comments(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut state = Scan::Code;
    let mut i = 0;

    while i < input.len() {
        let b = input[i];
        let next = input.get(i + 1).copied();
        match state {
            Scan::Code => match (b, next) {
                (b'"', _) => {
                    state = Scan::Str;
                    out.push(b);
                }
                (b'/', Some(b'/')) => {
                    state = Scan::LineComment;
                    out.extend_from_slice(b"  ");
                    i += 1;
                }
                (b'/', Some(b'*')) => {
                    state = Scan::BlockComment;
                    out.extend_from_slice(b"  ");
                    i += 1;
                }
                _ => out.push(b),
            },
            Scan::Str => {
                match b {
                    b'\\' => state = Scan::StrEscape,
                    b'"' => state = Scan::Code,
                    _ => {}
                }
                out.push(b);
            }
            Scan::StrEscape => {
                state = Scan::Str;
                out.push(b);
            }
            Scan::LineComment => {
                if b == b'\n' {
                    state = Scan::Code;
                    out.push(b);
                } else {
                    out.push(blank(b));
                }
            }
            Scan::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    state = Scan::Code;
                    out.extend_from_slice(b"  ");
                    i += 1;
                } else {
                    out.push(blank(b));
                }
            }
        }
        i += 1;
    }

    out
}

fn blank(b: u8) -> u8 {
    if b == b'\n' || b == b'\r' {
        b
    } else {
        b' '
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Coerce a scalar to a string: null is empty, bools and numbers use their
/// text form. Arrays and objects cannot be coerced.
pub(crate) fn coerce_string(value: &Value, at: impl FnOnce() -> String) -> Result<String, TraversalError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => Err(TraversalError::NotAString { at: at() }),
    }
}

/// Coerce a scalar to `u32`: null is 0, bools are 0/1, numbers must be
/// integral and in range.
pub(crate) fn coerce_u32(value: &Value, at: impl FnOnce() -> String) -> Result<u32, TraversalError> {
    let converted = match value {
        Value::Null => Some(0),
        Value::Bool(b) => Some(u32::from(*b)),
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
                    .map(|f| f as u32)
            }),
        Value::String(_) | Value::Array(_) | Value::Object(_) => None,
    };
    converted.ok_or_else(|| TraversalError::NotAnUnsigned { at: at() })
}

/// Children of a container: array elements, or object member values in
/// member-name order. Scalars have no children.
pub(crate) fn children<'a>(value: &'a Value, at: &str) -> Vec<(String, &'a Value)> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| (format!("{}[{}]", at, i), item))
            .collect(),
        Value::Object(members) => members
            .iter()
            .map(|(name, item)| (format!("{}.{}", at, name), item))
            .collect(),
        _ => Vec::new(),
    }
}
