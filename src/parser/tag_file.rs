//! Tag file schema
//!
//! ```json
//! {
//!     "Plugin.esp|0x000D62": "female",
//!     "Plugin.esp|0x000D63": ["male", "beard"]
//! }
//! ```

use serde_json::Value;

use super::{coerce_string, kind_name};
use crate::error::TraversalError;

/// Call `visit(identifier, tag)` for every tag in a parsed tag file.
///
/// Members are visited in member-name order. Array elements are coerced to
/// strings; members that are neither arrays nor strings are skipped. On error
/// the entries already visited stay visited.
pub fn for_each_tag_entry(
    root: &Value,
    mut visit: impl FnMut(&str, String),
) -> Result<(), TraversalError> {
    let members = match root {
        Value::Object(members) => members,
        Value::Null => return Ok(()),
        other => {
            return Err(TraversalError::RootNotObject {
                found: kind_name(other),
            })
        }
    };

    for (identifier, value) in members {
        match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    let tag = coerce_string(item, || format!("{}[{}]", identifier, i))?;
                    visit(identifier.as_str(), tag);
                }
            }
            Value::String(tag) => visit(identifier.as_str(), tag.clone()),
            _ => {}
        }
    }

    Ok(())
}
