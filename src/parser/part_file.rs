//! Part-tag file schema
//!
//! ```json
//! {
//!     "parts": [
//!         { "type": 3, "tags": [ { "name": "scar", "label": "Scars" }, "freckles" ] }
//!     ]
//! }
//! ```
//!
//! A bare string tag is used as both name and label.

use serde_json::Value;

use super::{children, coerce_string, coerce_u32, kind_name};
use crate::error::TraversalError;
use crate::types::PartType;

const PARTS_FIELD: &str = "parts";
const TYPE_FIELD: &str = "type";
const TAGS_FIELD: &str = "tags";
const NAME_FIELD: &str = "name";
const LABEL_FIELD: &str = "label";

static NULL: Value = Value::Null;

/// Call `visit(part_type, name, label)` for every tag in a parsed part file.
///
/// Group entries that are not objects and tag entries that are neither
/// objects nor strings are skipped. Missing fields read as null.
pub fn for_each_part_entry(
    root: &Value,
    mut visit: impl FnMut(PartType, &str, &str),
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

    let Some(parts) = members.get(PARTS_FIELD) else {
        return Ok(());
    };

    for (group_at, group) in children(parts, PARTS_FIELD) {
        let Value::Object(group) = group else {
            continue;
        };

        let part_type = coerce_u32(field(group, TYPE_FIELD), || {
            format!("{}.{}", group_at, TYPE_FIELD)
        })?;

        let Some(tags) = group.get(TAGS_FIELD) else {
            continue;
        };
        let tags_at = format!("{}.{}", group_at, TAGS_FIELD);

        for (tag_at, tag) in children(tags, &tags_at) {
            match tag {
                Value::Object(tag) => {
                    let name = coerce_string(field(tag, NAME_FIELD), || {
                        format!("{}.{}", tag_at, NAME_FIELD)
                    })?;
                    let label = coerce_string(field(tag, LABEL_FIELD), || {
                        format!("{}.{}", tag_at, LABEL_FIELD)
                    })?;
                    visit(part_type, name.as_str(), label.as_str());
                }
                Value::String(tag) => visit(part_type, tag.as_str(), tag.as_str()),
                _ => {}
            }
        }
    }

    Ok(())
}

fn field<'a>(object: &'a serde_json::Map<String, Value>, name: &str) -> &'a Value {
    object.get(name).unwrap_or(&NULL)
}
