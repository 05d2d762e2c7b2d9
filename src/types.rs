use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque form identifier assigned by the host form database.
///
/// The registry stores these as keys but never creates, validates or
/// dereferences them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormId(pub u32);

impl FormId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

impl From<u32> for FormId {
    fn from(value: u32) -> Self {
        FormId(value)
    }
}

/// Application-defined part category. Any value is a valid bucket.
pub type PartType = u32;

/// A named tag attached to a part category, with a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartTag {
    pub name: String,
    pub label: String,
}

impl PartTag {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}
