use std::io::Read;
use std::path::Path;

use crate::types::FormId;

/// Host form database
pub trait FormResolver: Send + Sync {
    /// The host's handle for a resolved form
    type Form;

    /// Resolve a textual identifier. Unknown or malformed identifiers yield `None`.
    fn resolve_identifier(&self, identifier: &str) -> Option<FormId>;

    /// Look a stored id back up. Ids the host no longer knows yield `None`.
    fn lookup(&self, form: FormId) -> Option<Self::Form>;
}

/// Enumerates installed packages in the host's load order
pub trait PackageSource: Send + Sync {
    fn for_each_package(&self, visitor: &mut dyn FnMut(&str));
}

/// Byte-oriented access to package files
pub trait ResourceProvider: Send + Sync {
    /// Open `path`. An error means the stream is invalid for this file.
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn Read + '_>>;
}
