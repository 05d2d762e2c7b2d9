use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid identifier: {0}")]
    Identifier(String),
}

pub type Result<T> = std::result::Result<T, TagError>;

/// Failure of a single tag or part-tag file. The loader logs these and moves
/// on to the next package.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing json for {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to load json {}: {source}", .path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: TraversalError,
    },
}

impl LoadError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Open { path, .. }
            | LoadError::Read { path, .. }
            | LoadError::Parse { path, .. }
            | LoadError::Traversal { path, .. } => path,
        }
    }

    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Open { .. } => "open",
            LoadError::Read { .. } => "read",
            LoadError::Parse { .. } => "parse",
            LoadError::Traversal { .. } => "traversal",
        }
    }
}

/// A value in an already-parsed document had a type the schema cannot use
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraversalError {
    #[error("value at {at} is not convertible to string")]
    NotAString { at: String },

    #[error("value at {at} is not convertible to an unsigned integer")]
    NotAnUnsigned { at: String },

    #[error("root value must be an object, found {found}")]
    RootNotObject { found: &'static str },
}
