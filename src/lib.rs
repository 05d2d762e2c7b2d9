pub mod config;
pub mod constants;
pub mod error;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod parser;
pub mod registry;
pub mod storage;
pub mod types;

// Collaborator boundaries and their concrete adapters
pub mod app;
pub mod infra;

pub use error::{LoadError, Result, TagError};
pub use loader::{FileFamily, LoadReport, TagLoader};
pub use registry::TagRegistry;
pub use types::{FormId, PartTag, PartType};
