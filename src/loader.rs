//! Bulk loading of per-package tag files
//!
//! Every package may ship two files below the plugin root:
//!
//! ```text
//! <plugins_root>/CharGen/Tags/<package>/tags.json   form tags
//! <plugins_root>/CharGen/Tags/<package>/parts.json  part tags
//! ```
//!
//! [`TagLoader::load_mods`] reads every package's `tags.json` before it
//! reads any `parts.json`. Failures are absorbed per file: a missing,
//! unreadable or malformed file is logged and the sweep moves on. Entries
//! applied before a mid-file failure stay applied.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, error, info};

use crate::app::ports::{FormResolver, PackageSource, ResourceProvider};
use crate::constants::{CHARGEN_DIR, DEFAULT_PLUGINS_ROOT, PART_FILE_NAME, TAGS_DIR, TAG_FILE_NAME};
use crate::error::LoadError;
use crate::metrics::LoaderMetrics;
use crate::parser::{for_each_part_entry, for_each_tag_entry, parse_lenient};
use crate::registry::TagRegistry;

/// The two kinds of per-package file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFamily {
    Tags,
    Parts,
}

impl FileFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            FileFamily::Tags => "tags",
            FileFamily::Parts => "parts",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            FileFamily::Tags => TAG_FILE_NAME,
            FileFamily::Parts => PART_FILE_NAME,
        }
    }
}

impl fmt::Display for FileFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one successfully traversed file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entries the registry accepted
    pub applied: usize,
    /// Entries the registry turned down: duplicates and unresolved forms
    pub rejected: usize,
    /// Identifiers the form resolver did not know. Counted in `rejected` too.
    pub unresolved: usize,
}

#[derive(Debug, Default)]
struct PassSummary {
    loaded: usize,
    missing: usize,
    failed: usize,
    applied: usize,
}

pub struct TagLoader<'a, R: FormResolver> {
    registry: &'a TagRegistry,
    resolver: &'a R,
    packages: &'a dyn PackageSource,
    resources: &'a dyn ResourceProvider,
    plugins_root: PathBuf,
}

impl<'a, R: FormResolver> TagLoader<'a, R> {
    pub fn new(
        registry: &'a TagRegistry,
        resolver: &'a R,
        packages: &'a dyn PackageSource,
        resources: &'a dyn ResourceProvider,
    ) -> Self {
        Self {
            registry,
            resolver,
            packages,
            resources,
            plugins_root: PathBuf::from(DEFAULT_PLUGINS_ROOT),
        }
    }

    /// Root the per-package paths at `plugins_root` instead of the default
    pub fn with_plugins_root(mut self, plugins_root: impl Into<PathBuf>) -> Self {
        self.plugins_root = plugins_root.into();
        self
    }

    pub fn package_file(&self, package: &str, family: FileFamily) -> PathBuf {
        self.plugins_root
            .join(CHARGEN_DIR)
            .join(TAGS_DIR)
            .join(package)
            .join(family.file_name())
    }

    /// Load every package's tag file, then every package's part-tag file
    pub fn load_mods(&self) {
        for family in [FileFamily::Tags, FileFamily::Parts] {
            let span = tracing::info_span!("load_pass", family = %family);
            let _enter = span.enter();

            let mut summary = PassSummary::default();
            self.packages.for_each_package(&mut |package: &str| {
                let path = self.package_file(package, family);
                match self.load_file(family, &path) {
                    Ok(report) => {
                        summary.loaded += 1;
                        summary.applied += report.applied;
                        LoaderMetrics::record_file_loaded(family, &report);
                    }
                    Err(LoadError::Open { .. }) => {
                        summary.missing += 1;
                        LoaderMetrics::record_file_missing(family);
                    }
                    Err(e) => {
                        summary.failed += 1;
                        LoaderMetrics::record_file_failed(family, e.kind());
                    }
                }
            });

            info!(
                "Loaded {} {} files ({} entries applied), {} missing, {} failed",
                summary.loaded, family, summary.applied, summary.missing, summary.failed
            );
        }
    }

    pub fn load_file(&self, family: FileFamily, path: &Path) -> Result<LoadReport, LoadError> {
        match family {
            FileFamily::Tags => self.load_tag_file(path),
            FileFamily::Parts => self.load_part_file(path),
        }
    }

    /// Load one tag file. Identifiers that do not resolve are counted in the
    /// report but do not fail the file.
    pub fn load_tag_file(&self, path: &Path) -> Result<LoadReport, LoadError> {
        let result = self.read_document(path).and_then(|root| {
            let mut report = LoadReport::default();
            for_each_tag_entry(&root, |identifier, tag| {
                let form = self.resolver.resolve_identifier(identifier);
                if form.is_none() {
                    debug!("Unresolved identifier '{}' in {}", identifier, path.display());
                    report.unresolved += 1;
                }
                if self.registry.add_tag(form, &tag) {
                    report.applied += 1;
                } else {
                    report.rejected += 1;
                }
            })
            .map_err(|source| LoadError::Traversal {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(report)
        });
        log_outcome(FileFamily::Tags, path, &result);
        result
    }

    pub fn load_part_file(&self, path: &Path) -> Result<LoadReport, LoadError> {
        let result = self.read_document(path).and_then(|root| {
            let mut report = LoadReport::default();
            for_each_part_entry(&root, |part_type, name, label| {
                if self.registry.add_part_tag(part_type, name, label) {
                    report.applied += 1;
                } else {
                    report.rejected += 1;
                }
            })
            .map_err(|source| LoadError::Traversal {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(report)
        });
        log_outcome(FileFamily::Parts, path, &result);
        result
    }

    // The stream is dropped as soon as its bytes are read, before parsing.
    fn read_document(&self, path: &Path) -> Result<Value, LoadError> {
        let bytes = {
            let mut stream = self.resources.open(path).map_err(|source| LoadError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            let mut bytes = Vec::new();
            stream
                .read_to_end(&mut bytes)
                .map_err(|source| LoadError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
            bytes
        };

        parse_lenient(&bytes).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn log_outcome(family: FileFamily, path: &Path, result: &Result<LoadReport, LoadError>) {
    match result {
        Ok(report) => debug!(
            "Loaded {} file {}: {} applied, {} rejected, {} unresolved",
            family,
            path.display(),
            report.applied,
            report.rejected,
            report.unresolved
        ),
        Err(e @ LoadError::Open { .. }) => debug!("Skipping {} file: {}", family, e),
        Err(e) => error!("{}", e),
    }
}
