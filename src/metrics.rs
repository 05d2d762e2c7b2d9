//! Load outcome counters
//!
//! Recorded through the `metrics` facade; without an installed recorder these
//! calls are no-ops.

use crate::loader::{FileFamily, LoadReport};

pub const FILES_LOADED: &str = "chargen_tags_files_loaded_total";
pub const FILES_MISSING: &str = "chargen_tags_files_missing_total";
pub const FILES_FAILED: &str = "chargen_tags_files_failed_total";
pub const ENTRIES_APPLIED: &str = "chargen_tags_entries_applied_total";
pub const ENTRIES_UNRESOLVED: &str = "chargen_tags_entries_unresolved_total";

pub struct LoaderMetrics;

impl LoaderMetrics {
    pub fn record_file_loaded(family: FileFamily, report: &LoadReport) {
        ::metrics::counter!(FILES_LOADED, "family" => family.as_str()).increment(1);
        ::metrics::counter!(ENTRIES_APPLIED, "family" => family.as_str())
            .increment(report.applied as u64);
        if report.unresolved > 0 {
            ::metrics::counter!(ENTRIES_UNRESOLVED, "family" => family.as_str())
                .increment(report.unresolved as u64);
        }
    }

    pub fn record_file_missing(family: FileFamily) {
        ::metrics::counter!(FILES_MISSING, "family" => family.as_str()).increment(1);
    }

    pub fn record_file_failed(family: FileFamily, error_kind: &'static str) {
        ::metrics::counter!(FILES_FAILED, "family" => family.as_str(), "error" => error_kind)
            .increment(1);
    }
}
