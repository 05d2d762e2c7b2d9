use std::fs;
use std::path::Path;

use crate::app::ports::PackageSource;
use crate::error::{Result, TagError};

/// Ordered list of installed packages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOrder {
    packages: Vec<String>,
}

impl LoadOrder {
    pub fn new<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            packages: packages.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a `plugins.txt` style listing.
    ///
    /// Blank lines and `#` comments are ignored. A leading `*` marks an
    /// active entry; if any entry is marked, unmarked entries are dropped.
    pub fn parse(text: &str) -> Self {
        let entries: Vec<(bool, &str)> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| match line.strip_prefix('*') {
                Some(name) => (true, name.trim()),
                None => (false, line),
            })
            .filter(|(_, name)| !name.is_empty())
            .collect();

        let any_marked = entries.iter().any(|(active, _)| *active);
        Self::new(
            entries
                .into_iter()
                .filter(|(active, _)| *active || !any_marked)
                .map(|(_, name)| name),
        )
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            TagError::Config(format!("Failed to read load order '{}': {}", path.display(), e))
        })?;
        Ok(Self::parse(&text))
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// Position of `package` in the load order, compared case-insensitively
    pub fn index_of(&self, package: &str) -> Option<usize> {
        self.packages
            .iter()
            .position(|p| p.eq_ignore_ascii_case(package))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl PackageSource for LoadOrder {
    fn for_each_package(&self, visitor: &mut dyn FnMut(&str)) {
        for package in &self.packages {
            visitor(package);
        }
    }
}
