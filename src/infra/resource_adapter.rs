use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::app::ports::ResourceProvider;

/// Resolves resource paths against a directory on disk
pub struct FsResourceProvider {
    root: PathBuf,
}

impl FsResourceProvider {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceProvider for FsResourceProvider {
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn Read + '_>> {
        let file = File::open(self.root.join(path))?;
        Ok(Box::new(BufReader::new(file)))
    }
}
