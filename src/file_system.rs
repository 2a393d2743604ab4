use crate::{BoxError, Lookup};
use std::{io, path::PathBuf};

/// A lookup source which reads whole files, such as mounted secrets.
///
/// A name is a path, relative to `base` unless it is absolute. A missing file is "not found";
/// any other I/O error is a source error for that field.
#[derive(Clone, Debug)]
pub struct FileSystem {
    base: PathBuf,
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FileSystem {
    /// Read files relative to `base`
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl Lookup for FileSystem {
    fn lookup(&self, name: &str) -> Result<Option<String>, BoxError> {
        // join() keeps an absolute name as-is
        let path = self.base.join(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("{}: {err}", path.display()).into()),
        }
    }
}
