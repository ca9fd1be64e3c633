//! File-backed ledger store.
//!
//! Each key maps to `<key>.json` inside a capability directory. Keys are
//! restricted to ASCII letters, digits, `-`, and `_`, so a key can never
//! name a path outside the directory.

use std::io;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use super::atomic_io::replace_file;
use crate::domain::ports::{LedgerStore, LedgerStoreError};

const FILE_EXTENSION: &str = "json";

/// Ledger store that keeps one JSON file per key.
#[derive(Debug)]
pub struct FileLedgerStore {
    dir: Dir,
}

impl FileLedgerStore {
    /// Open (creating if needed) the store rooted at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created or opened.
    pub fn open(path: &Utf8Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        debug!(path = %path, "opened file ledger store");
        Ok(Self { dir })
    }

    /// Wrap an already opened directory.
    #[must_use]
    pub const fn from_dir(dir: Dir) -> Self {
        Self { dir }
    }
}

fn file_name(key: &str) -> Result<String, LedgerStoreError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_');
    if valid {
        Ok(format!("{key}.{FILE_EXTENSION}"))
    } else {
        Err(LedgerStoreError::invalid_key(key))
    }
}

impl LedgerStore for FileLedgerStore {
    fn read(&self, key: &str) -> Result<Option<String>, LedgerStoreError> {
        let name = file_name(key)?;
        match self.dir.read_to_string(&name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(LedgerStoreError::read(key, err.to_string())),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), LedgerStoreError> {
        let name = file_name(key)?;
        replace_file(&self.dir, &name, value)
            .map_err(|err| LedgerStoreError::write(key, err.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), LedgerStoreError> {
        let name = file_name(key)?;
        match self.dir.remove_file(&name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(LedgerStoreError::write(key, err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("payments")]
    #[case::dashed("payments-v2")]
    #[case::underscored("payments_archive")]
    fn accepts_simple_keys(#[case] key: &str) {
        assert_eq!(file_name(key), Ok(format!("{key}.json")));
    }

    #[rstest]
    #[case::empty("")]
    #[case::traversal("../payments")]
    #[case::nested("a/b")]
    #[case::dotted("payments.json")]
    fn rejects_keys_that_are_not_single_names(#[case] key: &str) {
        assert_eq!(file_name(key), Err(LedgerStoreError::invalid_key(key)));
    }
}
