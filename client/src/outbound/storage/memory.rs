//! Process-local ledger store.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::domain::ports::{LedgerStore, LedgerStoreError};

/// Ledger store backed by a map held in memory.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryLedgerStore {
    /// Store pre-populated with `key` set to `value`.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let values = HashMap::from([(key.into(), value.into())]);
        Self {
            values: Mutex::new(values),
        }
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn read(&self, key: &str) -> Result<Option<String>, LedgerStoreError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), LedgerStoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LedgerStoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}
