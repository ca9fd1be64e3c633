//! Driven port for durable key/value text storage backing the payments ledger.

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger storage adapters.
    pub enum LedgerStoreError {
        /// Reading a stored value failed.
        Read {
            /// Key being read.
            key: String,
            /// Adapter description of the failure.
            message: String,
        } => "ledger store read of {key} failed: {message}",
        /// Persisting a value failed.
        Write {
            /// Key being written.
            key: String,
            /// Adapter description of the failure.
            message: String,
        } => "ledger store write of {key} failed: {message}",
        /// The key cannot be represented by the adapter.
        InvalidKey {
            /// Rejected key.
            key: String,
        } => "ledger store key {key} is not valid",
    }
}

/// Synchronous string store keyed by short ASCII names.
///
/// Writes replace the previous value wholesale; adapters must never leave a
/// partially written value visible to later reads.
#[cfg_attr(test, mockall::automock)]
pub trait LedgerStore: Send + Sync {
    /// Read the value stored under `key`, or `None` when nothing is stored.
    fn read(&self, key: &str) -> Result<Option<String>, LedgerStoreError>;

    /// Replace the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), LedgerStoreError>;

    /// Remove the value stored under `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), LedgerStoreError>;
}

/// Fixture store that holds nothing and discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLedgerStore;

impl LedgerStore for FixtureLedgerStore {
    fn read(&self, _key: &str) -> Result<Option<String>, LedgerStoreError> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &str) -> Result<(), LedgerStoreError> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), LedgerStoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fixture_store_never_remembers_writes() {
        let store = FixtureLedgerStore;
        store.write("payments", "[]").expect("write succeeds");
        assert_eq!(store.read("payments").expect("read succeeds"), None);
    }

    #[rstest]
    fn errors_name_the_offending_key() {
        let err = LedgerStoreError::write("payments", "disk full");
        assert_eq!(
            err.to_string(),
            "ledger store write of payments failed: disk full"
        );
    }
}
