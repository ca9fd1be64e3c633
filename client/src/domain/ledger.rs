//! Client-side cache of payment-due records.
//!
//! The ledger is stored as a single JSON array under [`LEDGER_STORAGE_KEY`].
//! Every append is a read-modify-write of the whole array. The store port is
//! synchronous, so an append never spans an await point and cannot interleave
//! with another append on the same task.
//!
//! Appends are deliberately not deduplicated. Callers own the guarantee that
//! each confirmed subscription is appended once.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use super::ports::{LedgerStore, LedgerStoreError};
use super::{PaymentRecord, PaymentRecordId};

/// Well-known storage key shared with the payments views.
pub const LEDGER_STORAGE_KEY: &str = "payments";

const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Change notification published after the ledger is modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerChanged {
    /// A record was appended.
    Appended {
        /// Identity of the new record.
        record_id: PaymentRecordId,
        /// Ledger length after the append.
        len: usize,
    },
    /// The ledger was cleared.
    Cleared,
}

/// Errors raised by [`LedgerCache`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerCacheError {
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] LedgerStoreError),
    /// The stored value is not a ledger.
    #[error("stored payments ledger is corrupt: {message}")]
    Corrupt {
        /// Decoder description of the problem.
        message: String,
    },
    /// The ledger could not be serialised.
    #[error("payments ledger could not be encoded: {message}")]
    Encode {
        /// Encoder description of the problem.
        message: String,
    },
}

/// Append-only payments ledger with change broadcast.
pub struct LedgerCache<S> {
    store: Arc<S>,
    changes: broadcast::Sender<LedgerChanged>,
}

impl<S> LedgerCache<S>
where
    S: LedgerStore,
{
    /// Wrap `store` in a ledger cache.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { store, changes }
    }

    /// Observe subsequent ledger changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerChanged> {
        self.changes.subscribe()
    }

    /// Current ledger contents in append order.
    ///
    /// A missing ledger is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerCacheError::Store`] when the store cannot be read and
    /// [`LedgerCacheError::Corrupt`] when the stored value does not decode.
    pub fn records(&self) -> Result<Vec<PaymentRecord>, LedgerCacheError> {
        let Some(raw) = self.store.read(LEDGER_STORAGE_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|err| LedgerCacheError::Corrupt {
            message: err.to_string(),
        })
    }

    /// Append `record` and broadcast the change.
    ///
    /// Returns the ledger length after the append. Existing entries are
    /// written back untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerCacheError`] when the ledger cannot be read, decoded,
    /// encoded, or written. Nothing is broadcast on failure.
    pub fn append(&self, record: PaymentRecord) -> Result<usize, LedgerCacheError> {
        let mut records = self.records()?;
        let record_id = record.id;
        records.push(record);

        let encoded = serde_json::to_string(&records).map_err(|err| LedgerCacheError::Encode {
            message: err.to_string(),
        })?;
        self.store.write(LEDGER_STORAGE_KEY, &encoded)?;

        let len = records.len();
        debug!(record_id = %record_id, len, "appended payment record");
        self.publish(LedgerChanged::Appended { record_id, len });
        Ok(len)
    }

    /// Remove every record and broadcast the change.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerCacheError::Store`] when the store rejects the removal.
    pub fn clear(&self) -> Result<(), LedgerCacheError> {
        self.store.remove(LEDGER_STORAGE_KEY)?;
        debug!("cleared payments ledger");
        self.publish(LedgerChanged::Cleared);
        Ok(())
    }

    fn publish(&self, change: LedgerChanged) {
        if self.changes.send(change).is_err() {
            debug!(?change, "no ledger observers");
        }
    }
}
