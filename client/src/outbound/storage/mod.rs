//! Ledger storage adapters.
//!
//! - [`MemoryLedgerStore`] keeps values in process memory.
//! - [`FileLedgerStore`] keeps one JSON file per key with atomic
//!   replacement.

mod atomic_io;
mod file;
mod memory;

pub use file::FileLedgerStore;
pub use memory::MemoryLedgerStore;
