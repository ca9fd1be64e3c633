//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed subscription gateway
//! - **storage**: in-memory and file-backed ledger stores
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod http;
pub mod storage;
