//! Inbound adapters that drive the domain.

pub mod cli;
