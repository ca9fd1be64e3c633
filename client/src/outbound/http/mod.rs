//! HTTP outbound adapter for the subscription backend.
//!
//! This module provides a thin reqwest implementation of the
//! `SubscriptionGateway` port.

mod dto;
mod gateway;

pub use gateway::HttpSubscriptionGateway;
