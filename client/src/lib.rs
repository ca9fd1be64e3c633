//! Client-side publication subscription signup flow.
//!
//! The crate is laid out as a small hexagon:
//!
//! - [`domain`] owns the reconciliation logic: catalogue loading, customer
//!   subscription lookup, the dedup guard, subscription submission, and the
//!   locally cached payments ledger.
//! - [`domain::ports`] declares the seams the domain depends on (remote
//!   gateway, ledger storage, notifications, navigation).
//! - [`outbound`] implements the driven ports (reqwest gateway, in-memory and
//!   file-backed ledger stores).
//! - [`inbound`] drives the flow from a terminal.
//!
//! # Example
//!
//! ```
//! use signup_client::domain::{PublicationId, Subscription, is_subscribed};
//!
//! let daily = PublicationId::new("p1").expect("valid id");
//! let subscribed = vec![Subscription::new(daily.clone(), "Asha")];
//!
//! assert!(is_subscribed(&daily, &subscribed));
//! ```

pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
