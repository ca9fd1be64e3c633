//! Locally cached payment-due records.
//!
//! Payment records are a client-side projection of confirmed subscriptions.
//! They are serialised into the ledger as a JSON array of camelCase objects:
//!
//! ```json
//! [{"id": 1767225600000, "subscriptionName": "Daily Times", "amount": 100.0,
//!   "dueDate": "2026-01-31T00:00:00Z", "status": "paid",
//!   "paidDate": "2026-01-01T00:00:00Z"}]
//! ```

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Publication;

/// Days between recording a subscription and its next payment falling due.
pub const PAYMENT_DUE_PERIOD_DAYS: i64 = 30;

/// Time-based synthetic record identifier (milliseconds since the Unix epoch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentRecordId(i64);

impl PaymentRecordId {
    /// Derive an identifier from the creation instant.
    #[must_use]
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self(instant.timestamp_millis())
    }

    /// Raw millisecond value.
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PaymentRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment status.
///
/// Only `paid` is produced by this crate. Other states are managed by
/// downstream payment views and are preserved verbatim when read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    /// Settled at subscription time.
    Paid,
    /// Awaiting payment.
    Pending,
    /// Past its due date without payment.
    Overdue,
    /// Any other downstream-managed state.
    Other(String),
}

impl PaymentStatus {
    /// Wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Overdue => "overdue",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "paid" => Self::Paid,
            "pending" => Self::Pending,
            "overdue" => Self::Overdue,
            _ => Self::Other(value),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the local payments ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Time-based synthetic identity.
    pub id: PaymentRecordId,
    /// Display name of the subscribed publication.
    pub subscription_name: String,
    /// Amount charged.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// When the next payment falls due.
    pub due_date: DateTime<Utc>,
    /// Payment state.
    pub status: PaymentStatus,
    /// When the payment was settled, if it has been.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<DateTime<Utc>>,
}

impl PaymentRecord {
    /// Project a confirmed subscription into a paid ledger entry.
    ///
    /// The amount is the publication's monthly price; the due date is
    /// [`PAYMENT_DUE_PERIOD_DAYS`] after `now`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeDelta, TimeZone, Utc};
    /// use rust_decimal::Decimal;
    /// use signup_client::domain::{PaymentRecord, PaymentStatus, Publication, PublicationId};
    ///
    /// let id = PublicationId::new("p1").expect("valid id");
    /// let daily = Publication::try_new(id, "Daily Times", "en", Decimal::from(100))
    ///     .expect("valid publication");
    /// let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("valid instant");
    ///
    /// let record = PaymentRecord::for_confirmed_subscription(&daily, now);
    /// assert_eq!(record.status, PaymentStatus::Paid);
    /// assert_eq!(record.due_date - now, TimeDelta::days(30));
    /// ```
    #[must_use]
    pub fn for_confirmed_subscription(publication: &Publication, now: DateTime<Utc>) -> Self {
        Self {
            id: PaymentRecordId::from_instant(now),
            subscription_name: publication.name().to_owned(),
            amount: publication.monthly_price(),
            due_date: now + TimeDelta::days(PAYMENT_DUE_PERIOD_DAYS),
            status: PaymentStatus::Paid,
            paid_date: Some(now),
        }
    }
}
