//! Server-side subscription view and customer names.

use std::fmt;

use super::PublicationId;

/// A server-recorded link between a customer name and a publication.
///
/// The client never mutates subscriptions; they are created only through the
/// remote subscribe call and observed through lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    /// Publication the customer is subscribed to.
    pub publication: PublicationId,
    /// Customer name exactly as recorded by the server (case-sensitive).
    pub customer_name: String,
}

impl Subscription {
    /// Build a subscription view.
    #[must_use]
    pub fn new(publication: PublicationId, customer_name: impl Into<String>) -> Self {
        Self {
            publication,
            customer_name: customer_name.into(),
        }
    }
}

/// Customer name accepted for a subscribe request.
///
/// ## Invariants
/// - Surrounding whitespace is removed.
/// - The remaining text is non-empty.
///
/// Case is preserved; `"asha"` and `"Asha"` are different customers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerName(String);

impl CustomerName {
    /// Trim the raw input and accept it when something remains.
    ///
    /// # Examples
    /// ```
    /// use signup_client::domain::CustomerName;
    ///
    /// let name = CustomerName::parse("  Asha ").expect("non-empty name");
    /// assert_eq!(name.as_str(), "Asha");
    /// assert!(CustomerName::parse("   ").is_none());
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Borrow the trimmed name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CustomerName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CustomerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
