//! Publication catalogue entries.

use std::fmt;

use rust_decimal::Decimal;

/// Validation errors returned when constructing publications.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublicationValidationError {
    /// The publication identifier was blank.
    #[error("publication id must not be empty")]
    EmptyId,
    /// The display name was blank.
    #[error("publication name must not be empty")]
    EmptyName,
    /// The monthly price was zero or negative.
    #[error("monthly price must be positive, got {price}")]
    NonPositivePrice {
        /// Rejected price.
        price: Decimal,
    },
}

/// Opaque publication identifier assigned by the remote catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicationId(String);

impl PublicationId {
    /// Validate and construct a [`PublicationId`].
    ///
    /// # Errors
    ///
    /// Returns [`PublicationValidationError::EmptyId`] when the id is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, PublicationValidationError> {
        let raw: String = id.into();
        if raw.trim().is_empty() {
            return Err(PublicationValidationError::EmptyId);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PublicationId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PublicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A subscribable publication as listed by the remote catalogue.
///
/// ## Invariants
/// - `name` is non-empty once trimmed.
/// - `monthly_price` is strictly positive.
///
/// Publications are immutable once fetched; a new catalogue fetch replaces
/// them wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    id: PublicationId,
    name: String,
    language: String,
    monthly_price: Decimal,
}

impl Publication {
    /// Validate and construct a publication.
    ///
    /// # Errors
    ///
    /// Returns [`PublicationValidationError`] when the name is blank or the
    /// price is not positive.
    ///
    /// # Examples
    /// ```
    /// use rust_decimal::Decimal;
    /// use signup_client::domain::{Publication, PublicationId};
    ///
    /// let id = PublicationId::new("p1").expect("valid id");
    /// let daily = Publication::try_new(id, "Daily Times", "en", Decimal::from(100))
    ///     .expect("valid publication");
    /// assert_eq!(daily.name(), "Daily Times");
    /// ```
    pub fn try_new(
        id: PublicationId,
        name: impl Into<String>,
        language: impl Into<String>,
        monthly_price: Decimal,
    ) -> Result<Self, PublicationValidationError> {
        let display_name: String = name.into();
        if display_name.trim().is_empty() {
            return Err(PublicationValidationError::EmptyName);
        }
        if monthly_price <= Decimal::ZERO {
            return Err(PublicationValidationError::NonPositivePrice {
                price: monthly_price,
            });
        }
        Ok(Self {
            id,
            name: display_name,
            language: language.into(),
            monthly_price,
        })
    }

    /// Catalogue identifier.
    #[must_use]
    pub fn id(&self) -> &PublicationId {
        &self.id
    }

    /// Display name shown to customers and copied into payment records.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Language tag as supplied by the catalogue.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Monthly price, which is also the amount charged on subscription.
    #[must_use]
    pub const fn monthly_price(&self) -> Decimal {
        self.monthly_price
    }
}
