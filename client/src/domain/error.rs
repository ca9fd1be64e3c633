//! Failures surfaced by the signup flow.

use super::LedgerCacheError;
use super::ports::GatewayError;

/// Local validation failures detected before any remote call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No publication is selected.
    #[error("Please select a publication")]
    NoPublicationSelected,
    /// The customer name is empty once trimmed.
    #[error("Please enter your name")]
    EmptyCustomerName,
    /// A subscribe request is still awaiting the backend.
    #[error("A subscription request is already in progress")]
    SubmissionInProgress,
    /// The customer already holds a subscription to the publication.
    #[error("Already subscribed to {publication_name}")]
    AlreadySubscribed {
        /// Display name of the publication.
        publication_name: String,
    },
    /// The selected identifier is not in the loaded catalogue.
    #[error("Publication {id} is not in the catalogue")]
    UnknownPublication {
        /// Unmatched identifier.
        id: String,
    },
}

/// Errors returned by signup operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignupError {
    /// Input was rejected locally.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The backend could not be reached or answered unintelligibly.
    #[error("subscription backend unavailable: {message}")]
    Transport {
        /// Underlying failure description.
        message: String,
    },
    /// The backend rejected the session credentials.
    #[error("session is not authorised")]
    Unauthorized,
    /// The backend refused the request.
    #[error("subscription backend rejected the request with status {status}")]
    Rejected {
        /// HTTP status returned.
        status: u16,
        /// Server-supplied explanation, when one was present.
        message: Option<String>,
    },
    /// The local ledger could not be read or written.
    #[error(transparent)]
    Ledger(#[from] LedgerCacheError),
}

impl SignupError {
    /// Text to show the user, preferring specific messages over `fallback`.
    ///
    /// Validation failures and server-supplied rejection messages are shown
    /// verbatim; everything else collapses to the caller's generic text.
    ///
    /// # Examples
    /// ```
    /// use signup_client::domain::{SignupError, ValidationError};
    ///
    /// let err = SignupError::from(ValidationError::EmptyCustomerName);
    /// assert_eq!(err.user_message("Failed to subscribe"), "Please enter your name");
    ///
    /// let err = SignupError::Unauthorized;
    /// assert_eq!(err.user_message("Failed to subscribe"), "Failed to subscribe");
    /// ```
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_owned(),
        }
    }

    /// Whether the user should be sent back to the login view.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<GatewayError> for SignupError {
    fn from(value: GatewayError) -> Self {
        match value {
            GatewayError::Unauthorized { .. } => Self::Unauthorized,
            GatewayError::Rejected { status, message } => Self::Rejected { status, message },
            other @ (GatewayError::Transport { .. }
            | GatewayError::Timeout { .. }
            | GatewayError::Decode { .. }
            | GatewayError::InvalidRequest { .. }) => Self::Transport {
                message: other.to_string(),
            },
        }
    }
}
