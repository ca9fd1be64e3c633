//! Client configuration loaded via OrthoConfig.

use std::fmt;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_LEDGER_DIR: &str = ".signup";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings for reaching the subscription backend and storing the ledger.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SIGNUP")]
pub struct SignupSettings {
    /// API root of the subscription backend.
    pub base_url: Option<String>,
    /// Bearer token forwarded with every request.
    pub token: Option<String>,
    /// Directory holding the local payments ledger.
    pub ledger_dir: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

impl SignupSettings {
    /// Return the configured API root, falling back to the local default.
    ///
    /// # Errors
    ///
    /// Returns a parse error when the configured value is not a URL.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
    }

    /// Return the bearer token, if one is configured and non-blank.
    #[must_use]
    pub fn token(&self) -> Option<Zeroizing<String>> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Zeroizing::new(token.to_owned()))
    }

    /// Return the ledger directory, falling back to the default.
    #[must_use]
    pub fn ledger_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.ledger_dir.as_deref().unwrap_or(DEFAULT_LEDGER_DIR))
    }

    /// Return the request timeout, falling back to the default.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

impl fmt::Debug for SignupSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupSettings")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("ledger_dir", &self.ledger_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
