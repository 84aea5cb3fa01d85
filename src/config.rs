//! Merchant credentials and client configuration.
//!
//! Both structures deserialize from TOML so callers can keep them in their
//! own configuration layer; reading the environment or a file stays with the
//! caller.

use std::{fmt, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::error::{GatewayError, Result};

/// Merchant account credentials.
///
/// Immutable, supplied at client construction. The shared secret is the HMAC
/// key for every outbound request, inbound response, and callback; it is
/// redacted from `Debug` output and never included in diagnostics or log
/// lines.
#[derive(Clone, Deserialize)]
pub struct MerchantCredentials {
    /// Merchant account identifier, sent as the `checkout-account` header.
    pub account_id: String,
    /// Shared HMAC secret. Never part of any request body or header.
    pub shared_secret: String,
}

impl MerchantCredentials {
    /// Creates credentials from an account id and shared secret.
    #[must_use]
    pub fn new(account_id: &str, shared_secret: &str) -> Self {
        Self { account_id: account_id.to_owned(), shared_secret: shared_secret.to_owned() }
    }
}

impl fmt::Debug for MerchantCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantCredentials")
            .field("account_id", &self.account_id)
            .field("shared_secret", &"<redacted>")
            .finish()
    }
}

/// Gateway client configuration.
///
/// Every field has a serde default, so an empty TOML table yields a working
/// configuration pointing at the production gateway.
///
/// # Examples
///
/// ```
/// use checkout_gateway::GatewayConfig;
///
/// let config: GatewayConfig = toml::from_str(
///     r#"
///     service_name = "webshop"
///     secure_callbacks = false
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.server_url, "https://api.checkout.fi");
/// assert!(!config.secure_callbacks);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Gateway base URL. The payment endpoint is `{server_url}/payments`.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Service name used in audit lines and failure diagnostics.
    #[serde(default)]
    pub service_name: String,

    /// ISO 4217 currency code for orders opened through the builder.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Two-letter language code for orders opened through the builder.
    #[serde(default = "default_language")]
    pub language: String,

    /// Whether this deployment can receive gateway callbacks over TLS.
    ///
    /// When false, callback URLs are omitted from outgoing orders — the
    /// gateway rejects plain-HTTP callback targets.
    #[serde(default = "default_secure_callbacks")]
    pub secure_callbacks: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            service_name: String::new(),
            currency: default_currency(),
            language: default_language(),
            secure_callbacks: default_secure_callbacks(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    /// Validates configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if:
    /// - `server_url` is not a parseable HTTPS URL with a host
    /// - `timeout_secs` is outside 1-300
    /// - `connect_timeout_secs` is outside 1-60
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.server_url).map_err(|e| {
            GatewayError::Config(format!("invalid server_url '{}': {e}", self.server_url))
        })?;

        if url.scheme() != "https" {
            return Err(GatewayError::Config(format!(
                "server_url must use HTTPS, got: {}",
                url.scheme()
            )));
        }

        if url.host_str().is_none() {
            return Err(GatewayError::Config(format!(
                "server_url missing host: {}",
                self.server_url
            )));
        }

        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(GatewayError::Config("timeout_secs must be between 1 and 300".to_owned()));
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 60 {
            return Err(GatewayError::Config(
                "connect_timeout_secs must be between 1 and 60".to_owned(),
            ));
        }

        Ok(())
    }

    /// Returns the request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the connection timeout as a `Duration`.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// True when both timeouts are at their default values.
    pub(crate) fn uses_default_timeouts(&self) -> bool {
        self.timeout_secs == default_timeout_secs()
            && self.connect_timeout_secs == default_connect_timeout_secs()
    }
}

fn default_server_url() -> String {
    "https://api.checkout.fi".to_owned()
}

fn default_currency() -> String {
    "EUR".to_owned()
}

fn default_language() -> String {
    "FI".to_owned()
}

fn default_secure_callbacks() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = GatewayConfig::default();
        assert_eq!(config.server_url, "https://api.checkout.fi");
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.language, "FI");
        assert!(config.secure_callbacks);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn test_config_default_validates() {
        assert!(GatewayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_from_empty_toml() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.server_url, "https://api.checkout.fi");
        assert!(config.service_name.is_empty());
        assert!(config.secure_callbacks);
    }

    #[test]
    fn test_config_from_toml_partial() {
        let config: GatewayConfig = toml::from_str(
            r#"
            server_url = "https://gateway.example.com"
            service_name = "webshop"
            timeout_secs = 45
            "#,
        )
        .unwrap();

        assert_eq!(config.server_url, "https://gateway.example.com");
        assert_eq!(config.service_name, "webshop");
        assert_eq!(config.timeout_secs, 45);
        assert_eq!(config.connect_timeout_secs, 10); // default
        assert_eq!(config.currency, "EUR"); // default
    }

    #[test]
    fn test_config_timeout_accessors() {
        let config = GatewayConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_validate_rejects_http_url() {
        let config =
            GatewayConfig { server_url: "http://api.checkout.fi".to_owned(), ..Default::default() };
        let result = config.validate();
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), GatewayError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_malformed_url() {
        let config = GatewayConfig { server_url: "not-a-url".to_owned(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = GatewayConfig { timeout_secs: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = GatewayConfig { connect_timeout_secs: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_excessive_timeout() {
        let config = GatewayConfig { timeout_secs: 301, ..Default::default() };
        assert!(config.validate().is_err());

        let config = GatewayConfig { connect_timeout_secs: 61, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_uses_default_timeouts() {
        assert!(GatewayConfig::default().uses_default_timeouts());
        let config = GatewayConfig { timeout_secs: 60, ..Default::default() };
        assert!(!config.uses_default_timeouts());
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let credentials = MerchantCredentials::new("375917", "SAIPPUAKAUPPIAS");
        let debug_str = format!("{credentials:?}");
        assert!(debug_str.contains("375917"));
        assert!(debug_str.contains("<redacted>"));
        assert!(!debug_str.contains("SAIPPUAKAUPPIAS"));
    }

    #[test]
    fn test_credentials_from_toml() {
        let credentials: MerchantCredentials = toml::from_str(
            r#"
            account_id = "375917"
            shared_secret = "SAIPPUAKAUPPIAS"
            "#,
        )
        .unwrap();

        assert_eq!(credentials.account_id, "375917");
        assert_eq!(credentials.shared_secret, "SAIPPUAKAUPPIAS");
    }
}
