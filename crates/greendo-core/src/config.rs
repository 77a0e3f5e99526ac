// ── Runtime connection configuration ──
//
// Describes *how* to reach the vendor cloud: endpoints, account
// credentials and transport tuning. Never touches disk; callers (or the
// greendo-config crate) build a `ClientConfig` and hand it in.

use std::path::PathBuf;
use std::time::Duration;

use greendo_api::{DEFAULT_API_URL, DEFAULT_SOCKET_URL, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). The vendor cloud presents a public certificate.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Only useful against local test relays.
    DangerAcceptInvalid,
}

/// Configuration for one account session against the vendor cloud.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST API root, e.g. `https://tti.tiwiconnect.com/api`.
    pub api_url: Url,
    /// Relay websocket endpoint, e.g. `wss://tti.tiwiconnect.com/api/wsrpc`.
    pub socket_url: Url,
    /// Account login (an email address).
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Config for the vendor cloud with default endpoints and transport.
    pub fn new(username: impl Into<String>, password: SecretString) -> Result<Self, CoreError> {
        Ok(Self {
            api_url: parse_url(DEFAULT_API_URL)?,
            socket_url: parse_url(DEFAULT_SOCKET_URL)?,
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        })
    }

    /// Point both endpoints somewhere else (a staging host, a mock server).
    pub fn with_endpoints(mut self, api_url: Url, socket_url: Url) -> Self {
        self.api_url = api_url;
        self.socket_url = socket_url;
        self
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: tls_to_transport(&self.tls),
            timeout: self.timeout,
            cookie_jar: None, // RestClient::new adds one
        }
    }
}

fn parse_url(raw: &str) -> Result<Url, CoreError> {
    Url::parse(raw).map_err(|e| CoreError::Config {
        message: format!("invalid endpoint {raw}: {e}"),
    })
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_points_at_vendor_cloud() {
        let config = ClientConfig::new("me@example.com", SecretString::from("pw".to_string())).unwrap();

        assert_eq!(config.api_url.as_str(), "https://tti.tiwiconnect.com/api");
        assert_eq!(config.socket_url.as_str(), "wss://tti.tiwiconnect.com/api/wsrpc");
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn transport_mirrors_tls_and_timeout() {
        let mut config = ClientConfig::new("me@example.com", SecretString::from("pw".to_string())).unwrap();
        config.tls = TlsVerification::DangerAcceptInvalid;
        config.timeout = Duration::from_secs(5);

        let transport = config.transport();
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert!(transport.cookie_jar.is_none());
    }
}
