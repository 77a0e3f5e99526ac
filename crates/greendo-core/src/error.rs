// ── Core error types ──
//
// Domain errors from greendo-core. The `From<greendo_api::Error>` impl
// translates transport-layer errors into these variants; classified REST
// replies stay attached so callers can still inspect what the server said.

use greendo_api::ResponseEnvelope;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        message: String,
        response: Option<Box<ResponseEnvelope>>,
    },

    #[error("Relay channel closed: {reason}")]
    ChannelClosed { reason: String },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Device discovery failed{}: {message}", device_suffix(device.as_deref()))]
    DeviceDiscovery {
        device: Option<String>,
        message: String,
        response: Option<Box<ResponseEnvelope>>,
    },

    #[error("Logout failed: {response}")]
    LogoutFailed { response: Box<ResponseEnvelope> },

    #[error("No device exposes a master unit")]
    MasterUnitNotFound,

    /// Releasing the client failed. Each field holds the outcome of one
    /// release step; at least one of them is an error.
    #[error("Close failed (socket: {}, logout: {})", outcome(socket.as_deref()), outcome(logout.as_deref()))]
    Close {
        socket: Option<Box<CoreError>>,
        logout: Option<Box<CoreError>>,
    },

    // ── Command errors ───────────────────────────────────────────────
    #[error("Module not resolved on this device: {module}")]
    ModuleNotResolved { module: String },

    #[error("Cannot build {module} command: {reason}")]
    CommandBuild { module: String, reason: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

fn device_suffix(device: Option<&str>) -> String {
    device.map(|d| format!(" for {d}")).unwrap_or_default()
}

fn outcome(err: Option<&CoreError>) -> String {
    err.map_or_else(|| "ok".to_owned(), ToString::to_string)
}

impl CoreError {
    /// Returns `true` for login and socket-auth failures.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    /// The classified REST reply behind this error, if there is one.
    pub fn response(&self) -> Option<&ResponseEnvelope> {
        match self {
            Self::AuthenticationFailed { response, .. } | Self::DeviceDiscovery { response, .. } => {
                response.as_deref()
            }
            Self::LogoutFailed { response } => Some(response),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<greendo_api::Error> for CoreError {
    fn from(err: greendo_api::Error) -> Self {
        match err {
            greendo_api::Error::Authentication { message, response } => {
                CoreError::AuthenticationFailed { message, response }
            }
            greendo_api::Error::DeviceDiscovery {
                device,
                message,
                response,
            } => CoreError::DeviceDiscovery {
                device,
                message,
                response,
            },
            greendo_api::Error::Logout { response } => CoreError::LogoutFailed { response },
            greendo_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            greendo_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            greendo_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            greendo_api::Error::WebSocketConnect(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("WebSocket connection failed: {reason}"),
            },
            greendo_api::Error::WebSocketClosed { code, reason } => CoreError::ChannelClosed {
                reason: format!("code {code}: {reason}"),
            },
            greendo_api::Error::WebSocket(reason) => CoreError::ChannelClosed { reason },
            greendo_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            greendo_api::Error::Json(e) => CoreError::Internal(format!("JSON error: {e}")),
        }
    }
}
