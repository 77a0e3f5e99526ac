use thiserror::Error;

use crate::rest::response::ResponseEnvelope;

/// Top-level error type for the `greendo-api` crate.
///
/// Covers every failure mode of the transport layer: REST session flow,
/// HTTP transport, websocket RPC, and payload decoding. Failures caused by
/// a classified REST reply keep that reply attached so callers can inspect
/// the status code, error value and raw body.
/// `greendo-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Session flow ────────────────────────────────────────────────
    /// Login failed, or the relay socket refused the api key.
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        response: Option<Box<ResponseEnvelope>>,
    },

    /// Device list or device detail retrieval failed.
    ///
    /// `device` is `None` when the device list request itself failed.
    #[error("Device discovery failed{}: {message}", device_suffix(device.as_deref()))]
    DeviceDiscovery {
        device: Option<String>,
        message: String,
        response: Option<Box<ResponseEnvelope>>,
    },

    /// Logout was rejected; the server-side session state is unknown.
    #[error("Logout failed: {response}")]
    Logout { response: Box<ResponseEnvelope> },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── WebSocket ───────────────────────────────────────────────────
    /// WebSocket connection failed.
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    /// WebSocket closed while a reply was expected.
    #[error("WebSocket closed (code {code}): {reason}")]
    WebSocketClosed { code: u16, reason: String },

    /// Read or write on an open WebSocket failed.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// JSON serialization of an outbound message failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn device_suffix(device: Option<&str>) -> String {
    device.map(|d| format!(" for {d}")).unwrap_or_default()
}

impl Error {
    /// Returns `true` for login and socket-auth failures.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if the relay socket is gone and a new client is needed.
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, Self::WebSocketClosed { .. } | Self::WebSocket(_))
    }

    /// The classified REST reply behind this error, if there is one.
    pub fn response(&self) -> Option<&ResponseEnvelope> {
        match self {
            Self::Authentication { response, .. } | Self::DeviceDiscovery { response, .. } => {
                response.as_deref()
            }
            Self::Logout { response } => Some(response),
            _ => None,
        }
    }
}
