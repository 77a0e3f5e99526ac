//! Relay websocket RPC channel.
//!
//! Connects to the vendor relay, authenticates with the REST session's api
//! key, then exchanges JSON-RPC messages strictly one at a time: every
//! [`RpcChannel::call`] writes one message and reads exactly one reply.
//!
//! # Example
//!
//! ```rust,ignore
//! use greendo_api::rpc::{RpcChannel, DEFAULT_SOCKET_URL};
//! use url::Url;
//!
//! let url = Url::parse(DEFAULT_SOCKET_URL)?;
//! let mut channel = RpcChannel::open(&url, "me@example.com", session.api_key()).await?;
//! let reply = channel.call(&command).await?;
//! channel.close().await?;
//! ```

use futures_util::{SinkExt, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::error::Error;
use crate::rest::truthy;

/// Default relay endpoint of the vendor cloud.
pub const DEFAULT_SOCKET_URL: &str = "wss://tti.tiwiconnect.com/api/wsrpc";

/// Fixed request id the relay expects on the auth message.
const AUTH_REQUEST_ID: u32 = 3;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ── RpcChannel ───────────────────────────────────────────────────────

/// An open, authenticated relay connection.
///
/// Half-duplex by construction: `call` takes `&mut self`, so a second
/// request cannot be written before the previous reply has been read.
pub struct RpcChannel {
    stream: WsStream,
    url: Url,
}

impl RpcChannel {
    /// Connect to the relay without authenticating.
    pub async fn connect(url: &Url) -> Result<Self, Error> {
        info!(url = %url, "Connecting to relay websocket");

        let (stream, _response) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| Error::WebSocketConnect(e.to_string()))?;

        debug!("relay websocket connected");
        Ok(Self {
            stream,
            url: url.clone(),
        })
    }

    /// Connect and authenticate in one step.
    ///
    /// If authentication fails the socket is closed before the error is
    /// returned, so no half-open channel escapes.
    pub async fn open(url: &Url, username: &str, api_key: &SecretString) -> Result<Self, Error> {
        let mut channel = Self::connect(url).await?;
        match channel.authenticate(username, api_key).await {
            Ok(()) => Ok(channel),
            Err(e) => {
                if let Err(close_err) = channel.close().await {
                    warn!(error = %close_err, "closing rejected relay socket failed");
                }
                Err(e)
            }
        }
    }

    /// The relay URL this channel is connected to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send the `srvWebSocketAuth` message and validate the single reply.
    pub async fn authenticate(&mut self, username: &str, api_key: &SecretString) -> Result<(), Error> {
        debug!(username, "authenticating relay websocket");

        let request = json!({
            "jsonrpc": "2.0",
            "id": AUTH_REQUEST_ID,
            "method": "srvWebSocketAuth",
            "params": {
                "varName": username,
                "apiKey": api_key.expose_secret(),
            },
        });

        let reply = self.call(&request).await?;
        check_auth_reply(&reply)?;

        info!("relay websocket authorized");
        Ok(())
    }

    /// Write one message and read exactly one reply.
    pub async fn call<T: Serialize + ?Sized>(&mut self, message: &T) -> Result<Value, Error> {
        let text = serde_json::to_string(message)?;
        trace!(message = %text, "relay send");

        self.stream
            .send(Message::text(text))
            .await
            .map_err(map_ws_error)?;

        let reply = self.read_reply().await?;
        trace!(reply = %reply, "relay recv");

        serde_json::from_str(&reply).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: reply,
        })
    }

    /// Send a close frame. A socket the relay already dropped counts as closed.
    pub async fn close(&mut self) -> Result<(), Error> {
        debug!("closing relay websocket");
        match self.stream.close(None).await {
            Ok(()) | Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Ok(())
            }
            Err(e) => Err(map_ws_error(e)),
        }
    }

    /// Read frames until a data frame arrives.
    async fn read_reply(&mut self) -> Result<String, Error> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_owned()),
                Some(Ok(Message::Binary(bytes))) => {
                    return String::from_utf8(bytes.to_vec()).map_err(|e| Error::Deserialization {
                        message: format!("binary reply is not UTF-8: {e}"),
                        body: String::new(),
                    });
                }
                Some(Ok(Message::Close(frame))) => {
                    return Err(match frame {
                        Some(cf) => Error::WebSocketClosed {
                            code: cf.code.into(),
                            reason: cf.reason.as_str().to_owned(),
                        },
                        None => Error::WebSocketClosed {
                            code: 1005,
                            reason: "close frame without payload".into(),
                        },
                    });
                }
                Some(Ok(_)) => {
                    // Ping / Pong / raw Frame -- tungstenite answers pings itself
                    trace!("skipping control frame");
                }
                Some(Err(e)) => return Err(map_ws_error(e)),
                None => {
                    return Err(Error::WebSocketClosed {
                        code: 1006,
                        reason: "stream ended without a close frame".into(),
                    });
                }
            }
        }
    }
}

fn map_ws_error(err: tungstenite::Error) -> Error {
    match err {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            Error::WebSocketClosed {
                code: 1006,
                reason: err.to_string(),
            }
        }
        other => Error::WebSocket(other.to_string()),
    }
}

// ── Auth reply validation ────────────────────────────────────────────

/// Validate the relay's answer to `srvWebSocketAuth`.
///
/// The reply must be non-empty, carry a non-empty `params`, and have a
/// truthy `params.authorized`.
pub fn check_auth_reply(reply: &Value) -> Result<(), Error> {
    if !truthy(reply) {
        return Err(socket_auth_error("no socket auth returned"));
    }

    let Some(params) = reply.get("params").filter(|p| truthy(p)) else {
        return Err(socket_auth_error("no socket auth params received"));
    };

    if !params.get("authorized").is_some_and(truthy) {
        return Err(socket_auth_error(&format!("socket not authorized: {reply}")));
    }

    Ok(())
}

fn socket_auth_error(message: &str) -> Error {
    Error::Authentication {
        message: message.to_owned(),
        response: None,
    }
}

// ── Tests ────────────────────────────────────────────────────────────
