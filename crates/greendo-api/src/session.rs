use secrecy::SecretString;
use serde_json::Value;

/// An authenticated REST session.
///
/// `api_key` authenticates the relay websocket; `data` is the full `result`
/// object of the login reply, kept for consumers that need other session
/// fields. Immutable once created.
#[derive(Debug, Clone)]
pub struct Session {
    api_key: SecretString,
    data: Value,
}

impl Session {
    pub fn new(api_key: SecretString, data: Value) -> Self {
        Self { api_key, data }
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// The decoded login `result` object.
    pub fn data(&self) -> &Value {
        &self.data
    }
}
