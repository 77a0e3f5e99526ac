// REST response classification
//
// Every vendor endpoint answers with a JSON body that is either
// `{ "result": ... }` on success or carries an `err` field. HTTP status,
// the `err` field, and an empty `result` are folded into one envelope so
// callers branch on `error` rather than on the HTTP status alone.

use std::fmt;

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::Error;

/// Why a REST reply was classified as a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseError {
    /// HTTP status other than 200.
    Status(u16),
    /// HTTP 200, but the body carried a non-null `err` field. Holds the whole body.
    Body(Value),
    /// HTTP 200 without `err`, but `result` was missing or empty.
    NoResult,
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::Body(body) => write!(f, "{body}"),
            Self::NoResult => f.write_str("no result"),
        }
    }
}

/// A classified REST reply.
///
/// Built once per request and never mutated. `data` is the decoded body
/// (`{}` for an empty body, `null` for an undecodable error page) and `raw`
/// the body text as received.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub error: Option<ResponseError>,
    pub data: Value,
    pub raw: String,
}

impl ResponseEnvelope {
    /// Classify a reply from its HTTP status and body text.
    ///
    /// Tiers, first match wins:
    /// 1. status != 200 -> `Status(code)`
    /// 2. non-null `err` -> `Body(data)`
    /// 3. missing or falsy `result` -> `NoResult`
    /// 4. success
    ///
    /// A body that is not JSON is tolerated on error statuses but is a
    /// [`Error::Deserialization`] on HTTP 200.
    pub fn classify(status: u16, raw: String) -> Result<Self, Error> {
        let data = if raw.trim().is_empty() {
            Value::Object(Map::new())
        } else {
            match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(_) if status != 200 => Value::Null,
                Err(e) => {
                    let preview: String = raw.chars().take(200).collect();
                    return Err(Error::Deserialization {
                        message: format!("{e} (body preview: {preview:?})"),
                        body: raw,
                    });
                }
            }
        };

        let error = if status != 200 {
            Some(ResponseError::Status(status))
        } else if data.get("err").is_some_and(|err| !err.is_null()) {
            Some(ResponseError::Body(data.clone()))
        } else if !data.get("result").is_some_and(truthy) {
            Some(ResponseError::NoResult)
        } else {
            None
        };

        trace!(status, error = ?error, "classified response");

        Ok(Self {
            status,
            error,
            data,
            raw,
        })
    }

    /// Read the full body of a `reqwest` response and classify it.
    pub(crate) async fn from_response(resp: reqwest::Response) -> Result<Self, Error> {
        let status = resp.status().as_u16();
        let raw = resp.text().await.map_err(Error::Transport)?;
        Self::classify(status, raw)
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The `result` member of the body.
    pub fn payload(&self) -> Option<&Value> {
        self.data.get("result")
    }
}

impl fmt::Display for ResponseEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(err) => write!(f, "HTTP {} ({err})", self.status),
            None => write!(f, "HTTP {} (ok)", self.status),
        }
    }
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
///
/// The vendor API signals "nothing here" with any of these interchangeably.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
