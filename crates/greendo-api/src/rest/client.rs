// REST HTTP client
//
// Wraps `reqwest::Client` with vendor URL construction, the `x-tc-*`
// header conventions, and response classification. Endpoint methods
// (login, devices, ...) live in sibling files as inherent methods so
// this module stays focused on transport mechanics.

use reqwest::Method;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::rest::response::ResponseEnvelope;
use crate::transport::TransportConfig;

/// Default REST endpoint of the vendor cloud.
pub const DEFAULT_API_URL: &str = "https://tti.tiwiconnect.com/api";

const TRANSFORM_HEADER: &str = "x-tc-transform";
const TRANSFORM_VALUE: &str = "tti-app";
const TRANSFORM_VERSION_HEADER: &str = "x-tc-transformversion";
const TRANSFORM_VERSION_VALUE: &str = "0.2";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Raw HTTP client for the vendor REST API.
///
/// Holds the cookie-bearing `reqwest::Client`: the session cookie set by
/// `/login` rides along on every later request. All methods return a
/// classified [`ResponseEnvelope`]; endpoint wrappers turn a failed
/// classification into the matching [`Error`] variant.
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    /// Create a new REST client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (the session is cookie-based). `base_url` is the API
    /// root, e.g. [`DEFAULT_API_URL`].
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a REST client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/{path}`.
    ///
    /// A missing leading slash on `path` is tolerated.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helper ───────────────────────────────────────────────

    /// Send a request and classify the reply.
    ///
    /// Every request carries `x-tc-transform: tti-app`. With a body the
    /// JSON content type and length are set explicitly; without one the
    /// `x-tc-transformversion` header is sent instead.
    pub(crate) async fn send_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ResponseEnvelope, Error> {
        let url = self.api_url(path)?;
        debug!("{} {}", method, url);

        let builder = self
            .http
            .request(method, url)
            .header(TRANSFORM_HEADER, TRANSFORM_VALUE);

        let builder = match body {
            Some(body) => {
                let bytes = serde_json::to_vec(body)?;
                builder
                    .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                    .header(CONTENT_LENGTH, bytes.len())
                    .body(bytes)
            }
            None => builder.header(TRANSFORM_VERSION_HEADER, TRANSFORM_VERSION_VALUE),
        };

        let resp = builder.send().await.map_err(Error::Transport)?;
        ResponseEnvelope::from_response(resp).await
    }
}
