// REST session authentication
//
// Cookie-based login/logout. The login endpoint sets a session cookie in
// the client's jar and returns the api key used by the relay websocket.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::rest::client::RestClient;
use crate::session::Session;

impl RestClient {
    /// Authenticate with username/password.
    ///
    /// `POST /login` with `{username, password}`. On success the session
    /// cookie is stored in the client's cookie jar and the returned
    /// [`Session`] carries `result.auth.apiKey` plus the whole `result`.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session, Error> {
        debug!(username, "logging in");

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self.send_request(Method::POST, "/login", Some(&body)).await?;

        if !resp.is_success() {
            return Err(Error::Authentication {
                message: format!("login failed: {resp}"),
                response: Some(Box::new(resp)),
            });
        }

        let Some(data) = resp.payload().cloned() else {
            return Err(Error::Authentication {
                message: "login reply has no result".into(),
                response: Some(Box::new(resp)),
            });
        };

        let Some(api_key) = data
            .get("auth")
            .and_then(|auth| auth.get("apiKey"))
            .and_then(|key| key.as_str())
        else {
            return Err(Error::Authentication {
                message: "login reply carries no auth.apiKey".into(),
                response: Some(Box::new(resp)),
            });
        };

        let api_key = SecretString::from(api_key.to_owned());
        debug!("login successful");
        Ok(Session::new(api_key, data))
    }

    /// End the current session.
    ///
    /// `POST /logout` without a body. A rejected logout is an error: the
    /// server-side session state is ambiguous afterwards.
    pub async fn logout(&self) -> Result<(), Error> {
        debug!("logging out");

        let resp = self.send_request(Method::POST, "/logout", None).await?;
        if !resp.is_success() {
            return Err(Error::Logout {
                response: Box::new(resp),
            });
        }

        debug!("logout complete");
        Ok(())
    }
}
