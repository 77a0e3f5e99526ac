// REST device endpoints
//
// `GET /devices` lists device metadata; `GET /devices/{varName}` returns
// the detail blob (with the `attributes` map) as a one-element list.

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Error;
use crate::rest::client::RestClient;

impl RestClient {
    /// List device metadata objects in server order.
    ///
    /// `GET /devices`. Each entry carries at least `varName` and `name`.
    pub async fn list_devices(&self) -> Result<Vec<Value>, Error> {
        debug!("listing devices");

        let resp = self.send_request(Method::GET, "/devices", None).await?;
        if !resp.is_success() {
            return Err(Error::DeviceDiscovery {
                device: None,
                message: format!("devices request failed: {resp}"),
                response: Some(Box::new(resp)),
            });
        }

        match resp.payload() {
            Some(Value::Array(devices)) => Ok(devices.clone()),
            _ => Err(Error::DeviceDiscovery {
                device: None,
                message: "device list result is not a list".into(),
                response: Some(Box::new(resp)),
            }),
        }
    }

    /// Fetch the detail blob for one device.
    ///
    /// `GET /devices/{varName}`. The server wraps the detail in a list;
    /// only the first element is used.
    pub async fn device_detail(&self, var_name: &str) -> Result<Value, Error> {
        debug!(device = var_name, "fetching device detail");

        let resp = self
            .send_request(Method::GET, &format!("/devices/{var_name}"), None)
            .await?;
        if !resp.is_success() {
            return Err(Error::DeviceDiscovery {
                device: Some(var_name.to_owned()),
                message: format!("device request failed: {resp}"),
                response: Some(Box::new(resp)),
            });
        }

        let first = match resp.payload() {
            Some(Value::Array(details)) => {
                if details.len() > 1 {
                    warn!(
                        device = var_name,
                        count = details.len(),
                        "device detail holds more than one element, using the first"
                    );
                }
                details.first().cloned()
            }
            _ => None,
        };

        first.ok_or_else(|| Error::DeviceDiscovery {
            device: Some(var_name.to_owned()),
            message: "device detail result is not a non-empty list".into(),
            response: Some(Box::new(resp)),
        })
    }
}
