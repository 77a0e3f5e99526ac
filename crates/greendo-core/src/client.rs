// ── Client ──
//
// Session lifecycle for one account: REST login, device discovery, master
// unit selection and the authenticated relay channel. Every step is awaited
// in sequence; nothing runs in the background.

use secrecy::SecretString;
use serde_json::Value;
use tracing::{debug, info, warn};

use greendo_api::{RestClient, RpcChannel, Session};

use crate::command::ModuleCommand;
use crate::config::ClientConfig;
use crate::device::Device;
use crate::error::CoreError;
use crate::module::Master;

/// A logged-in account with an open relay channel.
///
/// Obtain one with [`Client::connect`] and release it with
/// [`Client::close`]; dropping a client without closing it leaves the REST
/// session open on the server.
pub struct Client {
    config: ClientConfig,
    rest: RestClient,
    session: Session,
    devices: Vec<Device>,
    master_device: String,
    master: Master,
    channel: RpcChannel,
}

impl Client {
    // ── Connection lifecycle ─────────────────────────────────────────

    /// Log in, discover devices, select the master unit and open the relay.
    ///
    /// Any failure after login closes what was opened and attempts a
    /// logout before returning the original error. A failed logout during
    /// that cleanup is logged, not returned.
    pub async fn connect(config: ClientConfig) -> Result<Self, CoreError> {
        let rest = RestClient::new(config.api_url.clone(), &config.transport())?;

        let session = rest.login(&config.username, &config.password).await?;
        info!(username = %config.username, "logged in");

        match establish(&config, &rest, &session).await {
            Ok((devices, (master_device, master), channel)) => {
                info!(
                    devices = devices.len(),
                    master = %master_device,
                    "client connected"
                );
                Ok(Self {
                    config,
                    rest,
                    session,
                    devices,
                    master_device,
                    master,
                    channel,
                })
            }
            Err(e) => {
                if let Err(logout_err) = rest.logout().await {
                    warn!(error = %logout_err, "logout after failed connect also failed");
                }
                Err(e)
            }
        }
    }

    /// Close the relay channel, then log out.
    ///
    /// Logout is attempted even when closing the socket failed. If either
    /// step fails the error carries both outcomes.
    pub async fn close(mut self) -> Result<(), CoreError> {
        let socket = self
            .channel
            .close()
            .await
            .err()
            .map(|e| Box::new(CoreError::from(e)));
        if let Some(ref e) = socket {
            warn!(error = %e, "closing relay channel failed");
        }

        let logout = self
            .rest
            .logout()
            .await
            .err()
            .map(|e| Box::new(CoreError::from(e)));

        if socket.is_none() && logout.is_none() {
            info!("client closed");
            Ok(())
        } else {
            Err(CoreError::Close { socket, logout })
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Write one command to the relay and return its reply.
    pub async fn send_command(&mut self, command: &ModuleCommand) -> Result<Value, CoreError> {
        debug!(
            device = %command.params.topic,
            method = command.method(),
            "sending module command"
        );
        Ok(self.channel.call(command).await?)
    }

    /// Re-run device discovery and re-select the master unit.
    ///
    /// On failure the previous snapshot is kept.
    pub async fn refresh_devices(&mut self) -> Result<(), CoreError> {
        let devices = discover_devices(&self.rest).await?;
        let (master_device, master) = select_master(&devices)?;

        debug!(devices = devices.len(), "device snapshot refreshed");
        self.devices = devices;
        self.master_device = master_device;
        self.master = master;
        Ok(())
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn username(&self) -> &str {
        &self.config.username
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn api_key(&self) -> &SecretString {
        self.session.api_key()
    }

    /// Devices in server order.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Look up a device by `varName`.
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id() == id)
    }

    /// The selected master unit.
    pub fn master(&self) -> &Master {
        &self.master
    }

    /// `varName` of the device the master unit was taken from.
    pub fn master_device_id(&self) -> &str {
        &self.master_device
    }

    /// Time zone offset reported by the master unit.
    pub fn tz_offset(&self) -> Option<i64> {
        self.master.tz_offset()
    }
}

// ── Connection steps ─────────────────────────────────────────────────

async fn establish(
    config: &ClientConfig,
    rest: &RestClient,
    session: &Session,
) -> Result<(Vec<Device>, (String, Master), RpcChannel), CoreError> {
    let devices = discover_devices(rest).await?;
    let master = select_master(&devices)?;

    // `RpcChannel::open` closes the socket itself when auth is rejected.
    let channel = tokio::time::timeout(
        config.timeout,
        RpcChannel::open(&config.socket_url, &config.username, session.api_key()),
    )
    .await
    .map_err(|_| CoreError::Timeout)??;

    Ok((devices, master, channel))
}

/// Fetch the device list, then each device's detail, one at a time.
async fn discover_devices(rest: &RestClient) -> Result<Vec<Device>, CoreError> {
    let listed = rest.list_devices().await?;
    debug!(count = listed.len(), "device list received");

    let mut devices = Vec::with_capacity(listed.len());
    for metadata in listed {
        let Some(id) = metadata.get("varName").and_then(Value::as_str).map(str::to_owned) else {
            return Err(CoreError::DeviceDiscovery {
                device: None,
                message: format!("device entry without varName: {metadata}"),
                response: None,
            });
        };

        let detail = rest.device_detail(&id).await?;
        devices.push(Device::new(id, metadata, detail));
    }
    Ok(devices)
}

/// The first device in server order that exposes a master unit wins.
fn select_master(devices: &[Device]) -> Result<(String, Master), CoreError> {
    let mut candidates = devices
        .iter()
        .filter_map(|d| d.master().map(|m| (d.id(), m)));

    let (id, master) = candidates.next().ok_or(CoreError::MasterUnitNotFound)?;
    for (ignored, _) in candidates {
        warn!(selected = id, ignored, "more than one master unit, using the first");
    }
    Ok((id.to_owned(), master.clone()))
}
