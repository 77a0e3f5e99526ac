//! Device model and session lifecycle on top of `greendo-api`.
//!
//! - **[`Client`]**: Logs in, discovers devices, selects the master unit
//!   and opens the authenticated relay channel in
//!   [`connect()`](Client::connect); [`close()`](Client::close) releases
//!   both the channel and the REST session.
//!
//! - **[`Device`]**: One opener unit with its discovered module views and
//!   the `cmd_*` builders producing [`ModuleCommand`] payloads.
//!
//! - **Module views** ([`module`]): [`Door`], [`Light`], [`Fan`],
//!   [`Charger`], [`Wifi`] and [`Master`] read typed values out of the
//!   loosely structured attribute map through [`AttributeBlock`].

pub mod attribute;
pub mod client;
pub mod command;
pub mod config;
pub mod device;
pub mod error;
pub mod module;

// ── Primary re-exports ──────────────────────────────────────────────
pub use attribute::AttributeBlock;
pub use client::Client;
pub use command::{DoorCommand, ModuleCommand, ModuleMsg};
pub use config::{ClientConfig, TlsVerification};
pub use device::Device;
pub use error::CoreError;
pub use module::{
    Addressable, Charger, Door, DoorError, DoorStatus, Fan, Light, Master, ModuleKind, ModuleView,
    Wifi,
};
