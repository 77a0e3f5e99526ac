// ── Module decoders ──
//
// Typed read-only views over the attribute blocks of one opener unit.
// Each attribute key names a module (`garageDoor_7`, `garageLight_9`, ...);
// `ModuleKind::classify` is the single place that maps keys to views.

mod charger;
mod door;
mod fan;
mod light;
mod master;
mod wifi;

pub use charger::Charger;
pub use door::{Door, DoorError, DoorStatus};
pub use fan::Fan;
pub use light::Light;
pub use master::Master;
pub use wifi::Wifi;

use serde_json::Value;

use crate::attribute::AttributeBlock;

/// Module kind of an attribute key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ModuleKind {
    Master,
    Charger,
    Door,
    Fan,
    Wifi,
    Light,
    Unknown,
}

const MASTER_KEY: &str = "masterUnit";

/// Key prefixes of numbered modules, e.g. `garageDoor_8`.
const MODULE_PREFIXES: &[(&str, ModuleKind)] = &[
    ("backupCharger_", ModuleKind::Charger),
    ("garageDoor_", ModuleKind::Door),
    ("fan_", ModuleKind::Fan),
    ("wifiModule_", ModuleKind::Wifi),
    ("garageLight_", ModuleKind::Light),
];

impl ModuleKind {
    /// Classify one key of a device's `attributes` map.
    pub fn classify(key: &str) -> Self {
        if key == MASTER_KEY {
            return Self::Master;
        }
        MODULE_PREFIXES
            .iter()
            .find(|(prefix, _)| key.starts_with(prefix))
            .map_or(Self::Unknown, |&(_, kind)| kind)
    }
}

/// A typed view over one attribute block.
pub trait ModuleView {
    const KIND: ModuleKind;

    fn from_block(block: AttributeBlock) -> Self;

    fn block(&self) -> &AttributeBlock;

    /// The attribute key the module was discovered under.
    fn key(&self) -> &str {
        self.block().key()
    }
}

/// A module that can be addressed by relay commands.
///
/// Ids are passed through to the relay exactly as the server reported them.
pub trait Addressable: ModuleView {
    fn module_id(&self) -> Option<&Value> {
        self.block().maybe(&["moduleId", "value"])
    }

    fn port_id(&self) -> Option<&Value> {
        self.block().maybe(&["portId", "value"])
    }
}

/// Declares a view struct wrapping an [`AttributeBlock`].
macro_rules! module_view {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            block: $crate::attribute::AttributeBlock,
        }

        impl $crate::module::ModuleView for $name {
            const KIND: $crate::module::ModuleKind = $kind;

            fn from_block(block: $crate::attribute::AttributeBlock) -> Self {
                Self { block }
            }

            fn block(&self) -> &$crate::attribute::AttributeBlock {
                &self.block
            }
        }
    };
}
pub(crate) use module_view;
