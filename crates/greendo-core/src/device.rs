// ── Device aggregate ──
//
// One physical opener unit: the metadata entry from the device list, the
// detail blob, and the module views discovered from its `attributes` map.
// Command builders resolve the target module and produce a relay payload.

use serde_json::Value;
use tracing::{debug, warn};

use crate::attribute::AttributeBlock;
use crate::command::{DoorCommand, ModuleCommand, ModuleMsg};
use crate::error::CoreError;
use crate::module::{
    Addressable, Charger, Door, Fan, Light, Master, ModuleKind, ModuleView, Wifi,
};

const FAN_SPEED_MAX: i64 = 100;

/// A garage door opener unit and its modules.
#[derive(Debug, Clone)]
pub struct Device {
    id: String,
    metadata: Value,
    detail: Value,
    door: Option<Door>,
    light: Option<Light>,
    fan: Option<Fan>,
    charger: Option<Charger>,
    wifi: Option<Wifi>,
    master: Option<Master>,
    unrecognized: Vec<String>,
}

impl Device {
    /// Build a device from its `varName`, list metadata and detail blob.
    ///
    /// Attribute keys that match no known module are logged and kept in
    /// [`unrecognized`](Self::unrecognized). A detail blob without an
    /// `attributes` map yields a device with no modules.
    pub fn new(id: impl Into<String>, metadata: Value, detail: Value) -> Self {
        let mut device = Self {
            id: id.into(),
            metadata,
            detail,
            door: None,
            light: None,
            fan: None,
            charger: None,
            wifi: None,
            master: None,
            unrecognized: Vec::new(),
        };
        device.discover_modules();
        device
    }

    fn discover_modules(&mut self) {
        let Some(attributes) = self.detail.get("attributes").and_then(Value::as_object) else {
            warn!(device = %self.id, "device detail has no attributes map");
            return;
        };

        let mut unrecognized = Vec::new();
        for (key, value) in attributes {
            let data = (!value.is_null()).then(|| value.clone());
            let block = AttributeBlock::new(key.as_str(), data);
            match ModuleKind::classify(key) {
                ModuleKind::Master => install(&mut self.master, &self.id, block),
                ModuleKind::Charger => install(&mut self.charger, &self.id, block),
                ModuleKind::Door => install(&mut self.door, &self.id, block),
                ModuleKind::Fan => install(&mut self.fan, &self.id, block),
                ModuleKind::Wifi => install(&mut self.wifi, &self.id, block),
                ModuleKind::Light => install(&mut self.light, &self.id, block),
                ModuleKind::Unknown => {
                    warn!(device = %self.id, key = %key, "unknown module key");
                    unrecognized.push(key.clone());
                }
            }
        }
        self.unrecognized = unrecognized;
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The device `varName`; used as the relay topic.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name from the device list.
    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").and_then(Value::as_str)
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub fn detail(&self) -> &Value {
        &self.detail
    }

    pub fn door(&self) -> Option<&Door> {
        self.door.as_ref()
    }

    pub fn light(&self) -> Option<&Light> {
        self.light.as_ref()
    }

    pub fn fan(&self) -> Option<&Fan> {
        self.fan.as_ref()
    }

    pub fn charger(&self) -> Option<&Charger> {
        self.charger.as_ref()
    }

    pub fn wifi(&self) -> Option<&Wifi> {
        self.wifi.as_ref()
    }

    pub fn master(&self) -> Option<&Master> {
        self.master.as_ref()
    }

    /// Attribute keys that matched no known module.
    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }

    // ── Command builders ─────────────────────────────────────────────

    pub fn cmd_open(&self) -> Result<ModuleCommand, CoreError> {
        self.module_command(self.door(), ModuleMsg::DoorCommand(DoorCommand::Open))
    }

    pub fn cmd_close(&self) -> Result<ModuleCommand, CoreError> {
        self.module_command(self.door(), ModuleMsg::DoorCommand(DoorCommand::Close))
    }

    /// Move the door to its stored preset position.
    pub fn cmd_preset(&self) -> Result<ModuleCommand, CoreError> {
        self.module_command(self.door(), ModuleMsg::DoorCommand(DoorCommand::Preset))
    }

    /// Store a new preset position, clamped to `0..=door.max_pos()`.
    pub fn cmd_preset_pos(&self, pos: i64) -> Result<ModuleCommand, CoreError> {
        let door = self.door().ok_or_else(not_resolved::<Door>)?;
        let max = door.max_pos().ok_or_else(|| CoreError::CommandBuild {
            module: Door::KIND.to_string(),
            reason: "door reports no maximum position".into(),
        })?;
        let pos = pos.min(max).max(0);
        self.module_command(Some(door), ModuleMsg::PresetPosition(pos))
    }

    pub fn cmd_light(&self, on: bool) -> Result<ModuleCommand, CoreError> {
        self.module_command(self.light(), ModuleMsg::LightState(on))
    }

    /// Set the light auto-off delay in minutes. Passed through unclamped.
    pub fn cmd_light_timer(&self, minutes: i64) -> Result<ModuleCommand, CoreError> {
        self.module_command(self.light(), ModuleMsg::LightTimer(minutes))
    }

    /// Always fails: discovery never resolves a vacation module, and the
    /// door module is not known to accept `vacationMode`.
    pub fn cmd_vacation(&self, on: bool) -> Result<ModuleCommand, CoreError> {
        debug!(device = %self.id, on, "vacation command requested");
        Err(CoreError::ModuleNotResolved {
            module: "vacation".into(),
        })
    }

    pub fn cmd_motion(&self, on: bool) -> Result<ModuleCommand, CoreError> {
        self.module_command(self.door(), ModuleMsg::MotionSensor(on))
    }

    /// Set fan speed, clamped to `0..=100`.
    pub fn cmd_fan(&self, speed: i64) -> Result<ModuleCommand, CoreError> {
        self.module_command(self.fan(), ModuleMsg::Speed(speed.clamp(0, FAN_SPEED_MAX)))
    }

    fn module_command<M: Addressable>(
        &self,
        module: Option<&M>,
        msg: ModuleMsg,
    ) -> Result<ModuleCommand, CoreError> {
        let module = module.ok_or_else(not_resolved::<M>)?;
        let module_type = module
            .module_id()
            .cloned()
            .ok_or_else(|| missing_field::<M>("moduleId"))?;
        let port_id = module
            .port_id()
            .cloned()
            .ok_or_else(|| missing_field::<M>("portId"))?;

        Ok(ModuleCommand::new(module_type, port_id, self.id.as_str(), msg))
    }
}

/// Store a discovered module view, replacing (and logging) an earlier one.
fn install<M: ModuleView>(slot: &mut Option<M>, device: &str, block: AttributeBlock) {
    if let Some(previous) = slot.as_ref() {
        warn!(
            device,
            kind = %M::KIND,
            previous = previous.key(),
            replacement = block.key(),
            "duplicate module, keeping the later one"
        );
    }
    *slot = Some(M::from_block(block));
}

fn not_resolved<M: ModuleView>() -> CoreError {
    CoreError::ModuleNotResolved {
        module: M::KIND.to_string(),
    }
}

fn missing_field<M: ModuleView>(field: &str) -> CoreError {
    CoreError::CommandBuild {
        module: M::KIND.to_string(),
        reason: format!("module reports no {field}"),
    }
}
