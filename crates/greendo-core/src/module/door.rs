// ── Door module ──
//
// The door block carries most of the opener's telemetry: door state and
// position, fault mode, and the motion sensor, alarm and vacation flags.

use serde_json::Value;

use super::{Addressable, ModuleKind, module_view};

/// Movement state of the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DoorStatus {
    Closed,
    Open,
    Closing,
    Opening,
}

impl DoorStatus {
    /// Decode a `doorState` value.
    ///
    /// Any value other than 0, 1 or 2 reads as `Opening`, including
    /// non-integer values.
    pub fn from_value(value: &Value) -> Self {
        match value.as_i64() {
            Some(0) => Self::Closed,
            Some(1) => Self::Open,
            Some(2) => Self::Closing,
            _ => Self::Opening,
        }
    }
}

/// Fault reported by the opener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DoorError {
    Error,
    Locked,
}

impl DoorError {
    /// Decode an `opMode` code. 0 and unknown codes mean no fault.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Error),
            2 => Some(Self::Locked),
            _ => None,
        }
    }
}

module_view! {
    /// The `garageDoor_*` module.
    Door => ModuleKind::Door
}

impl Addressable for Door {}

impl Door {
    /// `None` when the block reports no door state at all.
    pub fn door_status(&self) -> Option<DoorStatus> {
        self.block
            .maybe(&["doorState", "value"])
            .map(DoorStatus::from_value)
    }

    pub fn door_error(&self) -> Option<DoorError> {
        self.block
            .int(&["opMode", "value"])
            .and_then(DoorError::from_code)
    }

    /// Current door position, in the opener's own units.
    pub fn door_pos(&self) -> Option<i64> {
        self.block.int(&["doorPosition", "value"])
    }

    pub fn max_pos(&self) -> Option<i64> {
        self.block.int(&["maxDoorPosition", "value"])
    }

    pub fn preset_pos(&self) -> Option<i64> {
        self.block.int(&["presetPosition", "value"])
    }

    pub fn motor(&self) -> Option<i64> {
        self.block.int(&["motorStatus", "value"])
    }

    pub fn alarm(&self) -> Option<bool> {
        self.block.flag(&["alarmState", "value"])
    }

    /// Whether the motion sensor is enabled.
    pub fn motion(&self) -> Option<bool> {
        self.block.flag(&["motionSensor", "value"])
    }

    /// State of the safety sensors.
    pub fn sensor(&self) -> Option<bool> {
        self.block.flag(&["sensorFlag", "value"])
    }

    pub fn vacation(&self) -> Option<bool> {
        self.block.flag(&["vacationMode", "value"])
    }
}
