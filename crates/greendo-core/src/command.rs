// ── Relay command payloads ──
//
// Typed `gdoModuleCommand` messages. Built by `Device::cmd_*` and written
// to the relay by `Client::send_command`.

use serde::Serialize;
use serde_json::Value;

const JSONRPC_VERSION: &str = "2.0";
const MODULE_COMMAND_METHOD: &str = "gdoModuleCommand";
const MODULE_COMMAND_MSG_TYPE: u8 = 16;

/// Door movement requested by `doorCommand`. Sent as a string code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DoorCommand {
    #[serde(rename = "0")]
    Close,
    #[serde(rename = "1")]
    Open,
    /// Move to the stored preset position.
    #[serde(rename = "2")]
    Preset,
}

/// The command-specific `moduleMsg` map. Always exactly one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ModuleMsg {
    DoorCommand(DoorCommand),
    PresetPosition(i64),
    MotionSensor(bool),
    LightState(bool),
    LightTimer(i64),
    VacationMode(bool),
    Speed(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandParams {
    pub msg_type: u8,
    /// The target module's `moduleId`, verbatim.
    pub module_type: Value,
    pub port_id: Value,
    /// The device `varName`.
    pub topic: String,
    pub module_msg: ModuleMsg,
}

/// A JSON-RPC `gdoModuleCommand` message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleCommand {
    jsonrpc: &'static str,
    method: &'static str,
    pub params: CommandParams,
}

impl ModuleCommand {
    pub fn new(module_type: Value, port_id: Value, topic: impl Into<String>, msg: ModuleMsg) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: MODULE_COMMAND_METHOD,
            params: CommandParams {
                msg_type: MODULE_COMMAND_MSG_TYPE,
                module_type,
                port_id,
                topic: topic.into(),
                module_msg: msg,
            },
        }
    }

    pub fn method(&self) -> &str {
        self.method
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_to_wire_shape() {
        let cmd = ModuleCommand::new(json!(5), json!(7), "gdo-a", ModuleMsg::DoorCommand(DoorCommand::Open));

        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "method": "gdoModuleCommand",
                "params": {
                    "msgType": 16,
                    "moduleType": 5,
                    "portId": 7,
                    "topic": "gdo-a",
                    "moduleMsg": { "doorCommand": "1" }
                }
            })
        );
    }

    #[test]
    fn module_msg_keys() {
        let cases = [
            (ModuleMsg::DoorCommand(DoorCommand::Close), json!({ "doorCommand": "0" })),
            (ModuleMsg::DoorCommand(DoorCommand::Preset), json!({ "doorCommand": "2" })),
            (ModuleMsg::PresetPosition(24), json!({ "presetPosition": 24 })),
            (ModuleMsg::MotionSensor(false), json!({ "motionSensor": false })),
            (ModuleMsg::LightState(true), json!({ "lightState": true })),
            (ModuleMsg::LightTimer(10), json!({ "lightTimer": 10 })),
            (ModuleMsg::VacationMode(true), json!({ "vacationMode": true })),
            (ModuleMsg::Speed(42), json!({ "speed": 42 })),
        ];
        for (msg, expected) in cases {
            assert_eq!(serde_json::to_value(msg).unwrap(), expected);
        }
    }
}
