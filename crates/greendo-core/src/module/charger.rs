// ── Backup charger module ──

use super::{Addressable, ModuleKind, module_view};

module_view! {
    /// The `backupCharger_*` module.
    Charger => ModuleKind::Charger
}

impl Addressable for Charger {}

impl Charger {
    /// Battery charge level, 0 to 100.
    pub fn level(&self) -> Option<i64> {
        self.block.int(&["chargeLevel", "value"])
    }
}
