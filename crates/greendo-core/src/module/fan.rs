// ── Fan module ──

use super::{Addressable, ModuleKind, module_view};

module_view! {
    /// The `fan_*` module.
    Fan => ModuleKind::Fan
}

impl Addressable for Fan {}

impl Fan {
    /// Speed, 0 to 100.
    pub fn speed(&self) -> Option<i64> {
        self.block.int(&["speed", "value"])
    }
}
