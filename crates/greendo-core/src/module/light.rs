// ── Light module ──

use super::{Addressable, ModuleKind, module_view};

module_view! {
    /// The `garageLight_*` module.
    Light => ModuleKind::Light
}

impl Addressable for Light {}

impl Light {
    pub fn on(&self) -> Option<bool> {
        self.block.flag(&["lightState", "value"])
    }

    /// Auto-off delay in minutes.
    pub fn timer(&self) -> Option<i64> {
        self.block.int(&["lightTimer", "value"])
    }
}
