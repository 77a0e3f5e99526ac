// ── Master unit ──
//
// The `masterUnit` block describes the opener head itself. It is not
// addressable by module commands.

use super::{ModuleKind, module_view};

module_view! {
    /// The `masterUnit` block.
    Master => ModuleKind::Master
}

impl Master {
    /// Time zone offset configured on the unit.
    pub fn tz_offset(&self) -> Option<i64> {
        self.block.int(&["timeZoneOffset", "value"])
    }
}
