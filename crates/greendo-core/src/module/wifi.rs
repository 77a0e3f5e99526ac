use super::{Addressable, ModuleKind, module_view};

module_view! {
    /// The `wifiModule_*` module. Exposes nothing beyond its ids.
    Wifi => ModuleKind::Wifi
}

impl Addressable for Wifi {}
