// ── Attribute reader ──
//
// Safe navigation over one named subtree of a device's `attributes` map.
// The vendor data model is loosely structured: any key may be missing,
// null, or of an unexpected type. Every read returns `Option` and never
// panics.

use serde_json::Value;

/// A named subtree of a device's attribute dictionary.
///
/// `data` is `None` when the subtree was absent; every read on such a
/// block yields `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeBlock {
    key: String,
    data: Option<Value>,
}

impl AttributeBlock {
    pub fn new(key: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            key: key.into(),
            data,
        }
    }

    /// The attribute key this block was read from, e.g. `garageDoor_7`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw subtree.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Whether the block has any data at all.
    pub fn valid(&self) -> bool {
        self.data.is_some()
    }

    /// Walk `path` from the block root.
    ///
    /// Stops with `None` at the first missing key, at any JSON `null`
    /// (including the leaf), or when a non-object is reached where another
    /// key must be looked up.
    pub fn maybe(&self, path: &[&str]) -> Option<&Value> {
        let mut node = self.data.as_ref()?;
        for segment in path {
            node = node.as_object()?.get(*segment)?;
        }
        (!node.is_null()).then_some(node)
    }

    /// Integer read.
    pub fn int(&self, path: &[&str]) -> Option<i64> {
        self.maybe(path)?.as_i64()
    }

    /// Boolean read. Integers are accepted, non-zero meaning `true`.
    pub fn flag(&self, path: &[&str]) -> Option<bool> {
        match self.maybe(path)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|i| i != 0),
            _ => None,
        }
    }

    pub fn text(&self, path: &[&str]) -> Option<&str> {
        self.maybe(path)?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn block() -> AttributeBlock {
        AttributeBlock::new(
            "garageDoor_7",
            Some(json!({
                "doorState": { "value": 1 },
                "motionSensor": { "value": true },
                "sensorFlag": { "value": 0 },
                "name": { "value": "Main" },
                "opMode": { "value": null },
                "list": [1, 2]
            })),
        )
    }

    #[test]
    fn empty_block_yields_nothing_for_any_path() {
        let empty = AttributeBlock::new("garageDoor_7", None);
        assert!(!empty.valid());
        assert_eq!(empty.maybe(&[]), None);
        assert_eq!(empty.maybe(&["doorState", "value"]), None);
        assert_eq!(empty.int(&["doorState", "value"]), None);
    }

    #[test]
    fn walks_to_leaf() {
        let b = block();
        assert!(b.valid());
        assert_eq!(b.maybe(&["doorState", "value"]), Some(&json!(1)));
        assert_eq!(b.int(&["doorState", "value"]), Some(1));
        assert_eq!(b.text(&["name", "value"]), Some("Main"));
    }

    #[test]
    fn stops_at_first_missing_segment() {
        let b = block();
        assert_eq!(b.maybe(&["missing", "value"]), None);
        assert_eq!(b.maybe(&["doorState", "missing"]), None);
        assert_eq!(b.maybe(&["doorState", "value", "deeper"]), None);
    }

    #[test]
    fn null_and_non_map_yield_nothing() {
        let b = block();
        assert_eq!(b.maybe(&["opMode", "value"]), None);
        assert_eq!(b.maybe(&["list", "0"]), None);
    }

    #[test]
    fn flag_accepts_bools_and_integers() {
        let b = block();
        assert_eq!(b.flag(&["motionSensor", "value"]), Some(true));
        assert_eq!(b.flag(&["sensorFlag", "value"]), Some(false));
        assert_eq!(b.flag(&["doorState", "value"]), Some(true));
        assert_eq!(b.flag(&["name", "value"]), None);
    }

    #[test]
    fn typed_reads_reject_wrong_types() {
        let b = block();
        assert_eq!(b.int(&["name", "value"]), None);
        assert_eq!(b.text(&["doorState", "value"]), None);
    }
}
