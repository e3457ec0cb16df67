//! Perf-dash performance data format
//!
//! The JSON shape consumed by downstream reporting dashboards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A versioned collection of data items
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfData {
    /// Format version
    pub version: String,

    /// Measured data items
    pub data_items: Vec<DataItem>,
}

/// One labeled set of values sharing a unit
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataItem {
    /// Values keyed by name (e.g. `Perc50`)
    pub data: BTreeMap<String, f64>,

    /// Unit of every value in `data`
    pub unit: String,

    /// Labels identifying the item
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl PerfData {
    /// Create perf data holding the given items
    pub fn new(version: impl Into<String>, data_items: Vec<DataItem>) -> Self {
        Self {
            version: version.into(),
            data_items,
        }
    }
}

impl DataItem {
    /// Create an empty item with the given unit
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            data: BTreeMap::new(),
            unit: unit.into(),
            labels: BTreeMap::new(),
        }
    }

    /// Add a value
    pub fn with_value(mut self, key: impl Into<String>, value: f64) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Get a value by key
    pub fn value(&self, key: &str) -> Option<f64> {
        self.data.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let data = PerfData::new(
            "v1",
            vec![DataItem::new("ms")
                .with_value("Perc50", 1.5)
                .with_label("Metric", "Example")],
        );

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["version"], "v1");
        assert_eq!(value["dataItems"][0]["data"]["Perc50"], 1.5);
        assert_eq!(value["dataItems"][0]["unit"], "ms");
        assert_eq!(value["dataItems"][0]["labels"]["Metric"], "Example");
    }

    #[test]
    fn test_labels_optional_on_decode() {
        let json = r#"{"version":"v1","dataItems":[{"data":{"Perc99":2.0},"unit":"ms"}]}"#;
        let data: PerfData = serde_json::from_str(json).unwrap();
        assert_eq!(data.data_items[0].value("Perc99"), Some(2.0));
        assert!(data.data_items[0].labels.is_empty());
    }
}
