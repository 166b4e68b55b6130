//! Restaurant record as stored in the listing store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Restaurant listing record.
///
/// Only the label and location fields are typed; every other field is
/// carried through `extra`. The store writes records back from their source
/// object, so explicit nulls and absent keys survive there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Neighborhood within the city
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,

    /// Raw values from enrichment sources; may be null, strings or out of range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Restaurant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_position(mut self, lon: f64, lat: f64) -> Self {
        self.longitude = Some(Value::from(lon));
        self.latitude = Some(Value::from(lat));
        self
    }

    /// Both coordinate fields exist and are not null
    pub fn has_coordinates(&self) -> bool {
        present(&self.longitude) && present(&self.latitude)
    }

    /// Numeric longitude/latitude; anything that is not a JSON number is `None`
    pub fn position(&self) -> (Option<f64>, Option<f64>) {
        (number(&self.longitude), number(&self.latitude))
    }

    pub fn has_neighborhood(&self) -> bool {
        self.neighborhood
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty())
    }

    /// Raw coordinate pair for log output
    pub fn display_position(&self) -> String {
        format!(
            "({}, {})",
            display_value(&self.longitude),
            display_value(&self.latitude)
        )
    }
}

fn present(value: &Option<Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}

fn number(value: &Option<Value>) -> Option<f64> {
    value.as_ref().and_then(Value::as_f64)
}

fn display_value(value: &Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => format!("{:?}", s),
        Some(v) => v.to_string(),
    }
}
