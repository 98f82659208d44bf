//! Technical sheet of a vehicle

use serde::{Deserialize, Serialize};

/// Technical characteristics remembered for a vehicle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalSpecs {
    /// e.g. "205/55 R16"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tire_dimensions: Option<String>,
    /// e.g. "5W30"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oil_viscosity: Option<String>,
    /// e.g. "4.5L"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oil_capacity: Option<String>,
    /// e.g. "70Ah 640A"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_ref: Option<String>,
    /// Paint code, e.g. "EWP"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_code: Option<String>,
    /// e.g. "Bosch A123S"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiper_ref: Option<String>,
}

impl TechnicalSpecs {
    /// Merge `other` into `self`.
    ///
    /// `None` in `other` keeps the current value, a non-blank value replaces
    /// it and a blank value clears it.
    pub fn merge(&mut self, other: &TechnicalSpecs) {
        merge_field(&mut self.tire_dimensions, &other.tire_dimensions);
        merge_field(&mut self.oil_viscosity, &other.oil_viscosity);
        merge_field(&mut self.oil_capacity, &other.oil_capacity);
        merge_field(&mut self.battery_ref, &other.battery_ref);
        merge_field(&mut self.color_code, &other.color_code);
        merge_field(&mut self.wiper_ref, &other.wiper_ref);
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_none())
    }

    /// Labelled fields in display order
    pub fn fields(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("Tyres", self.tire_dimensions.as_deref()),
            ("Oil viscosity", self.oil_viscosity.as_deref()),
            ("Oil capacity", self.oil_capacity.as_deref()),
            ("Battery", self.battery_ref.as_deref()),
            ("Paint code", self.color_code.as_deref()),
            ("Wipers", self.wiper_ref.as_deref()),
        ]
    }
}

fn merge_field(current: &mut Option<String>, incoming: &Option<String>) {
    if let Some(value) = incoming {
        let value = value.trim();
        *current = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
    }
}
