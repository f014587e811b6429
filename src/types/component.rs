//! Consumption components (end-use sectors) reported by the EIA natural-gas dataset.

use std::fmt;
use std::str::FromStr;

/// A natural-gas end-use sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Residential,
    Commercial,
    ElectricPower,
}

impl Component {
    /// Value of the EIA `process-name` field for this component.
    pub fn process_name(&self) -> &'static str {
        match self {
            Component::Residential => "Residential Consumption",
            Component::Commercial => "Commercial Consumption",
            Component::ElectricPower => "Electric Power Consumption",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Residential => "Residential",
            Component::Commercial => "Commercial",
            Component::ElectricPower => "Electric",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown consumption component '{0}'")]
pub struct UnknownComponent(pub String);

impl FromStr for Component {
    type Err = UnknownComponent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "residential" | "residential consumption" => Ok(Component::Residential),
            "commercial" | "commercial consumption" => Ok(Component::Commercial),
            "electric" | "electric power" | "electric power consumption" => {
                Ok(Component::ElectricPower)
            }
            _ => Err(UnknownComponent(s.to_string())),
        }
    }
}
