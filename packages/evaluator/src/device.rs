//! Device-aware layout parameters.

use crate::error::EvalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Preview device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl Device {
    pub const ALL: [Device; 3] = [Device::Mobile, Device::Tablet, Device::Desktop];

    /// Column count for a block that shows `desktop` columns on desktop.
    ///
    /// Never returns zero, so an empty block still lays out as one column.
    pub fn columns(self, desktop: usize) -> usize {
        let columns = match self {
            Device::Mobile => desktop.min(1),
            Device::Tablet => desktop.min(2),
            Device::Desktop => desktop,
        };
        columns.max(1)
    }

    /// Max width of the page container
    pub fn container_width(self) -> &'static str {
        match self {
            Device::Mobile => "100%",
            Device::Tablet => "768px",
            Device::Desktop => "1200px",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Device::Mobile => "mobile",
            Device::Tablet => "tablet",
            Device::Desktop => "desktop",
        }
    }
}

impl FromStr for Device {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mobile" => Ok(Device::Mobile),
            "tablet" => Ok(Device::Tablet),
            "desktop" => Ok(Device::Desktop),
            _ => Err(EvalError::UnknownDevice(s.to_string())),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
