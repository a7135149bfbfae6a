//! Device model definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a device model takes a firmware upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeMethod {
    /// `dmcli` commands on the serial console, reached through a bridge.
    Console,

    /// DOCSIS software-download objects over SNMP.
    Snmp,
}

impl fmt::Display for UpgradeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => write!(f, "console"),
            Self::Snmp => write!(f, "snmp"),
        }
    }
}

/// A supported device model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDefinition {
    /// Model name as printed on the device label (e.g. "TG3492").
    pub name: String,

    /// Upgrade path the model supports.
    pub method: UpgradeMethod,

    /// Free-form notes (firmware family, vendor).
    pub description: String,
}

impl ModelDefinition {
    /// Create a model definition.
    pub fn new(name: impl Into<String>, method: UpgradeMethod) -> Self {
        Self {
            name: name.into(),
            method,
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
