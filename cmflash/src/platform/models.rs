//! Built-in cable modem and gateway models.

use super::definition::{ModelDefinition, UpgradeMethod};

/// All models the upgrade procedures have been validated on.
pub fn builtin() -> Vec<ModelDefinition> {
    vec![
        ModelDefinition::new("TG2492", UpgradeMethod::Snmp).with_description("OEM firmware"),
        ModelDefinition::new("CH7465-OEM", UpgradeMethod::Snmp).with_description("OEM firmware"),
        ModelDefinition::new("CH7465-OFW", UpgradeMethod::Snmp)
            .with_description("Operator firmware"),
        ModelDefinition::new("TG3492", UpgradeMethod::Snmp).with_description("RDK-B"),
        ModelDefinition::new("F3896", UpgradeMethod::Snmp).with_description("RDK-B"),
        ModelDefinition::new("F5685", UpgradeMethod::Console)
            .with_description("RDK-B, dmcli over ATOM console"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_models() {
        let console: Vec<_> = builtin()
            .into_iter()
            .filter(|m| m.method == UpgradeMethod::Console)
            .map(|m| m.name)
            .collect();
        assert_eq!(console, vec!["F5685"]);
    }

    #[test]
    fn test_names_unique() {
        let models = builtin();
        let mut names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), models.len());
    }
}
