//! Supported device models and per-model dispatch.
//!
//! Each model supports exactly one upgrade path. [`upgrade_model`] looks the
//! model up in the global [`PlatformRegistry`] and runs the matching
//! procedure.

mod definition;
mod models;
mod registry;

pub use definition::{ModelDefinition, UpgradeMethod};
pub use registry::PlatformRegistry;

use log::info;

use crate::error::{PlatformError, Result};
use crate::upgrade::{UpgradeOutcome, UpgradeRequest, console_upgrade, snmp_upgrade};

/// Look up the upgrade method for `model` in the global registry.
pub fn method_for(model: &str) -> Result<UpgradeMethod> {
    let registry = PlatformRegistry::global()
        .read()
        .map_err(|_| PlatformError::InvalidDefinition {
            message: "Failed to acquire registry lock".to_string(),
        })?;

    registry
        .get(model)
        .map(|definition| definition.method)
        .ok_or_else(|| {
            PlatformError::UnknownModel {
                name: model.to_string(),
            }
            .into()
        })
}

/// Check that `request` carries what `method` needs.
pub fn validate_request(method: UpgradeMethod, request: &UpgradeRequest) -> Result<()> {
    if request.host.trim().is_empty() {
        return Err(PlatformError::InvalidDefinition {
            message: "Host is required".to_string(),
        }
        .into());
    }
    if request.firmware.trim().is_empty() {
        return Err(PlatformError::InvalidDefinition {
            message: "Firmware name is required".to_string(),
        }
        .into());
    }
    if method == UpgradeMethod::Console && request.port.is_none() {
        return Err(PlatformError::InvalidDefinition {
            message: "Console upgrades need the bridge port".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Upgrade a device of the given model.
///
/// Errors only for an unknown model or an incomplete request; the upgrade
/// itself reports through the returned outcome.
pub async fn upgrade_model(model: &str, request: &UpgradeRequest) -> Result<UpgradeOutcome> {
    let method = method_for(model)?;
    validate_request(method, request)?;
    info!("Upgrading {} at {} to {} via {}", model, request.host, request.firmware, method);

    let outcome = match method {
        UpgradeMethod::Console => {
            let port = request.port.ok_or_else(|| PlatformError::InvalidDefinition {
                message: "Console upgrades need the bridge port".to_string(),
            })?;
            console_upgrade(&request.host, port, &request.firmware).await
        }
        UpgradeMethod::Snmp => snmp_upgrade(&request.host, &request.firmware).await,
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_method_for() {
        assert_eq!(method_for("F5685").unwrap(), UpgradeMethod::Console);
        assert_eq!(method_for("ch7465-ofw").unwrap(), UpgradeMethod::Snmp);
        assert!(matches!(
            method_for("WRT54G"),
            Err(Error::Platform(PlatformError::UnknownModel { .. }))
        ));
    }

    #[test]
    fn test_validate_request() {
        let console = UpgradeRequest::console("10.55.69.106", 9001, "F5685.pkgtb");
        assert!(validate_request(UpgradeMethod::Console, &console).is_ok());

        let missing_port = UpgradeRequest::snmp("10.55.69.106", "F5685.pkgtb");
        assert!(validate_request(UpgradeMethod::Console, &missing_port).is_err());
        assert!(validate_request(UpgradeMethod::Snmp, &missing_port).is_ok());

        let missing_fw = UpgradeRequest::snmp("10.11.142.122", " ");
        assert!(validate_request(UpgradeMethod::Snmp, &missing_fw).is_err());
    }

    #[test]
    fn test_unknown_model_runs_nothing() {
        let request = UpgradeRequest::snmp("10.11.142.122", "fw.p7b");
        tokio_test::assert_err!(tokio_test::block_on(upgrade_model("WRT54G", &request)));
    }

    #[test]
    fn test_console_model_without_port_runs_nothing() {
        let request = UpgradeRequest::snmp("10.55.69.106", "F5685.pkgtb");
        let result = tokio_test::block_on(upgrade_model("F5685", &request));
        assert!(matches!(
            result,
            Err(Error::Platform(PlatformError::InvalidDefinition { .. }))
        ));
    }
}
