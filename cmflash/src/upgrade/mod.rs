//! Upgrade orchestration.
//!
//! Both procedures follow the same shape: write the download parameters,
//! trigger the download, ride out the reboot, and confirm the device came
//! back. They differ in transport and in what counts as progress:
//!
//! - [`ConsoleUpgrade`] watches the console stream for a reboot banner and
//!   then a login prompt.
//! - [`ProtocolUpgrade`] polls the DOCSIS download status over SNMP and then
//!   waits for `sysDescr.0` to answer.
//!
//! Neither distinguishes *why* an upgrade could not be confirmed in its
//! return value; the reason is in the log. Every non-success outcome should
//! be handled the same way by callers.

pub mod console;
pub mod protocol;
mod retry;
mod settings;
#[cfg(test)]
pub(crate) mod sim;

pub use console::ConsoleUpgrade;
pub use protocol::{DownloadStatus, ProtocolUpgrade};
pub use retry::Retry;
pub use settings::{ConsoleUpgradeSettings, ProtocolUpgradeSettings};

use std::fmt;

use log::error;
use serde::{Deserialize, Serialize};

use crate::console::ConsoleBuilder;
use crate::mgmt::SnmpBuilder;

/// Final result of one upgrade attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeOutcome {
    /// The device came back healthy after the download.
    Succeeded,

    /// The upgrade could not be confirmed: the device was unreachable,
    /// rejected the download, never rebooted, or never came back.
    Indeterminate,
}

impl UpgradeOutcome {
    /// Whether the upgrade was confirmed.
    pub fn is_success(self) -> bool {
        self == Self::Succeeded
    }

    /// `Some(true)` on success, `None` otherwise.
    pub fn into_option(self) -> Option<bool> {
        self.is_success().then_some(true)
    }
}

impl fmt::Display for UpgradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// Inputs of one upgrade attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeRequest {
    /// Console bridge address, or the modem's own address for SNMP.
    pub host: String,

    /// Bridge port wired to the console; unused for SNMP.
    pub port: Option<u16>,

    /// Firmware file name as it appears on the download server.
    pub firmware: String,
}

impl UpgradeRequest {
    /// Request an upgrade through a console bridge.
    pub fn console(bridge: impl Into<String>, port: u16, firmware: impl Into<String>) -> Self {
        Self {
            host: bridge.into(),
            port: Some(port),
            firmware: firmware.into(),
        }
    }

    /// Request an upgrade over SNMP.
    pub fn snmp(device: impl Into<String>, firmware: impl Into<String>) -> Self {
        Self {
            host: device.into(),
            port: None,
            firmware: firmware.into(),
        }
    }
}

/// Upgrade a gateway through the serial console behind a bridge.
///
/// `bridge` and `port` address the bridge port wired to the device console
/// (e.g. `10.55.69.106`, `9001`). `target_fw` is the file name in the
/// server's download folder.
pub async fn console_upgrade(bridge: &str, port: u16, target_fw: &str) -> UpgradeOutcome {
    let console = match ConsoleBuilder::new(bridge).port(port).build() {
        Ok(console) => console,
        Err(e) => {
            error!("Invalid console configuration: {}", e);
            return UpgradeOutcome::Indeterminate;
        }
    };

    ConsoleUpgrade::new(console, ConsoleUpgradeSettings::default())
        .run(target_fw)
        .await
}

/// Upgrade a cable modem over SNMP.
///
/// `device` is the modem's cable-side address. `target_fw` is the file name
/// in the server's firmware folder.
pub async fn snmp_upgrade(device: &str, target_fw: &str) -> UpgradeOutcome {
    let agent = match SnmpBuilder::new(device).connect().await {
        Ok(agent) => agent,
        Err(e) => {
            error!("Unable to open SNMP session to {}: {}", device, e);
            return UpgradeOutcome::Indeterminate;
        }
    };

    ProtocolUpgrade::new(agent, ProtocolUpgradeSettings::default())
        .run(target_fw)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upgrade::sim::{SimAgent, SimConsole};

    #[test]
    fn test_outcome_option_mapping() {
        assert_eq!(UpgradeOutcome::Succeeded.into_option(), Some(true));
        assert_eq!(UpgradeOutcome::Indeterminate.into_option(), None);
        assert!(!UpgradeOutcome::Indeterminate.is_success());
        assert_eq!(UpgradeOutcome::Indeterminate.to_string(), "indeterminate");
    }

    #[test]
    fn test_request_constructors() {
        let request = UpgradeRequest::console("10.55.69.106", 9001, "F5685.pkgtb");
        assert_eq!(request.port, Some(9001));

        let request = UpgradeRequest::snmp("10.11.142.122", "TG3492.p7b");
        assert_eq!(request.port, None);
        assert_eq!(request.firmware, "TG3492.p7b");
    }

    fn assert_send<T: Send>(_: T) {}

    #[test]
    fn test_upgrade_futures_are_send() {
        assert_send(console_upgrade("127.0.0.1", 9001, "F5685.pkgtb"));
        assert_send(snmp_upgrade("127.0.0.1", "TG3492.p7b"));

        let mut console = ConsoleUpgrade::new(SimConsole::new(), ConsoleUpgradeSettings::default());
        assert_send(console.run("F5685.pkgtb"));
        let mut protocol = ProtocolUpgrade::new(SimAgent::new(), ProtocolUpgradeSettings::default());
        assert_send(protocol.run("TG3492.p7b"));
    }

    #[tokio::test]
    async fn test_spawned_upgrade_runs_to_completion() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let handle =
            tokio::spawn(async move { console_upgrade("127.0.0.1", port, "F5685.pkgtb").await });
        assert_eq!(handle.await.unwrap(), UpgradeOutcome::Indeterminate);
    }

    #[tokio::test]
    async fn test_console_upgrade_unreachable_bridge() {
        // Nothing listens on a freshly released port
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let outcome = console_upgrade("127.0.0.1", port, "F5685.pkgtb").await;
        assert_eq!(outcome, UpgradeOutcome::Indeterminate);
    }
}
