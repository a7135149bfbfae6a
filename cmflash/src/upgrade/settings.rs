//! Fixed server parameters and phase timings for both upgrade paths.
//!
//! The delays are not tuning knobs in normal use: they reproduce how long
//! the modems need to apply a setting, start a download and reboot. The
//! defaults are the values the procedures were validated with.

use std::net::Ipv4Addr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::retry::Retry;

/// Settings for the console upgrade path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleUpgradeSettings {
    /// Base URL of the firmware download server.
    pub download_url: String,

    /// Pause after each configuration write.
    pub write_settle: Duration,

    /// Response-wait timeout for the reboot banner.
    pub reboot_wait: Duration,

    /// Pause after the reboot banner before probing the console.
    pub reboot_settle: Duration,

    /// Response-wait timeout for each login-prompt probe.
    pub prompt_timeout: Duration,

    /// Login-prompt probe budget.
    pub prompt_retry: Retry,

    /// Response-wait timeout restored before closing the session.
    pub restored_timeout: Duration,
}

impl Default for ConsoleUpgradeSettings {
    fn default() -> Self {
        Self {
            download_url: "https://gateway-dl.lab.nl.dmdsdp.com/".to_string(),
            write_settle: Duration::from_secs(2),
            reboot_wait: Duration::from_secs(120),
            reboot_settle: Duration::from_secs(120),
            prompt_timeout: Duration::from_secs(5),
            prompt_retry: Retry::new(4, Duration::from_secs(30)),
            restored_timeout: Duration::from_secs(30),
        }
    }
}

/// Settings for the SNMP upgrade path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolUpgradeSettings {
    /// Download server address written to the modem.
    pub server_address: Ipv4Addr,

    /// Directory on the server prefixed to the firmware name.
    pub firmware_dir: String,

    /// Server transport protocol value (2 = HTTP).
    pub transport_mode: i64,

    /// Pause between the trigger and the first status read.
    pub first_status_delay: Duration,

    /// Pause before monitoring starts, covering the download itself.
    pub monitor_delay: Duration,

    /// Download status poll budget.
    pub status_poll: Retry,

    /// Identity poll budget after a completed download.
    pub identity_poll: Retry,
}

impl Default for ProtocolUpgradeSettings {
    fn default() -> Self {
        Self {
            server_address: Ipv4Addr::new(172, 30, 144, 122),
            firmware_dir: "firmware/".to_string(),
            transport_mode: 2,
            first_status_delay: Duration::from_secs(5),
            monitor_delay: Duration::from_secs(60),
            status_poll: Retry::new(20, Duration::from_secs(30)),
            identity_poll: Retry::new(20, Duration::from_secs(30)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let settings: ConsoleUpgradeSettings = serde_json::from_str(
            r#"{"reboot_wait": {"secs": 300, "nanos": 0}, "prompt_retry": {"attempts": 6, "interval": {"secs": 10, "nanos": 0}}}"#,
        )
        .unwrap();

        assert_eq!(settings.reboot_wait, Duration::from_secs(300));
        assert_eq!(settings.prompt_retry, Retry::new(6, Duration::from_secs(10)));
        assert_eq!(settings.reboot_settle, Duration::from_secs(120));
        assert_eq!(settings.download_url, "https://gateway-dl.lab.nl.dmdsdp.com/");
    }

    #[test]
    fn test_protocol_settings_from_json() {
        let settings: ProtocolUpgradeSettings =
            serde_json::from_str(r#"{"server_address": "10.0.0.5", "firmware_dir": "fw/"}"#)
                .unwrap();

        assert_eq!(settings.server_address, Ipv4Addr::new(10, 0, 0, 5));
        assert_eq!(settings.firmware_dir, "fw/");
        assert_eq!(settings.transport_mode, 2);
        assert_eq!(settings.status_poll, Retry::new(20, Duration::from_secs(30)));
    }

    #[test]
    fn test_settings_serialize() {
        let json = serde_json::to_value(ProtocolUpgradeSettings::default()).unwrap();
        assert_eq!(json["server_address"], "172.30.144.122");
        assert_eq!(json["monitor_delay"]["secs"], 60);
    }
}
