//! # cmflash
//!
//! Async firmware upgrades for cable modems and gateways in a test lab.
//!
//! Two upgrade paths are supported, and each device model uses exactly one:
//!
//! - **Console**: commands typed into the device's serial console, reached
//!   through a Telnet console bridge. Progress is read off the console stream.
//! - **SNMP**: DOCSIS software-download objects written over SNMP v2c, with
//!   progress read back from the device's download status.
//!
//! ## Features
//!
//! - Telnet console sessions with option negotiation and prompt matching
//! - SNMP v2c get/set via snmp2
//! - Upgrade orchestrators generic over the session traits
//! - Model registry mapping each device model to its upgrade path
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cmflash::{UpgradeRequest, upgrade_model};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cmflash::Error> {
//!     let request = UpgradeRequest::console("10.55.69.106", 9001, "F5685.pkgtb");
//!     let outcome = upgrade_model("F5685", &request).await?;
//!
//!     println!("Upgrade {}", outcome);
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod console;
pub mod error;
pub mod mgmt;
pub mod platform;
pub mod transport;
pub mod upgrade;

// Re-export main types for convenience
pub use console::{ConsoleBuilder, ConsoleSession, ExpectOutcome, Response, TelnetConsole};
pub use error::Error;
pub use mgmt::{ManagementSession, ObjectId, SnmpBuilder, TypedValue};
pub use platform::{ModelDefinition, PlatformRegistry, UpgradeMethod, upgrade_model};
pub use transport::{ConsoleConfig, SnmpConfig};
pub use upgrade::{
    ConsoleUpgrade, ConsoleUpgradeSettings, ProtocolUpgrade, ProtocolUpgradeSettings, Retry,
    UpgradeOutcome, UpgradeRequest, console_upgrade, snmp_upgrade,
};
