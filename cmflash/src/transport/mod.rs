//! Network transports to the device.
//!
//! The console path talks Telnet over TCP to a serial-to-network bridge;
//! the protocol path talks SNMPv2c over UDP straight to the modem.

pub mod config;
mod snmp;
mod telnet;

pub use config::{ConsoleConfig, SnmpConfig};
pub use snmp::SnmpTransport;
pub use telnet::TelnetTransport;
