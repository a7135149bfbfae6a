//! Connection configuration for the console bridge and the SNMP agent.

use std::time::Duration;

use secrecy::SecretString;

use crate::channel::DEFAULT_PROMPT;

/// Console bridge connection configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Bridge host (hostname or IP address).
    pub host: String,

    /// Bridge TCP port mapped to the device's serial console.
    pub port: u16,

    /// Connect timeout and initial response-wait timeout.
    pub timeout: Duration,

    /// How many bytes from the end of the output to search for the prompt.
    pub search_depth: usize,

    /// Shell prompt regex that terminates command output.
    pub prompt_pattern: String,

    /// Line terminator appended to commands.
    pub line_ending: String,
}

impl ConsoleConfig {
    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 23,
            timeout: Duration::from_secs(30),
            search_depth: 1000,
            prompt_pattern: DEFAULT_PROMPT.to_string(),
            line_ending: "\r\n".to_string(),
        }
    }
}

/// SNMP agent configuration.
#[derive(Debug, Clone)]
pub struct SnmpConfig {
    /// Agent host (hostname or IP address).
    pub host: String,

    /// Agent UDP port (default: 161).
    pub port: u16,

    /// SNMPv2c community with write access.
    pub community: SecretString,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl SnmpConfig {
    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for SnmpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 161,
            community: SecretString::from("private"),
            timeout: Duration::from_secs(5),
        }
    }
}
