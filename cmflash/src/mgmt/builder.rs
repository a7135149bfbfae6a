//! Builder for SNMP management sessions.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::Result;
use crate::transport::{SnmpConfig, SnmpTransport};

/// Builder for constructing SNMP sessions.
///
/// # Example
///
/// ```rust,no_run
/// use cmflash::mgmt::{oid, ManagementSession, SnmpBuilder};
///
/// # async fn example() -> Result<(), cmflash::Error> {
/// let mut agent = SnmpBuilder::new("10.11.142.122")
///     .community("private")
///     .connect()
///     .await?;
/// let descr = agent.get(&oid::SYS_DESCR).await?;
/// println!("{}", descr);
/// # Ok(())
/// # }
/// ```
pub struct SnmpBuilder {
    config: SnmpConfig,
}

impl SnmpBuilder {
    /// Create a new builder for the agent at `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            config: SnmpConfig {
                host: host.into(),
                ..SnmpConfig::default()
            },
        }
    }

    /// Set the agent UDP port (default: 161).
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the write community (default: `private`).
    pub fn community(mut self, community: impl Into<String>) -> Self {
        self.config.community = SecretString::from(community.into());
        self
    }

    /// Set the per-request timeout (default: 5s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Get the configuration built so far.
    pub fn config(&self) -> &SnmpConfig {
        &self.config
    }

    /// Open the session.
    pub async fn connect(self) -> Result<SnmpTransport> {
        SnmpTransport::connect(self.config).await
    }
}
