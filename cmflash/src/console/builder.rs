//! Builder for console sessions.

use std::time::Duration;

use super::session::TelnetConsole;
use crate::channel::compile_prompt_pattern;
use crate::error::{ChannelError, Result};
use crate::transport::ConsoleConfig;

/// Builder for constructing console sessions.
///
/// # Example
///
/// ```rust,no_run
/// use cmflash::console::{ConsoleBuilder, ConsoleSession};
///
/// # async fn example() -> Result<(), cmflash::Error> {
/// let mut console = ConsoleBuilder::new("10.55.69.106")
///     .port(9001)
///     .build()?;
/// console.connect().await?;
/// let response = console.execute("uname -a").await?;
/// println!("{}", response);
/// console.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct ConsoleBuilder {
    config: ConsoleConfig,
}

impl ConsoleBuilder {
    /// Create a new builder for the bridge at `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            config: ConsoleConfig {
                host: host.into(),
                ..ConsoleConfig::default()
            },
        }
    }

    /// Set the bridge TCP port (default: 23).
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connect and initial response-wait timeout (default: 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the shell prompt regex (default: `[#$>]\s*$`).
    pub fn prompt(mut self, pattern: impl Into<String>) -> Self {
        self.config.prompt_pattern = pattern.into();
        self
    }

    /// Set how many trailing bytes are searched for the prompt.
    pub fn search_depth(mut self, depth: usize) -> Self {
        self.config.search_depth = depth;
        self
    }

    /// Set the line terminator appended to commands (default: `\r\n`).
    pub fn line_ending(mut self, ending: impl Into<String>) -> Self {
        self.config.line_ending = ending.into();
        self
    }

    /// Build the session.
    ///
    /// This does not connect. Call `connect()` on the returned session.
    pub fn build(self) -> Result<TelnetConsole> {
        let prompt_pattern =
            compile_prompt_pattern(&self.config.prompt_pattern).map_err(ChannelError::from)?;
        Ok(TelnetConsole::new(self.config, prompt_pattern))
    }
}
