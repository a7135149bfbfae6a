//! Telnet transport to a console bridge over tokio TCP.

use std::time::Duration;

use log::{debug, trace};
use regex::bytes::Regex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::Instant;

use super::config::ConsoleConfig;
use crate::channel::telnet::escape;
use crate::channel::{PatternBuffer, TelnetFilter};
use crate::error::{ChannelError, Result, TransportError};

/// Telnet connection to the bridge port wired to the device console.
pub struct TelnetTransport {
    stream: TcpStream,
    filter: TelnetFilter,
    buffer: PatternBuffer,
}

impl TelnetTransport {
    /// Open the TCP connection, bounded by the configured timeout.
    pub async fn connect(config: &ConsoleConfig) -> Result<Self> {
        let stream = tokio::time::timeout(
            config.timeout,
            TcpStream::connect((config.host.as_str(), config.port)),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.timeout))?
        .map_err(|source| TransportError::ConnectionFailed {
            host: config.host.clone(),
            port: config.port,
            source,
        })?;

        stream.set_nodelay(true).map_err(TransportError::Io)?;
        debug!("telnet: connected to {}", config.socket_addr());

        Ok(Self {
            stream,
            filter: TelnetFilter::new(),
            buffer: PatternBuffer::new(config.search_depth),
        })
    }

    /// Write text to the console, escaping IAC bytes.
    pub async fn send(&mut self, text: &str) -> Result<()> {
        trace!("telnet: send {:?}", text);
        self.stream
            .write_all(&escape(text.as_bytes()))
            .await
            .map_err(TransportError::Io)?;
        Ok(())
    }

    /// Read until the tail of the output matches `pattern`.
    ///
    /// Returns the output up to and including the prompt.
    pub async fn read_until_prompt(&mut self, pattern: &Regex, timeout: Duration) -> Result<Vec<u8>> {
        self.read_until(timeout, |buffer| buffer.find_prompt(pattern))
            .await
    }

    /// Read until `marker` appears anywhere in the unconsumed output.
    ///
    /// Returns the output up to and including the marker; anything after it
    /// stays buffered for the next read.
    pub async fn read_until_marker(&mut self, marker: &str, timeout: Duration) -> Result<Vec<u8>> {
        self.read_until(timeout, |buffer| buffer.find_marker(marker.as_bytes()))
            .await
    }

    /// Drop any output received but not yet consumed.
    pub fn discard_pending(&mut self) {
        if !self.buffer.is_empty() {
            trace!("telnet: discarding {} pending bytes", self.buffer.len());
            self.buffer.clear();
        }
    }

    async fn read_until<F>(&mut self, timeout: Duration, mut find: F) -> Result<Vec<u8>>
    where
        F: FnMut(&PatternBuffer) -> Option<usize>,
    {
        let deadline = Instant::now() + timeout;
        let mut chunk = [0u8; 4096];

        loop {
            if let Some(end) = find(&self.buffer) {
                return Ok(self.buffer.consume_through(end));
            }

            let n = match tokio::time::timeout_at(deadline, self.stream.read(&mut chunk)).await {
                Err(_) => return Err(ChannelError::PatternTimeout(timeout).into()),
                Ok(Err(e)) => return Err(TransportError::Io(e).into()),
                Ok(Ok(0)) => return Err(TransportError::Disconnected.into()),
                Ok(Ok(n)) => n,
            };

            let filtered = self.filter.feed(&chunk[..n]);
            if !filtered.replies.is_empty() {
                self.stream
                    .write_all(&filtered.replies)
                    .await
                    .map_err(TransportError::Io)?;
            }

            trace!(
                "telnet: read {} bytes ({} data), buffered {}",
                n,
                filtered.data.len(),
                self.buffer.len()
            );
            self.buffer.extend(&filtered.data);
        }
    }

    /// Shut down the write half and drop the connection.
    pub async fn close(mut self) -> Result<()> {
        self.stream.shutdown().await.map_err(TransportError::Io)?;
        Ok(())
    }
}
