//! Console session over a Telnet serial bridge.

use std::time::{Duration, Instant};

use log::debug;
use regex::bytes::Regex;

use super::response::Response;
use super::{ConsoleSession, ExpectOutcome};
use crate::error::{ChannelError, ConsoleError, Error, Result};
use crate::transport::{ConsoleConfig, TelnetTransport};

/// Console session to a device behind a serial-to-network bridge.
///
/// The session owns the bridge connection while open. The response-wait
/// timeout starts at [`ConsoleConfig::timeout`] and is adjusted by callers
/// per phase with [`set_timeout`](ConsoleSession::set_timeout).
pub struct TelnetConsole {
    /// Connection configuration.
    config: ConsoleConfig,

    /// Compiled shell prompt pattern.
    prompt_pattern: Regex,

    /// Bridge connection (None when closed).
    transport: Option<TelnetTransport>,

    /// Current response-wait timeout.
    timeout: Duration,
}

impl TelnetConsole {
    /// Create a closed session. Call `connect()` to open it.
    pub fn new(config: ConsoleConfig, prompt_pattern: Regex) -> Self {
        let timeout = config.timeout;
        Self {
            config,
            prompt_pattern,
            transport: None,
            timeout,
        }
    }

    /// Get the connection configuration.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Whether the bridge connection is open.
    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    fn transport_mut(&mut self) -> Result<&mut TelnetTransport> {
        self.transport
            .as_mut()
            .ok_or_else(|| ConsoleError::NotConnected.into())
    }
}

impl ConsoleSession for TelnetConsole {
    async fn connect(&mut self) -> Result<()> {
        if self.transport.is_some() {
            return Err(ConsoleError::AlreadyConnected.into());
        }

        let transport = TelnetTransport::connect(&self.config).await?;
        self.transport = Some(transport);
        Ok(())
    }

    async fn execute(&mut self, command: &str) -> Result<Response> {
        let timeout = self.timeout;
        let line = format!("{}{}", command, self.config.line_ending);
        let prompt_pattern = self.prompt_pattern.clone();
        let transport = self.transport_mut()?;

        let start = Instant::now();
        transport.discard_pending();
        transport.send(&line).await?;

        let data = transport.read_until_prompt(&prompt_pattern, timeout).await?;
        let raw_result = String::from_utf8_lossy(&data).to_string();

        let prompt = match prompt_pattern.find(&data) {
            Some(m) => String::from_utf8_lossy(&data[m.start()..]).trim().to_string(),
            None => String::new(),
        };

        Ok(Response::from_raw(command, raw_result, prompt, start.elapsed()))
    }

    fn set_timeout(&mut self, timeout: Duration) {
        debug!("console: response timeout {:?} -> {:?}", self.timeout, timeout);
        self.timeout = timeout;
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.transport_mut()?.send(text).await
    }

    async fn expect(&mut self, marker: &str) -> ExpectOutcome {
        let timeout = self.timeout;
        let Some(transport) = self.transport.as_mut() else {
            return ExpectOutcome::ConnectionLost;
        };

        match transport.read_until_marker(marker, timeout).await {
            Ok(_) => ExpectOutcome::Found,
            Err(Error::Channel(ChannelError::PatternTimeout(_))) => ExpectOutcome::TimedOut,
            Err(e) => {
                debug!("console: waiting for {:?} failed: {}", marker, e);
                ExpectOutcome::ConnectionLost
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(transport) = self.transport.take() {
            transport.close().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ConsoleBuilder;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn bridge() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    fn console(port: u16) -> TelnetConsole {
        ConsoleBuilder::new("127.0.0.1")
            .port(port)
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_execute_waits_for_prompt() {
        let (listener, port) = bridge().await;
        let device = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut line = vec![0u8; 256];
            let n = socket.read(&mut line).await.unwrap();
            assert_eq!(&line[..n], b"dmcli eRT getv Device.DeviceInfo.ModelName\r\n");
            socket
                .write_all(b"dmcli eRT getv Device.DeviceInfo.ModelName\r\nvalue: F5685\r\nroot@F5685:~# ")
                .await
                .unwrap();
            // Keep the socket open until the client is done
            let _ = socket.read(&mut line).await;
        });

        let mut console = console(port);
        console.connect().await.unwrap();
        let response = console
            .execute("dmcli eRT getv Device.DeviceInfo.ModelName")
            .await
            .unwrap();
        assert_eq!(response.result, "value: F5685");
        assert_eq!(response.prompt, "#");
        console.close().await.unwrap();
        device.await.unwrap();
    }

    #[tokio::test]
    async fn test_expect_found_through_telnet_negotiation() {
        let (listener, port) = bridge().await;
        let device = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(&[255, 251, 1, 255, 251, 3]).await.unwrap();
            socket
                .write_all(b"[ 901.1] reboot: Restarting system\r\n")
                .await
                .unwrap();

            let mut reply = [0u8; 6];
            socket.read_exact(&mut reply).await.unwrap();
            assert_eq!(reply, [255, 253, 1, 255, 253, 3]);
            let _ = socket.read(&mut reply).await;
        });

        let mut console = console(port);
        console.connect().await.unwrap();
        assert_eq!(
            console.expect("reboot: Restarting system").await,
            ExpectOutcome::Found
        );
        console.close().await.unwrap();
        device.await.unwrap();
    }

    #[tokio::test]
    async fn test_expect_timeout_and_connection_lost() {
        let (listener, port) = bridge().await;
        let device = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"booting...\r\n").await.unwrap();
            let mut buf = [0u8; 16];
            // Wait for the client's keystroke, then hang up
            let _ = socket.read(&mut buf).await;
        });

        let mut console = console(port);
        console.connect().await.unwrap();
        console.set_timeout(Duration::from_millis(200));
        assert_eq!(console.expect("login:").await, ExpectOutcome::TimedOut);

        console.send_raw("\r").await.unwrap();
        device.await.unwrap();
        console.set_timeout(Duration::from_secs(2));
        assert_eq!(console.expect("login:").await, ExpectOutcome::ConnectionLost);
        console.close().await.ok();
    }

    #[tokio::test]
    async fn test_not_connected() {
        let mut console = console(1);
        assert!(!console.is_open());
        assert_eq!(console.expect("login:").await, ExpectOutcome::ConnectionLost);
        assert!(matches!(
            console.execute("true").await,
            Err(Error::Console(ConsoleError::NotConnected))
        ));
        // Closing a closed session is a no-op
        console.close().await.unwrap();
    }
}
