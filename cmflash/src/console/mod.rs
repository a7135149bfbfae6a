//! Console session layer.
//!
//! [`ConsoleSession`] is the interactive text-console seam the console
//! upgrade drives: send a command and wait for the shell, send raw
//! keystrokes, and wait for a literal marker under a phase-specific timeout.
//! [`TelnetConsole`] implements it over a serial bridge.

mod builder;
mod response;
mod session;

pub use builder::ConsoleBuilder;
pub use response::Response;
pub use session::TelnetConsole;

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// What happened while waiting for a marker.
///
/// Waiting never fails with a transport error: timeouts and dropped
/// connections are reported here so callers can fold them into their
/// retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectOutcome {
    /// The marker appeared in the output.
    Found,

    /// The response-wait timeout elapsed first.
    TimedOut,

    /// The connection failed or is not open.
    ConnectionLost,
}

impl ExpectOutcome {
    /// Whether the marker was observed.
    pub fn is_found(self) -> bool {
        self == Self::Found
    }
}

/// Trait for interactive console sessions.
pub trait ConsoleSession: Send {
    /// Open the session.
    fn connect(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Send a command line and wait for the shell prompt.
    fn execute(&mut self, command: &str) -> impl Future<Output = Result<Response>> + Send;

    /// Set the response-wait timeout used by `execute` and `expect`.
    fn set_timeout(&mut self, timeout: Duration);

    /// Current response-wait timeout.
    fn timeout(&self) -> Duration;

    /// Send text as-is, without a line terminator.
    fn send_raw(&mut self, text: &str) -> impl Future<Output = Result<()>> + Send;

    /// Wait until `marker` appears in the output.
    fn expect(&mut self, marker: &str) -> impl Future<Output = ExpectOutcome> + Send;

    /// Close the session.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}
