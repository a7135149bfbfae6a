//! Scripted device simulators for exercising the orchestrators.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tokio::time::Instant;

use super::console::{LOGIN_MARKER, REBOOT_MARKER};
use crate::console::{ConsoleSession, ExpectOutcome, Response};
use crate::error::{ConsoleError, ManagementError, Result, TransportError};
use crate::mgmt::{ManagementSession, ObjectId, TypedValue};

/// A call made against [`SimConsole`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCall {
    Connect,
    Execute(String),
    SetTimeout(Duration),
    SendRaw(String),
    Expect(String, ExpectOutcome),
    Close,
}

/// Console of a modem that reboots on its own schedule.
pub struct SimConsole {
    /// Whether `connect()` succeeds.
    pub reachable: bool,

    /// Whether commands get a prompt back.
    pub responsive: bool,

    /// When the reboot banner appears, measured from the trigger command.
    pub reboot_after: Option<Duration>,

    /// The 1-based login probe that first sees the prompt.
    pub login_on_probe: Option<u32>,

    /// Every call, in order.
    pub calls: Vec<ConsoleCall>,

    timeout: Duration,
    triggered_at: Option<Instant>,
    probes: u32,
}

impl SimConsole {
    pub fn new() -> Self {
        Self {
            reachable: true,
            responsive: true,
            reboot_after: Some(Duration::from_secs(10)),
            login_on_probe: Some(1),
            calls: Vec::new(),
            timeout: Duration::from_secs(30),
            triggered_at: None,
            probes: 0,
        }
    }

    pub fn commands(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ConsoleCall::Execute(cmd) => Some(cmd.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn expects(&self, marker: &str) -> Vec<ExpectOutcome> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ConsoleCall::Expect(m, outcome) if m == marker => Some(*outcome),
                _ => None,
            })
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| **call == ConsoleCall::Close)
            .count()
    }
}

impl ConsoleSession for SimConsole {
    async fn connect(&mut self) -> Result<()> {
        self.calls.push(ConsoleCall::Connect);
        if !self.reachable {
            return Err(TransportError::Timeout(self.timeout).into());
        }
        // Each session starts from a freshly booted device
        self.triggered_at = None;
        self.probes = 0;
        Ok(())
    }

    async fn execute(&mut self, command: &str) -> Result<Response> {
        self.calls.push(ConsoleCall::Execute(command.to_string()));
        if command.ends_with("FirmwareDownloadNow bool true") {
            self.triggered_at = Some(Instant::now());
        }
        if !self.responsive {
            tokio::time::sleep(self.timeout).await;
            return Err(ConsoleError::CommandFailed {
                message: "no prompt".to_string(),
            }
            .into());
        }
        Ok(Response::from_raw(
            command,
            format!("{}\r\nexecute succeed\r\n# ", command),
            "#",
            Duration::from_millis(100),
        ))
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.calls.push(ConsoleCall::SetTimeout(timeout));
        self.timeout = timeout;
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.calls.push(ConsoleCall::SendRaw(text.to_string()));
        Ok(())
    }

    async fn expect(&mut self, marker: &str) -> ExpectOutcome {
        let outcome = match marker {
            REBOOT_MARKER => {
                let appears_at = self
                    .triggered_at
                    .zip(self.reboot_after)
                    .map(|(at, after)| at + after);
                let deadline = Instant::now() + self.timeout;
                match appears_at {
                    Some(at) if at <= deadline => {
                        tokio::time::sleep_until(at).await;
                        ExpectOutcome::Found
                    }
                    _ => {
                        tokio::time::sleep_until(deadline).await;
                        ExpectOutcome::TimedOut
                    }
                }
            }
            LOGIN_MARKER => {
                self.probes += 1;
                match self.login_on_probe {
                    Some(n) if self.probes >= n => ExpectOutcome::Found,
                    _ => {
                        tokio::time::sleep(self.timeout).await;
                        ExpectOutcome::TimedOut
                    }
                }
            }
            _ => ExpectOutcome::TimedOut,
        };
        self.calls.push(ConsoleCall::Expect(marker.to_string(), outcome));
        outcome
    }

    async fn close(&mut self) -> Result<()> {
        self.calls.push(ConsoleCall::Close);
        Ok(())
    }
}

/// A read or write made against [`SimAgent`], with its virtual time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentCall {
    Get(ObjectId, Instant),
    Set(ObjectId, TypedValue),
}

/// SNMP agent of a modem with scripted read results.
///
/// Scripted reads are consumed in order; the last one repeats. `None` in a
/// script is a request that got no answer. Unscripted reads return the last
/// value written.
pub struct SimAgent {
    scripts: HashMap<ObjectId, VecDeque<Option<TypedValue>>>,
    values: HashMap<ObjectId, TypedValue>,
    pub calls: Vec<AgentCall>,
}

impl SimAgent {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            values: HashMap::new(),
            calls: Vec::new(),
        }
    }

    pub fn script(
        mut self,
        oid: ObjectId,
        reads: impl IntoIterator<Item = Option<TypedValue>>,
    ) -> Self {
        self.scripts.insert(oid, reads.into_iter().collect());
        self
    }

    pub fn gets(&self, oid: &ObjectId) -> Vec<Instant> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                AgentCall::Get(o, at) if o == oid => Some(*at),
                _ => None,
            })
            .collect()
    }

    pub fn sets(&self) -> Vec<(ObjectId, TypedValue)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                AgentCall::Set(oid, value) => Some((oid.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }
}

impl ManagementSession for SimAgent {
    async fn get(&mut self, oid: &ObjectId) -> Result<TypedValue> {
        self.calls.push(AgentCall::Get(oid.clone(), Instant::now()));

        let read = match self.scripts.get_mut(oid) {
            Some(script) if script.len() > 1 => script.pop_front().flatten(),
            Some(script) => script.front().cloned().flatten(),
            None => self.values.get(oid).cloned(),
        };

        read.ok_or_else(|| {
            ManagementError::NoValue {
                oid: oid.to_string(),
            }
            .into()
        })
    }

    async fn set(&mut self, oid: &ObjectId, value: TypedValue) -> Result<TypedValue> {
        self.calls.push(AgentCall::Set(oid.clone(), value.clone()));
        self.values.insert(oid.clone(), value.clone());
        Ok(value)
    }
}
