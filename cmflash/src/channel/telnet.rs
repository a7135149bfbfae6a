//! Telnet (RFC 854) stream filtering.
//!
//! Serial-to-network bridges expose the device console as a Telnet server.
//! The bridge interleaves option negotiation with console output, so every
//! received chunk passes through [`TelnetFilter`] which separates the two and
//! produces the replies the bridge expects.

use bytes::{BufMut, BytesMut};
use log::trace;

/// Interpret as command
pub const IAC: u8 = 255;

/// Refuse to let the peer perform an option
pub const DONT: u8 = 254;

/// Ask the peer to perform an option
pub const DO: u8 = 253;

/// Refuse to perform an option
pub const WONT: u8 = 252;

/// Offer to perform an option
pub const WILL: u8 = 251;

/// Begin subnegotiation
pub const SB: u8 = 250;

/// End subnegotiation
pub const SE: u8 = 240;

/// Echo option (RFC 857)
pub const OPT_ECHO: u8 = 1;

/// Suppress go-ahead option (RFC 858)
pub const OPT_SGA: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    Iac,
    Negotiate(u8),
    Sub,
    SubIac,
}

/// Output of one [`TelnetFilter::feed`] call.
#[derive(Debug, Default)]
pub struct Filtered {
    /// Console bytes with all Telnet commands removed.
    pub data: BytesMut,

    /// Negotiation replies to write back to the peer.
    pub replies: BytesMut,
}

/// Incremental Telnet command parser.
///
/// Sequences split across reads are handled by carrying the parser state
/// between calls. Server-side ECHO and SUPPRESS-GO-AHEAD are accepted, every
/// other option is refused.
#[derive(Debug)]
pub struct TelnetFilter {
    state: State,
    accepted: Vec<u8>,
}

impl TelnetFilter {
    /// Create a filter in the data state.
    pub fn new() -> Self {
        Self {
            state: State::Data,
            accepted: Vec::new(),
        }
    }

    /// Split a received chunk into console data and negotiation replies.
    pub fn feed(&mut self, input: &[u8]) -> Filtered {
        let mut out = Filtered {
            data: BytesMut::with_capacity(input.len()),
            replies: BytesMut::new(),
        };

        for &byte in input {
            self.state = match (self.state, byte) {
                (State::Data, IAC) => State::Iac,
                // NUL padding after CR carries no console text
                (State::Data, 0) => State::Data,
                (State::Data, b) => {
                    out.data.put_u8(b);
                    State::Data
                }
                (State::Iac, IAC) => {
                    out.data.put_u8(IAC);
                    State::Data
                }
                (State::Iac, cmd @ (WILL | WONT | DO | DONT)) => State::Negotiate(cmd),
                (State::Iac, SB) => State::Sub,
                (State::Iac, _) => State::Data,
                (State::Negotiate(cmd), option) => {
                    self.negotiate(cmd, option, &mut out.replies);
                    State::Data
                }
                (State::Sub, IAC) => State::SubIac,
                (State::Sub, _) => State::Sub,
                (State::SubIac, SE) => State::Data,
                (State::SubIac, _) => State::Sub,
            };
        }

        out
    }

    fn negotiate(&mut self, cmd: u8, option: u8, replies: &mut BytesMut) {
        trace!("telnet: received {} option {}", command_name(cmd), option);
        match cmd {
            WILL if option == OPT_ECHO || option == OPT_SGA => {
                if !self.accepted.contains(&option) {
                    self.accepted.push(option);
                    replies.put_slice(&[IAC, DO, option]);
                }
            }
            WILL => replies.put_slice(&[IAC, DONT, option]),
            DO => replies.put_slice(&[IAC, WONT, option]),
            WONT => self.accepted.retain(|&o| o != option),
            _ => {}
        }
    }
}

impl Default for TelnetFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape outgoing data so literal 0xFF bytes are not read as commands.
pub fn escape(data: &[u8]) -> BytesMut {
    let mut out = BytesMut::with_capacity(data.len());
    for &byte in data {
        if byte == IAC {
            out.put_u8(IAC);
        }
        out.put_u8(byte);
    }
    out
}

fn command_name(cmd: u8) -> &'static str {
    match cmd {
        WILL => "WILL",
        WONT => "WONT",
        DO => "DO",
        DONT => "DONT",
        _ => "?",
    }
}
