//! Channel layer for console byte handling.
//!
//! Turns the raw byte stream from the console bridge into searchable text:
//! Telnet negotiation is filtered out, ANSI escapes are stripped, and the
//! accumulated output is searched for prompts and literal markers.

mod buffer;
mod patterns;
pub mod telnet;

pub use buffer::PatternBuffer;
pub use patterns::{DEFAULT_PROMPT, compile_prompt_pattern};
pub use telnet::TelnetFilter;
