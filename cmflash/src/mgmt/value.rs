//! Typed values carried by management-protocol variables.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// A variable value with its primitive type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypedValue {
    /// Signed integer (SNMP `INTEGER`).
    Integer(i64),

    /// Text (SNMP `OCTET STRING`, lossily decoded as UTF-8).
    OctetString(String),

    /// IPv4 address (SNMP `IpAddress`).
    IpAddress(Ipv4Addr),
}

impl TypedValue {
    /// The integer payload, if this is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether the value renders as empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::OctetString(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::OctetString(s) => write!(f, "{}", s),
            Self::IpAddress(addr) => write!(f, "{}", addr),
        }
    }
}

impl From<i64> for TypedValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        Self::OctetString(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        Self::OctetString(s)
    }
}

impl From<Ipv4Addr> for TypedValue {
    fn from(addr: Ipv4Addr) -> Self {
        Self::IpAddress(addr)
    }
}
