//! Object identifiers used by the DOCSIS software-download procedure.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::ManagementError;

/// `sysDescr.0`: device identity string, answered once the agent is up.
pub const SYS_DESCR: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 1, 1, 0]);

/// `docsDevSwServerTransportProtocol.0`: 1 = TFTP, 2 = HTTP.
pub const SW_SERVER_TRANSPORT: ObjectId =
    ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 69, 1, 3, 8, 0]);

/// `docsDevSwFilename.0`: firmware path on the download server.
pub const SW_FILENAME: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 69, 1, 3, 2, 0]);

/// `docsDevSwServer.0`: download server address.
pub const SW_SERVER: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 69, 1, 3, 1, 0]);

/// `docsDevSwAdminStatus.0`: writing 1 starts the download.
pub const SW_ADMIN_STATUS: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 69, 1, 3, 3, 0]);

/// `docsDevSwOperStatus.0`: download phase reported by the device.
pub const SW_OPER_STATUS: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 69, 1, 3, 4, 0]);

/// A numeric object identifier, displayed in dotted form with a leading dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId {
    arcs: Cow<'static, [u64]>,
}

impl ObjectId {
    /// Wrap a fixed list of arcs.
    pub const fn from_static(arcs: &'static [u64]) -> Self {
        Self {
            arcs: Cow::Borrowed(arcs),
        }
    }

    /// Parse a dotted identifier; a leading dot is accepted.
    pub fn parse(s: &str) -> Result<Self, ManagementError> {
        let invalid = || ManagementError::InvalidOid { oid: s.to_string() };
        let trimmed = s.strip_prefix('.').unwrap_or(s);
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let arcs = trimmed
            .split('.')
            .map(|arc| arc.parse::<u64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        if arcs.len() < 2 {
            return Err(invalid());
        }
        Ok(Self {
            arcs: Cow::Owned(arcs),
        })
    }

    /// The numeric arcs.
    pub fn arcs(&self) -> &[u64] {
        &self.arcs
    }
}

impl FromStr for ObjectId {
    type Err = ManagementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for arc in self.arcs.iter() {
            write!(f, ".{}", arc)?;
        }
        Ok(())
    }
}
