//! SNMPv2c transport using snmp2's tokio session.

use std::net::Ipv4Addr;

use log::{debug, trace, warn};
use secrecy::ExposeSecret;
use snmp2::{AsyncSession, Oid, Value};

use super::config::SnmpConfig;
use crate::error::{Error, ManagementError, Result, TransportError};
use crate::mgmt::{ManagementSession, ObjectId, TypedValue};

/// SNMPv2c session to a cable modem's management agent.
///
/// Every request is bounded by [`SnmpConfig::timeout`]. The session is
/// connectionless, so a rebooting device simply shows up as timeouts.
///
/// A request that times out or gets an unusable reply reopens the session
/// on a fresh local socket. Replies still in flight for the old request
/// then land on the closed socket instead of being read as the answer to
/// the next one.
pub struct SnmpTransport {
    session: AsyncSession,
    config: SnmpConfig,
    next_req_id: i32,
}

impl SnmpTransport {
    /// Bind a local socket and associate it with the agent address.
    pub async fn connect(config: SnmpConfig) -> Result<Self> {
        let session = open_session(&config, 0).await?;
        debug!("snmp: session ready for {}", config.socket_addr());
        Ok(Self {
            session,
            config,
            next_req_id: 0,
        })
    }

    /// The configuration this session was created with.
    pub fn config(&self) -> &SnmpConfig {
        &self.config
    }

    fn begin_request(&mut self) {
        self.next_req_id = self.next_req_id.wrapping_add(1);
    }

    /// Replace the session after a failed exchange and hand back `error`.
    async fn recover(&mut self, error: Error) -> Error {
        debug!("snmp: reopening session to {} after: {}", self.config.socket_addr(), error);
        match open_session(&self.config, self.next_req_id).await {
            Ok(session) => self.session = session,
            Err(e) => warn!("snmp: unable to reopen session: {}", e),
        }
        error
    }
}

impl ManagementSession for SnmpTransport {
    async fn get(&mut self, oid: &ObjectId) -> Result<TypedValue> {
        let snmp_oid = to_snmp_oid(oid)?;
        let timeout = self.config.timeout;
        self.begin_request();
        trace!("snmp: get {}", oid);

        let error: Error = match tokio::time::timeout(timeout, self.session.get(&snmp_oid)).await {
            Ok(Ok(mut pdu)) => {
                let binding = pdu.varbinds.next().map(|(_, value)| value);
                return decode(oid, pdu.error_status, binding);
            }
            Ok(Err(e)) => ManagementError::Protocol {
                message: format!("{:?}", e),
            }
            .into(),
            Err(_) => TransportError::Timeout(timeout).into(),
        };

        Err(self.recover(error).await)
    }

    async fn set(&mut self, oid: &ObjectId, value: TypedValue) -> Result<TypedValue> {
        let snmp_oid = to_snmp_oid(oid)?;
        let timeout = self.config.timeout;
        self.begin_request();
        trace!("snmp: set {} = {}", oid, value);

        let snmp_value = match &value {
            TypedValue::Integer(n) => Value::Integer(*n),
            TypedValue::OctetString(s) => Value::OctetString(s.as_bytes()),
            TypedValue::IpAddress(addr) => Value::IpAddress(addr.octets()),
        };

        let bindings = [(&snmp_oid, snmp_value)];
        let request = self.session.set(&bindings);
        let error: Error = match tokio::time::timeout(timeout, request).await {
            Ok(Ok(mut pdu)) => {
                let binding = pdu.varbinds.next().map(|(_, value)| value);
                return decode(oid, pdu.error_status, binding);
            }
            Ok(Err(e)) => ManagementError::Protocol {
                message: format!("{:?}", e),
            }
            .into(),
            Err(_) => TransportError::Timeout(timeout).into(),
        };

        Err(self.recover(error).await)
    }
}

async fn open_session(config: &SnmpConfig, req_id: i32) -> Result<AsyncSession> {
    AsyncSession::new_v2c(
        config.socket_addr(),
        config.community.expose_secret().as_bytes(),
        req_id,
    )
    .await
    .map_err(|source| {
        TransportError::ConnectionFailed {
            host: config.host.clone(),
            port: config.port,
            source,
        }
        .into()
    })
}

fn to_snmp_oid(oid: &ObjectId) -> Result<Oid<'_>> {
    Oid::from(oid.arcs()).map_err(|_| {
        ManagementError::InvalidOid {
            oid: oid.to_string(),
        }
        .into()
    })
}

/// Convert the first variable binding of a response into a typed value.
fn decode(oid: &ObjectId, error_status: u32, value: Option<Value<'_>>) -> Result<TypedValue> {
    if error_status != 0 {
        return Err(ManagementError::ErrorStatus {
            oid: oid.to_string(),
            status: error_status,
        }
        .into());
    }

    let Some(value) = value else {
        return Err(ManagementError::NoValue {
            oid: oid.to_string(),
        }
        .into());
    };

    let typed = match value {
        Value::Integer(n) => TypedValue::Integer(n),
        Value::OctetString(bytes) => {
            TypedValue::OctetString(String::from_utf8_lossy(bytes).into_owned())
        }
        Value::IpAddress(octets) => TypedValue::IpAddress(Ipv4Addr::from(octets)),
        other => {
            return Err(ManagementError::UnsupportedType {
                oid: oid.to_string(),
                kind: format!("{:?}", other),
            }
            .into());
        }
    };

    Ok(typed)
}
