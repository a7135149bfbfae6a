//! Management-protocol session abstraction.
//!
//! The protocol orchestrator reads and writes single variables by object
//! identifier. [`ManagementSession`] is that seam; [`SnmpTransport`](crate::transport::SnmpTransport)
//! implements it over SNMPv2c and [`SnmpBuilder`] constructs one.

mod builder;
pub mod oid;
mod value;

pub use builder::SnmpBuilder;
pub use oid::ObjectId;
pub use value::TypedValue;

use std::future::Future;

use crate::error::Result;

/// Read/write access to individually identified device variables.
pub trait ManagementSession: Send {
    /// Read one variable.
    fn get(&mut self, oid: &ObjectId) -> impl Future<Output = Result<TypedValue>> + Send;

    /// Write one variable. Returns the value echoed back by the agent.
    fn set(
        &mut self,
        oid: &ObjectId,
        value: TypedValue,
    ) -> impl Future<Output = Result<TypedValue>> + Send;
}
