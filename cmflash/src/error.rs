//! Error types for cmflash.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for cmflash operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Network transport errors (TCP to the console bridge, UDP to the agent)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Console channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Console session errors
    #[error("Console error: {0}")]
    Console(#[from] ConsoleError),

    /// Management protocol errors
    #[error("Management error: {0}")]
    Management(#[from] ManagementError),

    /// Device model errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Transport layer errors.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Connection was closed by the peer
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors (pattern matching on the console stream).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Pattern matching timed out
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Console session errors.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Session not connected
    #[error("Console not connected - call connect() first")]
    NotConnected,

    /// Session already connected
    #[error("Console already connected")]
    AlreadyConnected,

    /// Command execution failed
    #[error("Command failed: {message}")]
    CommandFailed { message: String },
}

/// Management protocol (SNMP) errors.
#[derive(Error, Debug)]
pub enum ManagementError {
    /// Object identifier could not be parsed
    #[error("Invalid object identifier '{oid}'")]
    InvalidOid { oid: String },

    /// SNMP encoding or protocol failure
    #[error("SNMP error: {message}")]
    Protocol { message: String },

    /// Agent answered with a non-zero error status
    #[error("Agent reported error status {status} for {oid}")]
    ErrorStatus { oid: String, status: u32 },

    /// Agent answered without a usable variable binding
    #[error("No value returned for {oid}")]
    NoValue { oid: String },

    /// Agent returned a value type this crate does not model
    #[error("Unsupported value type for {oid}: {kind}")]
    UnsupportedType { oid: String, kind: String },
}

/// Device model errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Model not present in the registry
    #[error("Unknown device model: {name}")]
    UnknownModel { name: String },

    /// Model already registered
    #[error("Device model '{name}' is already registered")]
    AlreadyRegistered { name: String },

    /// Invalid model or connection definition
    #[error("Invalid platform definition: {message}")]
    InvalidDefinition { message: String },
}

/// Result type alias using cmflash's Error.
pub type Result<T> = std::result::Result<T, Error>;
