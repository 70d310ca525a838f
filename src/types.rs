//! Types for tag read cycles and host commands

use std::fmt;

/// Number of identifier bytes the sensor returns per read
pub const TAG_ID_LEN: usize = 7;

/// Longest host command accepted, one USB full-speed packet
pub const MAX_COMMAND_LEN: usize = 64;

/// Identifier of a tag, valid for the read cycle that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagId([u8; TAG_ID_LEN]);

impl TagId {
    pub const fn new(bytes: [u8; TAG_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TAG_ID_LEN] {
        &self.0
    }
}

impl From<[u8; TAG_ID_LEN]> for TagId {
    fn from(bytes: [u8; TAG_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bytes_to_hex(&self.0))
    }
}

/// Result of one write-then-read transaction against the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Both phases completed
    Success(TagId),
    /// The read request could not be sent; no receive was attempted
    CommandFailed,
    /// The request was sent but the identifier could not be received
    ReadFailed,
}

impl ReadOutcome {
    pub fn tag(&self) -> Option<TagId> {
        match self {
            ReadOutcome::Success(tag) => Some(*tag),
            _ => None,
        }
    }

    /// Map the outcome onto the error taxonomy
    pub fn into_result(self) -> Result<TagId, BridgeError> {
        match self {
            ReadOutcome::Success(tag) => Ok(tag),
            ReadOutcome::CommandFailed => Err(BridgeError::BusWrite("read request not sent".into())),
            ReadOutcome::ReadFailed => Err(BridgeError::BusRead("identifier not received".into())),
        }
    }
}

/// What the dispatcher decided to do with a host command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    PerformRead,
    ReportUnknown,
}

/// Command bytes received from the host, bounded to [`MAX_COMMAND_LEN`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCommand(heapless::Vec<u8, MAX_COMMAND_LEN>);

impl HostCommand {
    /// Copy `bytes` into a command. Inputs over the bound are rejected, never truncated.
    pub fn new(bytes: &[u8]) -> Result<Self, BridgeError> {
        heapless::Vec::from_slice(bytes)
            .map(Self)
            .map_err(|_| BridgeError::CommandTooLong(bytes.len()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Errors that can occur while bridging the sensor and the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Sending the read request to the sensor failed
    BusWrite(String),
    /// Receiving the identifier from the sensor failed
    BusRead(String),
    /// Host sent something outside the command vocabulary
    UnknownHostCommand,
    /// A report could not be handed to the host transport
    ReportDelivery(String),
    /// Another read transaction is in flight
    Busy,
    /// Host command longer than [`MAX_COMMAND_LEN`]
    CommandTooLong(usize),
    /// A peripheral or worker could not be brought up
    Init(String),
    /// The polling service is no longer running
    Stopped,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::BusWrite(msg) => write!(f, "bus write failed: {}", msg),
            BridgeError::BusRead(msg) => write!(f, "bus read failed: {}", msg),
            BridgeError::UnknownHostCommand => f.write_str("unknown host command"),
            BridgeError::ReportDelivery(msg) => write!(f, "report delivery failed: {}", msg),
            BridgeError::Busy => f.write_str("a read is already in progress"),
            BridgeError::CommandTooLong(len) => write!(
                f,
                "host command of {} bytes exceeds {} byte limit",
                len, MAX_COMMAND_LEN
            ),
            BridgeError::Init(msg) => write!(f, "initialization failed: {}", msg),
            BridgeError::Stopped => f.write_str("polling service stopped"),
        }
    }
}

impl std::error::Error for BridgeError {}

/// Convert bytes to space-separated uppercase hex
pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
