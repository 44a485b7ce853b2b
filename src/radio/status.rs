/// Classification of radio driver status codes
use std::fmt;

use crate::radio::StatusCode;

// Driver status codes the gateway knows about
pub const ERR_NONE: StatusCode = 0;
pub const ERR_CHIP_NOT_FOUND: StatusCode = -2;
pub const ERR_PACKET_TOO_LONG: StatusCode = -4;
pub const ERR_TX_TIMEOUT: StatusCode = -5;
pub const ERR_ACK_NOT_RECEIVED: StatusCode = -101;
pub const ERR_INVALID_PIPE_NUMBER: StatusCode = -102;

/// Outcome category of a radio operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioStatus {
    Success,
    /// Payload longer than a packet can carry
    PacketTooLong,
    /// Destination never acknowledged
    AckTimeout,
    TransmitTimeout,
    /// Any other driver code, kept for diagnostics
    Other(StatusCode),
}

impl RadioStatus {
    pub fn classify(code: StatusCode) -> Self {
        match code {
            ERR_NONE => RadioStatus::Success,
            ERR_PACKET_TOO_LONG => RadioStatus::PacketTooLong,
            ERR_ACK_NOT_RECEIVED => RadioStatus::AckTimeout,
            ERR_TX_TIMEOUT => RadioStatus::TransmitTimeout,
            other => RadioStatus::Other(other),
        }
    }

    pub fn is_success(self) -> bool {
        self == RadioStatus::Success
    }
}

impl fmt::Display for RadioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadioStatus::Success => write!(f, "success!"),
            RadioStatus::PacketTooLong => write!(f, "too long!"),
            RadioStatus::AckTimeout => write!(f, "ACK not received!"),
            RadioStatus::TransmitTimeout => write!(f, "timeout!"),
            RadioStatus::Other(code) => write!(f, "failed, code {}", code),
        }
    }
}
