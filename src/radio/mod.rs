pub mod decoder;
pub mod receiver;
pub mod serial;
pub mod status;

#[cfg(test)]
pub mod fake;

use std::sync::Arc;

pub use decoder::{decode, decode_strict, DecodeError};
pub use receiver::{InitError, PendingFlag, ReceivedFrame, Receiver, ReceiverState};
pub use serial::SerialRadio;
pub use status::RadioStatus;

/// Receive pipe address width in bytes
pub const ADDRESS_WIDTH: usize = 5;

/// Pipe the gateway listens on
pub const RECEIVE_PIPE: u8 = 0;

/// Largest payload a single radio packet can carry
pub const MAX_PACKET_LENGTH: usize = 32;

/// Primitive driver result code, `0` on success
pub type StatusCode = i16;

/// Capability exposed by the packet radio driver
///
/// Mirrors the small surface the gateway actually uses. Every call reports a
/// driver status code; [`RadioStatus::classify`] turns those into categories.
pub trait Radio {
    /// Power up and configure the transceiver with default settings.
    fn begin(&mut self) -> StatusCode;

    /// Set the address a receive pipe listens on.
    fn set_receive_pipe(&mut self, pipe: u8, address: &[u8; ADDRESS_WIDTH]) -> StatusCode;

    /// Register the flag raised from the packet-received notification.
    ///
    /// The driver must only call [`PendingFlag::raise`] from its notification
    /// context.
    fn set_packet_received_action(&mut self, flag: Arc<PendingFlag>);

    /// Put the transceiver into listen mode.
    fn start_receive(&mut self) -> StatusCode;

    /// Read the packet held by the transceiver.
    fn read_data(&mut self) -> (String, StatusCode);
}
