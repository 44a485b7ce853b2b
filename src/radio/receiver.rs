/// Half-duplex receive cycle: arm, wait for a packet, read, re-arm
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::radio::status::ERR_NONE;
use crate::radio::{Radio, RadioStatus, StatusCode, ADDRESS_WIDTH};
use crate::utils::format_address;

/// "Packet pending" flag shared with the radio's notification context
///
/// This is the only value touched from both sides of the notification
/// boundary. Raising it is a single atomic store.
#[derive(Debug, Default)]
pub struct PendingFlag {
    pending: AtomicBool,
}

impl PendingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a packet arrived. Safe to call from notification context.
    pub fn raise(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether it was set
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

/// Radio initialization stage that failed, with the driver code
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InitError {
    #[error("radio initialization failed, code {0}")]
    Begin(StatusCode),

    #[error("setting address for receive pipe {pipe} failed, code {code}")]
    ReceivePipe { pipe: u8, code: StatusCode },

    #[error("starting to listen failed, code {0}")]
    StartReceive(StatusCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    /// Listening, waiting for the next notification
    Idle,
    /// Notification seen, frame not read yet
    PacketPending,
    /// Frame taken from the radio, receiver not re-armed yet
    Reading,
}

/// Raw frame as read from the radio
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedFrame {
    pub payload: String,
    pub status: RadioStatus,
}

/// Owns the radio and drives its receive cycle
pub struct Receiver<R> {
    radio: R,
    flag: Arc<PendingFlag>,
    state: ReceiverState,
}

impl<R: Radio> Receiver<R> {
    /// Bring the radio up and start listening on `pipe` at `address`
    ///
    /// Any failing step is returned as an [`InitError`]; the caller is
    /// expected to treat it as fatal.
    pub fn init(
        mut radio: R,
        pipe: u8,
        address: [u8; ADDRESS_WIDTH],
    ) -> Result<Self, InitError> {
        info!("[radio] Initializing ...");
        let state = radio.begin();
        if state != ERR_NONE {
            error!("[radio] Initialization failed, code {}", state);
            return Err(InitError::Begin(state));
        }

        info!(
            "[radio] Setting address {} for receive pipe {} ...",
            format_address(&address),
            pipe
        );
        let state = radio.set_receive_pipe(pipe, &address);
        if state != ERR_NONE {
            error!("[radio] Setting receive pipe failed, code {}", state);
            return Err(InitError::ReceivePipe { pipe, code: state });
        }

        let flag = Arc::new(PendingFlag::new());
        radio.set_packet_received_action(Arc::clone(&flag));

        info!("[radio] Starting to listen ...");
        let state = radio.start_receive();
        if state != ERR_NONE {
            error!("[radio] Starting to listen failed, code {}", state);
            return Err(InitError::StartReceive(state));
        }
        info!("[radio] Listening");

        Ok(Receiver {
            radio,
            flag,
            state: ReceiverState::Idle,
        })
    }

    /// Take the pending packet, if any
    ///
    /// The flag is cleared before the radio is read so a notification landing
    /// during the read stays pending for the next poll.
    pub fn poll(&mut self) -> Option<ReceivedFrame> {
        if self.state == ReceiverState::Idle && self.flag.is_pending() {
            self.state = ReceiverState::PacketPending;
        }
        if self.state != ReceiverState::PacketPending || !self.flag.take() {
            return None;
        }

        self.state = ReceiverState::Reading;
        let (payload, code) = self.radio.read_data();
        Some(ReceivedFrame {
            payload,
            status: RadioStatus::classify(code),
        })
    }

    /// Put the radio back into listen mode after a read
    pub fn rearm(&mut self) -> RadioStatus {
        let status = RadioStatus::classify(self.radio.start_receive());
        self.state = ReceiverState::Idle;
        status
    }

    pub fn state(&self) -> ReceiverState {
        self.state
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn pending_flag(&self) -> &Arc<PendingFlag> {
        &self.flag
    }
}
