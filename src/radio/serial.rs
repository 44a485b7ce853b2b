/// Radio modem attached as a character device
///
/// The modem forwards every packet it receives on the configured pipe as one
/// newline-terminated line. A reader task stands in for the driver's receive
/// interrupt: it fills the single packet buffer and raises the pending flag.
/// Like the transceiver it models, the modem leaves listen mode after each
/// packet, so lines arriving before `start_receive` is called again are
/// dropped. Line bytes are not assumed to be UTF-8 and at most one packet
/// worth of bytes is kept per line.
///
/// The device is opened as-is; line settings (baud rate, raw mode) are
/// expected to be configured beforehand, e.g. with `stty`.
use log::{debug, error, warn};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;

use crate::radio::status::{
    ERR_CHIP_NOT_FOUND, ERR_INVALID_PIPE_NUMBER, ERR_NONE, ERR_PACKET_TOO_LONG,
};
use crate::radio::{PendingFlag, Radio, StatusCode, ADDRESS_WIDTH, MAX_PACKET_LENGTH};
use crate::utils::format_address;

const MAX_PIPE: u8 = 5;
const ERR_UNKNOWN: StatusCode = -1;
// Payload plus a trailing '\r'
const LINE_LIMIT: usize = MAX_PACKET_LENGTH + 1;

/// One line from the modem, cut to the packet size
#[derive(Debug, PartialEq)]
struct RawPacket {
    payload: String,
    too_long: bool,
}

/// Read the next line, keeping at most one packet worth of bytes
///
/// Bytes past the limit are discarded up to the next newline. Invalid UTF-8
/// is replaced rather than rejected. Returns `None` at end of stream.
async fn next_packet<R>(reader: &mut R) -> std::io::Result<Option<RawPacket>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::with_capacity(LINE_LIMIT);
    let mut overflow = false;
    let mut seen = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            if !seen {
                return Ok(None);
            }
            break;
        }
        seen = true;

        let (chunk, used, terminated) = match available.iter().position(|&b| b == b'\n') {
            Some(end) => (&available[..end], end + 1, true),
            None => (available, available.len(), false),
        };
        let room = LINE_LIMIT - line.len();
        if chunk.len() > room {
            overflow = true;
        }
        line.extend_from_slice(&chunk[..chunk.len().min(room)]);
        reader.consume(used);

        if terminated {
            break;
        }
    }

    if line.last() == Some(&b'\r') {
        line.pop();
    }
    let too_long = overflow || line.len() > MAX_PACKET_LENGTH;
    line.truncate(MAX_PACKET_LENGTH);

    Ok(Some(RawPacket {
        payload: String::from_utf8_lossy(&line).into_owned(),
        too_long,
    }))
}

#[derive(Default)]
struct Shared {
    listening: AtomicBool,
    packet: Mutex<Option<RawPacket>>,
    action: Mutex<Option<Arc<PendingFlag>>>,
}

impl Shared {
    fn on_packet(&self, packet: RawPacket) {
        if !self.listening.swap(false, Ordering::AcqRel) {
            warn!("[radio] Packet dropped, receiver not listening");
            return;
        }

        if let Ok(mut slot) = self.packet.lock() {
            *slot = Some(packet);
        }
        if let Ok(action) = self.action.lock() {
            if let Some(flag) = action.as_ref() {
                flag.raise();
            }
        }
    }
}

pub struct SerialRadio {
    device: PathBuf,
    port: Option<File>,
    shared: Arc<Shared>,
    reader: Option<JoinHandle<()>>,
}

impl SerialRadio {
    pub fn new(device: impl AsRef<Path>) -> Self {
        SerialRadio {
            device: device.as_ref().to_path_buf(),
            port: None,
            shared: Arc::new(Shared::default()),
            reader: None,
        }
    }

    fn spawn_reader<P>(&mut self, port: P) -> StatusCode
    where
        P: AsyncRead + Unpin + Send + 'static,
    {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!("[radio] No async runtime for the reader task: {}", e);
                return ERR_UNKNOWN;
            }
        };

        let shared = Arc::clone(&self.shared);
        let device = self.device.display().to_string();
        self.reader = Some(handle.spawn(async move {
            let mut port = BufReader::new(port);
            loop {
                match next_packet(&mut port).await {
                    Ok(Some(packet)) => {
                        debug!("[radio] Raw packet from {}: {:?}", device, packet.payload);
                        shared.on_packet(packet);
                    }
                    Ok(None) => {
                        warn!("[radio] Device {} closed", device);
                        break;
                    }
                    Err(e) => {
                        error!("[radio] Error reading from {}: {}", device, e);
                        break;
                    }
                }
            }
        }));

        ERR_NONE
    }
}

impl Radio for SerialRadio {
    fn begin(&mut self) -> StatusCode {
        match File::open(&self.device) {
            Ok(port) => {
                self.port = Some(port);
                ERR_NONE
            }
            Err(e) => {
                error!("[radio] Cannot open {}: {}", self.device.display(), e);
                ERR_CHIP_NOT_FOUND
            }
        }
    }

    fn set_receive_pipe(&mut self, pipe: u8, address: &[u8; ADDRESS_WIDTH]) -> StatusCode {
        if pipe > MAX_PIPE {
            return ERR_INVALID_PIPE_NUMBER;
        }
        debug!("[radio] Pipe {} address {}", pipe, format_address(address));
        ERR_NONE
    }

    fn set_packet_received_action(&mut self, flag: Arc<PendingFlag>) {
        if let Ok(mut action) = self.shared.action.lock() {
            *action = Some(flag);
        }
    }

    fn start_receive(&mut self) -> StatusCode {
        self.shared.listening.store(true, Ordering::Release);

        // The reader starts on first listen so no line is consumed unarmed
        if self.reader.is_none() {
            return match self.port.take() {
                Some(port) => self.spawn_reader(tokio::fs::File::from_std(port)),
                None => ERR_CHIP_NOT_FOUND,
            };
        }
        if self.reader.as_ref().map_or(false, |r| r.is_finished()) {
            error!("[radio] Reader for {} has stopped", self.device.display());
            return ERR_CHIP_NOT_FOUND;
        }
        ERR_NONE
    }

    fn read_data(&mut self) -> (String, StatusCode) {
        let packet = match self.shared.packet.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };

        match packet {
            Some(RawPacket {
                payload,
                too_long: true,
            }) => (payload, ERR_PACKET_TOO_LONG),
            Some(RawPacket { payload, .. }) => (payload, ERR_NONE),
            None => (String::new(), ERR_NONE),
        }
    }
}

impl Drop for SerialRadio {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}
