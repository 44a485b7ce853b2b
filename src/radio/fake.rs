/// Scripted radio used by the unit tests
use std::sync::{Arc, Mutex};

use crate::radio::status::ERR_NONE;
use crate::radio::{PendingFlag, Radio, StatusCode, ADDRESS_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioCall {
    Begin,
    SetReceivePipe(u8, [u8; ADDRESS_WIDTH]),
    SetPacketReceivedAction,
    StartReceive,
    ReadData,
}

#[derive(Default)]
struct Inner {
    calls: Vec<RadioCall>,
    flag: Option<Arc<PendingFlag>>,
    buffer: Option<(String, StatusCode)>,
    raise_during_read: Option<String>,
    flag_seen_by_reads: Vec<bool>,
}

/// Radio whose packets are injected by the test
///
/// `deliver` plays the role of the receive interrupt: it overwrites the
/// single packet buffer and raises the registered flag.
#[derive(Default)]
pub struct FakeRadio {
    begin_code: StatusCode,
    pipe_code: StatusCode,
    start_receive_code: StatusCode,
    inner: Mutex<Inner>,
}

impl FakeRadio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_begin_code(mut self, code: StatusCode) -> Self {
        self.begin_code = code;
        self
    }

    pub fn with_pipe_code(mut self, code: StatusCode) -> Self {
        self.pipe_code = code;
        self
    }

    pub fn with_start_receive_code(mut self, code: StatusCode) -> Self {
        self.start_receive_code = code;
        self
    }

    pub fn deliver(&self, payload: impl Into<String>, code: StatusCode) {
        let mut inner = self.inner.lock().unwrap();
        inner.buffer = Some((payload.into(), code));
        if let Some(flag) = &inner.flag {
            flag.raise();
        }
    }

    /// Deliver `payload` as a new packet in the middle of the next read
    pub fn raise_during_next_read(&self, payload: impl Into<String>) {
        self.inner.lock().unwrap().raise_during_read = Some(payload.into());
    }

    pub fn calls(&self) -> Vec<RadioCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn read_count(&self) -> usize {
        self.count(&RadioCall::ReadData)
    }

    pub fn start_receive_count(&self) -> usize {
        self.count(&RadioCall::StartReceive)
    }

    /// Value of the pending flag observed at the start of every read
    pub fn flag_seen_by_reads(&self) -> Vec<bool> {
        self.inner.lock().unwrap().flag_seen_by_reads.clone()
    }

    fn count(&self, call: &RadioCall) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| *c == call)
            .count()
    }
}

impl Radio for FakeRadio {
    fn begin(&mut self) -> StatusCode {
        self.inner.get_mut().unwrap().calls.push(RadioCall::Begin);
        self.begin_code
    }

    fn set_receive_pipe(&mut self, pipe: u8, address: &[u8; ADDRESS_WIDTH]) -> StatusCode {
        self.inner
            .get_mut()
            .unwrap()
            .calls
            .push(RadioCall::SetReceivePipe(pipe, *address));
        self.pipe_code
    }

    fn set_packet_received_action(&mut self, flag: Arc<PendingFlag>) {
        let inner = self.inner.get_mut().unwrap();
        inner.calls.push(RadioCall::SetPacketReceivedAction);
        inner.flag = Some(flag);
    }

    fn start_receive(&mut self) -> StatusCode {
        self.inner.get_mut().unwrap().calls.push(RadioCall::StartReceive);
        self.start_receive_code
    }

    fn read_data(&mut self) -> (String, StatusCode) {
        let inner = self.inner.get_mut().unwrap();
        inner.calls.push(RadioCall::ReadData);
        let seen = inner.flag.as_ref().map_or(false, |f| f.is_pending());
        inner.flag_seen_by_reads.push(seen);

        let packet = inner
            .buffer
            .take()
            .unwrap_or_else(|| (String::new(), ERR_NONE));

        if let Some(next) = inner.raise_during_read.take() {
            inner.buffer = Some((next, ERR_NONE));
            if let Some(flag) = &inner.flag {
                flag.raise();
            }
        }

        packet
    }
}
