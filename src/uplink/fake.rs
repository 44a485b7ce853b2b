/// In-memory network and HTTPS capabilities used by the unit tests
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::uplink::{HttpError, HttpResponse, HttpsClient, Network};

pub struct FakeNetwork {
    connected: AtomicBool,
    connect_calls: Mutex<Vec<(String, String)>>,
}

impl FakeNetwork {
    pub fn up() -> Self {
        Self::with_state(true)
    }

    pub fn down() -> Self {
        Self::with_state(false)
    }

    fn with_state(connected: bool) -> Self {
        FakeNetwork {
            connected: AtomicBool::new(connected),
            connect_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn connect_calls(&self) -> Vec<(String, String)> {
        self.connect_calls.lock().unwrap().clone()
    }
}

impl Network for FakeNetwork {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn connect(&mut self, ssid: &str, password: &str) {
        self.connect_calls
            .lock()
            .unwrap()
            .push((ssid.to_string(), password.to_string()));
        self.set_connected(true);
    }
}

/// HTTPS client answering every request with the same scripted result
pub struct FakeHttps {
    response: Result<HttpResponse, HttpError>,
    requests: Mutex<Vec<String>>,
}

impl FakeHttps {
    pub fn responding(response: Result<HttpResponse, HttpError>) -> Self {
        FakeHttps {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(status: u16, body: &str) -> Self {
        Self::responding(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }))
    }

    pub fn failing(error: HttpError) -> Self {
        Self::responding(Err(error))
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpsClient for FakeHttps {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.response.clone()
    }
}
