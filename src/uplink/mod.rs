pub mod client;
pub mod network;
pub mod request;
pub mod sender;

#[cfg(test)]
pub mod fake;

use std::future::Future;
use thiserror::Error;

pub use client::ReqwestClient;
pub use network::InterfaceNetwork;
pub use request::build_request_url;
pub use sender::{UplinkOutcome, UplinkSender};

/// Status line and body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Failure below the HTTP layer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpError {
    /// Connection to the server could not be established
    #[error("Unable to connect: {0}")]
    Connect(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Link-layer connectivity of the gateway
pub trait Network {
    fn is_connected(&self) -> bool;

    /// Associate with `ssid`, waiting as long as it takes.
    fn connect(&mut self, ssid: &str, password: &str) -> impl Future<Output = ()>;
}

/// HTTPS capability used by the uplink
pub trait HttpsClient {
    /// Issue a single GET, no retries.
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, HttpError>>;
}
