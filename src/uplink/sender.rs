/// Forwarding of encoded readings to the ingestion endpoint
use log::{error, info, warn};
use std::fmt;
use url::Url;

use crate::uplink::{HttpError, HttpsClient, Network};

const HTTP_CODE_OK: u16 = 200;
const HTTP_CODE_MOVED_PERMANENTLY: u16 = 301;

/// Result of one uplink attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UplinkOutcome {
    /// Server answered with this HTTP status
    Sent(u16),
    /// No network, nothing was attempted
    NetworkUnavailable,
    ConnectFailed(String),
    TransportError(String),
}

impl UplinkOutcome {
    /// Whether the server accepted the request and returned a body
    pub fn is_delivered(&self) -> bool {
        matches!(
            self,
            UplinkOutcome::Sent(HTTP_CODE_OK) | UplinkOutcome::Sent(HTTP_CODE_MOVED_PERMANENTLY)
        )
    }
}

impl fmt::Display for UplinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UplinkOutcome::Sent(status) => write!(f, "GET... code: {}", status),
            UplinkOutcome::NetworkUnavailable => write!(f, "network unavailable"),
            UplinkOutcome::ConnectFailed(detail) => write!(f, "Unable to connect: {}", detail),
            UplinkOutcome::TransportError(detail) => {
                write!(f, "GET... failed, error: {}", detail)
            }
        }
    }
}

/// Sends request URLs through the HTTPS capability
///
/// There is no retry and no queueing: a failed send is reported and the
/// reading is gone.
pub struct UplinkSender<N, H> {
    network: N,
    client: H,
}

impl<N: Network, H: HttpsClient> UplinkSender<N, H> {
    pub fn new(network: N, client: H) -> Self {
        Self { network, client }
    }

    /// Send one request URL
    ///
    /// Returns immediately with [`UplinkOutcome::NetworkUnavailable`] when
    /// the network is down so the receive loop never waits on connectivity.
    pub async fn send(&self, url: &str) -> UplinkOutcome {
        if !self.network.is_connected() {
            warn!("[HTTPS] Network not connected, reading not sent");
            return UplinkOutcome::NetworkUnavailable;
        }

        info!("[HTTPS] begin...");
        if let Err(e) = Url::parse(url) {
            error!("[HTTPS] Unable to connect: {}", e);
            return UplinkOutcome::ConnectFailed(e.to_string());
        }

        info!("[HTTPS] GET...");
        match self.client.get(url).await {
            Ok(response) if response.status == 0 => {
                UplinkOutcome::TransportError("no status code received".to_string())
            }
            Ok(response) => {
                if matches!(response.status, HTTP_CODE_OK | HTTP_CODE_MOVED_PERMANENTLY) {
                    info!("[HTTPS] Response body: {}", response.body);
                }
                UplinkOutcome::Sent(response.status)
            }
            Err(HttpError::Connect(detail)) => UplinkOutcome::ConnectFailed(detail),
            Err(HttpError::Transport(detail)) => UplinkOutcome::TransportError(detail),
        }
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn client(&self) -> &H {
        &self.client
    }
}
