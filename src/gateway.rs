/// Receive, decode and forward pipeline
use log::{debug, error, info, warn};
use tokio::time::{sleep, Duration};

use crate::config::GatewayConfig;
use crate::models::{SchemaVariant, SensorReading};
use crate::radio::{decode, decode_strict, DecodeError, Radio, RadioStatus, Receiver};
use crate::uplink::{build_request_url, HttpsClient, Network, UplinkOutcome, UplinkSender};

/// How often the idle loop looks at the pending flag
const POLL_INTERVAL_MS: u64 = 10;

/// Settings the pipeline needs for every frame
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub endpoint_url: String,
    pub station_id: i32,
    pub schema: SchemaVariant,
    pub fixed_node_id: i32,
    pub strict_decode: bool,
}

impl From<&GatewayConfig> for PipelineSettings {
    fn from(config: &GatewayConfig) -> Self {
        PipelineSettings {
            endpoint_url: config.endpoint_url.clone(),
            station_id: config.station_id,
            schema: config.schema,
            fixed_node_id: config.fixed_node_id,
            strict_decode: config.strict_decode,
        }
    }
}

/// What happened to one received packet
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub read_status: RadioStatus,
    pub reading: Option<SensorReading>,
    pub url: Option<String>,
    pub rearm_status: RadioStatus,
    /// `None` when the frame was rejected and nothing was sent
    pub uplink: Option<UplinkOutcome>,
}

pub struct Gateway<R, N, H> {
    receiver: Receiver<R>,
    uplink: UplinkSender<N, H>,
    settings: PipelineSettings,
}

impl<R: Radio, N: Network, H: HttpsClient> Gateway<R, N, H> {
    pub fn new(
        receiver: Receiver<R>,
        uplink: UplinkSender<N, H>,
        settings: PipelineSettings,
    ) -> Self {
        Gateway {
            receiver,
            uplink,
            settings,
        }
    }

    /// Run the pipeline, never returns
    pub async fn run(&mut self) {
        info!("Gateway listening for sensor frames");
        loop {
            if self.process_pending().await.is_none() {
                sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
            }
        }
    }

    fn decode(&self, payload: &str) -> Result<SensorReading, DecodeError> {
        let settings = &self.settings;
        if settings.strict_decode {
            decode_strict(payload, settings.schema, settings.fixed_node_id)
        } else {
            Ok(decode(payload, settings.schema, settings.fixed_node_id))
        }
    }

    /// Handle the pending packet, if there is one
    ///
    /// The receiver is re-armed right after the read status is reported and
    /// before the uplink is attempted, so no uplink result can keep the radio
    /// deaf. A slow uplink still delays the next poll.
    pub async fn process_pending(&mut self) -> Option<CycleReport> {
        let frame = self.receiver.poll()?;
        debug!("[radio] Received frame {:?}", frame.payload);

        let reading = match self.decode(&frame.payload) {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!("[radio] Frame {:?} rejected: {}", frame.payload, e);
                None
            }
        };

        let url = reading.as_ref().map(|reading| {
            build_request_url(&self.settings.endpoint_url, reading, self.settings.station_id)
        });
        if let Some(url) = &url {
            info!("{}", url);
        }

        if frame.status.is_success() {
            info!("[radio] Read {}", frame.status);
        } else {
            warn!("[radio] Read {}", frame.status);
        }

        let rearm_status = self.receiver.rearm();
        if !rearm_status.is_success() {
            error!("[radio] Returning to listen mode {}", rearm_status);
        }

        let uplink = match &url {
            Some(url) => {
                let outcome = self.uplink.send(url).await;
                report_uplink(&outcome);
                Some(outcome)
            }
            None => None,
        };

        Some(CycleReport {
            read_status: frame.status,
            reading,
            url,
            rearm_status,
            uplink,
        })
    }

    pub fn receiver(&self) -> &Receiver<R> {
        &self.receiver
    }

    pub fn uplink(&self) -> &UplinkSender<N, H> {
        &self.uplink
    }
}

fn report_uplink(outcome: &UplinkOutcome) {
    match outcome {
        UplinkOutcome::Sent(_) => info!("[HTTPS] {}", outcome),
        UplinkOutcome::NetworkUnavailable => warn!("[HTTPS] {}", outcome),
        UplinkOutcome::ConnectFailed(_) | UplinkOutcome::TransportError(_) => {
            error!("[HTTPS] {}", outcome)
        }
    }
}
