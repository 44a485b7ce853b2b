use log::{error, info};

use radio_uplink_gateway::config::GatewayConfig;
use radio_uplink_gateway::gateway::{Gateway, PipelineSettings};
use radio_uplink_gateway::radio::{InitError, Receiver, SerialRadio, RECEIVE_PIPE};
use radio_uplink_gateway::uplink::{InterfaceNetwork, Network, ReqwestClient, UplinkSender};

/// Stop the process after a radio initialization failure
///
/// A gateway without a working receiver must not keep running as if it were
/// healthy; it needs someone to look at the hardware.
fn halt(e: InitError) -> ! {
    error!("Unrecoverable radio failure: {}", e);
    error!("Halting, human intervention required");
    log::Log::flush(log::logger());
    std::process::abort();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match GatewayConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };
    info!(
        "Station {} using {:?} schema, radio on {}",
        config.station_id,
        config.schema,
        config.radio_device.display()
    );

    let radio = SerialRadio::new(&config.radio_device);
    let receiver = match Receiver::init(radio, RECEIVE_PIPE, config.radio_address) {
        Ok(receiver) => receiver,
        Err(e) => halt(e),
    };

    let mut network = InterfaceNetwork::new(&config.wifi_interface, config.wifi_managed);
    network
        .connect(&config.wifi_ssid, &config.wifi_password)
        .await;

    let client = ReqwestClient::new(config.tls_insecure)?;
    let mut gateway = Gateway::new(
        receiver,
        UplinkSender::new(network, client),
        PipelineSettings::from(&config),
    );

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        let _ = tx.send(());
    });

    // Run the gateway until shutdown signal
    tokio::select! {
        _ = gateway.run() => {}
        _ = &mut rx => {
            info!("Gateway terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
