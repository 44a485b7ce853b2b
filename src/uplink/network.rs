/// Wi-Fi connectivity through the host's network stack
use log::{debug, info, warn};
use std::path::PathBuf;
use tokio::process::Command;
use tokio::time::{sleep, Duration};

use crate::uplink::Network;

const SYSFS_NET: &str = "/sys/class/net";
const CONNECT_POLL_SECS: u64 = 1;
const CONNECT_LOG_EVERY: u32 = 10; // polls between progress messages

/// Network interface whose link state decides connectivity
///
/// When `managed` is set, `connect` asks NetworkManager (`nmcli`) to
/// associate; otherwise association is left to the OS and `connect` only
/// waits for the link to come up.
pub struct InterfaceNetwork {
    interface: String,
    managed: bool,
    sysfs_root: PathBuf,
}

impl InterfaceNetwork {
    pub fn new(interface: &str, managed: bool) -> Self {
        InterfaceNetwork {
            interface: interface.to_string(),
            managed,
            sysfs_root: PathBuf::from(SYSFS_NET),
        }
    }

    /// Read link state below `root` instead of `/sys/class/net`
    pub fn with_sysfs_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sysfs_root = root.into();
        self
    }

    fn operstate(&self) -> Option<String> {
        let path = self.sysfs_root.join(&self.interface).join("operstate");
        std::fs::read_to_string(path)
            .ok()
            .map(|state| state.trim().to_string())
    }

    async fn associate(&self, ssid: &str, password: &str) {
        let mut command = Command::new("nmcli");
        command.args(["device", "wifi", "connect", ssid]);
        if !password.is_empty() {
            command.args(["password", password]);
        }
        command.args(["ifname", self.interface.as_str()]);

        match command.output().await {
            Ok(output) if output.status.success() => {
                debug!("nmcli: {}", String::from_utf8_lossy(&output.stdout).trim());
            }
            Ok(output) => warn!(
                "nmcli exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Err(e) => warn!("Failed to run nmcli: {}", e),
        }
    }
}

impl Network for InterfaceNetwork {
    fn is_connected(&self) -> bool {
        self.operstate().as_deref() == Some("up")
    }

    async fn connect(&mut self, ssid: &str, password: &str) {
        info!("Connecting to WiFi '{}' on {} ..", ssid, self.interface);
        if self.managed {
            self.associate(ssid, password).await;
        }

        let mut polls: u32 = 0;
        while !self.is_connected() {
            polls += 1;
            if polls % CONNECT_LOG_EVERY == 0 {
                info!(
                    "Still waiting for {} ({}s, state {:?})",
                    self.interface,
                    polls as u64 * CONNECT_POLL_SECS,
                    self.operstate()
                );
            }
            sleep(Duration::from_secs(CONNECT_POLL_SECS)).await;
        }

        info!("WiFi connected on {}", self.interface);
    }
}
