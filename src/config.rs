use std::env;
use std::path::PathBuf;

use crate::models::SchemaVariant;
use crate::radio::ADDRESS_WIDTH;
use crate::utils::parse_address;

const DEFAULT_WIFI_INTERFACE: &str = "wlan0";
const DEFAULT_RADIO_DEVICE: &str = "/dev/ttyUSB0";
const DEFAULT_RADIO_ADDRESS: [u8; ADDRESS_WIDTH] = [0x01, 0x23, 0x45, 0x67, 0x89];

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub wifi_ssid: String,
    pub wifi_password: String,
    pub wifi_interface: String,
    /// Ask NetworkManager to associate instead of waiting for the OS
    pub wifi_managed: bool,
    pub endpoint_url: String,
    pub station_id: i32,
    pub schema: SchemaVariant,
    /// Node id reported for frames of the compact schema
    pub fixed_node_id: i32,
    pub strict_decode: bool,
    /// Skip server certificate validation on the uplink
    pub tls_insecure: bool,
    pub radio_device: PathBuf,
    pub radio_address: [u8; ADDRESS_WIDTH],
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("{} must be true or false, got '{}'", key, other)),
    }
}

fn parse_i32(key: &str, value: &str) -> Result<i32, String> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("{} must be an integer, got '{}'", key, value))
}

impl GatewayConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| format!("{} environment variable not set", key))
        };

        let wifi_ssid = required("WIFI_SSID")?;
        let wifi_password = required("WIFI_PASSWORD")?;
        let endpoint_url = required("ENDPOINT_URL")?;

        let wifi_interface =
            lookup("WIFI_INTERFACE").unwrap_or_else(|| DEFAULT_WIFI_INTERFACE.to_string());
        let wifi_managed = match lookup("WIFI_MANAGED") {
            Some(value) => parse_bool("WIFI_MANAGED", &value)?,
            None => true,
        };

        let station_id = match lookup("STATION_ID") {
            Some(value) => parse_i32("STATION_ID", &value)?,
            None => 1,
        };
        let schema = match lookup("SCHEMA_VARIANT") {
            Some(value) => value
                .parse::<SchemaVariant>()
                .map_err(|e| format!("SCHEMA_VARIANT: {}", e))?,
            None => SchemaVariant::Full,
        };
        let fixed_node_id = match lookup("FIXED_NODE_ID") {
            Some(value) => parse_i32("FIXED_NODE_ID", &value)?,
            None => 1,
        };
        let strict_decode = match lookup("STRICT_DECODE") {
            Some(value) => parse_bool("STRICT_DECODE", &value)?,
            None => false,
        };
        let tls_insecure = match lookup("TLS_INSECURE") {
            Some(value) => parse_bool("TLS_INSECURE", &value)?,
            None => true,
        };

        let radio_device = lookup("RADIO_DEVICE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RADIO_DEVICE));
        let radio_address = match lookup("RADIO_ADDRESS") {
            Some(value) => parse_address(&value).map_err(|e| format!("RADIO_ADDRESS: {}", e))?,
            None => DEFAULT_RADIO_ADDRESS,
        };

        let config = GatewayConfig {
            wifi_ssid,
            wifi_password,
            wifi_interface,
            wifi_managed,
            endpoint_url,
            station_id,
            schema,
            fixed_node_id,
            strict_decode,
            tls_insecure,
            radio_device,
            radio_address,
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.wifi_ssid.trim().is_empty() {
            return Err("WIFI_SSID must not be empty".into());
        }

        let endpoint = url::Url::parse(&self.endpoint_url)
            .map_err(|e| format!("ENDPOINT_URL '{}' is invalid: {}", self.endpoint_url, e))?;
        if endpoint.scheme() != "https" && endpoint.scheme() != "http" {
            return Err(format!(
                "ENDPOINT_URL '{}' must start with http:// or https://",
                self.endpoint_url
            ));
        }
        if endpoint.query().is_some() {
            return Err(format!(
                "ENDPOINT_URL '{}' must not contain a query string",
                self.endpoint_url
            ));
        }

        Ok(())
    }
}
