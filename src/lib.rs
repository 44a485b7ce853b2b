//! Gateway between a packet radio sensor network and a cloud ingestion
//! endpoint.
//!
//! Frames received on the radio are decoded into [`models::SensorReading`]s,
//! encoded as a GET request URL and forwarded over HTTPS, one packet at a
//! time. See [`gateway::Gateway`] for the per-packet cycle.

pub mod config;
pub mod gateway;
pub mod models;
pub mod radio;
pub mod uplink;
pub mod utils;
