/// Request URL encoding for the ingestion endpoint
use std::fmt::Write;

use crate::models::SensorReading;

/// Scale a measurement by 100 and drop the fraction
///
/// Truncates toward zero, so negative values round up (-1.239 -> -123).
/// Out of range values saturate.
pub fn scale_hundredths(value: f32) -> i32 {
    (value * 100.0) as i32
}

/// Build the GET URL carrying one reading
///
/// Parameters always come in the same order:
/// `stationID, nodeID, humidity, soil_moisture, rain, temperature`, followed
/// by `co, dust` when the reading has air quality data. Every value is an
/// integer so nothing needs percent-encoding.
pub fn build_request_url(base: &str, reading: &SensorReading, station_id: i32) -> String {
    let mut url = String::with_capacity(base.len() + 128);
    url.push_str(base);

    // Writing into a String cannot fail
    let _ = write!(
        url,
        "?stationID={}&nodeID={}&humidity={}&soil_moisture={}&rain={}&temperature={}",
        station_id,
        reading.node_id,
        scale_hundredths(reading.humidity),
        reading.soil_moisture,
        reading.rain,
        scale_hundredths(reading.temperature),
    );

    if let Some(air) = reading.air_quality {
        let _ = write!(url, "&co={}&dust={}", air.co, air.dust);
    }

    url
}
