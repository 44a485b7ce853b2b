/// Telemetry frame decoding
use thiserror::Error;

use crate::models::{Field, FieldKind, SchemaVariant, SensorReading};
use crate::utils::{parse_float_lenient, parse_int_lenient};

/// Frame rejected by strict decoding
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("Expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("Field {field} is not a valid number: '{value}'")]
    InvalidField { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy)]
enum Value {
    Integer(i32),
    Float(f32),
}

impl Value {
    fn as_int(self) -> i32 {
        match self {
            Value::Integer(v) => v,
            Value::Float(v) => v as i32,
        }
    }

    fn as_float(self) -> f32 {
        match self {
            Value::Integer(v) => v as f32,
            Value::Float(v) => v,
        }
    }
}

fn assign(reading: &mut SensorReading, field: Field, value: Value) {
    match field {
        Field::NodeId => reading.node_id = value.as_int(),
        Field::Temperature => reading.temperature = value.as_float(),
        Field::Humidity => reading.humidity = value.as_float(),
        Field::Rain => reading.rain = value.as_int(),
        Field::SoilMoisture => reading.soil_moisture = value.as_int(),
        Field::Co => {
            if let Some(air) = reading.air_quality.as_mut() {
                air.co = value.as_int();
            }
        }
        Field::Dust => {
            if let Some(air) = reading.air_quality.as_mut() {
                air.dust = value.as_int();
            }
        }
    }
}

/// Decode a comma separated frame into a sensor reading
///
/// The frame is split into exactly as many segments as the schema has
/// fields; the last segment runs to the end of the input. Each segment is
/// parsed with the best-effort rules of [`parse_int_lenient`] and
/// [`parse_float_lenient`]:
/// - text that is not a number becomes 0
/// - segments missing because the frame has too few commas become 0
///
/// Decoding never fails. For the compact schema `fixed_node_id` is used as
/// the node id, the full schema reads it from the first segment.
pub fn decode(frame: &str, variant: SchemaVariant, fixed_node_id: i32) -> SensorReading {
    let fields = variant.fields();
    let mut reading = SensorReading::zeroed(fixed_node_id, variant);
    let mut segments = frame.splitn(fields.len(), ',');

    for field in fields {
        let segment = segments.next().unwrap_or("");
        let value = match field.kind() {
            FieldKind::Integer => Value::Integer(parse_int_lenient(segment)),
            FieldKind::Float => Value::Float(parse_float_lenient(segment)),
        };
        assign(&mut reading, *field, value);
    }

    reading
}

/// Decode a frame, rejecting anything that is not exactly well formed
///
/// Requires one segment per schema field and every segment to be a complete
/// number of the field's type. Surrounding whitespace is ignored.
pub fn decode_strict(
    frame: &str,
    variant: SchemaVariant,
    fixed_node_id: i32,
) -> Result<SensorReading, DecodeError> {
    let fields = variant.fields();
    let segments: Vec<&str> = frame.split(',').collect();
    if segments.len() != fields.len() {
        return Err(DecodeError::FieldCount {
            expected: fields.len(),
            found: segments.len(),
        });
    }

    let mut reading = SensorReading::zeroed(fixed_node_id, variant);
    for (field, segment) in fields.iter().zip(segments) {
        let text = segment.trim();
        let value = match field.kind() {
            FieldKind::Integer => text.parse::<i32>().ok().map(Value::Integer),
            FieldKind::Float => text
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Float),
        };

        match value {
            Some(value) => assign(&mut reading, *field, value),
            None => {
                return Err(DecodeError::InvalidField {
                    field: field.name(),
                    value: segment.to_string(),
                })
            }
        }
    }

    Ok(reading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AirQuality;

    #[test]
    fn test_decode_full_frame() {
        let reading = decode("1,23.70,65.40,0,512,120,35", SchemaVariant::Full, 9);
        assert_eq!(
            reading,
            SensorReading {
                node_id: 1,
                temperature: 23.70,
                humidity: 65.40,
                rain: 0,
                soil_moisture: 512,
                air_quality: Some(AirQuality { co: 120, dust: 35 }),
            }
        );
    }

    #[test]
    fn test_decode_compact_frame_uses_fixed_node_id() {
        let reading = decode("23.70,65.40,1,300", SchemaVariant::Compact, 4);
        assert_eq!(reading.node_id, 4);
        assert_eq!(reading.temperature, 23.70);
        assert_eq!(reading.humidity, 65.40);
        assert_eq!(reading.rain, 1);
        assert_eq!(reading.soil_moisture, 300);
        assert_eq!(reading.air_quality, None);
    }

    #[test]
    fn test_missing_trailing_fields_are_zero() {
        let reading = decode("7,19.5,40", SchemaVariant::Full, 1);
        assert_eq!(reading.node_id, 7);
        assert_eq!(reading.temperature, 19.5);
        assert_eq!(reading.humidity, 40.0);
        assert_eq!(reading.rain, 0);
        assert_eq!(reading.soil_moisture, 0);
        assert_eq!(reading.air_quality, Some(AirQuality { co: 0, dust: 0 }));

        let empty = decode("", SchemaVariant::Compact, 1);
        assert_eq!(empty, SensorReading::zeroed(1, SchemaVariant::Compact));
    }

    #[test]
    fn test_non_numeric_segments_are_zero() {
        let reading = decode("x,warm,65.4,?,512,,35", SchemaVariant::Full, 1);
        assert_eq!(reading.node_id, 0);
        assert_eq!(reading.temperature, 0.0);
        assert_eq!(reading.humidity, 65.4);
        assert_eq!(reading.rain, 0);
        assert_eq!(reading.soil_moisture, 512);
        assert_eq!(reading.air_quality, Some(AirQuality { co: 0, dust: 35 }));
    }

    #[test]
    fn test_last_segment_runs_to_end_of_frame() {
        // Extra commas end up in the last segment, whose numeric prefix wins
        let reading = decode("23.70,65.40,0,512,99,100", SchemaVariant::Compact, 1);
        assert_eq!(reading.soil_moisture, 512);

        let reading = decode("1,23.70,65.40,0,512,120,35\r\n", SchemaVariant::Full, 1);
        assert_eq!(reading.air_quality, Some(AirQuality { co: 120, dust: 35 }));
    }

    #[test]
    fn test_integer_field_truncates_decimal_text() {
        let reading = decode("2.9,1,1,1.5", SchemaVariant::Compact, 1);
        assert_eq!(reading.temperature, 2.9);
        assert_eq!(reading.soil_moisture, 1);
    }

    #[test]
    fn test_strict_accepts_well_formed_frame() {
        let strict = decode_strict("1,23.70,65.40,0,512,120,35", SchemaVariant::Full, 1);
        let lenient = decode("1,23.70,65.40,0,512,120,35", SchemaVariant::Full, 1);
        assert_eq!(strict, Ok(lenient));

        assert!(decode_strict(" 23.7 , 65.4 ,0, 512\n", SchemaVariant::Compact, 1).is_ok());
    }

    #[test]
    fn test_strict_rejects_wrong_field_count() {
        assert_eq!(
            decode_strict("7,19.5,40", SchemaVariant::Full, 1),
            Err(DecodeError::FieldCount {
                expected: 7,
                found: 3
            })
        );
        assert_eq!(
            decode_strict("1,2,3,4,5", SchemaVariant::Compact, 1),
            Err(DecodeError::FieldCount {
                expected: 4,
                found: 5
            })
        );
    }

    #[test]
    fn test_strict_rejects_invalid_numbers() {
        assert_eq!(
            decode_strict("23.7,65.4,0,12abc", SchemaVariant::Compact, 1),
            Err(DecodeError::InvalidField {
                field: "soilMoisture",
                value: "12abc".to_string()
            })
        );
        assert!(matches!(
            decode_strict("1,nan,65.4,0,512,120,35", SchemaVariant::Full, 1),
            Err(DecodeError::InvalidField {
                field: "temperature",
                ..
            })
        ));
        assert!(decode_strict("1.5,23.7,65.4,0,512,120,35", SchemaVariant::Full, 1).is_err());
    }
}
