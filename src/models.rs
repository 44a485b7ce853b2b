/// Air quality block carried only by the full schema
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirQuality {
    pub co: i32,
    pub dust: i32,
}

/// One decoded telemetry frame from a sensor node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub node_id: i32,
    pub temperature: f32,
    pub humidity: f32,
    pub rain: i32,
    pub soil_moisture: i32,
    pub air_quality: Option<AirQuality>,
}

impl SensorReading {
    /// All-zero reading for the given node, the starting point of every decode
    pub fn zeroed(node_id: i32, variant: SchemaVariant) -> Self {
        SensorReading {
            node_id,
            temperature: 0.0,
            humidity: 0.0,
            rain: 0,
            soil_moisture: 0,
            air_quality: match variant {
                SchemaVariant::Full => Some(AirQuality { co: 0, dust: 0 }),
                SchemaVariant::Compact => None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
}

/// Positional fields of a wire frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    NodeId,
    Temperature,
    Humidity,
    Rain,
    SoilMoisture,
    Co,
    Dust,
}

impl Field {
    pub fn kind(self) -> FieldKind {
        match self {
            Field::Temperature | Field::Humidity => FieldKind::Float,
            _ => FieldKind::Integer,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::NodeId => "nodeID",
            Field::Temperature => "temperature",
            Field::Humidity => "humidity",
            Field::Rain => "rain",
            Field::SoilMoisture => "soilMoisture",
            Field::Co => "co",
            Field::Dust => "dust",
        }
    }
}

const FULL_FIELDS: [Field; 7] = [
    Field::NodeId,
    Field::Temperature,
    Field::Humidity,
    Field::Rain,
    Field::SoilMoisture,
    Field::Co,
    Field::Dust,
];

const COMPACT_FIELDS: [Field; 4] = [
    Field::Temperature,
    Field::Humidity,
    Field::Rain,
    Field::SoilMoisture,
];

/// Field layout a deployment's sensor nodes transmit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    /// `nodeID,temperature,humidity,rain,soilMoisture,co,dust`
    Full,
    /// `temperature,humidity,rain,soilMoisture`, node id fixed by configuration
    Compact,
}

impl SchemaVariant {
    /// Ordered field list, index `i` is the `i`-th comma separated segment
    pub fn fields(self) -> &'static [Field] {
        match self {
            SchemaVariant::Full => &FULL_FIELDS,
            SchemaVariant::Compact => &COMPACT_FIELDS,
        }
    }

    pub fn arity(self) -> usize {
        self.fields().len()
    }
}

impl std::str::FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "7" => Ok(SchemaVariant::Full),
            "compact" | "4" => Ok(SchemaVariant::Compact),
            other => Err(format!(
                "unknown schema variant '{}' (expected full/7 or compact/4)",
                other
            )),
        }
    }
}
