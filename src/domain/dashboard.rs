// Display-ready dashboard models
use super::pollutant::PollutantLevel;
use super::transmitter::Transmitter;
use serde::Serialize;

/// Summary card for the most recent reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityCard {
    pub reading_id: String,
    pub timestamp: String,
    pub air_quality: String,
    pub color: String,
    pub label: String,
    /// Share of the gauge scale covered by the index; not clamped.
    pub gauge_fraction: Option<f64>,
    pub temperature: String,
    pub humidity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(label: String, value: f64) -> Self {
        Self { label, value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorChart {
    pub field: String,
    pub title: String,
    pub color: String,
    pub unit: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantCell {
    pub pollutant: String,
    pub value: String,
    pub level: PollutantLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingRow {
    pub id: String,
    pub timestamp: String,
    pub pollutants: Vec<PollutantCell>,
    pub air_quality: String,
    pub air_quality_color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub transmitter: Transmitter,
    pub latest: Option<AirQualityCard>,
    pub charts: Vec<SensorChart>,
    pub recent: Vec<ReadingRow>,
}

/// One result of the periodic latest-reading poll.
#[derive(Debug, Clone, Serialize)]
pub struct LatestUpdate {
    pub sequence: u64,
    pub transmitter_id: u32,
    pub latest: Option<AirQualityCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
