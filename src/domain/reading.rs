// Reading domain model
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// One timestamped sample from a transmitter.
///
/// Every field may be absent in the store. Numeric fields accept either JSON
/// numbers or numeric strings. A blank string decodes to 0 and any other
/// string that does not parse decodes to NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Store key, attached after decoding.
    #[serde(default, skip_deserializing)]
    pub id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "number_like")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "number_like")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "number_like")]
    pub nh3_ppm: Option<f64>,
    #[serde(default, deserialize_with = "number_like")]
    pub so2_ppm: Option<f64>,
    #[serde(default, deserialize_with = "number_like")]
    pub no2_ppm: Option<f64>,
    #[serde(default, deserialize_with = "number_like")]
    pub benzene_ppm: Option<f64>,
    #[serde(default, deserialize_with = "number_like")]
    pub co_ppm: Option<f64>,
    #[serde(default, deserialize_with = "number_like")]
    pub h2s_ppm: Option<f64>,
    #[serde(default, deserialize_with = "number_like")]
    pub ch4_ppm: Option<f64>,
    #[serde(default, deserialize_with = "number_like")]
    pub smoke_ppm: Option<f64>,
    #[serde(default, deserialize_with = "number_like")]
    pub alcohol_ppm: Option<f64>,
    #[serde(default, deserialize_with = "number_like")]
    pub air_quality: Option<f64>,
}

impl Reading {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn get(&self, field: ReadingField) -> Option<f64> {
        match field {
            ReadingField::Temperature => self.temperature,
            ReadingField::Humidity => self.humidity,
            ReadingField::Nh3 => self.nh3_ppm,
            ReadingField::So2 => self.so2_ppm,
            ReadingField::No2 => self.no2_ppm,
            ReadingField::Benzene => self.benzene_ppm,
            ReadingField::Co => self.co_ppm,
            ReadingField::H2s => self.h2s_ppm,
            ReadingField::Ch4 => self.ch4_ppm,
            ReadingField::Smoke => self.smoke_ppm,
            ReadingField::Alcohol => self.alcohol_ppm,
            ReadingField::AirQuality => self.air_quality,
        }
    }

    /// Look a field up by its stored name. Unknown names read as absent.
    pub fn value_of(&self, field: &str) -> Option<f64> {
        field.parse().ok().and_then(|f| self.get(f))
    }
}

/// Numeric fields of a reading, named as they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingField {
    Temperature,
    Humidity,
    Nh3,
    So2,
    No2,
    Benzene,
    Co,
    H2s,
    Ch4,
    Smoke,
    Alcohol,
    AirQuality,
}

impl ReadingField {
    pub const ALL: [ReadingField; 12] = [
        ReadingField::Temperature,
        ReadingField::Humidity,
        ReadingField::Nh3,
        ReadingField::So2,
        ReadingField::No2,
        ReadingField::Benzene,
        ReadingField::Co,
        ReadingField::H2s,
        ReadingField::Ch4,
        ReadingField::Smoke,
        ReadingField::Alcohol,
        ReadingField::AirQuality,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingField::Temperature => "temperature",
            ReadingField::Humidity => "humidity",
            ReadingField::Nh3 => "nh3_ppm",
            ReadingField::So2 => "so2_ppm",
            ReadingField::No2 => "no2_ppm",
            ReadingField::Benzene => "benzene_ppm",
            ReadingField::Co => "co_ppm",
            ReadingField::H2s => "h2s_ppm",
            ReadingField::Ch4 => "ch4_ppm",
            ReadingField::Smoke => "smoke_ppm",
            ReadingField::Alcohol => "alcohol_ppm",
            ReadingField::AirQuality => "air_quality",
        }
    }
}

impl fmt::Display for ReadingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reading field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for ReadingField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReadingField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(f64),
    Text(String),
}

fn number_like<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberLike>::deserialize(deserializer)?;
    Ok(raw.map(|v| match v {
        NumberLike::Number(n) => n,
        NumberLike::Text(s) => match s.trim() {
            "" => 0.0,
            text => text.parse().unwrap_or(f64::NAN),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_partial_reading() {
        let json = r#"{"timestamp":"2024-05-01_13:45:00","temperature":24.5,"co_ppm":"3.25"}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();

        assert_eq!(reading.timestamp.as_deref(), Some("2024-05-01_13:45:00"));
        assert_eq!(reading.temperature, Some(24.5));
        assert_eq!(reading.co_ppm, Some(3.25));
        assert_eq!(reading.humidity, None);
        assert_eq!(reading.air_quality, None);
        assert!(reading.id.is_empty());
    }

    #[test]
    fn test_decode_null_and_garbage() {
        let json = r#"{"humidity":null,"smoke_ppm":"n/a","co_ppm":"","so2_ppm":"  "}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();

        assert_eq!(reading.humidity, None);
        assert!(reading.smoke_ppm.unwrap().is_nan());
        assert_eq!(reading.co_ppm, Some(0.0));
        assert_eq!(reading.so2_ppm, Some(0.0));
    }

    #[test]
    fn test_field_lookup() {
        let reading = Reading {
            h2s_ppm: Some(0.4),
            ..Default::default()
        };

        assert_eq!(reading.value_of("h2s_ppm"), Some(0.4));
        assert_eq!(reading.value_of("ch4_ppm"), None);
        assert_eq!(reading.value_of("no_such_field"), None);
        assert_eq!("air_quality".parse::<ReadingField>(), Ok(ReadingField::AirQuality));
        assert!("pm25".parse::<ReadingField>().is_err());
    }
}
