use crate::domain::air_quality::{AirQualityBand, AirQualityScale, InvalidScale};
use crate::domain::pollutant::{
    default_threshold_table, Breakpoints, InvalidThresholds, PollutantThresholds,
};
use crate::domain::reading::{ReadingField, UnknownField};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Thresholds(#[from] InvalidThresholds),
    #[error(transparent)]
    Scale(#[from] InvalidScale),
    #[error("chart {title}: {source}")]
    ChartField { title: String, source: UnknownField },
    #[error("invalid listen address {0}")]
    ListenAddr(String),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Deserialize, Clone)]
pub struct FirebaseConfig {
    pub firebase: FirebaseSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FirebaseSettings {
    pub api_key: String,
    pub database_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_readings_root")]
    pub readings_root: String,
}

fn default_auth_url() -> String {
    "https://identitytoolkit.googleapis.com".to_string()
}

fn default_readings_root() -> String {
    "air_quality_data".to_string()
}

/// Dashboard tables and layout as read from disk. Every key is optional.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub server: ServerConfig,
    pub transmitters: Vec<u32>,
    pub history_limit: usize,
    pub table_rows: usize,
    pub poll_interval_secs: u64,
    pub default_thresholds: Breakpoints,
    pub thresholds: HashMap<String, Breakpoints>,
    pub air_quality_bands: Vec<AirQualityBand>,
    pub charts: Vec<ChartConfig>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub field: String,
    pub title: String,
    pub color: String,
    #[serde(default)]
    pub unit: String,
}

impl ChartConfig {
    fn new(field: &str, title: &str, color: &str, unit: &str) -> Self {
        Self {
            field: field.to_string(),
            title: title.to_string(),
            color: color.to_string(),
            unit: unit.to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            transmitters: vec![101, 102, 103],
            history_limit: 100,
            table_rows: 10,
            poll_interval_secs: 30,
            default_thresholds: Breakpoints::default(),
            thresholds: default_threshold_table(),
            air_quality_bands: AirQualityScale::default().bands().to_vec(),
            charts: vec![
                ChartConfig::new("temperature", "Temperature", "#ef4444", "°C"),
                ChartConfig::new("humidity", "Humidity", "#3b82f6", "%"),
                ChartConfig::new("h2s_ppm", "Hydrogen Sulfide", "#8b5cf6", " ppm"),
                ChartConfig::new("ch4_ppm", "Methane", "#ec4899", " ppm"),
                ChartConfig::new("nh3_ppm", "Ammonia", "#14b8a6", " ppm"),
                ChartConfig::new("co_ppm", "Carbon Monoxide", "#f59e0b", " ppm"),
                ChartConfig::new("no2_ppm", "Nitrogen Dioxide", "#10b981", " ppm"),
                ChartConfig::new("so2_ppm", "Sulfur Dioxide", "#6366f1", " ppm"),
                ChartConfig::new("benzene_ppm", "Benzene", "#d946ef", " ppm"),
                ChartConfig::new("smoke_ppm", "Smoke", "#64748b", " ppm"),
                ChartConfig::new("air_quality", "Air Quality Index", "#0ea5e9", ""),
            ],
        }
    }
}

/// Validated, immutable dashboard settings shared by every request.
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub listen_addr: SocketAddr,
    pub transmitters: Vec<u32>,
    pub history_limit: usize,
    pub table_rows: usize,
    pub poll_interval: Duration,
    pub scale: AirQualityScale,
    pub thresholds: PollutantThresholds,
    pub charts: Vec<ChartSpec>,
}

#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub field: ReadingField,
    pub title: String,
    pub color: String,
    pub unit: String,
}

impl DashboardConfig {
    pub fn validate(self) -> Result<DashboardSettings, ConfigError> {
        let listen_addr = self
            .server
            .listen_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::ListenAddr(self.server.listen_addr.clone()))?;

        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Zero("poll_interval_secs"));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Zero("history_limit"));
        }

        let charts = self
            .charts
            .into_iter()
            .map(|c| {
                let field = c.field.parse::<ReadingField>().map_err(|source| ConfigError::ChartField {
                    title: c.title.clone(),
                    source,
                })?;
                Ok(ChartSpec {
                    field,
                    title: c.title,
                    color: c.color,
                    unit: c.unit,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(DashboardSettings {
            listen_addr,
            transmitters: self.transmitters,
            history_limit: self.history_limit,
            table_rows: self.table_rows,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            scale: AirQualityScale::new(self.air_quality_bands)?,
            thresholds: PollutantThresholds::new(self.thresholds, self.default_thresholds)?,
            charts,
        })
    }
}

pub fn load_firebase_config() -> anyhow::Result<FirebaseConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/firebase"))
        .add_source(config::Environment::with_prefix("IOTWEB").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardSettings> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .build()?;

    let dashboard: DashboardConfig = settings.try_deserialize()?;
    Ok(dashboard.validate()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> DashboardConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_validate() {
        let settings = DashboardConfig::default().validate().unwrap();

        assert_eq!(settings.transmitters, vec![101, 102, 103]);
        assert_eq!(settings.poll_interval, Duration::from_secs(30));
        assert_eq!(settings.listen_addr.port(), 8080);
        assert_eq!(settings.charts.len(), 11);
        assert_eq!(settings.scale, AirQualityScale::default());
        assert_eq!(settings.thresholds, PollutantThresholds::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = from_toml("");
        assert_eq!(config.history_limit, 100);
        assert_eq!(config.table_rows, 10);
        assert_eq!(config.charts.len(), 11);
    }

    #[test]
    fn test_overrides() {
        let config = from_toml(
            r##"
            transmitters = [201]
            poll_interval_secs = 10

            [thresholds.h2s_ppm]
            good = 1.0
            moderate = 5.0
            unhealthy = 10.0
            severe = 20.0

            [[charts]]
            field = "h2s_ppm"
            title = "Hydrogen Sulfide"
            color = "#8b5cf6"
            unit = " ppm"
            "##,
        );

        let settings = config.validate().unwrap();
        assert_eq!(settings.transmitters, vec![201]);
        assert_eq!(settings.poll_interval, Duration::from_secs(10));
        assert_eq!(settings.charts.len(), 1);
        assert_eq!(settings.charts[0].field, ReadingField::H2s);
        assert_eq!(settings.thresholds.breakpoints("h2s_ppm").good, 1.0);
        // co is no longer listed once the table is replaced
        assert_eq!(settings.thresholds.breakpoints("co_ppm"), &Breakpoints::default());
    }

    #[test]
    fn test_rejects_bad_tables() {
        let mut config = DashboardConfig::default();
        config
            .thresholds
            .insert("co_ppm".to_string(), Breakpoints::new(30.0, 15.0, 9.0, 50.0));
        assert!(matches!(config.validate(), Err(ConfigError::Thresholds(_))));

        let mut config = DashboardConfig::default();
        config.air_quality_bands.pop();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Scale(InvalidScale::ClosedLastBand { .. }))
        ));

        let mut config = DashboardConfig::default();
        config.charts.push(ChartConfig::new("pm25", "PM2.5", "#000", ""));
        assert!(matches!(config.validate(), Err(ConfigError::ChartField { .. })));

        let mut config = DashboardConfig::default();
        config.poll_interval_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Zero("poll_interval_secs"))));

        let mut config = DashboardConfig::default();
        config.server.listen_addr = "not-an-address".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ListenAddr(_))));
    }
}
