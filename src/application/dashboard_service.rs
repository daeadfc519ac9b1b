// Dashboard service - Use case for building dashboards
use crate::application::formatters::{format_date, format_value, prepare_chart_data, DEFAULT_PRECISION};
use crate::application::reading_repository::ReadingRepository;
use crate::domain::air_quality::AirQualityScale;
use crate::domain::dashboard::{AirQualityCard, Dashboard, PollutantCell, ReadingRow, SensorChart};
use crate::domain::pollutant::PollutantThresholds;
use crate::domain::reading::{Reading, ReadingField};
use crate::domain::session::Session;
use crate::domain::transmitter::Transmitter;
use crate::infrastructure::config::DashboardSettings;
use anyhow::Context;
use std::sync::Arc;

/// Index value that fills the gauge once.
const GAUGE_SCALE: f64 = 300.0;

/// Pollutant columns of the recent readings table, in display order.
const TABLE_POLLUTANTS: [ReadingField; 5] = [
    ReadingField::Nh3,
    ReadingField::So2,
    ReadingField::No2,
    ReadingField::Benzene,
    ReadingField::Co,
];

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn ReadingRepository>,
    settings: Arc<DashboardSettings>,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn ReadingRepository>, settings: Arc<DashboardSettings>) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub async fn get_dashboard(
        &self,
        session: &Session,
        transmitter: &Transmitter,
    ) -> anyhow::Result<Dashboard> {
        // History and latest reading are independent store queries
        let (history, latest) = tokio::join!(
            self.repository
                .fetch_readings(session, transmitter, self.settings.history_limit),
            self.repository.fetch_latest(session, transmitter),
        );

        let history = history
            .with_context(|| format!("Failed to fetch readings for {}", transmitter.name))?;

        let latest = match latest {
            Ok(reading) => reading,
            Err(e) => {
                tracing::warn!("Error fetching latest reading for {}: {:#}", transmitter.name, e);
                None
            }
        };

        tracing::debug!(
            "Building dashboard for {} from {} readings",
            transmitter.name,
            history.len()
        );

        Ok(Dashboard {
            transmitter: transmitter.clone(),
            latest: latest.map(|r| build_card(&r, &self.settings.scale)),
            charts: self.build_charts(&history),
            recent: self.build_table(&history),
        })
    }

    pub async fn get_latest(
        &self,
        session: &Session,
        transmitter: &Transmitter,
    ) -> anyhow::Result<Option<AirQualityCard>> {
        let latest = self
            .repository
            .fetch_latest(session, transmitter)
            .await
            .with_context(|| format!("Failed to fetch latest reading for {}", transmitter.name))?;
        Ok(latest.map(|r| build_card(&r, &self.settings.scale)))
    }

    fn build_charts(&self, history: &[Reading]) -> Vec<SensorChart> {
        self.settings
            .charts
            .iter()
            .map(|chart| SensorChart {
                field: chart.field.to_string(),
                title: chart.title.clone(),
                color: chart.color.clone(),
                unit: chart.unit.clone(),
                points: prepare_chart_data(history, chart.field.as_str()),
            })
            .collect()
    }

    /// Newest first.
    fn build_table(&self, history: &[Reading]) -> Vec<ReadingRow> {
        let start = history.len().saturating_sub(self.settings.table_rows);
        history[start..]
            .iter()
            .rev()
            .map(|reading| build_row(reading, &self.settings.scale, &self.settings.thresholds))
            .collect()
    }
}

pub fn build_card(reading: &Reading, scale: &AirQualityScale) -> AirQualityCard {
    let band = scale.classify_opt(reading.air_quality);
    AirQualityCard {
        reading_id: reading.id.clone(),
        timestamp: format_date(reading.timestamp.as_deref()),
        air_quality: format_value(reading.air_quality, 0),
        color: band.color.clone(),
        label: band.label.clone(),
        gauge_fraction: reading.air_quality.map(|v| v / GAUGE_SCALE),
        temperature: format_value(reading.temperature, DEFAULT_PRECISION),
        humidity: format_value(reading.humidity, DEFAULT_PRECISION),
    }
}

fn build_row(reading: &Reading, scale: &AirQualityScale, thresholds: &PollutantThresholds) -> ReadingRow {
    let pollutants = TABLE_POLLUTANTS
        .iter()
        .map(|field| {
            let value = reading.get(*field);
            PollutantCell {
                pollutant: field.to_string(),
                value: format_value(value, DEFAULT_PRECISION),
                level: thresholds.level_opt(field.as_str(), value),
            }
        })
        .collect();

    ReadingRow {
        id: reading.id.clone(),
        timestamp: format_date(reading.timestamp.as_deref()),
        pollutants,
        air_quality: format_value(reading.air_quality, 0),
        air_quality_color: scale.classify_opt(reading.air_quality).color.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::reading_repository::StoreError;
    use crate::domain::pollutant::PollutantLevel;
    use crate::infrastructure::config::DashboardConfig;
    use async_trait::async_trait;

    struct FakeRepository {
        readings: Vec<Reading>,
        fail_history: bool,
        fail_latest: bool,
    }

    #[async_trait]
    impl ReadingRepository for FakeRepository {
        async fn fetch_readings(
            &self,
            _session: &Session,
            _transmitter: &Transmitter,
            limit: usize,
        ) -> anyhow::Result<Vec<Reading>> {
            if self.fail_history {
                return Err(StoreError::PermissionDenied.into());
            }
            let start = self.readings.len().saturating_sub(limit);
            Ok(self.readings[start..].to_vec())
        }

        async fn fetch_latest(
            &self,
            _session: &Session,
            _transmitter: &Transmitter,
        ) -> anyhow::Result<Option<Reading>> {
            if self.fail_latest {
                anyhow::bail!("connection reset");
            }
            Ok(self.readings.last().cloned())
        }
    }

    fn reading(i: usize) -> Reading {
        Reading {
            timestamp: Some(format!("2024-01-01_01:{:02}:00", i)),
            temperature: Some(21.0 + i as f64 / 10.0),
            humidity: Some(40.0),
            co_ppm: Some(i as f64),
            air_quality: Some(40.0 + i as f64 * 3.0),
            ..Default::default()
        }
        .with_id(format!("r{:03}", i))
    }

    fn service(readings: Vec<Reading>, fail_history: bool, fail_latest: bool) -> DashboardService {
        let settings = DashboardConfig::default().validate().unwrap();
        let repository = Arc::new(FakeRepository {
            readings,
            fail_history,
            fail_latest,
        });
        DashboardService::new(repository, Arc::new(settings))
    }

    #[tokio::test]
    async fn test_dashboard_assembly() {
        let readings: Vec<Reading> = (0..30).map(reading).collect();
        let service = service(readings, false, false);
        let transmitter = Transmitter::new(101);

        let dashboard = service
            .get_dashboard(&Session::new("t"), &transmitter)
            .await
            .unwrap();

        let latest = dashboard.latest.unwrap();
        assert_eq!(latest.reading_id, "r029");
        assert_eq!(latest.air_quality, "127");
        assert_eq!(latest.label, "Unhealthy for Sensitive Groups");
        assert_eq!(latest.color, "orange");
        assert_eq!(latest.temperature, "23.90");
        assert_eq!(latest.humidity, "40.00");
        assert_eq!(latest.timestamp, "Jan 1, 2024, 5:59 AM");

        assert_eq!(dashboard.charts.len(), 11);
        assert_eq!(dashboard.charts[0].field, "temperature");
        assert!(dashboard.charts.iter().all(|c| c.points.len() == 20));
        let h2s = dashboard.charts.iter().find(|c| c.field == "h2s_ppm").unwrap();
        assert!(h2s.points.iter().all(|p| p.value == 0.0));

        assert_eq!(dashboard.recent.len(), 10);
        assert_eq!(dashboard.recent[0].id, "r029");
        assert_eq!(dashboard.recent[9].id, "r020");
        let co = dashboard.recent[0]
            .pollutants
            .iter()
            .find(|c| c.pollutant == "co_ppm")
            .unwrap();
        assert_eq!(co.value, "29.00");
        assert_eq!(co.level, PollutantLevel::Orange);
        let nh3 = &dashboard.recent[0].pollutants[0];
        assert_eq!(nh3.pollutant, "nh3_ppm");
        assert_eq!(nh3.value, "N/A");
        assert_eq!(nh3.level, PollutantLevel::Red);
    }

    #[tokio::test]
    async fn test_empty_transmitter() {
        let service = service(Vec::new(), false, false);
        let dashboard = service
            .get_dashboard(&Session::new("t"), &Transmitter::new(103))
            .await
            .unwrap();

        assert!(dashboard.latest.is_none());
        assert!(dashboard.recent.is_empty());
        assert!(dashboard.charts.iter().all(|c| c.points.is_empty()));
    }

    #[tokio::test]
    async fn test_history_failure_fails_dashboard() {
        let service = service((0..3).map(reading).collect(), true, false);
        let err = service
            .get_dashboard(&Session::new("t"), &Transmitter::new(101))
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::PermissionDenied)));
    }

    #[tokio::test]
    async fn test_latest_failure_drops_card_only() {
        let service = service((0..3).map(reading).collect(), false, true);
        let dashboard = service
            .get_dashboard(&Session::new("t"), &Transmitter::new(101))
            .await
            .unwrap();
        assert!(dashboard.latest.is_none());
        assert_eq!(dashboard.recent.len(), 3);

        assert!(service
            .get_latest(&Session::new("t"), &Transmitter::new(101))
            .await
            .is_err());
    }

    #[test]
    fn test_card_without_index() {
        let card = build_card(&Reading::default(), &AirQualityScale::default());
        assert_eq!(card.air_quality, "N/A");
        assert_eq!(card.label, "Hazardous");
        assert_eq!(card.gauge_fraction, None);
        assert_eq!(card.timestamp, "N/A");
    }
}
