// Realtime database repository implementation
use crate::application::reading_repository::{ReadingRepository, StoreError};
use crate::domain::reading::Reading;
use crate::domain::session::Session;
use crate::domain::transmitter::Transmitter;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct FirebaseRepository {
    client: reqwest::Client,
    database_url: String,
    readings_root: String,
}

impl FirebaseRepository {
    pub fn new(client: reqwest::Client, database_url: String, readings_root: String) -> Self {
        Self {
            client,
            database_url: database_url.trim_end_matches('/').to_string(),
            readings_root: readings_root.trim_matches('/').to_string(),
        }
    }

    /// `orderBy` takes a JSON string, so `"$key"` keeps its quotes.
    fn build_query_url(&self, session: &Session, transmitter: &Transmitter, limit: usize) -> String {
        format!(
            "{}/{}/{}.json?orderBy={}&limitToLast={}&auth={}",
            self.database_url,
            self.readings_root,
            transmitter.store_path(),
            urlencoding::encode("\"$key\""),
            limit,
            urlencoding::encode(session.id_token())
        )
    }

    async fn execute_query(
        &self,
        session: &Session,
        transmitter: &Transmitter,
        limit: usize,
    ) -> Result<Vec<Reading>> {
        let url = self.build_query_url(session, transmitter, limit);
        tracing::debug!(
            "Querying last {} readings of {}/{}",
            limit,
            self.readings_root,
            transmitter.store_path()
        );

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to the realtime database")?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::PermissionDenied.into());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let snapshot = response
            .json::<Option<HashMap<String, Value>>>()
            .await
            .context("Failed to parse realtime database response")?;

        Ok(flatten_snapshot(snapshot))
    }
}

#[async_trait]
impl ReadingRepository for FirebaseRepository {
    async fn fetch_readings(
        &self,
        session: &Session,
        transmitter: &Transmitter,
        limit: usize,
    ) -> Result<Vec<Reading>> {
        self.execute_query(session, transmitter, limit).await
    }

    async fn fetch_latest(
        &self,
        session: &Session,
        transmitter: &Transmitter,
    ) -> Result<Option<Reading>> {
        let mut readings = self.execute_query(session, transmitter, 1).await?;
        Ok(readings.pop())
    }
}

/// Attach each key as the reading id and restore the store's key order.
/// An empty location comes back as `null`. Children that do not decode as a
/// reading are logged and skipped.
fn flatten_snapshot(snapshot: Option<HashMap<String, Value>>) -> Vec<Reading> {
    let mut readings: Vec<Reading> = snapshot
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, child)| match serde_json::from_value::<Reading>(child) {
            Ok(reading) => Some(reading.with_id(key)),
            Err(e) => {
                tracing::warn!("Skipping malformed reading {}: {}", key, e);
                None
            }
        })
        .collect();
    readings.sort_by(|a, b| compare_keys(&a.id, &b.id));
    readings
}

/// Keys that parse as 32-bit integers sort first, numerically; the rest
/// sort as plain strings.
fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<i32>(), b.parse::<i32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
