// Repository trait for reading access
use crate::domain::reading::Reading;
use crate::domain::session::Session;
use crate::domain::transmitter::Transmitter;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("permission denied by the store")]
    PermissionDenied,
    #[error("store request failed with status {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Last `limit` readings of a transmitter, oldest first, each carrying its store key as `id`
    async fn fetch_readings(
        &self,
        session: &Session,
        transmitter: &Transmitter,
        limit: usize,
    ) -> anyhow::Result<Vec<Reading>>;

    /// Most recent reading, if the transmitter has any
    async fn fetch_latest(
        &self,
        session: &Session,
        transmitter: &Transmitter,
    ) -> anyhow::Result<Option<Reading>>;
}
