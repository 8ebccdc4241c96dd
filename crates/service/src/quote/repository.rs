use std::{path::Path, time::Instant};

use async_trait::async_trait;
use models::quote::Quote;
use tracing::info;

use crate::errors::ServiceError;

/// Synchronized quote storage. Implementations guard their collection
/// internally; callers never see it directly.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Snapshot of all quotes in insertion order.
    async fn list(&self) -> Vec<Quote>;

    async fn find(&self, id: &str) -> Result<Quote, ServiceError>;

    /// Upsert by id: overwrite text/author in place when the id exists,
    /// append otherwise. Returns the stored copy.
    async fn save(&self, quote: Quote) -> Result<Quote, ServiceError>;

    async fn delete(&self, id: &str) -> Result<(), ServiceError>;

    /// Load a JSON array of `{id, text, author}` and push each record through
    /// [`QuoteRepository::save`]. The file is fully parsed before the first
    /// write, so unreadable or malformed input leaves the store untouched.
    async fn seed_from_file(&self, path: &Path) -> Result<(), ServiceError> {
        let start = Instant::now();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ServiceError::Io(format!("failed to open seed file {}: {e}", path.display())))?;
        let quotes: Vec<Quote> = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Parse(format!("failed to parse seed file {}: {e}", path.display())))?;

        let count = quotes.len();
        for quote in quotes {
            self.save(quote).await?;
        }

        info!(
            path = %path.display(),
            count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "quotes_seeded_from_file"
        );
        Ok(())
    }
}
