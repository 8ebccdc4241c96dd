//! Third-party quote sources.

use async_trait::async_trait;
use models::quote::ExternalQuoteRecord;

use crate::errors::ServiceError;

pub mod zenquotes;

/// A remote source of quotes without local ids.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Single best-effort fetch; no retry, no pagination.
    async fn fetch_all(&self) -> Result<Vec<ExternalQuoteRecord>, ServiceError>;
}
