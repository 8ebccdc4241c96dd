use std::{sync::Arc, time::Instant};

use models::quote::Quote;
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::external::QuoteSource;
use crate::quote::repository::QuoteRepository;

/// Bulk import from a remote source through the regular `save` path.
pub struct QuoteSeeder<R: QuoteRepository> {
    repo: Arc<R>,
    source: Arc<dyn QuoteSource>,
}

impl<R: QuoteRepository> QuoteSeeder<R> {
    pub fn new(repo: Arc<R>, source: Arc<dyn QuoteSource>) -> Self { Self { repo, source } }

    /// Fetch everything, then save record by record. Records are stored
    /// verbatim under fresh ids. The first failed save aborts the run;
    /// quotes saved before it stay.
    #[instrument(skip(self))]
    pub async fn seed_from_external_source(&self) -> Result<(), ServiceError> {
        let start = Instant::now();

        let records = self.source.fetch_all().await?;
        let count = records.len();
        for record in records {
            self.repo.save(Quote::from_external(record)).await?;
        }

        info!(count, elapsed_ms = start.elapsed().as_millis() as u64, "quotes_seeded_from_api");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use models::quote::ExternalQuoteRecord;

    use super::*;
    use crate::storage::memory_quote_store::InMemoryQuoteRepository;

    struct FixedSource(Vec<ExternalQuoteRecord>);

    #[async_trait]
    impl QuoteSource for FixedSource {
        async fn fetch_all(&self) -> Result<Vec<ExternalQuoteRecord>, ServiceError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl QuoteSource for FailingSource {
        async fn fetch_all(&self) -> Result<Vec<ExternalQuoteRecord>, ServiceError> {
            Err(ServiceError::External("connection refused".into()))
        }
    }

    /// Accepts `limit` saves, then fails every later one.
    struct FlakyRepo {
        inner: Arc<InMemoryQuoteRepository>,
        saves: AtomicUsize,
        limit: usize,
    }

    #[async_trait]
    impl QuoteRepository for FlakyRepo {
        async fn list(&self) -> Vec<Quote> { self.inner.list().await }
        async fn find(&self, id: &str) -> Result<Quote, ServiceError> { self.inner.find(id).await }
        async fn save(&self, quote: Quote) -> Result<Quote, ServiceError> {
            if self.saves.fetch_add(1, Ordering::SeqCst) >= self.limit {
                return Err(ServiceError::Io("backend unavailable".into()));
            }
            self.inner.save(quote).await
        }
        async fn delete(&self, id: &str) -> Result<(), ServiceError> { self.inner.delete(id).await }
    }

    fn records(n: usize) -> Vec<ExternalQuoteRecord> {
        (0..n)
            .map(|i| ExternalQuoteRecord { text: format!(" quote {i} "), author: String::new() })
            .collect()
    }

    #[tokio::test]
    async fn imports_every_record_verbatim_with_fresh_ids() -> Result<(), anyhow::Error> {
        let repo = InMemoryQuoteRepository::new();
        let seeder = QuoteSeeder::new(Arc::clone(&repo), Arc::new(FixedSource(records(3))));
        seeder.seed_from_external_source().await?;

        let list = repo.list().await;
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].text, " quote 0 ");
        assert_eq!(list[0].author, "");
        assert_ne!(list[0].id, list[1].id);
        Ok(())
    }

    #[tokio::test]
    async fn fetch_failure_leaves_store_empty() {
        let repo = InMemoryQuoteRepository::new();
        let seeder = QuoteSeeder::new(Arc::clone(&repo), Arc::new(FailingSource));
        assert!(matches!(seeder.seed_from_external_source().await, Err(ServiceError::External(_))));
        assert!(repo.list().await.is_empty());
    }

    #[tokio::test]
    async fn first_save_error_aborts_without_rollback() {
        let inner = InMemoryQuoteRepository::new();
        let repo = Arc::new(FlakyRepo { inner: Arc::clone(&inner), saves: AtomicUsize::new(0), limit: 2 });
        let seeder = QuoteSeeder::new(Arc::clone(&repo), Arc::new(FixedSource(records(5))));

        assert!(matches!(seeder.seed_from_external_source().await, Err(ServiceError::Io(_))));
        assert_eq!(inner.list().await.len(), 2);
        assert_eq!(repo.saves.load(Ordering::SeqCst), 3);
    }
}
