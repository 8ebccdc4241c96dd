use std::{path::Path, sync::Arc};

use models::quote::{Quote, UNKNOWN_AUTHOR};
use rand::Rng;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::quote::repository::QuoteRepository;

/// Result of a file seeding request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// No path, or a path without a `.json` extension.
    Skipped,
    Seeded,
}

/// Application service encapsulating quote business rules.
/// Input length limits are enforced at the HTTP boundary, not here.
pub struct QuoteService<R: QuoteRepository> {
    repo: Arc<R>,
}

impl<R: QuoteRepository> Clone for QuoteService<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: QuoteRepository> QuoteService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub fn repository(&self) -> &Arc<R> { &self.repo }

    /// Uniform pick over the current snapshot; repeats are allowed.
    pub async fn get_random_quote(&self) -> Result<Quote, ServiceError> {
        let mut quotes = self.repo.list().await;
        if quotes.is_empty() {
            return Err(ServiceError::Empty);
        }
        let index = rand::thread_rng().gen_range(0..quotes.len());
        Ok(quotes.swap_remove(index))
    }

    /// Create with policy: fresh id, trimmed fields, `"Unknown"` for a blank author.
    #[instrument(skip(self, text, author))]
    pub async fn create_quote(&self, text: &str, author: &str) -> Result<Quote, ServiceError> {
        let author = match author.trim() {
            "" => UNKNOWN_AUTHOR,
            a => a,
        };
        let quote = Quote::new(Uuid::new_v4().to_string(), text.trim(), author);
        let stored = self.repo.save(quote).await?;
        info!(id = %stored.id, "quote_created");
        Ok(stored)
    }

    /// Seed from a JSON file when one is given. Failure is returned to the
    /// caller, which decides whether startup continues.
    #[instrument(skip(self))]
    pub async fn seed_db_from_file(&self, path: Option<&Path>) -> Result<SeedOutcome, ServiceError> {
        let Some(path) = path.filter(|p| p.extension().is_some_and(|ext| ext == "json")) else {
            return Ok(SeedOutcome::Skipped);
        };
        self.repo.seed_from_file(path).await?;
        Ok(SeedOutcome::Seeded)
    }
}
