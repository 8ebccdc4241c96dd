use std::sync::Arc;

use async_trait::async_trait;
use models::quote::Quote;
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::quote::repository::QuoteRepository;

/// In-memory quote store.
///
/// A single `RwLock` guards the vector: writers are exclusive with every other
/// access, and each operation (including upsert's lookup-then-write) runs in
/// one critical section. Share it through the `Arc` returned by [`new`].
///
/// [`new`]: InMemoryQuoteRepository::new
#[derive(Default)]
pub struct InMemoryQuoteRepository {
    inner: RwLock<Vec<Quote>>,
}

impl InMemoryQuoteRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn list(&self) -> Vec<Quote> {
        let data = self.inner.read().await;
        data.clone()
    }

    async fn find(&self, id: &str) -> Result<Quote, ServiceError> {
        let data = self.inner.read().await;
        data.iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(&format!("quote {id}")))
    }

    async fn save(&self, quote: Quote) -> Result<Quote, ServiceError> {
        let mut data = self.inner.write().await;
        match data.iter_mut().find(|q| q.id == quote.id) {
            Some(existing) => {
                existing.text = quote.text;
                existing.author = quote.author;
                Ok(existing.clone())
            }
            None => {
                data.push(quote.clone());
                Ok(quote)
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let mut data = self.inner.write().await;
        let pos = data
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| ServiceError::not_found(&format!("quote {id}")))?;
        data.remove(pos);
        Ok(())
    }
}
