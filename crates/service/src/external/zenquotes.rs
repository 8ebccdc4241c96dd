use std::time::Duration;

use async_trait::async_trait;
use models::quote::ExternalQuoteRecord;
use tracing::{debug, instrument};

use crate::errors::ServiceError;
use crate::external::QuoteSource;

/// HTTP client for a ZenQuotes-compatible endpoint returning a JSON array of
/// `{q, a}` records.
#[derive(Clone)]
pub struct ZenQuotesClient {
    base_url: String,
    http: reqwest::Client,
}

impl ZenQuotesClient {
    /// The timeout bounds the whole request, body included.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::External(format!("failed to build http client: {e}")))?;
        Ok(Self { base_url: base_url.into(), http })
    }

    pub fn from_config(cfg: &configs::QuoteSourceConfig) -> Result<Self, ServiceError> {
        Self::new(cfg.base_url.clone(), cfg.timeout())
    }

    pub fn base_url(&self) -> &str { &self.base_url }
}

#[async_trait]
impl QuoteSource for ZenQuotesClient {
    #[instrument(skip(self), fields(url = %self.base_url))]
    async fn fetch_all(&self) -> Result<Vec<ExternalQuoteRecord>, ServiceError> {
        let resp = self
            .http
            .get(&self.base_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ServiceError::External(format!("failed to fetch quotes: {e}")))?;

        let body = resp
            .bytes()
            .await
            .map_err(|e| ServiceError::External(format!("failed to read response body: {e}")))?;

        let records: Vec<ExternalQuoteRecord> = serde_json::from_slice(&body)
            .map_err(|e| ServiceError::Decode(format!("failed to decode quotes: {e}")))?;
        debug!(count = records.len(), "external_quotes_fetched");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use tokio::net::TcpListener;

    /// Serve a fixed body/status on `/quotes` from a local listener.
    async fn stub(status: StatusCode, body: &'static str) -> anyhow::Result<String> {
        let app = Router::new().route("/quotes", get(move || async move { (status, body) }));
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await { eprintln!("stub server error: {}", e); }
        });
        Ok(format!("http://{}/quotes", addr))
    }

    #[tokio::test]
    async fn decodes_zenquotes_payload() -> anyhow::Result<()> {
        let url = stub(
            StatusCode::OK,
            r#"[{"q":"Well begun is half done.","a":"Aristotle","h":"<blockquote/>"},{"q":"Act.","a":"Unknown","h":""}]"#,
        )
        .await?;
        let client = ZenQuotesClient::new(url, Duration::from_secs(5))?;
        let records = client.fetch_all().await?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "Well begun is half done.");
        assert_eq!(records[0].author, "Aristotle");
        Ok(())
    }

    #[tokio::test]
    async fn non_list_body_is_decode_error() -> anyhow::Result<()> {
        let url = stub(StatusCode::OK, r#"{"error":"rate limited"}"#).await?;
        let client = ZenQuotesClient::new(url, Duration::from_secs(5))?;
        assert!(matches!(client.fetch_all().await, Err(ServiceError::Decode(_))));
        Ok(())
    }

    #[tokio::test]
    async fn error_status_is_external_error() -> anyhow::Result<()> {
        let url = stub(StatusCode::SERVICE_UNAVAILABLE, "down").await?;
        let client = ZenQuotesClient::new(url, Duration::from_secs(5))?;
        assert!(matches!(client.fetch_all().await, Err(ServiceError::External(_))));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_host_is_external_error() -> anyhow::Result<()> {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let client = ZenQuotesClient::new(format!("http://{}/quotes", addr), Duration::from_secs(2))?;
        assert!(matches!(client.fetch_all().await, Err(ServiceError::External(_))));
        Ok(())
    }
}
