use axum::{body::Bytes, extract::{rejection::BytesRejection, State}, http::StatusCode, Json};
use models::{
    quote::{self, Quote},
    recipient,
};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::info;

use crate::{errors::ApiError, observability, routes::AppState};

pub const SHARE_SUBJECT: &str = "A motivating quote for you";

#[derive(Debug, Deserialize)]
pub struct NewQuoteInput {
    #[serde(default)]
    pub text: Option<String>,
    /// Missing and `null` both mean "no author".
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShareInput {
    pub to: Vec<String>,
}

/// Decode a JSON body regardless of the request's content type.
fn parse_json<T: DeserializeOwned>(body: Result<Bytes, BytesRejection>) -> Result<T, ApiError> {
    let body = body?;
    serde_json::from_slice(&body).map_err(|_| ApiError::bad_request("Invalid JSON"))
}

/// GET /quote
pub async fn get_random_quote(State(state): State<AppState>) -> Result<Json<Quote>, ApiError> {
    let quote = state.quotes.get_random_quote().await?;
    observability::QUOTES_SERVED_TOTAL.inc();
    Ok(Json(quote))
}

/// POST /add
pub async fn create_quote(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Quote>), ApiError> {
    let input: NewQuoteInput = parse_json(body)?;
    let text = input.text.as_deref().unwrap_or_default();
    let author = input.author.as_deref().unwrap_or_default();
    quote::validate_text(text)?;
    quote::validate_author(author)?;

    let created = state.quotes.create_quote(text, author).await?;
    observability::QUOTES_CREATED_TOTAL.inc();
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /share: mail one random quote to every recipient.
pub async fn share_random_quote(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let input: ShareInput = parse_json(body)?;
    recipient::validate_recipients(&input.to)?;

    let quote = state.quotes.get_random_quote().await?;
    if let Err(e) = state.mailer.send_mail(&input.to, SHARE_SUBJECT, &quote.mail_body()).await {
        observability::MAIL_FAILURES_TOTAL.inc();
        return Err(ApiError::internal(format!("Failed to send email - {e}")));
    }

    observability::MAIL_SENT_TOTAL.inc();
    info!(quote_id = %quote.id, recipients = input.to.len(), "quote_shared");
    Ok(Json(serde_json::json!({"ok": true})))
}
