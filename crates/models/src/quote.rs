use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

pub const MAX_TEXT_CHARS: usize = 512;
pub const MAX_AUTHOR_CHARS: usize = 128;
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Stored quote. Identity is `id`; two quotes are the same entity iff ids match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: String,
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn new(id: impl Into<String>, text: impl Into<String>, author: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), author: author.into() }
    }

    /// Import a third-party record under a freshly generated id.
    /// Text and author are copied verbatim.
    pub fn from_external(record: ExternalQuoteRecord) -> Self {
        Self { id: Uuid::new_v4().to_string(), text: record.text, author: record.author }
    }

    /// Plain-text body used when mailing a quote.
    pub fn mail_body(&self) -> String {
        format!("\"{}\"\n\n - {}", self.text, self.author)
    }
}

/// Quote as returned by the upstream quote API: no local id.
/// The API uses `q`/`a`; the long names are accepted too.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalQuoteRecord {
    #[serde(rename = "q", alias = "text")]
    pub text: String,
    #[serde(rename = "a", alias = "author")]
    pub author: String,
}

pub fn validate_text(text: &str) -> Result<(), ModelError> {
    let len = text.trim().chars().count();
    if len == 0 {
        return Err(ModelError::Validation("text is required".into()));
    }
    if len > MAX_TEXT_CHARS {
        return Err(ModelError::Validation(format!("text must be at most {MAX_TEXT_CHARS} characters")));
    }
    Ok(())
}

pub fn validate_author(author: &str) -> Result<(), ModelError> {
    if author.trim().chars().count() > MAX_AUTHOR_CHARS {
        return Err(ModelError::Validation(format!("author must be at most {MAX_AUTHOR_CHARS} characters")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_bounds_are_counted_in_chars_after_trim() {
        assert!(validate_text("hi").is_ok());
        assert!(validate_text("   ").is_err());
        assert!(validate_text("").is_err());
        assert!(validate_text(&"é".repeat(MAX_TEXT_CHARS)).is_ok());
        assert!(validate_text(&"a".repeat(MAX_TEXT_CHARS + 1)).is_err());
    }

    #[test]
    fn author_may_be_empty_but_not_too_long() {
        assert!(validate_author("").is_ok());
        assert!(validate_author(&"b".repeat(MAX_AUTHOR_CHARS)).is_ok());
        assert!(matches!(validate_author(&"b".repeat(MAX_AUTHOR_CHARS + 1)), Err(ModelError::Validation(_))));
    }

    #[test]
    fn external_record_accepts_short_and_long_field_names() {
        let short: Vec<ExternalQuoteRecord> =
            serde_json::from_str(r#"[{"q":"Act.","a":"Anon","h":"<blockquote/>"}]"#).unwrap();
        let long: Vec<ExternalQuoteRecord> = serde_json::from_str(r#"[{"text":"Act.","author":"Anon"}]"#).unwrap();
        assert_eq!(short, long);
    }

    #[test]
    fn from_external_copies_verbatim_with_fresh_id() {
        let rec = ExternalQuoteRecord { text: "  spaced  ".into(), author: "".into() };
        let a = Quote::from_external(rec.clone());
        let b = Quote::from_external(rec);
        assert_eq!(a.text, "  spaced  ");
        assert_eq!(a.author, "");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn mail_body_quotes_text_and_names_author() {
        let q = Quote::new("1", "Stay hungry, stay foolish.", "Steve Jobs");
        assert_eq!(q.mail_body(), "\"Stay hungry, stay foolish.\"\n\n - Steve Jobs");
    }
}
