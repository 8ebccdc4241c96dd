use crate::errors::ModelError;

/// Syntactic check for a mail address: one `@`, non-empty local part,
/// dotted domain without empty labels, no whitespace.
pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let invalid = || ModelError::Validation(format!("invalid email: {email}"));
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

/// At least one recipient, each a valid address.
pub fn validate_recipients(to: &[String]) -> Result<(), ModelError> {
    if to.is_empty() {
        return Err(ModelError::Validation("at least one recipient is required".into()));
    }
    to.iter().try_for_each(|addr| validate_email(addr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("test@mail.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "plain", "@example.com", "a@", "a@b", "a@@b.com", "a@b..com", "a b@c.com"] {
            assert!(validate_email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn recipients_must_be_non_empty_and_all_valid() {
        assert!(validate_recipients(&[]).is_err());
        assert!(validate_recipients(&["ok@x.io".to_string(), "nope".to_string()]).is_err());
        assert!(validate_recipients(&["ok@x.io".to_string()]).is_ok());
    }
}
