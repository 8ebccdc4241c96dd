//! Outbound mail capability.
//!
//! Callers hold a [`Mailer`]. The concrete [`MailService`] is either disabled
//! (incomplete SMTP settings, every send fails with [`MailError::Disabled`])
//! or backed by an SMTP relay.

use async_trait::async_trait;
use configs::MailConfig;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_SMTP_PORT: u16 = 587;
const IMPLICIT_TLS_PORT: u16 = 465;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail service disabled: SMTP settings are incomplete")]
    Disabled,
    #[error("invalid address: {0}")]
    Address(String),
    #[error("failed to build message: {0}")]
    Message(String),
    #[error("smtp error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_mail(&self, to: &[String], subject: &str, body: &str) -> Result<(), MailError>;
}

pub enum MailService {
    Disabled,
    Smtp(SmtpMailer),
}

impl MailService {
    pub fn from_config(cfg: &MailConfig) -> Self {
        if !cfg.is_complete() {
            warn!("mail disabled: FROM_EMAIL, FROM_EMAIL_PASSWORD, FROM_EMAIL_SMTP and SMTP_ADDR are required");
            return Self::Disabled;
        }
        match SmtpMailer::from_config(cfg) {
            Ok(m) => {
                info!(relay = %m.relay, "mail enabled");
                Self::Smtp(m)
            }
            Err(e) => {
                warn!(error = %e, "mail disabled: invalid SMTP settings");
                Self::Disabled
            }
        }
    }

    pub fn is_enabled(&self) -> bool { matches!(self, Self::Smtp(_)) }
}

#[async_trait]
impl Mailer for MailService {
    async fn send_mail(&self, to: &[String], subject: &str, body: &str) -> Result<(), MailError> {
        match self {
            Self::Disabled => Err(MailError::Disabled),
            Self::Smtp(m) => m.send_mail(to, subject, body).await,
        }
    }
}

pub struct SmtpMailer {
    from: Mailbox,
    relay: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// `smtp_addr` is the relay `host[:port]`; `smtp_host` is the name the
    /// credentials and TLS certificate are checked against.
    pub fn from_config(cfg: &MailConfig) -> Result<Self, MailError> {
        let field = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_string();
        let (from, password, smtp_host, smtp_addr) =
            (field(&cfg.from), field(&cfg.password), field(&cfg.smtp_host), field(&cfg.smtp_addr));

        let from_mailbox: Mailbox = from.parse().map_err(|_| MailError::Address(from.clone()))?;
        let (relay_host, port) = split_host_port(&smtp_addr)?;

        let tls = TlsParameters::new(smtp_host).map_err(|e| MailError::Transport(e.to_string()))?;
        let tls = if port == IMPLICIT_TLS_PORT { Tls::Wrapper(tls) } else { Tls::Required(tls) };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(relay_host.clone())
            .port(port)
            .tls(tls)
            .credentials(Credentials::new(from, password))
            .build();

        Ok(Self { from: from_mailbox, relay: format!("{relay_host}:{port}"), transport })
    }

    async fn send_mail(&self, to: &[String], subject: &str, body: &str) -> Result<(), MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);
        for addr in to {
            let mailbox: Mailbox = addr.parse().map_err(|_| MailError::Address(addr.clone()))?;
            builder = builder.to(mailbox);
        }
        let message = builder.body(body.to_string()).map_err(|e| MailError::Message(e.to_string()))?;

        self.transport.send(message).await.map_err(|e| MailError::Transport(e.to_string()))?;
        info!(recipients = to.len(), relay = %self.relay, "mail_sent");
        Ok(())
    }
}

fn split_host_port(addr: &str) -> Result<(String, u16), MailError> {
    match addr.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| MailError::Transport(format!("invalid SMTP port in {addr}")))?;
            Ok((host.to_string(), port))
        }
        None => Ok((addr.to_string(), DEFAULT_SMTP_PORT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> MailConfig {
        MailConfig {
            from: Some("quotes@example.com".into()),
            password: Some("app-password".into()),
            smtp_host: Some("smtp.example.com".into()),
            smtp_addr: Some("smtp.example.com:587".into()),
        }
    }

    #[tokio::test]
    async fn incomplete_config_yields_disabled_mailer() {
        let mut cfg = complete();
        cfg.smtp_addr = None;
        let mailer = MailService::from_config(&cfg);
        assert!(!mailer.is_enabled());
        let err = mailer.send_mail(&["a@b.io".to_string()], "s", "b").await.unwrap_err();
        assert!(matches!(err, MailError::Disabled));
    }

    #[test]
    fn complete_config_yields_smtp_mailer() {
        assert!(MailService::from_config(&complete()).is_enabled());
    }

    #[test]
    fn bad_sender_address_disables_mail() {
        let mut cfg = complete();
        cfg.from = Some("not an address".into());
        assert!(!MailService::from_config(&cfg).is_enabled());
    }

    #[test]
    fn host_port_parsing() {
        assert_eq!(split_host_port("smtp.gmail.com:465").unwrap(), ("smtp.gmail.com".to_string(), 465));
        assert_eq!(split_host_port("smtp.gmail.com").unwrap(), ("smtp.gmail.com".to_string(), DEFAULT_SMTP_PORT));
        assert!(split_host_port("smtp.gmail.com:http").is_err());
    }
}
