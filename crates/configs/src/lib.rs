use std::{net::SocketAddr, path::{Path, PathBuf}, time::Duration};

use anyhow::{anyhow, Result};
use serde::Deserialize;

pub mod env;

use env::{env_bool, env_parse, env_port, env_string};

pub const DEFAULT_QUOTES_API_URL: &str = "https://zenquotes.io/api/quotes";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub quote_source: QuoteSourceConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(4),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

/// Startup seeding sources. The file is tried first, then the quote API.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeedConfig {
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub from_api: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSourceConfig {
    #[serde(default = "default_quotes_api_url")]
    pub base_url: String,
    #[serde(default = "default_quotes_api_timeout")]
    pub timeout_secs: u64,
}

impl Default for QuoteSourceConfig {
    fn default() -> Self {
        Self { base_url: default_quotes_api_url(), timeout_secs: default_quotes_api_timeout() }
    }
}

/// SMTP settings. Mail stays disabled unless every field is present.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MailConfig {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Host the credentials are issued for; also the TLS server name.
    #[serde(default)]
    pub smtp_host: Option<String>,
    /// `host:port` of the relay.
    #[serde(default)]
    pub smtp_addr: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 15 }
fn default_shutdown_timeout() -> u64 { 5 }
fn default_quotes_api_url() -> String { DEFAULT_QUOTES_API_URL.into() }
fn default_quotes_api_timeout() -> u64 { 10 }

pub fn load_from_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content).map_err(|e| anyhow!("invalid config {}: {e}", path.display()))?;
    Ok(cfg)
}

impl AppConfig {
    /// File (explicit path, else `CONFIG_PATH`, else `config.toml`) if present,
    /// defaults otherwise; then environment overrides; then validation.
    /// A file that exists but does not parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())),
        };
        let mut cfg = if path.exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.apply_env();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self) {
        if let Some(host) = env_string("SERVER_HOST") { self.server.host = host; }
        if let Some(port) = env_port("PORT") { self.server.port = port; }
        if let Some(w) = env_parse::<usize>("TOKIO_WORKER_THREADS") { self.server.worker_threads = Some(w); }
        // READ_TIMEOUT/WRITE_TIMEOUT are the older names; the larger one bounds a request.
        let legacy = [env_parse::<u64>("READ_TIMEOUT"), env_parse::<u64>("WRITE_TIMEOUT")].into_iter().flatten().max();
        if let Some(t) = env_parse::<u64>("REQUEST_TIMEOUT").or(legacy) { self.server.request_timeout_secs = t; }
        if let Some(t) = env_parse::<u64>("SHUTDOWN_TIMEOUT") { self.server.shutdown_timeout_secs = t; }

        if let Some(file) = env_string("SEED_FILE") { self.seed.file = Some(PathBuf::from(file)); }
        if let Some(b) = env_bool("SEED_FROM_API") { self.seed.from_api = b; }

        if let Some(url) = env_string("QUOTES_API_URL") { self.quote_source.base_url = url; }
        if let Some(t) = env_parse::<u64>("QUOTES_API_TIMEOUT") { self.quote_source.timeout_secs = t; }

        if let Some(v) = env_string("FROM_EMAIL") { self.mail.from = Some(v); }
        if let Some(v) = env_string("FROM_EMAIL_PASSWORD") { self.mail.password = Some(v); }
        if let Some(v) = env_string("FROM_EMAIL_SMTP") { self.mail.smtp_host = Some(v); }
        if let Some(v) = env_string("SMTP_ADDR") { self.mail.smtp_addr = Some(v); }

        if let Some(f) = env_string("LOG_FORMAT") {
            match f.to_ascii_lowercase().as_str() {
                "json" => self.logging.format = LogFormat::Json,
                "compact" => self.logging.format = LogFormat::Compact,
                _ => tracing::warn!(value = %f, "unknown LOG_FORMAT, keeping default"),
            }
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.quote_source.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = Some(4);
        }
        if self.request_timeout_secs == 0 || self.shutdown_timeout_secs == 0 {
            return Err(anyhow!("server timeouts must be positive seconds"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl QuoteSourceConfig {
    fn validate(&self) -> Result<()> {
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("quote_source.base_url must start with http:// or https://"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("quote_source.timeout_secs must be positive"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl MailConfig {
    /// All four settings present and non-blank.
    pub fn is_complete(&self) -> bool {
        [&self.from, &self.password, &self.smtp_host, &self.smtp_addr]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}
