use std::sync::Arc;

use axum::Router;
use common::utils::logging::{init_logging_default, init_logging_json};
use configs::{AppConfig, LogFormat, LoggingConfig};
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::routes::{self, AppState};
use service::{
    external::zenquotes::ZenQuotesClient,
    mail::{MailService, Mailer},
    quote::service::{QuoteService, SeedOutcome},
    seed::QuoteSeeder,
    storage::memory_quote_store::InMemoryQuoteRepository,
};

/// Initialize logging via shared common utils
pub fn init_logging(cfg: &LoggingConfig) {
    match cfg.format {
        LogFormat::Compact => init_logging_default(),
        LogFormat::Json => init_logging_json(),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Seed the store once, before the listener is bound. Failures are logged and
/// the server starts with whatever was loaded.
pub async fn seed_store(cfg: &AppConfig, quotes: &QuoteService<InMemoryQuoteRepository>) {
    match quotes.seed_db_from_file(cfg.seed.file.as_deref()).await {
        Ok(SeedOutcome::Seeded) => {}
        Ok(SeedOutcome::Skipped) => info!("no valid json seed file path given; skipping file seeding"),
        Err(e) => warn!(error = %e, "seeding from file failed; continuing"),
    }

    if !cfg.seed.from_api {
        return;
    }
    let source = match ZenQuotesClient::from_config(&cfg.quote_source) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "quote API client unavailable; skipping API seeding");
            return;
        }
    };
    info!(url = %source.base_url(), "seeding from quote API");
    let seeder = QuoteSeeder::new(Arc::clone(quotes.repository()), Arc::new(source));
    if let Err(e) = seeder.seed_from_external_source().await {
        warn!(error = %e, "seeding from quote API failed; continuing");
    }
}

/// Build store, service, mailer and router from config.
pub async fn build_app(cfg: &AppConfig) -> Router {
    let quotes = QuoteService::new(InMemoryQuoteRepository::new());
    seed_store(cfg, &quotes).await;

    let mailer: Arc<dyn Mailer> = Arc::new(MailService::from_config(&cfg.mail));
    let state = AppState { quotes, mailer };
    routes::build_router(state, build_cors(), cfg.server.request_timeout())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Public entry: build the app and serve until a shutdown signal arrives.
/// In-flight requests get `server.shutdown_timeout` to finish.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await;

    let addr = cfg.server.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "server listening");

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                let _ = stop_tx.send(());
            })
            .await
    });

    tokio::select! {
        res = &mut server => {
            res??;
            return Ok(());
        }
        _ = stop_rx => {}
    }

    info!("gracefully shutting down");
    match tokio::time::timeout(cfg.server.shutdown_timeout(), server).await {
        Ok(res) => res??,
        Err(_) => warn!(timeout_secs = cfg.server.shutdown_timeout_secs, "graceful shutdown timed out"),
    }
    info!("shutdown complete");
    Ok(())
}
