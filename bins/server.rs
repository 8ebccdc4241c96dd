use std::path::PathBuf;

use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

/// Serve random motivational quotes over HTTP.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML config file (defaults to `CONFIG_PATH`, then `config.toml`)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed the quote store from this JSON file at startup
    #[arg(long)]
    seed_file: Option<PathBuf>,

    /// Seed the quote store from the configured quote API at startup
    #[arg(long)]
    seed_from_api: bool,
}

fn main() -> std::process::ExitCode {
    // load .env before reading config so RUST_LOG and friends apply
    dotenv().ok();
    let args = Args::parse();

    let mut cfg = match configs::AppConfig::load(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("invalid configuration: {e:#}");
            return std::process::ExitCode::FAILURE;
        }
    };
    if let Some(path) = args.seed_file {
        cfg.seed.file = Some(path);
    }
    if args.seed_from_api {
        cfg.seed.from_api = true;
    }

    server::startup::init_logging(&cfg.logging);
    info!(service = "server", event = "logger_init", "tracing subscriber initialized");

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new({
        let service_id = service_id;
        move |info| {
            error!(
                service = "server",
                event = "panic",
                %service_id,
                pid,
                message = %info,
                "unhandled panic occurred"
            );
        }
    }));

    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "server service starting"
    );

    rt.block_on(async move {
        match server::run(cfg).await {
            Ok(()) => {
                info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "server", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
