#![forbid(unsafe_code)]

//! Upload validation daemon: serves the validation API and checks local files.

use std::{net::SocketAddr, path::PathBuf, process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use upload_guard_core::Validator;

mod check;
mod config;
mod http;

use crate::check::CheckOptions;
use crate::config::DaemonConfig;

#[derive(Parser, Debug)]
#[command(name = "upload-guard-daemon", version, about = "Upload content validation service")]
struct Cli {
    /// TOML config file (listen address, validator defaults).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (env-filter syntax).
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Serve the validation API over HTTP.
    Serve {
        /// Listen address, e.g. 127.0.0.1:8080. Overrides the config file.
        #[arg(long)]
        listen: Option<SocketAddr>,
    },
    /// Validate a local file and print the verdict as JSON.
    Check {
        path: PathBuf,

        /// Declared media type. Guessed from the extension when omitted.
        #[arg(long)]
        mime: Option<String>,

        #[arg(long)]
        max_size_bytes: Option<u64>,

        /// Accepted media type; repeat to allow several.
        #[arg(long = "allowed-type")]
        allowed_types: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so `check` output stays machine-readable.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&cli.log))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = DaemonConfig::load_or_default(cli.config.as_deref())?;

    match cli.cmd {
        Cmd::Serve { listen } => {
            if let Some(addr) = listen {
                config.listen = addr;
            }
            serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Check {
            path,
            mime,
            max_size_bytes,
            allowed_types,
        } => {
            let opts = CheckOptions {
                mime,
                max_size_bytes,
                allowed_types,
            };
            check::run(&path, &opts, config.validator)
        }
    }
}

async fn serve(config: DaemonConfig) -> anyhow::Result<()> {
    info!("starting daemon with config: {:?}", config);

    let validator = Arc::new(Validator::new(config.validator));
    let app = http::router(validator);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!("listening on http://{}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown requested");
}
