//! cliniccio route server.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │               ROUTE SERVER                    │
//!                         │                                               │
//!     Client Request      │  ┌─────────┐    ┌──────────┐   ┌──────────┐  │
//!     ────────────────────┼─▶│  http   │───▶│ routing  │──▶│ template │  │
//!                         │  │ server  │    │  table   │   │  store   │  │
//!                         │  └─────────┘    └────┬─────┘   └────┬─────┘  │
//!                         │                      │ no match     │ match  │
//!     Client Response     │                      ▼              ▼        │
//!     ◀───────────────────┼──────────── 302 Location    200 view +     │
//!                         │              (default)       controller     │
//!                         │                                               │
//!                         │  config · app modules · observability ·      │
//!                         │  lifecycle (startup / shutdown)               │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use cliniccio_routes::config::{load_or_default, AppConfig, ObservabilityConfig};
use cliniccio_routes::lifecycle::{signals, Shutdown};
use cliniccio_routes::observability::{logging, metrics};
use cliniccio_routes::{build_application, HttpServer, StartupError};

#[derive(Parser)]
#[command(name = "cliniccio-routes")]
#[command(version, about = "Serve the cliniccio route table", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Built-in defaults are used if omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the route table over HTTP (default)
    Serve,
    /// Validate the configuration and print the resolved routes
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = load_or_default(cli.config.as_deref());
    let observability = loaded
        .as_ref()
        .map(|c| c.observability.clone())
        .unwrap_or_else(|_| ObservabilityConfig::default());
    logging::init_logging(&observability)?;

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration rejected");
            return Err(StartupError::from(e).into());
        }
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        "cliniccio-routes starting"
    );

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Check => check(&config),
        Commands::Serve => serve(config).await,
    }
}

fn check(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_application(config).inspect_err(|e| {
        tracing::error!(error = %e, "Startup check failed");
    })?;

    print!("{}", app.summary());
    Ok(())
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_application(&config).inspect_err(|e| {
        tracing::error!(error = %e, "Startup failed");
    })?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(config, app).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
