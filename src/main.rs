//! Recursive delay site.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                        SITE                          │
//!   POST path JSON   │  ┌─────────┐   ┌───────────┐   ┌──────────────────┐  │
//!  ──────────────────┼─▶│  http   │──▶│   site    │──▶│    scheduler     │  │
//!                    │  │ server  │   │  process  │   │ queue → workers  │  │
//!                    │  └─────────┘   └─────┬─────┘   │ sleep head delay │  │
//!                    │                      │         └────────┬─────────┘  │
//!                    │                      │◀── timings ──────┘            │
//!                    │                      │    (autoscale on ratio)       │
//!                    │                      ▼                               │
//!   text report      │               ┌─────────────┐   POST trimmed path     │
//!  ◀─────────────────┼───────────────│  forwarder  │─────────────────────────┼──▶ next site
//!                    │               └─────────────┘                         │
//!                    └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use recursive_delay::config::{load_config, SiteConfig};
use recursive_delay::lifecycle::{self, Shutdown};
use recursive_delay::observability::{logging, metrics};

/// A site in a simulated service path.
#[derive(Parser, Debug)]
#[command(name = "recursive-delay", version, about, long_about = None)]
struct Args {
    /// HTTP service port number.
    #[arg(long)]
    port: Option<u16>,

    /// Number of workers. Zero or negative enables autoscaling from one.
    #[arg(short = 'n', long = "workers", allow_negative_numbers = true)]
    workers: Option<i64>,

    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut SiteConfig) {
        if let Some(port) = self.port {
            config.listener.set_port(port);
        }
        if let Some(workers) = self.workers {
            config.pool.workers = workers;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SiteConfig::default(),
    };
    args.apply(&mut config);

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "recursive-delay starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let started = lifecycle::start(config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    started.server.run(started.listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
