//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Start the worker pool and the forwarding client
//! - Bind the listener last, so traffic only arrives once the pool exists

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{validate_config, SiteConfig, ValidationError};
use crate::http::HttpServer;
use crate::path::Forwarder;
use crate::scheduler::{Scheduler, SchedulerError};
use crate::site::Site;

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0:?}")]
    Config(Vec<ValidationError>),

    #[error("failed to start worker pool: {0}")]
    Pool(#[from] SchedulerError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// A site that is ready to serve.
pub struct Started {
    pub server: HttpServer,
    pub listener: TcpListener,
    pub local_addr: SocketAddr,
    pub site: Site,
}

/// Build every subsystem for `config` and bind its listener.
pub async fn start(config: SiteConfig) -> Result<Started, StartupError> {
    validate_config(&config).map_err(StartupError::Config)?;

    let scheduler = Arc::new(Scheduler::new(config.pool.workers)?);
    let forwarder = Forwarder::new(&config.forwarding);
    let site = Site::new(scheduler, forwarder);

    let bind_err = |source: std::io::Error| StartupError::Bind {
        addr: config.listener.bind_address.clone(),
        source,
    };
    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(bind_err)?;
    let local_addr = listener.local_addr().map_err(bind_err)?;

    tracing::info!(
        address = %local_addr,
        workers = site.scheduler().worker_count(),
        auto_scale = site.scheduler().auto_scale(),
        "Site ready"
    );

    let server = HttpServer::new(&config, site.clone());
    Ok(Started {
        server,
        listener,
        local_addr,
        site,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_on_ephemeral_port() {
        let mut config = SiteConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.pool.workers = 2;

        let started = start(config).await.unwrap();
        assert_ne!(started.local_addr.port(), 0);
        assert_eq!(started.site.scheduler().worker_count(), 2);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let mut config = SiteConfig::default();
        config.listener.bind_address = "nowhere".into();
        assert!(matches!(start(config).await, Err(StartupError::Config(_))));
    }

    #[tokio::test]
    async fn test_oversized_pool_rejected_before_spawning() {
        let mut config = SiteConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.pool.workers = 1_000_000;
        assert!(matches!(start(config).await, Err(StartupError::Config(_))));
    }
}
