//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use recursive_delay::config::SiteConfig;
use recursive_delay::lifecycle::{self, Shutdown};
use recursive_delay::Site;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

/// A site server running in the background.
pub struct RunningSite {
    pub addr: SocketAddr,
    pub site: Site,
}

impl RunningSite {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Start a site on an ephemeral port with `workers` initial workers.
pub async fn start_site(workers: i64, shutdown: &Shutdown) -> RunningSite {
    let mut config = SiteConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.pool.workers = workers;

    let started = lifecycle::start(config).await.expect("site failed to start");
    let addr = started.local_addr;
    let site = started.site.clone();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = started.server.run(started.listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningSite { addr, site }
}

/// Start a backend that always answers with `status` and `body`.
#[allow(dead_code)]
pub async fn start_fixed_backend(status: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// HTTP client without pooling or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
