//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a site.
//! All types derive Serde traits for deserialization from config files.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Root configuration for one site.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Worker pool sizing.
    pub pool: PoolConfig,

    /// Outbound forwarding to the next hop.
    pub forwarding: ForwardConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ListenerConfig {
    /// Replace the port of `bind_address`, keeping the configured host.
    pub fn set_port(&mut self, port: u16) {
        self.bind_address = match self.bind_address.parse::<SocketAddr>() {
            Ok(mut addr) => {
                addr.set_port(port);
                addr.to_string()
            }
            Err(_) => match self.bind_address.rsplit_once(':') {
                Some((host, _)) if !host.is_empty() => format!("{}:{}", host, port),
                _ => format!("0.0.0.0:{}", port),
            },
        };
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Initial worker count. Zero or negative: start at one and autoscale.
    pub workers: i64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

impl PoolConfig {
    pub fn auto_scale(&self) -> bool {
        self.workers <= 0
    }
}

/// Forwarding client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardConfig {
    /// TCP connect timeout in milliseconds (0 = OS default).
    pub connect_timeout_ms: u64,

    /// Largest downstream response body relayed upward.
    pub max_response_bytes: usize,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            max_response_bytes: 16 * 1024 * 1024, // 16MB
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml() {
        let config: SiteConfig = toml::from_str("[pool]\nworkers = 0\n").unwrap();
        assert!(config.pool.auto_scale());
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.limits.max_body_size, 2 * 1024 * 1024);
    }

    #[test]
    fn test_set_port_keeps_host() {
        let mut listener = ListenerConfig {
            bind_address: "127.0.0.1:8080".into(),
        };
        listener.set_port(9000);
        assert_eq!(listener.bind_address, "127.0.0.1:9000");

        let mut listener = ListenerConfig {
            bind_address: "[::1]:8080".into(),
        };
        listener.set_port(9001);
        assert_eq!(listener.bind_address, "[::1]:9001");

        let mut listener = ListenerConfig {
            bind_address: "garbage".into(),
        };
        listener.set_port(9002);
        assert_eq!(listener.bind_address, "0.0.0.0:9002");
    }

    #[test]
    fn test_full_toml() {
        let raw = r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [pool]
            workers = 8

            [forwarding]
            connect_timeout_ms = 250

            [observability]
            log_level = "debug"
            metrics_enabled = true
            metrics_address = "127.0.0.1:9100"
        "#;
        let config: SiteConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.pool.workers, 8);
        assert!(!config.pool.auto_scale());
        assert_eq!(config.forwarding.connect_timeout_ms, 250);
        assert!(config.observability.metrics_enabled);
    }
}
