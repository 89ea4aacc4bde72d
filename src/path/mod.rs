//! Path protocol subsystem.
//!
//! # Data Flow
//! ```text
//! JSON body {"id", "sites": [...]}
//!     → path_spec.rs (PathSpec, decoded at the boundary)
//!     → site.rs (head SiteSpec: sleep fixed + sampled delay)
//!     → path_spec.rs (trim head, keep id)
//!     → forward.rs (POST trimmed path to its new head)
//!     → response bytes relayed upward unchanged
//! ```
//!
//! # Design Decisions
//! - Each hop builds a fresh trimmed PathSpec; nothing is mutated in place
//! - An empty trimmed path ends the chain with a completion marker, no I/O

pub mod forward;
pub mod path_spec;
pub mod site;

use axum::http::StatusCode;
use thiserror::Error;

pub use forward::Forwarder;
pub use path_spec::PathSpec;
pub use site::SiteSpec;

/// Errors raised while delaying against or forwarding a path.
#[derive(Debug, Error)]
pub enum PathError {
    /// Delay requested on a path with no sites.
    #[error("path has no sites")]
    EmptyPath,

    /// Trimmed path could not be serialized.
    #[error("failed to encode path: {0}")]
    Encode(#[from] serde_json::Error),

    /// Next hop address is not a usable URL.
    #[error("invalid site address {addr:?}: {reason}")]
    InvalidAddress { addr: String, reason: String },

    /// Outbound request could not be built.
    #[error("failed to build forward request: {0}")]
    Request(#[from] axum::http::Error),

    /// Connection or protocol failure talking to the next hop.
    #[error("forward to {addr} failed: {source}")]
    Transport {
        addr: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    /// Next hop answered with a non-2xx status.
    #[error("{addr} returned {status}: {body}")]
    UpstreamStatus {
        addr: String,
        status: StatusCode,
        body: String,
    },

    /// Response body could not be read.
    #[error("failed to read response from {addr}: {reason}")]
    Body { addr: String, reason: String },
}

pub type PathResult<T> = Result<T, PathError>;
