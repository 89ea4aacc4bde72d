//! Recursive delay sites: a chain of HTTP services that each queue, delay and
//! relay a path, used to study queuing behaviour across a pipeline.

pub mod config;
pub mod delay;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod path;
pub mod scheduler;
pub mod site;

pub use config::SiteConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use path::{PathSpec, SiteSpec};
pub use scheduler::Scheduler;
pub use site::Site;
