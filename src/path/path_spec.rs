//! Path itinerary: the remaining hops plus a correlation id.

use std::fmt;

use axum::body::Bytes;
use serde::{Deserialize, Serialize};

use crate::path::{Forwarder, PathError, PathResult, SiteSpec};

/// Ordered remaining sites; the head is the hop being served.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PathSpec {
    pub sites: Vec<SiteSpec>,

    /// Opaque id carried unchanged across every hop.
    #[serde(default)]
    pub id: String,
}

impl PathSpec {
    pub fn new(id: impl Into<String>, sites: Vec<SiteSpec>) -> Self {
        Self {
            sites,
            id: id.into(),
        }
    }

    pub fn head(&self) -> Option<&SiteSpec> {
        self.sites.first()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Sleep for the head site's service time.
    pub fn delay_at_head(&self) -> PathResult<()> {
        let site = self.head().ok_or(PathError::EmptyPath)?;
        site.delay_by_sleeping();
        Ok(())
    }

    /// A new path without the head; same id.
    pub fn trimmed(&self) -> PathSpec {
        PathSpec {
            sites: self.sites.iter().skip(1).cloned().collect(),
            id: self.id.clone(),
        }
    }

    /// Text returned once no hops remain.
    pub fn completion_marker(&self) -> Bytes {
        Bytes::from(format!("finished path {}\n", self.id))
    }

    /// Relay the rest of the path and return the downstream response body.
    ///
    /// The trimmed path is posted to its own head, which serves it with the
    /// same protocol. A path with nothing left after the head short-circuits.
    pub async fn forward_to_next_hop(&self, forwarder: &Forwarder) -> PathResult<Bytes> {
        let next = self.trimmed();
        let Some(target) = next.head() else {
            tracing::debug!(path_id = %self.id, "Path finished");
            return Ok(next.completion_marker());
        };

        let body = serde_json::to_vec(&next)?;
        forwarder.post(&target.addr, &next.id, body).await
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "id: {}", self.id)?;
        for site in &self.sites {
            writeln!(f, "{}", site)?;
        }
        Ok(())
    }
}
