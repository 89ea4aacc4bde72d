//! Per-hop response text.

use std::time::Duration;

use axum::body::Bytes;

use crate::path::PathResult;

/// What one hop did, plus whatever came back from further down the path.
#[derive(Debug)]
pub struct HopReport {
    pub site: String,
    pub queuing_delay: Duration,
    pub service_time: Duration,
    pub downstream: PathResult<Bytes>,
}

impl HopReport {
    /// `site: <addr>; queuing delay: <d>; service time: <d>` followed by the
    /// downstream bytes, or by the forwarding error.
    pub fn render(&self) -> Bytes {
        let mut out = format!(
            "site: {}; queuing delay: {:?}; service time: {:?}\n",
            self.site, self.queuing_delay, self.service_time
        )
        .into_bytes();

        match &self.downstream {
            Ok(body) => out.extend_from_slice(body),
            Err(e) => out.extend_from_slice(
                format!("Error occurred on site {} when forwarding: {}\n", self.site, e).as_bytes(),
            ),
        }
        Bytes::from(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathError;

    #[test]
    fn test_render_relays_downstream_unchanged() {
        let report = HopReport {
            site: "http://a".into(),
            queuing_delay: Duration::from_millis(3),
            service_time: Duration::from_millis(12),
            downstream: Ok(Bytes::from_static(b"site: http://b; ...\nfinished path x\n")),
        };
        assert_eq!(
            report.render(),
            Bytes::from_static(
                b"site: http://a; queuing delay: 3ms; service time: 12ms\n\
                  site: http://b; ...\nfinished path x\n"
            )
        );
    }

    #[test]
    fn test_render_forward_error() {
        let report = HopReport {
            site: "http://a".into(),
            queuing_delay: Duration::ZERO,
            service_time: Duration::ZERO,
            downstream: Err(PathError::EmptyPath),
        };
        let text = String::from_utf8(report.render().to_vec()).unwrap();
        assert_eq!(
            text,
            "site: http://a; queuing delay: 0ns; service time: 0ns\n\
             Error occurred on site http://a when forwarding: path has no sites\n"
        );
    }
}
