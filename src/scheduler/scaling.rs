//! Autoscaling policy.
//!
//! Compares one request's queuing delay with its service time:
//!
//! ```text
//! queuing * 2 < service   → ScaleDown   (workers sit idle)
//! queuing > service * 2   → ScaleUp     (requests pile up)
//! otherwise               → Hold
//! ```
//!
//! The band between the two thresholds keeps the pool from oscillating.
//! Each decision uses a single sample; there is no smoothing.

use std::time::Duration;

/// Outcome of one policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingDecision {
    ScaleUp,
    ScaleDown,
    Hold,
}

impl ScalingDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalingDecision::ScaleUp => "up",
            ScalingDecision::ScaleDown => "down",
            ScalingDecision::Hold => "hold",
        }
    }
}

/// Evaluate the hysteresis policy for one completed request.
pub fn evaluate(queuing_delay: Duration, service_time: Duration) -> ScalingDecision {
    if queuing_delay.saturating_mul(2) < service_time {
        ScalingDecision::ScaleDown
    } else if queuing_delay > service_time.saturating_mul(2) {
        ScalingDecision::ScaleUp
    } else {
        ScalingDecision::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_idle_pool_scales_down() {
        assert_eq!(evaluate(ms(1), ms(10)), ScalingDecision::ScaleDown);
        assert_eq!(evaluate(ms(0), ms(1)), ScalingDecision::ScaleDown);
    }

    #[test]
    fn test_backlog_scales_up() {
        assert_eq!(evaluate(ms(21), ms(10)), ScalingDecision::ScaleUp);
        assert_eq!(evaluate(ms(1), ms(0)), ScalingDecision::ScaleUp);
    }

    #[test]
    fn test_hysteresis_band_holds() {
        assert_eq!(evaluate(ms(5), ms(10)), ScalingDecision::Hold);
        assert_eq!(evaluate(ms(10), ms(10)), ScalingDecision::Hold);
        assert_eq!(evaluate(ms(20), ms(10)), ScalingDecision::Hold);
        assert_eq!(evaluate(Duration::ZERO, Duration::ZERO), ScalingDecision::Hold);
    }
}
