//! Statistical service-time distributions.
//!
//! # Supported distributions
//! - `poisson` / `exponential`: exponentially distributed gaps, parameter
//!   `lambda` (events per second, default 500)
//! - `uniform`: parameters `min` and `max` in seconds
//!
//! Unknown names sample zero.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::delay::DelayGenerator;

const DEFAULT_LAMBDA: f64 = 500.0;

/// A named distribution with numeric parameters.
///
/// Parameters are kept ordered so rendering stays deterministic.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Distribution {
    #[serde(rename = "type")]
    pub name: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, f64>,
}

impl Distribution {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: f64) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    fn parameter(&self, key: &str, default: f64) -> f64 {
        self.parameters.get(key).copied().unwrap_or(default)
    }

    /// Draw a sample in seconds.
    fn sample_secs<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self.name.to_ascii_lowercase().as_str() {
            "poisson" | "exponential" => {
                let lambda = self.parameter("lambda", DEFAULT_LAMBDA);
                if !lambda.is_finite() || lambda <= 0.0 {
                    return 0.0;
                }
                // Inverse transform; 1 - u keeps ln away from zero.
                let u: f64 = rng.gen();
                -(1.0 - u).ln() / lambda
            }
            "uniform" => {
                let min = self.parameter("min", 0.0);
                let max = self.parameter("max", 0.0);
                if !(min.is_finite() && max.is_finite()) || min < 0.0 || max <= min {
                    return min.max(0.0);
                }
                rng.gen_range(min..max)
            }
            _ => 0.0,
        }
    }

    /// Sample using the supplied RNG.
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::try_from_secs_f64(self.sample_secs(rng)).unwrap_or(Duration::ZERO)
    }
}

impl DelayGenerator for Distribution {
    fn next_delay(&self) -> Duration {
        self.sample_with(&mut rand::thread_rng())
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.parameters.is_empty() {
            return Ok(());
        }
        write!(f, "(")?;
        for (i, (k, v)) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_unknown_distribution_is_zero() {
        let dist = Distribution::new("pareto").with_parameter("alpha", 2.0);
        assert_eq!(dist.next_delay(), Duration::ZERO);
    }

    #[test]
    fn test_poisson_mean_tracks_lambda() {
        let dist = Distribution::new("Poisson").with_parameter("lambda", 100.0);
        let mut rng = StdRng::seed_from_u64(7);
        let n = 20_000;
        let total: f64 = (0..n).map(|_| dist.sample_with(&mut rng).as_secs_f64()).sum();
        let mean = total / n as f64;
        // Expected mean is 1 / lambda = 10ms.
        assert!(mean > 0.008 && mean < 0.012, "mean was {}", mean);
    }

    #[test]
    fn test_poisson_default_lambda() {
        let dist = Distribution::new("poisson");
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            // Default rate of 500/s: samples are overwhelmingly sub-second.
            assert!(dist.sample_with(&mut rng) < Duration::from_secs(1));
        }
    }

    #[test]
    fn test_invalid_lambda_is_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        let zero = Distribution::new("poisson").with_parameter("lambda", 0.0);
        let negative = Distribution::new("exponential").with_parameter("lambda", -4.0);
        assert_eq!(zero.sample_with(&mut rng), Duration::ZERO);
        assert_eq!(negative.sample_with(&mut rng), Duration::ZERO);
    }

    #[test]
    fn test_uniform_bounds() {
        let dist = Distribution::new("uniform")
            .with_parameter("min", 0.01)
            .with_parameter("max", 0.02);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let d = dist.sample_with(&mut rng);
            assert!(d >= Duration::from_millis(10) && d < Duration::from_millis(20));
        }
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{"type":"poisson","parameters":{"lambda":500}}"#;
        let dist: Distribution = serde_json::from_str(json).unwrap();
        assert_eq!(dist.name, "poisson");
        assert_eq!(dist.parameters.get("lambda"), Some(&500.0));
        assert_eq!(dist.to_string(), "poisson(lambda=500)");
    }
}
