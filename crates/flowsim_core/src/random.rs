//! Random draws used by the simulation.
//!
//! Every draw goes through [`RandomSource`] so that a run is fully determined by
//! its seed. Any [`rand::Rng`] is a random source.

use rand::Rng;
use rand::distr::Distribution;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Source of uniform and Beta-distributed draws
pub trait RandomSource: Send {
    /// A uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// A draw from the given Beta distribution, in `[0, 1]`.
    fn beta(&mut self, dist: &BetaDistribution) -> f64;
}

impl<R: Rng + Send> RandomSource for R {
    fn uniform(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn beta(&mut self, dist: &BetaDistribution) -> f64 {
        dist.inner.sample(self)
    }
}

/// Create the seeded generator used for a simulation run.
pub fn seeded(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Shape parameters of a Beta distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaParams {
    pub alpha: f64,
    pub beta: f64,
}

/// A validated Beta distribution, serialized as its shape parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BetaParams", into = "BetaParams")]
pub struct BetaDistribution {
    params: BetaParams,
    inner: rand_distr::Beta<f64>,
}

impl BetaDistribution {
    pub fn new(alpha: f64, beta: f64) -> Result<Self, ConfigError> {
        let inner = rand_distr::Beta::new(alpha, beta)
            .map_err(|_| ConfigError::InvalidDistribution { alpha, beta })?;
        Ok(Self {
            params: BetaParams { alpha, beta },
            inner,
        })
    }

    pub fn params(&self) -> BetaParams {
        self.params
    }
}

impl PartialEq for BetaDistribution {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
    }
}

impl TryFrom<BetaParams> for BetaDistribution {
    type Error = ConfigError;

    fn try_from(params: BetaParams) -> Result<Self, Self::Error> {
        BetaDistribution::new(params.alpha, params.beta)
    }
}

impl From<BetaDistribution> for BetaParams {
    fn from(dist: BetaDistribution) -> Self {
        dist.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_beta_rejected() {
        assert!(BetaDistribution::new(0.0, 1.0).is_err());
        assert!(BetaDistribution::new(1.0, -2.0).is_err());
        assert!(BetaDistribution::new(1.0, 4.0).is_ok());
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let dist = BetaDistribution::new(3.0, 8.0).unwrap();
        let mut a = seeded(11);
        let mut b = seeded(11);
        for _ in 0..100 {
            assert_eq!(a.uniform(), b.uniform());
            let draw = a.beta(&dist);
            assert_eq!(draw, b.beta(&dist));
            assert!((0.0..=1.0).contains(&draw));
        }
    }

    #[test]
    fn test_serde_as_params() {
        let dist: BetaDistribution = serde_json::from_str(r#"{"alpha":1.0,"beta":4.0}"#).unwrap();
        assert_eq!(dist.params(), BetaParams { alpha: 1.0, beta: 4.0 });
        assert!(serde_json::from_str::<BetaDistribution>(r#"{"alpha":0.0,"beta":4.0}"#).is_err());
    }
}
