use crate::num::ln_gamma;
use crate::view::DiscreteView;

use thiserror::Error;

/// Error type for Poisson distribution construction failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoissonError {
    /// The provided rate is not strictly positive and finite.
    #[error("the rate should be strictly positive and finite")]
    BadRate,
}

/// The Poisson distribution.
///
/// The probability mass function is:
///
/// ```text
/// p(k) = λ^k exp(-λ) / k!
/// ```
///
/// where the rate `λ` is strictly positive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Poisson {
    rate: f64,
    ln_rate: f64,
}

impl Poisson {
    /// Constructs a Poisson distribution with the specified rate.
    pub fn new(rate: f64) -> Result<Self, PoissonError> {
        if !(rate > 0.0) || !rate.is_finite() {
            return Err(PoissonError::BadRate);
        }

        Ok(Self {
            rate,
            ln_rate: rate.ln(),
        })
    }
}

impl DiscreteView for Poisson {
    fn pmf(&self, k: i64) -> f64 {
        if k < 0 {
            return 0.0;
        }
        let k = k as f64;

        (k * self.ln_rate - self.rate - ln_gamma(k + 1.0)).exp()
    }
    fn domain(&self) -> (i64, i64) {
        (0, i64::MAX)
    }
    fn mode(&self) -> Option<i64> {
        Some(self.rate.floor() as i64)
    }
    fn pmf_sum(&self) -> Option<f64> {
        Some(1.0)
    }
}
