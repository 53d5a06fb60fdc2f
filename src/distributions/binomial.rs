use crate::num::ln_gamma;
use crate::view::DiscreteView;

use thiserror::Error;

/// Error type for binomial distribution construction failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BinomialError {
    /// The provided success probability is not in `(0, 1)`.
    #[error("the success probability should be in (0, 1)")]
    BadProbability,
}

/// The binomial distribution.
///
/// The probability mass function is:
///
/// ```text
/// p(k) = C(n, k) p^k (1 - p)^(n - k)
/// ```
///
/// for `0 <= k <= n`, where the success probability `p` lies in `(0, 1)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Binomial {
    n: u32,
    p: f64,
    ln_p: f64,
    ln_q: f64,
    ln_n_factorial: f64,
}

impl Binomial {
    /// Constructs a binomial distribution with `n` trials and success probability `p`.
    pub fn new(n: u32, p: f64) -> Result<Self, BinomialError> {
        if !(p > 0.0 && p < 1.0) {
            return Err(BinomialError::BadProbability);
        }

        Ok(Self {
            n,
            p,
            ln_p: p.ln(),
            ln_q: (-p).ln_1p(),
            ln_n_factorial: ln_gamma(n as f64 + 1.0),
        })
    }
}

impl DiscreteView for Binomial {
    fn pmf(&self, k: i64) -> f64 {
        if k < 0 || k > self.n as i64 {
            return 0.0;
        }
        let (k, n) = (k as f64, self.n as f64);

        (self.ln_n_factorial - ln_gamma(k + 1.0) - ln_gamma(n - k + 1.0)
            + k * self.ln_p
            + (n - k) * self.ln_q)
            .exp()
    }
    fn domain(&self) -> (i64, i64) {
        (0, self.n as i64)
    }
    fn mode(&self) -> Option<i64> {
        let m = ((self.n as f64 + 1.0) * self.p).floor() as i64;

        Some(m.min(self.n as i64))
    }
    fn pmf_sum(&self) -> Option<f64> {
        Some(1.0)
    }
}
