use crate::view::{DifferentiableView, DistributionView};

use thiserror::Error;

/// Error type for Weibull distribution construction failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeibullError {
    /// The provided shape parameter is not strictly positive.
    #[error("the shape parameter should be strictly positive")]
    BadShape,
    /// The provided scale parameter is not strictly positive.
    #[error("the scale parameter should be strictly positive")]
    BadScale,
}

/// The Weibull distribution.
///
/// The probability density function is:
///
/// ```text
/// f(x) = (k/λ) (x/λ)^(k - 1) exp(-(x/λ)^k)
/// ```
///
/// where the shape parameter `k` and the scale parameter `λ` are strictly
/// positive. For `k < 1` the density has a pole at the origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Weibull {
    shape: f64,
    scale: f64,
    inv_scale: f64,
}

impl Weibull {
    /// Constructs a Weibull distribution with the specified shape and scale.
    pub fn new(shape: f64, scale: f64) -> Result<Self, WeibullError> {
        if !(shape > 0.0) {
            return Err(WeibullError::BadShape);
        }
        if !(scale > 0.0) {
            return Err(WeibullError::BadScale);
        }

        Ok(Self {
            shape,
            scale,
            inv_scale: 1.0 / scale,
        })
    }
}

impl DistributionView for Weibull {
    #[inline]
    fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            return 0.0;
        }
        let z = x * self.inv_scale;

        self.shape * self.inv_scale * z.powf(self.shape - 1.0) * (-z.powf(self.shape)).exp()
    }
    fn domain(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }
    fn mode(&self) -> Option<f64> {
        Some(if self.shape > 1.0 {
            self.scale * ((self.shape - 1.0) / self.shape).powf(1.0 / self.shape)
        } else {
            0.0
        })
    }
    fn pdf_area(&self) -> Option<f64> {
        Some(1.0)
    }
    fn cdf(&self, x: f64) -> Option<f64> {
        if x <= 0.0 {
            return Some(0.0);
        }
        Some(1.0 - (-(x * self.inv_scale).powf(self.shape)).exp())
    }
}

impl DifferentiableView for Weibull {
    fn dpdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            return 0.0;
        }
        let z = x * self.inv_scale;

        ((self.shape - 1.0) / x - self.shape * self.inv_scale * z.powf(self.shape - 1.0))
            * self.pdf(x)
    }
}
