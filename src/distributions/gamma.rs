use crate::num::ln_gamma;
use crate::view::{DifferentiableView, DistributionView};

use thiserror::Error;

/// Error type for gamma distribution construction failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GammaError {
    /// The provided shape parameter is not strictly positive.
    #[error("the shape parameter should be strictly positive")]
    BadShape,
    /// The provided scale parameter is not strictly positive.
    #[error("the scale parameter should be strictly positive")]
    BadScale,
}

/// The gamma distribution.
///
/// The probability density function is:
///
/// ```text
/// f(x) = x^(k - 1) exp(-x / θ) / (Γ(k) θ^k)
/// ```
///
/// where the shape parameter `k` and the scale parameter `θ` are strictly
/// positive. The view exposes the unnormalized density
/// `x^(k - 1) exp(-x / θ)`.
///
/// For `k < 1` the density has a pole at the origin, which is then reported
/// as the mode; such a view suits [`PoleHat`](crate::methods::PoleHat).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Gamma {
    shape: f64,
    scale: f64,
    m: f64,         // shape - 1
    inv_scale: f64, // 1 / scale
}

impl Gamma {
    /// Constructs a gamma distribution with the specified shape and scale.
    pub fn new(shape: f64, scale: f64) -> Result<Self, GammaError> {
        if !(shape > 0.0) {
            return Err(GammaError::BadShape);
        }
        if !(scale > 0.0) {
            return Err(GammaError::BadScale);
        }

        Ok(Self {
            shape,
            scale,
            m: shape - 1.0,
            inv_scale: 1.0 / scale,
        })
    }
}

impl DistributionView for Gamma {
    #[inline]
    fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            return 0.0;
        }
        x.powf(self.m) * (-x * self.inv_scale).exp()
    }
    fn domain(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }
    fn mode(&self) -> Option<f64> {
        Some(if self.m > 0.0 { self.m * self.scale } else { 0.0 })
    }
    fn pdf_area(&self) -> Option<f64> {
        Some((ln_gamma(self.shape) + self.shape * self.scale.ln()).exp())
    }
}

impl DifferentiableView for Gamma {
    fn dpdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            return 0.0;
        }
        (self.m / x - self.inv_scale) * self.pdf(x)
    }
}
