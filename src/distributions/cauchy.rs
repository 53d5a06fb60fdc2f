use crate::view::{DifferentiableView, DistributionView};

use std::f64::consts::PI;
use thiserror::Error;

/// Error type for Cauchy distribution construction failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CauchyError {
    /// The provided scale parameter is not strictly positive.
    #[error("the scale parameter should be strictly positive")]
    BadScale,
}

/// The Cauchy distribution.
///
/// The probability density function is:
///
/// ```text
/// f(x) = 𝛾 / (π((x - x₀)² + 𝛾²))
/// ```
///
/// where `x₀` is the location parameter and where the scale parameter `𝛾` is
/// strictly positive. The view exposes the unnormalized density
/// `1 / (1 + ((x - x₀)/𝛾)²)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cauchy {
    location: f64,
    scale: f64,
    inv_scale: f64,
}

impl Cauchy {
    /// Constructs a Cauchy distribution with the specified location and scale.
    pub fn new(location: f64, scale: f64) -> Result<Self, CauchyError> {
        if !(scale > 0.0) {
            return Err(CauchyError::BadScale);
        }

        Ok(Self {
            location,
            scale,
            inv_scale: 1.0 / scale,
        })
    }
}

impl DistributionView for Cauchy {
    #[inline]
    fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.location) * self.inv_scale;

        1.0 / (1.0 + z * z)
    }
    fn mode(&self) -> Option<f64> {
        Some(self.location)
    }
    fn pdf_area(&self) -> Option<f64> {
        Some(PI * self.scale)
    }
    fn cdf(&self, x: f64) -> Option<f64> {
        Some(0.5 + ((x - self.location) * self.inv_scale).atan() / PI)
    }
}

impl DifferentiableView for Cauchy {
    fn dpdf(&self, x: f64) -> f64 {
        let z = (x - self.location) * self.inv_scale;
        let v = 1.0 + z * z;

        -2.0 * z * self.inv_scale / (v * v)
    }
}
