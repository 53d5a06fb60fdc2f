use crate::view::{DifferentiableView, DistributionView};

use thiserror::Error;

/// Error type for normal distribution construction failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalError {
    /// The provided standard deviation is not strictly positive.
    #[error("the standard deviation should be strictly positive")]
    BadStdDev,
}

/// The normal distribution.
///
/// The probability density function is:
///
/// ```text
/// f(x) = exp(-(x - μ)² / (2σ²)) / (σ √(2π))
/// ```
///
/// where `μ` is the mean and the standard deviation `σ` is strictly
/// positive. The view exposes the unnormalized density, with maximum 1.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Normal {
    mean: f64,
    std_dev: f64,
    inv_square_std_dev: f64,
}

impl Normal {
    /// Constructs a normal distribution with the specified mean and standard deviation.
    pub fn new(mean: f64, std_dev: f64) -> Result<Self, NormalError> {
        if !(std_dev > 0.0) {
            return Err(NormalError::BadStdDev);
        }

        Ok(Self {
            mean,
            std_dev,
            inv_square_std_dev: 1.0 / (std_dev * std_dev),
        })
    }
}

impl DistributionView for Normal {
    #[inline]
    fn pdf(&self, x: f64) -> f64 {
        let dx = x - self.mean;

        (-0.5 * self.inv_square_std_dev * dx * dx).exp()
    }
    fn mode(&self) -> Option<f64> {
        Some(self.mean)
    }
    fn pdf_area(&self) -> Option<f64> {
        Some(self.std_dev * (2.0 * std::f64::consts::PI).sqrt())
    }
    fn cdf_at_mode(&self) -> Option<f64> {
        Some(0.5)
    }
}

impl DifferentiableView for Normal {
    fn dpdf(&self, x: f64) -> f64 {
        -self.inv_square_std_dev * (x - self.mean) * self.pdf(x)
    }
}
