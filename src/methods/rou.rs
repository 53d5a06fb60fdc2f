//! Simple ratio-of-uniforms for `T_{-1/2}`-concave densities.
//!
//! The hat is built from the mode `m`, the density at the mode and the area
//! below the density alone. In coordinates centered on the mode it is flat
//! over `[xl, xr]` and decays as `1/x²` outside:
//!
//! ```text
//! h(x) = vl²/x²    x < xl
//! h(x) = f(m)      xl <= x <= xr
//! h(x) = vr²/x²    x > xr
//! ```
//!
//! When the CDF at the mode is known the hat area is twice the area below
//! the density, otherwise it is four times that area.

use super::Verifier;
use crate::error::ConstructionError;
use crate::num::{not_above, UniformSource};
use crate::view::DistributionView;
use crate::Distribution;

use rand_core::RngCore;

/// Configuration of a `RouHat`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RouConfig {
    /// Overrides the density at the mode.
    pub pdf_at_mode: Option<f64>,
    /// Overrides the CDF at the mode.
    pub cdf_at_mode: Option<f64>,
    /// Accept without density evaluation below a quarter of the mode height.
    pub use_squeeze: bool,
    pub verify: bool,
}

impl Default for RouConfig {
    fn default() -> Self {
        Self {
            pdf_at_mode: None,
            cdf_at_mode: None,
            use_squeeze: false,
            verify: false,
        }
    }
}

impl RouConfig {
    pub fn with_pdf_at_mode(mut self, fm: f64) -> Self {
        self.pdf_at_mode = Some(fm);
        self
    }
    pub fn with_cdf_at_mode(mut self, cdf: f64) -> Self {
        self.cdf_at_mode = Some(cdf);
        self
    }
    pub fn with_squeeze(mut self, use_squeeze: bool) -> Self {
        self.use_squeeze = use_squeeze;
        self
    }
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

/// Ratio-of-uniforms sampler with a fixed hat.
#[derive(Clone, Debug)]
pub struct RouHat<D> {
    dist: D,
    mode: f64,
    domain: (f64, f64),
    fm: f64,
    vl: f64,
    vr: f64,
    xl: f64,
    xr: f64,
    area_left: f64,   // hat area left of xl
    area_center: f64, // hat area left of xr
    area_total: f64,  // hat area over the whole real line
    h_min: f64,
    h_max: f64,
    uses_cdf_at_mode: bool,
    use_squeeze: bool,
    verifier: Verifier,
}

impl<D: DistributionView> RouHat<D> {
    /// Constructs the hat.
    ///
    /// The view must provide the mode and the area below the density.
    pub fn new(dist: D, config: &RouConfig) -> Result<Self, ConstructionError> {
        let mode = dist
            .mode()
            .ok_or(ConstructionError::Precondition("the mode is required"))?;
        let area = dist
            .pdf_area()
            .ok_or(ConstructionError::Precondition("the area below the density is required"))?;
        if !(area > 0.0) || !area.is_finite() {
            return Err(ConstructionError::Precondition(
                "the area below the density must be positive and finite",
            ));
        }
        let (lo, hi) = dist.domain();
        if !(lo < hi) {
            return Err(ConstructionError::DegenerateDistribution(
                "the domain is empty",
            ));
        }
        if !(lo <= mode && mode <= hi) {
            return Err(ConstructionError::Precondition(
                "the mode lies outside the domain",
            ));
        }
        if !mode.is_finite() {
            return Err(ConstructionError::Precondition("the mode must be finite"));
        }

        let fm = config.pdf_at_mode.unwrap_or_else(|| dist.pdf(mode));
        if !(fm > 0.0) || !fm.is_finite() {
            return Err(ConstructionError::DegenerateDistribution(
                "the density at the mode is not positive",
            ));
        }
        let um = fm.sqrt();

        let cdf_at_mode = match config.cdf_at_mode {
            Some(cdf) => {
                if !(cdf >= 0.0 && cdf <= 1.0) {
                    return Err(ConstructionError::Precondition(
                        "the CDF at the mode must lie in [0, 1]",
                    ));
                }
                Some(cdf)
            }
            None => dist.cdf_at_mode().filter(|cdf| *cdf >= 0.0 && *cdf <= 1.0),
        };

        let (vl, vr) = match cdf_at_mode {
            Some(cdf) => (-cdf * area / um, (1.0 - cdf) * area / um),
            None => (-area / um, area / um),
        };
        let xl = vl / um;
        let xr = vr / um;
        let area_left = -vl * um;
        let area_center = area_left + fm * (xr - xl);
        let area_total = area_center + vr * um;

        // The squeeze only lies below the density for the hat built from
        // the CDF at the mode.
        let use_squeeze = config.use_squeeze && cdf_at_mode.is_some();
        if config.use_squeeze && !use_squeeze {
            tracing::debug!("squeeze disabled: the CDF at the mode is unknown");
        }

        let mut hat = Self {
            dist,
            mode,
            domain: (lo, hi),
            fm,
            vl,
            vr,
            xl,
            xr,
            area_left,
            area_center,
            area_total,
            h_min: 0.0,
            h_max: area_total,
            uses_cdf_at_mode: cdf_at_mode.is_some(),
            use_squeeze,
            verifier: Verifier::new(config.verify),
        };

        // Cut away the hat area outside a bounded domain.
        hat.h_min = hat.cumulative(lo - mode);
        hat.h_max = hat.cumulative(hi - mode);
        if !(hat.h_max > hat.h_min) {
            return Err(ConstructionError::DegenerateDistribution(
                "the hat has no area over the domain",
            ));
        }

        tracing::debug!(
            fm,
            vl,
            vr,
            total_area = hat.h_max - hat.h_min,
            uses_cdf_at_mode = hat.uses_cdf_at_mode,
            "ratio-of-uniforms hat constructed"
        );

        Ok(hat)
    }
}

impl<D> RouHat<D> {
    // Hat area left of `x`, in coordinates centered on the mode.
    fn cumulative(&self, x: f64) -> f64 {
        if x <= self.xl {
            if self.vl == 0.0 || x == f64::NEG_INFINITY {
                0.0
            } else {
                self.vl * self.vl / -x
            }
        } else if x < self.xr {
            self.area_left + self.fm * (x - self.xl)
        } else if self.vr == 0.0 || x == f64::INFINITY {
            self.area_total
        } else {
            self.area_total - self.vr * self.vr / x
        }
    }

    // Hat in coordinates centered on the mode.
    fn centered_hat(&self, x: f64) -> f64 {
        if x < self.xl {
            self.vl * self.vl / (x * x)
        } else if x <= self.xr {
            self.fm
        } else {
            self.vr * self.vr / (x * x)
        }
    }

    // Band where the squeeze `fm/4` is valid; empty without the CDF at the
    // mode.
    fn in_squeeze_zone(&self, x: f64) -> bool {
        if !self.uses_cdf_at_mode {
            return false;
        }
        let x2 = x + x;
        x2 >= self.xl && x2 <= self.xr
    }

    /// Area below the hat over the domain.
    pub fn total_area(&self) -> f64 {
        self.h_max - self.h_min
    }

    /// Whether the CDF at the mode was used to tighten the hat.
    pub fn uses_cdf_at_mode(&self) -> bool {
        self.uses_cdf_at_mode
    }

    pub fn hat(&self, x: f64) -> f64 {
        if x < self.domain.0 || x > self.domain.1 {
            return 0.0;
        }
        self.centered_hat(x - self.mode)
    }

    /// Squeeze at `x`, whether or not it is enabled for sampling.
    ///
    /// The squeeze is zero unless the CDF at the mode is known.
    pub fn squeeze(&self, x: f64) -> f64 {
        if x < self.domain.0 || x > self.domain.1 || !self.in_squeeze_zone(x - self.mode) {
            return 0.0;
        }
        0.25 * self.fm
    }

    pub fn set_verify(&mut self, verify: bool) {
        self.verifier.set_enabled(verify);
    }
    pub fn verify_failures(&self) -> u64 {
        self.verifier.failures()
    }
}

impl<D: DistributionView> Distribution<f64> for RouHat<D> {
    fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> f64 {
        loop {
            let u = self.h_min + rng.next_uniform() * (self.h_max - self.h_min);

            // Invert the cumulative hat area and take the hat height there.
            let (x, h) = if u < self.area_left {
                let x = -self.vl * self.vl / u;
                let r = u / self.vl;
                (x, r * r)
            } else if u <= self.area_center {
                (self.xl + (u - self.area_left) / self.fm, self.fm)
            } else {
                let rest = self.area_total - u;
                let r = rest / self.vr;
                (self.vr * self.vr / rest, r * r)
            };
            let value = x + self.mode;
            if !value.is_finite() || value < self.domain.0 || value > self.domain.1 {
                continue;
            }
            let y = rng.next_uniform() * h;

            let squeezed = self.use_squeeze && y <= 0.25 * self.fm && self.in_squeeze_zone(x);
            if squeezed && !self.verifier.is_enabled() {
                return value;
            }

            let fx = self.dist.pdf(value);
            if self.verifier.is_enabled() {
                if !not_above(fx, h) {
                    self.verifier.report("rou", "density above hat", value, fx, h);
                }
                if self.in_squeeze_zone(x) && fx < 0.25 * self.fm {
                    self.verifier
                        .report("rou", "density below squeeze", value, fx, 0.25 * self.fm);
                }
            }
            if squeezed || y <= fx {
                return value;
            }
        }
    }
}
