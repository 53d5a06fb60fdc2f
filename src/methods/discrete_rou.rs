//! Discrete simple ratio-of-uniforms for `T_{-1/2}`-concave mass functions.
//!
//! The mass function is turned into the step density `p(floor(x))` and
//! sampled by ratio-of-uniforms. The enclosing region is the union of two
//! rectangles in the `(u, v)` plane, one on each side of the mode, with
//! heights `ul = sqrt(p(m-1))` and `ur = sqrt(p(m))`. Both rectangles are
//! sampled through a single uniform `W` in `[al, ar]` scaled by the height
//! of the side it falls on.

use super::Verifier;
use crate::error::ConstructionError;
use crate::num::{not_above, UniformSource};
use crate::view::DiscreteView;
use crate::Distribution;

use rand_core::RngCore;

/// Configuration of a `DiscreteRouHat`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DiscreteRouConfig {
    /// Overrides the mass at the mode.
    pub pmf_at_mode: Option<f64>,
    /// Overrides `P(X <= mode)`.
    pub cdf_at_mode: Option<f64>,
    pub verify: bool,
}

impl DiscreteRouConfig {
    pub fn with_pmf_at_mode(mut self, pm: f64) -> Self {
        self.pmf_at_mode = Some(pm);
        self
    }
    pub fn with_cdf_at_mode(mut self, cdf: f64) -> Self {
        self.cdf_at_mode = Some(cdf);
        self
    }
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

/// Ratio-of-uniforms sampler for discrete distributions.
#[derive(Clone, Debug)]
pub struct DiscreteRouHat<D> {
    dist: D,
    mode: i64,
    domain: (i64, i64),
    ul: f64,
    ur: f64,
    al: f64,
    ar: f64,
    uses_cdf_at_mode: bool,
    verifier: Verifier,
}

impl<D: DiscreteView> DiscreteRouHat<D> {
    /// Constructs the enclosing region.
    ///
    /// The view must provide the mode and the sum of the mass function.
    pub fn new(dist: D, config: &DiscreteRouConfig) -> Result<Self, ConstructionError> {
        let mode = dist
            .mode()
            .ok_or(ConstructionError::Precondition("the mode is required"))?;
        let sum = dist
            .pmf_sum()
            .ok_or(ConstructionError::Precondition("the sum of the mass function is required"))?;
        if !(sum > 0.0) || !sum.is_finite() {
            return Err(ConstructionError::Precondition(
                "the sum of the mass function must be positive and finite",
            ));
        }
        let (lo, hi) = dist.domain();
        if lo > hi {
            return Err(ConstructionError::DegenerateDistribution(
                "the domain is empty",
            ));
        }
        if mode < lo || mode > hi {
            return Err(ConstructionError::Precondition(
                "the mode lies outside the domain",
            ));
        }

        let pm = config.pmf_at_mode.unwrap_or_else(|| dist.pmf(mode));
        if !(pm > 0.0) || !pm.is_finite() {
            return Err(ConstructionError::DegenerateDistribution(
                "the mass at the mode is not positive",
            ));
        }
        let pbm = if mode > lo { dist.pmf(mode - 1) } else { 0.0 };
        if !(pbm >= 0.0) || !pbm.is_finite() {
            return Err(ConstructionError::Precondition(
                "the mass function must be finite and non-negative",
            ));
        }
        let ul = pbm.sqrt();
        let ur = pm.sqrt();

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

        let (mut al, ar) = match cdf_at_mode {
            Some(cdf) => {
                let al = -(cdf * sum - pm);
                (al, al + sum)
            }
            None => (-(sum - pm), sum),
        };
        if ul == 0.0 {
            al = 0.0;
        }
        // The left rectangle cannot extend right of the origin.
        let al = al.min(0.0);
        if !(ar > al) {
            return Err(ConstructionError::DegenerateDistribution(
                "the enclosing region is empty",
            ));
        }

        tracing::debug!(
            mode,
            ul,
            ur,
            al,
            ar,
            uses_cdf_at_mode = cdf_at_mode.is_some(),
            "discrete ratio-of-uniforms region constructed"
        );

        Ok(Self {
            dist,
            mode,
            domain: (lo, hi),
            ul,
            ur,
            al,
            ar,
            uses_cdf_at_mode: cdf_at_mode.is_some(),
            verifier: Verifier::new(config.verify),
        })
    }
}

impl<D> DiscreteRouHat<D> {
    /// Area of the enclosing region, in units of the mass function.
    pub fn total_area(&self) -> f64 {
        self.ar - self.al
    }

    /// Bounds `(al, ar)` of the enclosing region before scaling.
    pub fn bounds(&self) -> (f64, f64) {
        (self.al, self.ar)
    }

    pub fn uses_cdf_at_mode(&self) -> bool {
        self.uses_cdf_at_mode
    }

    pub fn set_verify(&mut self, verify: bool) {
        self.verifier.set_enabled(verify);
    }
    pub fn verify_failures(&self) -> u64 {
        self.verifier.failures()
    }
}

impl<D: DiscreteView> DiscreteRouHat<D> {
    /// Checks that the point `k` with mass `pk` lies inside the region.
    fn check(&self, k: i64, pk: f64) {
        let sp = pk.sqrt();
        let (offset, u_side, v_side) = if k >= self.mode {
            (k as f64 - self.mode as f64 + 1.0, self.ur, self.ar / self.ur)
        } else {
            (self.mode as f64 - k as f64, self.ul, -self.al / self.ul)
        };
        if !not_above(sp, u_side) {
            self.verifier
                .report("discrete_rou", "mass above region height", k as f64, pk, u_side * u_side);
        }
        if !not_above(sp * offset, v_side) {
            self.verifier
                .report("discrete_rou", "mass outside region width", k as f64, pk, v_side);
        }
    }
}

impl<D: DiscreteView> Distribution<i64> for DiscreteRouHat<D> {
    fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> i64 {
        let (lo, hi) = (self.domain.0 as f64, self.domain.1 as f64);
        loop {
            let w = self.al + rng.next_uniform() * (self.ar - self.al);
            let u_side = if w < 0.0 { self.ul } else { self.ur };
            let v = w / u_side;
            let u = u_side * rng.next_open_uniform();

            let x = (v / u).floor() + self.mode as f64;
            if !(x >= lo && x <= hi) {
                continue;
            }
            let k = x as i64;

            let pk = self.dist.pmf(k);
            if self.verifier.is_enabled() {
                self.check(k, pk);
            }
            if u * u <= pk {
                return k;
            }
        }
    }
}
