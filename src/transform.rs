//! Power transforms used by transformed density rejection.
//!
//! For an exponent `c < 0` the transform is:
//!
//! ```text
//! T(x) = -x^c                          x > 0
//! T⁻¹(y) = (-y)^(1/c)                   y < 0
//! FT(y) = -(-y)^((c+1)/c) c/(c+1)       y < 0   (antiderivative of T⁻¹)
//! FT⁻¹(w) = -(-w (c+1)/c)^(c/(c+1))      w > 0
//! ```
//!
//! `T` is increasing, and a density is `T`-concave if `T(f)` is concave. The
//! case `c = -1/2` is the ratio-of-uniforms transform.

use thiserror::Error;

/// Largest admissible exponent.
pub const C_MAX: f64 = -0.1;

/// Exponents at or below this value are too close to -1 for a stable inverse.
pub const C_MIN: f64 = -0.999;

/// Error returned for exponents outside `(C_MIN, C_MAX]`.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("transform exponent {0} is outside the admissible range")]
pub struct TransformError(pub f64);

/// Power transform with a fixed exponent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PowerTransform {
    c: f64,
    inv_c: f64,
    p: f64,     // (c + 1) / c
    inv_p: f64, // c / (c + 1)
}

impl PowerTransform {
    /// Creates a transform, rejecting exponents outside `(C_MIN, C_MAX]`.
    pub fn new(c: f64) -> Result<Self, TransformError> {
        if !(c > C_MIN && c <= C_MAX) {
            return Err(TransformError(c));
        }
        let p = (c + 1.0) / c;

        Ok(Self {
            c,
            inv_c: 1.0 / c,
            p,
            inv_p: 1.0 / p,
        })
    }

    /// Exponent of the transform.
    pub fn exponent(&self) -> f64 {
        self.c
    }

    /// `T(x)`, defined for `x > 0`.
    #[inline]
    pub fn t(&self, x: f64) -> f64 {
        -x.powf(self.c)
    }

    /// `T⁻¹(y)`, defined for `y < 0`.
    #[inline]
    pub fn t_inv(&self, y: f64) -> f64 {
        (-y).powf(self.inv_c)
    }

    /// Derivative of `T` at `x > 0`.
    #[inline]
    pub fn dt(&self, x: f64) -> f64 {
        -self.c * x.powf(self.c - 1.0)
    }

    /// `FT(y)`, an antiderivative of `T⁻¹`, defined for `y < 0`.
    ///
    /// It is positive and vanishes as `y` tends to minus infinity.
    #[inline]
    pub fn ft(&self, y: f64) -> f64 {
        -(-y).powf(self.p) * self.inv_p
    }

    /// `FT⁻¹(w)`, defined for `w > 0`.
    #[inline]
    pub fn ft_inv(&self, w: f64) -> f64 {
        -(-w * self.p).powf(self.inv_p)
    }

    /// Tangent line `alpha + beta u` of the transformed function at a design
    /// point where the function takes value `v` with derivative `dv` with
    /// respect to the abscissa `u`.
    ///
    /// Used both for ordinary tails (`u` = abscissa, `v` = density) and for
    /// inverse densities (`u` = density, `v` = abscissa, `dv = 1/f'`).
    pub fn tangent(&self, u: f64, v: f64, dv: f64) -> (f64, f64) {
        let beta = self.dt(v) * dv;
        let alpha = self.t(v) - beta * u;

        (alpha, beta)
    }
}
