//! Uniform deviates and numeric helpers.

use rand_core::RngCore;

/// Relative tolerance used by hat domination checks.
pub(crate) const REL_TOLERANCE: f64 = 1.0e-10;

/// Source of canonical uniform deviates.
///
/// This is implemented for every `RngCore`, so any generator of the `rand`
/// ecosystem can drive the samplers.
pub trait UniformSource {
    /// Returns a uniform deviate in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;

    /// Returns a uniform deviate in `(0, 1)`.
    ///
    /// Zero is redrawn, which is needed wherever the deviate ends up in a
    /// denominator or a logarithm.
    fn next_open_uniform(&mut self) -> f64 {
        loop {
            let u = self.next_uniform();
            if u > 0.0 {
                return u;
            }
        }
    }
}

impl<R: RngCore + ?Sized> UniformSource for R {
    #[inline(always)]
    fn next_uniform(&mut self) -> f64 {
        // The 53 leftmost bits make up the significand.
        const SCALE: f64 = 1.0 / (1u64 << 53) as f64;

        (self.next_u64() >> 11) as f64 * SCALE
    }
}

/// Arc-mean of two abscissae.
///
/// The mean is taken in `atan` space, which converges much faster than the
/// arithmetic mean when one end is very far away or infinite.
pub fn arc_mean(x0: f64, x1: f64) -> f64 {
    let a0 = if x0 == f64::NEG_INFINITY {
        -std::f64::consts::FRAC_PI_2
    } else {
        x0.atan()
    };
    let a1 = if x1 == f64::INFINITY {
        std::f64::consts::FRAC_PI_2
    } else {
        x1.atan()
    };

    if (a0 - a1).abs() < 1.0e-6 {
        0.5 * x0 + 0.5 * x1
    } else {
        (0.5 * (a0 + a1)).tan()
    }
}

/// Natural logarithm of the gamma function for `x > 0`.
///
/// Lanczos approximation with `g = 7`, accurate to about 15 digits.
pub fn ln_gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_59,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_571_6e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula.
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let mut a = COEFFS[0];
    let t = x + G + 0.5;
    for (i, c) in COEFFS.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }

    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
}

/// Returns true if `a` does not exceed `b` beyond the relative tolerance.
#[inline]
pub(crate) fn not_above(a: f64, b: f64) -> bool {
    a <= b + REL_TOLERANCE * b.abs().max(a.abs())
}
