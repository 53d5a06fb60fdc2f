use rand_pcg::Lcg128Xsl64;

pub type TestRng = Lcg128Xsl64;

pub fn test_rng() -> TestRng {
    Lcg128Xsl64::new(0xcafef00dd15ea5e5, 0xa02bdbf7bb3c0a7ac28fa16a64abf96)
}

/// Error function, Abramowitz and Stegun 7.1.26 (absolute error below 1.5e-7).
#[allow(dead_code)]
pub fn erf(x: f64) -> f64 {
    const P: f64 = 0.327_591_1;
    const A: [f64; 5] = [
        0.254_829_592,
        -0.284_496_736,
        1.421_413_741,
        -1.453_152_027,
        1.061_405_429,
    ];

    let s = x.signum();
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = t * (A[0] + t * (A[1] + t * (A[2] + t * (A[3] + t * A[4]))));

    s * (1.0 - poly * (-x * x).exp())
}
