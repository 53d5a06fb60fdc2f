mod common;
use common::*;

use hatrej::distributions::{Gamma, Weibull};
use hatrej::transform::C_MAX;
use hatrej::view::{Continuous, DistributionView};
use hatrej::{ConstructionError, Distribution, PoleConfig, PoleHat};

use proptest::prelude::*;
use std::f64::consts::PI;

fn weibull_cdf(x: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else {
        1.0 - (-x.sqrt()).exp()
    }
}

#[test]
fn weibull_construction() {
    let hat = PoleHat::new(Weibull::new(0.5, 1.0).unwrap(), &PoleConfig::default()).unwrap();

    assert!((hat.split_point() - 1.0).abs() < 1e-8);
    assert!((hat.pole_exponent() + 0.75).abs() < 1e-4);
    let ct = hat.tail_exponent().unwrap();
    assert!(ct > -1.0 && ct <= C_MAX);
    assert_eq!(hat.segments().len(), 3);
    assert!(hat.total_area() >= 1.0);
    assert!(hat.total_area() < 1.5);
}

#[test]
fn weibull_fit() {
    let hat = PoleHat::new(Weibull::new(0.5, 1.0).unwrap(), &PoleConfig::default()).unwrap();

    goodness_of_fit(
        |rng| hat.sample(rng),
        weibull_cdf,
        0.0,
        20.0,
        1_000_000,
        200,
        0.001,
    );
}

#[test]
fn weibull_collisions() {
    let hat = PoleHat::new(Weibull::new(0.5, 1.0).unwrap(), &PoleConfig::default()).unwrap();

    collisions(|rng| hat.sample(rng), weibull_cdf, 20, 64, 10, 0.05);
}

#[test]
fn square_root_fit() {
    let dist = Continuous::new(|x: f64| 0.5 / x.sqrt())
        .with_derivative(|x: f64| -0.25 / (x * x.sqrt()))
        .with_domain(0.0, 1.0)
        .with_mode(0.0);
    let config = PoleConfig::default().with_pole_exponent(-0.5);
    let hat = PoleHat::new(dist, &config).unwrap();

    assert!(hat.tail_exponent().is_none());
    assert!((hat.pole_area() - 0.5).abs() < 1e-9);
    assert!((hat.center_area() - 0.5).abs() < 1e-12);
    assert!((hat.total_area() - 1.0).abs() < 1e-9);

    goodness_of_fit(
        |rng| hat.sample(rng),
        |x| x.max(0.0).min(1.0).sqrt(),
        0.0,
        1.0,
        1_000_000,
        100,
        0.001,
    );
}

#[test]
fn mirrored_square_root_fit() {
    let dist = Continuous::new(|x: f64| 0.5 / (1.0 - x).sqrt())
        .with_derivative(|x: f64| 0.25 / ((1.0 - x) * (1.0 - x).sqrt()))
        .with_domain(0.0, 1.0)
        .with_mode(1.0);
    let hat = PoleHat::new(dist, &PoleConfig::default()).unwrap();
    assert_eq!(hat.split_point(), 0.0);

    goodness_of_fit(
        |rng| hat.sample(rng),
        |x| 1.0 - (1.0 - x.max(0.0).min(1.0)).sqrt(),
        0.0,
        1.0,
        500_000,
        100,
        0.001,
    );
}

#[test]
fn arcsine_half_domain_fit() {
    // The derivative vanishes at the right end, so the pole hat covers the
    // whole domain and reaches past it.
    let dist = Continuous::new(|x: f64| 1.0 / (PI * (x * (1.0 - x)).sqrt()))
        .with_derivative(|x: f64| -(1.0 - 2.0 * x) / (2.0 * PI * (x * (1.0 - x)).powf(1.5)))
        .with_domain(0.0, 0.5)
        .with_mode(0.0);
    let config = PoleConfig::default().with_verify(true);
    let hat = PoleHat::new(dist, &config).unwrap();
    assert!(hat.tail_exponent().is_none());

    goodness_of_fit(
        |rng| hat.sample(rng),
        |x| 4.0 / PI * x.max(0.0).min(0.5).sqrt().asin(),
        0.0,
        0.5,
        500_000,
        100,
        0.001,
    );
    assert_eq!(hat.verify_failures(), 0);
}

#[test]
fn gamma_areas() {
    let dist = Gamma::new(0.5, 1.0).unwrap();
    let hat = PoleHat::new(dist, &PoleConfig::default()).unwrap();

    let cp = hat.pole_exponent();
    let ct = hat.tail_exponent().unwrap();
    assert!(cp > -1.0 && cp <= C_MAX);
    assert!(ct > -1.0 && ct <= C_MAX);

    let sum: f64 = hat.segments().iter().map(|s| s.area_hat).sum();
    assert!((sum - hat.total_area()).abs() <= 1e-9 * hat.total_area());
    let last = hat.segments().last().unwrap();
    assert!((last.cumulative_area - hat.total_area()).abs() <= 1e-9 * hat.total_area());
    assert!(hat.total_area() >= dist.pdf_area().unwrap());
}

#[test]
fn verify_mode_is_silent() {
    let config = PoleConfig::default().with_verify(true);
    let hat = PoleHat::new(Weibull::new(0.5, 1.0).unwrap(), &config).unwrap();
    let mut rng = test_rng();
    for _ in 0..100_000 {
        hat.sample(&mut rng);
    }
    assert_eq!(hat.verify_failures(), 0);
}

#[test]
fn deterministic_sampling() {
    let hat = PoleHat::new(Weibull::new(0.5, 1.0).unwrap(), &PoleConfig::default()).unwrap();
    let (mut rng1, mut rng2) = (test_rng(), test_rng());
    for _ in 0..1000 {
        assert_eq!(hat.sample(&mut rng1), hat.sample(&mut rng2));
    }
}

#[test]
fn explicit_split_point() {
    let config = PoleConfig::default().with_split_point(0.5);
    let hat = PoleHat::new(Weibull::new(0.5, 1.0).unwrap(), &config).unwrap();
    assert_eq!(hat.split_point(), 0.5);

    goodness_of_fit(
        |rng| hat.sample(rng),
        weibull_cdf,
        0.0,
        20.0,
        500_000,
        200,
        0.001,
    );
}

#[test]
fn degenerate_density() {
    let dist = Continuous::new(|_: f64| 0.0)
        .with_derivative(|_: f64| 0.0)
        .with_domain(0.0, f64::INFINITY)
        .with_mode(0.0);
    assert!(matches!(
        PoleHat::new(dist, &PoleConfig::default()),
        Err(ConstructionError::DegenerateDistribution(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn gamma_hat_dominates(shape in 0.2f64..0.95, scale in 0.5f64..4.0) {
        let dist = Gamma::new(shape, scale).unwrap();
        let hat = PoleHat::new(dist, &PoleConfig::default()).unwrap();

        for i in 0..400 {
            let x = scale * 1.0e-6 * 1.05f64.powi(i);
            let f = dist.pdf(x);
            prop_assert!(hat.hat(x) >= f * (1.0 - 1.0e-8), "x = {}, f = {}, hat = {}", x, f, hat.hat(x));
        }
        prop_assert!(hat.total_area() >= dist.pdf_area().unwrap() * (1.0 - 1.0e-9));
    }
}
