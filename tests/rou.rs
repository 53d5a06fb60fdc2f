mod common;
use common::*;

use hatrej::distributions::{Cauchy, Normal};
use hatrej::view::{Continuous, DistributionView};
use hatrej::{ConstructionError, Distribution, RouConfig, RouHat};

use proptest::prelude::*;
use std::f64::consts::PI;

fn cauchy_cdf(x: f64, location: f64, scale: f64) -> f64 {
    ((x - location) / scale).atan() / PI + 0.5
}

fn logistic_cdf(x: f64, location: f64, scale: f64) -> f64 {
    1.0 / (1.0 + (-(x - location) / scale).exp())
}

#[test]
fn normal_areas() {
    let area = (2.0 * PI).sqrt();

    // The view knows the CDF at the mode.
    let hat = RouHat::new(Normal::new(0.0, 1.0).unwrap(), &RouConfig::default()).unwrap();
    assert!(hat.uses_cdf_at_mode());
    assert!((hat.total_area() - 2.0 * area).abs() <= 1e-12 * area);

    let dist = Continuous::new(|x: f64| (-0.5 * x * x).exp())
        .with_mode(0.0)
        .with_pdf_area(area);
    let hat = RouHat::new(dist, &RouConfig::default()).unwrap();
    assert!(!hat.uses_cdf_at_mode());
    assert!((hat.total_area() - 4.0 * area).abs() <= 1e-12 * area);
}

#[test]
fn cauchy_fit() {
    let (location, scale) = (2.2, 3.4);
    let n_scale = 4.0; // test interval half-width in scale units
    let hat = RouHat::new(Cauchy::new(location, scale).unwrap(), &RouConfig::default()).unwrap();

    goodness_of_fit(
        |rng| hat.sample(rng),
        |x| cauchy_cdf(x, location, scale),
        location - n_scale * scale,
        location + n_scale * scale,
        1_000_000,
        401,
        0.001,
    );
}

#[test]
fn cauchy_collisions() {
    let (location, scale) = (-1.7, 2.8);
    let hat = RouHat::new(Cauchy::new(location, scale).unwrap(), &RouConfig::default()).unwrap();

    collisions(
        |rng| hat.sample(rng),
        |x| cauchy_cdf(x, location, scale),
        20,
        64,
        10,
        0.05,
    );
}

#[test]
fn logistic_fit_with_squeeze() {
    let (location, scale) = (0.5, 1.5);
    let dist = Continuous::new(move |x: f64| {
        let e = (-(x - location) / scale).exp();
        e / ((1.0 + e) * (1.0 + e))
    })
    .with_mode(location)
    .with_pdf_area(scale)
    .with_cdf(move |x: f64| logistic_cdf(x, location, scale));
    let config = RouConfig::default().with_squeeze(true).with_verify(true);
    let hat = RouHat::new(dist, &config).unwrap();
    assert!(hat.uses_cdf_at_mode());

    goodness_of_fit(
        |rng| hat.sample(rng),
        |x| logistic_cdf(x, location, scale),
        location - 10.0 * scale,
        location + 10.0 * scale,
        1_000_000,
        400,
        0.001,
    );
    assert_eq!(hat.verify_failures(), 0);
}

#[test]
fn lopsided_fit_with_squeeze_and_no_cdf() {
    // Flat on [-10, 0] with a heavy right tail; the mode is at the kink.
    let pdf = |x: f64| {
        if x <= 0.0 {
            1.0
        } else {
            let d = 1.0 + 10.0 * x;
            1.0 / (d * d)
        }
    };
    let cdf = |x: f64| {
        let x = x.max(-10.0);
        let mass = if x <= 0.0 {
            x + 10.0
        } else {
            10.0 + 0.1 * (1.0 - 1.0 / (1.0 + 10.0 * x))
        };
        mass / 10.1
    };
    let dist = Continuous::new(pdf)
        .with_domain(-10.0, f64::INFINITY)
        .with_mode(0.0)
        .with_pdf_area(10.1);
    let config = RouConfig::default().with_squeeze(true).with_verify(true);
    let hat = RouHat::new(dist, &config).unwrap();
    assert!(!hat.uses_cdf_at_mode());

    goodness_of_fit(|rng| hat.sample(rng), cdf, -10.0, 2.0, 500_000, 120, 0.001);
    assert_eq!(hat.verify_failures(), 0);
}

#[test]
fn reversed_domain() {
    let dist = Continuous::new(|x: f64| (-0.5 * x * x).exp())
        .with_domain(1.0, -1.0)
        .with_mode(0.0)
        .with_pdf_area(1.0);
    assert!(matches!(
        RouHat::new(dist, &RouConfig::default()),
        Err(ConstructionError::DegenerateDistribution(_))
    ));
}

#[test]
fn truncated_normal_fit() {
    // Half-normal on [0, inf) with the mode at the domain boundary.
    let dist = Continuous::new(|x: f64| (-0.5 * x * x).exp())
        .with_domain(0.0, f64::INFINITY)
        .with_mode(0.0)
        .with_pdf_area(0.5 * (2.0 * PI).sqrt())
        .with_cdf_at_mode(0.0);
    let hat = RouHat::new(dist, &RouConfig::default()).unwrap();
    assert!((hat.total_area() - (2.0 * PI).sqrt()).abs() < 1e-12);

    let mut rng = test_rng();
    let n = 200_000;
    let mut inside = 0;
    for _ in 0..n {
        let x = hat.sample(&mut rng);
        assert!(x >= 0.0);
        if x <= 1.0 {
            inside += 1;
        }
    }
    // P(|Z| <= 1) = 0.682689...
    let p = inside as f64 / n as f64;
    assert!((p - 0.682_689_492).abs() < 0.005);
}

#[test]
fn bounded_domain() {
    let (location, scale) = (0.0, 1.0);
    let dist = Continuous::new(|x: f64| 1.0 / (1.0 + x * x))
        .with_domain(-1.0, 3.0)
        .with_mode(0.0)
        .with_pdf_area(PI);
    let hat = RouHat::new(dist, &RouConfig::default()).unwrap();
    assert!(hat.total_area() < 4.0 * PI);

    let (c0, c1) = (cauchy_cdf(-1.0, location, scale), cauchy_cdf(3.0, location, scale));
    goodness_of_fit(
        |rng| hat.sample(rng),
        |x| (cauchy_cdf(x.max(-1.0).min(3.0), location, scale) - c0) / (c1 - c0),
        -1.0,
        3.0,
        500_000,
        100,
        0.001,
    );
}

#[test]
fn deterministic_sampling() {
    let hat = RouHat::new(Normal::new(1.0, 2.0).unwrap(), &RouConfig::default()).unwrap();
    let (mut rng1, mut rng2) = (test_rng(), test_rng());
    for _ in 0..1000 {
        assert_eq!(hat.sample(&mut rng1), hat.sample(&mut rng2));
    }
}

#[test]
fn missing_area() {
    let dist = Continuous::new(|x: f64| (-0.5 * x * x).exp()).with_mode(0.0);
    assert!(matches!(
        RouHat::new(dist, &RouConfig::default()),
        Err(ConstructionError::Precondition(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn normal_hat_dominates(mean in -10.0f64..10.0, std_dev in 0.1f64..10.0, x in -100.0f64..100.0) {
        let dist = Normal::new(mean, std_dev).unwrap();
        let hat = RouHat::new(dist, &RouConfig::default()).unwrap();
        let f = dist.pdf(x);
        prop_assert!(hat.squeeze(x) <= f);
        prop_assert!(f <= hat.hat(x));
    }
}
