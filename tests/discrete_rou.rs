mod common;
use common::*;

use hatrej::distributions::{Binomial, Poisson};
use hatrej::view::{Discrete, DiscreteView};
use hatrej::{ConstructionError, DiscreteRouConfig, DiscreteRouHat, Distribution};

#[test]
fn poisson_fit() {
    for &rate in &[0.5, 4.5, 20.0] {
        let dist = Poisson::new(rate).unwrap();
        let config = DiscreteRouConfig::default().with_verify(true);
        let hat = DiscreteRouHat::new(dist, &config).unwrap();

        discrete_goodness_of_fit(
            |rng| hat.sample(rng),
            |k| dist.pmf(k),
            0,
            (4.0 * rate) as i64 + 20,
            500_000,
            0.001,
        );
        assert_eq!(hat.verify_failures(), 0);
    }
}

#[test]
fn poisson_fit_with_cdf() {
    let rate = 7.3;
    let dist = Poisson::new(rate).unwrap();
    let mode = dist.mode().unwrap();
    let cdf: f64 = (0..=mode).map(|k| dist.pmf(k)).sum();
    let config = DiscreteRouConfig::default()
        .with_cdf_at_mode(cdf)
        .with_verify(true);
    let hat = DiscreteRouHat::new(dist, &config).unwrap();
    assert!(hat.uses_cdf_at_mode());
    assert!((hat.total_area() - 1.0).abs() < 1e-12);

    discrete_goodness_of_fit(
        |rng| hat.sample(rng),
        |k| dist.pmf(k),
        0,
        60,
        500_000,
        0.001,
    );
    assert_eq!(hat.verify_failures(), 0);
}

#[test]
fn binomial_fit() {
    let dist = Binomial::new(20, 0.3).unwrap();
    let config = DiscreteRouConfig::default().with_verify(true);
    let hat = DiscreteRouHat::new(dist, &config).unwrap();

    discrete_goodness_of_fit(|rng| hat.sample(rng), |k| dist.pmf(k), 0, 20, 500_000, 0.001);
    assert_eq!(hat.verify_failures(), 0);
}

#[test]
fn samples_stay_in_domain() {
    let dist = Binomial::new(5, 0.9).unwrap();
    let hat = DiscreteRouHat::new(dist, &DiscreteRouConfig::default()).unwrap();
    let mut rng = test_rng();
    for _ in 0..100_000 {
        let k = hat.sample(&mut rng);
        assert!(k >= 0 && k <= 5);
    }
}

#[test]
fn unnormalized_mass() {
    // Triangular mass function scaled by an arbitrary constant.
    let pmf = |k: i64| if (0..=10).contains(&k) { 3.0 * (6 - (k - 5).abs()) as f64 } else { 0.0 };
    let dist = Discrete::new(pmf)
        .with_domain(0, 10)
        .with_mode(5)
        .with_pmf_sum(108.0);
    let hat = DiscreteRouHat::new(dist, &DiscreteRouConfig::default()).unwrap();

    discrete_goodness_of_fit(
        |rng| hat.sample(rng),
        |k| pmf(k) / 108.0,
        0,
        10,
        200_000,
        0.001,
    );
}

#[test]
fn deterministic_sampling() {
    let hat = DiscreteRouHat::new(Poisson::new(3.0).unwrap(), &DiscreteRouConfig::default()).unwrap();
    let (mut rng1, mut rng2) = (test_rng(), test_rng());
    for _ in 0..1000 {
        assert_eq!(hat.sample(&mut rng1), hat.sample(&mut rng2));
    }
}

#[test]
fn zero_mass_at_mode() {
    let dist = Discrete::new(|_: i64| 0.0).with_mode(3).with_pmf_sum(1.0);
    assert!(matches!(
        DiscreteRouHat::new(dist, &DiscreteRouConfig::default()),
        Err(ConstructionError::DegenerateDistribution(_))
    ));
}
