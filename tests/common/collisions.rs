use super::util::{test_rng, TestRng};
use std::collections::HashSet;

/// Probability distribution of the number of occupied urns after throwing
/// `balls` balls uniformly into `urns` urns.
///
/// Entry `j` of the returned vector is the probability that exactly `j` urns
/// are occupied. Negligible probabilities at both ends are pruned while
/// iterating, as suggested by Knuth.
fn occupancy(urns: u64, balls: u64) -> Vec<f64> {
    const PRUNE: f64 = 1e-20;

    let inv_urns = 1.0 / urns as f64;
    let mut prob = vec![0.0; balls as usize + 1];
    prob[1] = 1.0;
    let (mut lo, mut hi) = (1usize, 1usize);

    for _ in 1..balls {
        hi += 1;
        for j in (lo..=hi).rev() {
            let occupied = j as f64 * inv_urns;
            // Either the ball lands in an occupied urn or it opens a new one.
            prob[j] = prob[j] * occupied + prob[j - 1] * (1.0 + inv_urns - occupied);
        }
        if prob[lo] < PRUNE {
            prob[lo] = 0.0;
            lo += 1;
        }
        if prob[hi] < PRUNE {
            prob[hi] = 0.0;
            hi -= 1;
        }
    }

    prob
}

/// Upper-tail P-value of observing at least `collisions` collisions.
fn collision_p_value(urns: u64, balls: u64, collisions: u64) -> f64 {
    let occupied = (balls - collisions) as usize;
    // At least `collisions` collisions means at most `occupied` occupied urns.
    let below: f64 = occupancy(urns, balls)
        .iter()
        .skip(occupied + 1)
        .sum();

    (1.0 - below).max(0.0).min(1.0)
}

/// Knuth collision test applied to the CDF-transformed samples.
///
/// Each repetition throws `2^dimension / urn_to_ball_ratio` variates, mapped
/// to `[0, 1)` by `cdf`, into `2^dimension` urns and counts collisions. The
/// test fails if the P-value averaged over `test_count` repetitions does not
/// exceed `p_value_threshold`.
#[allow(dead_code)]
pub fn collisions<S, F>(
    mut sampler: S,
    cdf: F,
    dimension: u8,
    urn_to_ball_ratio: u64,
    test_count: u64,
    p_value_threshold: f64,
) where
    S: FnMut(&mut TestRng) -> f64,
    F: Fn(f64) -> f64,
{
    let urns = 1u64 << dimension;
    let balls = urns / urn_to_ball_ratio;
    let urn_of = |u: f64| ((u * urns as f64) as u64).min(urns - 1);

    let mut rng = test_rng();
    let total: f64 = (0..test_count)
        .map(|_| {
            let mut seen = HashSet::new();
            let hits = (0..balls)
                .filter(|_| !seen.insert(urn_of(cdf(sampler(&mut rng)))))
                .count() as u64;
            collision_p_value(urns, balls, hits)
        })
        .sum();

    let p_value = total / test_count as f64;
    println!("Average P-value: {}", p_value);
    assert!(p_value > p_value_threshold);
}
