use super::util::{erf, test_rng, TestRng};

/// Counts of samples falling into `bins` equal-width bins over `[lo, hi)`.
///
/// Samples outside the range are counted as overflow.
pub struct Histogram {
    lo: f64,
    hi: f64,
    counts: Vec<u64>,
    overflow: u64,
}

#[allow(dead_code)]
impl Histogram {
    pub fn new(lo: f64, hi: f64, bins: usize) -> Self {
        assert!(bins >= 1, "a histogram needs at least one bin");
        Self {
            lo,
            hi,
            counts: vec![0; bins],
            overflow: 0,
        }
    }

    pub fn add(&mut self, x: f64) {
        let pos = (x - self.lo) / (self.hi - self.lo) * self.counts.len() as f64;
        match self.counts.get_mut(pos as usize) {
            Some(count) if pos >= 0.0 => *count += 1,
            _ => self.overflow += 1,
        }
    }

    /// Upper edge of bin `i`.
    pub fn edge(&self, i: usize) -> f64 {
        let m = self.counts.len();
        self.hi - (m - i - 1) as f64 / m as f64 * (self.hi - self.lo)
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum::<u64>() + self.overflow
    }
}

/// Returns the upper tail P-value of χ² with `k` degrees of freedom, using
/// the Wilson-Hilferty normal approximation.
fn chi_square_p_value(chi_square: f64, k: usize) -> f64 {
    let k = k as f64;
    let s = 2.0 / (9.0 * k);
    let z = ((chi_square / k).cbrt() - (1.0 - s)) / s.sqrt();

    0.5 * (1.0 - erf(z / std::f64::consts::SQRT_2))
}

/// Returns the upper tail P-value of a chi-square test.
#[allow(dead_code)]
pub fn chi_square_test<F: Fn(f64) -> f64>(histogram: &Histogram, cdf: F) -> f64 {
    let n = histogram.total() as f64;
    let (cdf_lo, cdf_hi) = (cdf(histogram.lo), cdf(histogram.hi));
    let term = |observed: f64, expected: f64| (observed - expected).powi(2) / expected;

    let mut left = cdf_lo;
    let mut chi_square = 0.0;
    for (i, &count) in histogram.counts().iter().enumerate() {
        let right = cdf(histogram.edge(i));
        chi_square += term(count as f64, (right - left) * n);
        left = right;
    }
    let mut dof = histogram.counts().len() - 1;

    // The overflow only counts as a bin when at least one sample is expected
    // there.
    let expected_overflow = (1.0 - (cdf_hi - cdf_lo)) * n;
    if expected_overflow > 1.0 {
        chi_square += term(histogram.overflow() as f64, expected_overflow);
        dof += 1;
    }

    chi_square_p_value(chi_square, dof)
}

/// Assess goodness of fit based on a χ² test.
#[allow(dead_code)]
pub fn goodness_of_fit<S, F>(
    mut sampler: S,
    cdf: F,
    x0: f64,
    x1: f64,
    sample_count: u64,
    bin_count: usize,
    p_value_threshold: f64,
) where
    S: FnMut(&mut TestRng) -> f64,
    F: Fn(f64) -> f64,
{
    // Sample the distribution.
    let mut histogram = Histogram::new(x0, x1, bin_count);
    let mut rng = test_rng();
    for _ in 0..sample_count {
        histogram.add(sampler(&mut rng));
    }

    // Process the data.
    let p_value = chi_square_test(&histogram, cdf);
    println!("P-value: {}", p_value);

    assert!(p_value > p_value_threshold);
}

/// Assess goodness of fit of a discrete distribution based on a χ² test.
///
/// Values with an expected count below 5 are pooled into a single bin.
#[allow(dead_code)]
pub fn discrete_goodness_of_fit<S, P>(
    mut sampler: S,
    pmf: P,
    lo: i64,
    hi: i64,
    sample_count: u64,
    p_value_threshold: f64,
) where
    S: FnMut(&mut TestRng) -> i64,
    P: Fn(i64) -> f64,
{
    let mut counts = vec![0u64; (hi - lo + 1) as usize];
    let mut residual = 0u64;
    let mut rng = test_rng();
    for _ in 0..sample_count {
        let k = sampler(&mut rng);
        if k >= lo && k <= hi {
            counts[(k - lo) as usize] += 1;
        } else {
            residual += 1;
        }
    }

    let n = sample_count as f64;
    let mut chi_square = 0.0;
    let mut bins = 0;
    let mut pooled_count = residual as f64;
    let mut pooled_expected = n;
    for (i, &count) in counts.iter().enumerate() {
        let expected = pmf(lo + i as i64) * n;
        if expected >= 5.0 {
            let delta = count as f64 - expected;
            chi_square += delta * delta / expected;
            pooled_expected -= expected;
            bins += 1;
        } else {
            pooled_count += count as f64;
        }
    }
    if pooled_expected >= 5.0 {
        let delta = pooled_count - pooled_expected;
        chi_square += delta * delta / pooled_expected;
        bins += 1;
    }

    let p_value = chi_square_p_value(chi_square, bins - 1);
    println!("P-value: {}", p_value);

    assert!(p_value > p_value_threshold);
}
