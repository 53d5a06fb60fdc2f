//! Read-only views over the distributions to be sampled.
//!
//! A view exposes the density and whatever analytic information is known
//! about it. Optional properties default to `None`; the derivative is a
//! separate trait so that methods requiring it can say so in their bounds.

/// View over a continuous univariate distribution.
pub trait DistributionView {
    /// Density, possibly scaled by an arbitrary constant.
    fn pdf(&self, x: f64) -> f64;

    /// Domain `(lo, hi)`, with possibly infinite bounds.
    fn domain(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Location of the mode (or of the pole).
    fn mode(&self) -> Option<f64> {
        None
    }

    /// Area under the density, consistent with the scaling of `pdf`.
    fn pdf_area(&self) -> Option<f64> {
        None
    }

    /// Normalized cumulative distribution function.
    fn cdf(&self, _x: f64) -> Option<f64> {
        None
    }

    /// Normalized cumulative distribution function at the mode.
    fn cdf_at_mode(&self) -> Option<f64> {
        match self.mode() {
            Some(m) => self.cdf(m),
            None => None,
        }
    }
}

/// View over a continuous distribution with a known density derivative.
pub trait DifferentiableView: DistributionView {
    /// Derivative of `pdf`, with the same scaling.
    fn dpdf(&self, x: f64) -> f64;
}

/// View over a discrete distribution on the integers.
pub trait DiscreteView {
    /// Probability mass function, possibly scaled by an arbitrary constant.
    fn pmf(&self, k: i64) -> f64;

    /// Inclusive domain `(lo, hi)`; `i64::MIN` and `i64::MAX` stand for
    /// unbounded ends.
    fn domain(&self) -> (i64, i64) {
        (i64::MIN, i64::MAX)
    }

    /// Location of the mode.
    fn mode(&self) -> Option<i64> {
        None
    }

    /// Sum of the probability mass function over the domain.
    fn pmf_sum(&self) -> Option<f64> {
        None
    }

    /// Normalized cumulative distribution function `P(X <= mode)`.
    fn cdf_at_mode(&self) -> Option<f64> {
        None
    }
}

impl<'a, V: DistributionView + ?Sized> DistributionView for &'a V {
    fn pdf(&self, x: f64) -> f64 {
        (**self).pdf(x)
    }
    fn domain(&self) -> (f64, f64) {
        (**self).domain()
    }
    fn mode(&self) -> Option<f64> {
        (**self).mode()
    }
    fn pdf_area(&self) -> Option<f64> {
        (**self).pdf_area()
    }
    fn cdf(&self, x: f64) -> Option<f64> {
        (**self).cdf(x)
    }
    fn cdf_at_mode(&self) -> Option<f64> {
        (**self).cdf_at_mode()
    }
}

impl<'a, V: DifferentiableView + ?Sized> DifferentiableView for &'a V {
    fn dpdf(&self, x: f64) -> f64 {
        (**self).dpdf(x)
    }
}

impl<'a, V: DiscreteView + ?Sized> DiscreteView for &'a V {
    fn pmf(&self, k: i64) -> f64 {
        (**self).pmf(k)
    }
    fn domain(&self) -> (i64, i64) {
        (**self).domain()
    }
    fn mode(&self) -> Option<i64> {
        (**self).mode()
    }
    fn pmf_sum(&self) -> Option<f64> {
        (**self).pmf_sum()
    }
    fn cdf_at_mode(&self) -> Option<f64> {
        (**self).cdf_at_mode()
    }
}

/// Marker for a missing derivative or CDF in a `Continuous` view.
#[derive(Copy, Clone, Debug, Default)]
pub struct Absent;

/// Continuous distribution view assembled from closures.
///
/// ```
/// use hatrej::view::{Continuous, DistributionView};
///
/// let view = Continuous::new(|x: f64| (-0.5 * x * x).exp())
///     .with_mode(0.0)
///     .with_pdf_area((2.0 * std::f64::consts::PI).sqrt());
/// assert_eq!(view.mode(), Some(0.0));
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Continuous<F, DF = Absent, CF = Absent> {
    pdf: F,
    dpdf: DF,
    cdf: CF,
    domain: (f64, f64),
    mode: Option<f64>,
    pdf_area: Option<f64>,
    cdf_at_mode: Option<f64>,
}

impl<F: Fn(f64) -> f64> Continuous<F> {
    /// Creates a view over the whole real line.
    pub fn new(pdf: F) -> Self {
        Self {
            pdf,
            dpdf: Absent,
            cdf: Absent,
            domain: (f64::NEG_INFINITY, f64::INFINITY),
            mode: None,
            pdf_area: None,
            cdf_at_mode: None,
        }
    }
}

impl<F, DF, CF> Continuous<F, DF, CF> {
    pub fn with_domain(mut self, lo: f64, hi: f64) -> Self {
        self.domain = (lo, hi);
        self
    }
    pub fn with_mode(mut self, mode: f64) -> Self {
        self.mode = Some(mode);
        self
    }
    pub fn with_pdf_area(mut self, area: f64) -> Self {
        self.pdf_area = Some(area);
        self
    }
    pub fn with_cdf_at_mode(mut self, cdf_at_mode: f64) -> Self {
        self.cdf_at_mode = Some(cdf_at_mode);
        self
    }

    /// Adds the density derivative.
    pub fn with_derivative<G: Fn(f64) -> f64>(self, dpdf: G) -> Continuous<F, G, CF> {
        Continuous {
            pdf: self.pdf,
            dpdf,
            cdf: self.cdf,
            domain: self.domain,
            mode: self.mode,
            pdf_area: self.pdf_area,
            cdf_at_mode: self.cdf_at_mode,
        }
    }

    /// Adds the normalized cumulative distribution function.
    pub fn with_cdf<G: Fn(f64) -> f64>(self, cdf: G) -> Continuous<F, DF, G> {
        Continuous {
            pdf: self.pdf,
            dpdf: self.dpdf,
            cdf,
            domain: self.domain,
            mode: self.mode,
            pdf_area: self.pdf_area,
            cdf_at_mode: self.cdf_at_mode,
        }
    }
}

/// Optional CDF slot of a `Continuous` view.
pub trait CdfSlot {
    fn eval(&self, x: f64) -> Option<f64>;
}

impl CdfSlot for Absent {
    fn eval(&self, _x: f64) -> Option<f64> {
        None
    }
}

impl<G: Fn(f64) -> f64> CdfSlot for G {
    fn eval(&self, x: f64) -> Option<f64> {
        Some(self(x))
    }
}

impl<F, DF, CF> DistributionView for Continuous<F, DF, CF>
where
    F: Fn(f64) -> f64,
    CF: CdfSlot,
{
    fn pdf(&self, x: f64) -> f64 {
        (self.pdf)(x)
    }
    fn domain(&self) -> (f64, f64) {
        self.domain
    }
    fn mode(&self) -> Option<f64> {
        self.mode
    }
    fn pdf_area(&self) -> Option<f64> {
        self.pdf_area
    }
    fn cdf(&self, x: f64) -> Option<f64> {
        self.cdf.eval(x)
    }
    fn cdf_at_mode(&self) -> Option<f64> {
        match (self.cdf_at_mode, self.mode) {
            (Some(fm), _) => Some(fm),
            (None, Some(m)) => self.cdf.eval(m),
            (None, None) => None,
        }
    }
}

impl<F, DF, CF> DifferentiableView for Continuous<F, DF, CF>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
    CF: CdfSlot,
{
    fn dpdf(&self, x: f64) -> f64 {
        (self.dpdf)(x)
    }
}

/// Discrete distribution view assembled from a closure.
#[derive(Copy, Clone, Debug)]
pub struct Discrete<F> {
    pmf: F,
    domain: (i64, i64),
    mode: Option<i64>,
    pmf_sum: Option<f64>,
    cdf_at_mode: Option<f64>,
}

impl<F: Fn(i64) -> f64> Discrete<F> {
    /// Creates a view over all integers.
    pub fn new(pmf: F) -> Self {
        Self {
            pmf,
            domain: (i64::MIN, i64::MAX),
            mode: None,
            pmf_sum: None,
            cdf_at_mode: None,
        }
    }
    pub fn with_domain(mut self, lo: i64, hi: i64) -> Self {
        self.domain = (lo, hi);
        self
    }
    pub fn with_mode(mut self, mode: i64) -> Self {
        self.mode = Some(mode);
        self
    }
    pub fn with_pmf_sum(mut self, sum: f64) -> Self {
        self.pmf_sum = Some(sum);
        self
    }
    pub fn with_cdf_at_mode(mut self, cdf_at_mode: f64) -> Self {
        self.cdf_at_mode = Some(cdf_at_mode);
        self
    }
}

impl<F: Fn(i64) -> f64> DiscreteView for Discrete<F> {
    fn pmf(&self, k: i64) -> f64 {
        (self.pmf)(k)
    }
    fn domain(&self) -> (i64, i64) {
        self.domain
    }
    fn mode(&self) -> Option<i64> {
        self.mode
    }
    fn pmf_sum(&self) -> Option<f64> {
        self.pmf_sum
    }
    fn cdf_at_mode(&self) -> Option<f64> {
        self.cdf_at_mode
    }
}
