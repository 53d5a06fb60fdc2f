//! Adaptive rejection with piecewise-constant hats.
//!
//! The domain is cut into intervals over which the density is monotone. Over
//! each interval the hat is the density at the high end and the squeeze the
//! density at the low end. Every density evaluation made while sampling may
//! split its interval in two, so the hat tightens as samples are drawn, until
//! the squeeze covers a configured fraction of the hat area or a maximum
//! number of intervals is reached.
//!
//! Intervals live in an arena linked in traversal order. A split rewrites the
//! old slot in place as the left child and appends the right child, so slot
//! indices recorded in the guide table stay valid. The cumulative areas are
//! only refreshed when the guide table is rebuilt; in between, the area freed
//! by splits shows up as gaps which are detected and redrawn.

use super::Verifier;
use crate::error::ConstructionError;
use crate::guide::GuideTable;
use crate::num::{arc_mean, not_above, UniformSource};
use crate::segment::{HatSegment, SegmentShape, Slope};
use crate::view::DistributionView;

use rand_core::RngCore;

/// Stale fraction of the lookup range above which the guide table is rebuilt.
const MAX_STALE_FRACTION: f64 = 0.05;

/// Maximum number of passes of the above-average splitting heuristic.
const MAX_SETUP_PASSES: usize = 20;

/// Choice of the splitting point of an interval during sampling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SplitMode {
    /// At the sampled point.
    Point,
    /// At the arithmetic mean of the interval bounds.
    Mean,
    /// At the arc-mean of the interval bounds.
    ArcMean,
}

/// Configuration of an `AdaptiveTable`.
#[derive(Clone, Debug, PartialEq)]
pub struct TableConfig {
    /// Intervals `(a, b)` over which the density is monotone. If absent, the
    /// domain is split at the mode.
    pub slopes: Option<Vec<(f64, f64)>>,
    /// Clipping bounds for infinite domains.
    pub boundary: (f64, f64),
    /// Area of the slices cut by equal-area splitting, relative to the
    /// area below the density.
    pub area_fraction: f64,
    pub use_equal_area: bool,
    pub use_above_average: bool,
    /// Target number of intervals for above-average splitting.
    pub setup_intervals: usize,
    pub max_intervals: usize,
    /// Squeeze to hat area ratio at which refinement stops.
    pub max_ratio: f64,
    pub split_mode: SplitMode,
    /// Number of guide table entries per interval.
    pub guide_factor: f64,
    pub verify: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            slopes: None,
            boundary: (-1.0e20, 1.0e20),
            area_fraction: 0.1,
            use_equal_area: true,
            use_above_average: true,
            setup_intervals: 30,
            max_intervals: 100,
            max_ratio: 0.95,
            split_mode: SplitMode::ArcMean,
            guide_factor: 1.0,
            verify: false,
        }
    }
}

impl TableConfig {
    pub fn with_slopes(mut self, slopes: Vec<(f64, f64)>) -> Self {
        self.slopes = Some(slopes);
        self
    }
    pub fn with_boundary(mut self, lo: f64, hi: f64) -> Self {
        self.boundary = (lo, hi);
        self
    }
    pub fn with_area_fraction(mut self, fraction: f64) -> Self {
        self.area_fraction = fraction;
        self
    }
    pub fn with_equal_area(mut self, enabled: bool) -> Self {
        self.use_equal_area = enabled;
        self
    }
    pub fn with_above_average(mut self, enabled: bool) -> Self {
        self.use_above_average = enabled;
        self
    }
    pub fn with_setup_intervals(mut self, n: usize) -> Self {
        self.setup_intervals = n;
        self
    }
    pub fn with_max_intervals(mut self, n: usize) -> Self {
        self.max_intervals = n;
        self
    }
    pub fn with_max_ratio(mut self, ratio: f64) -> Self {
        self.max_ratio = ratio;
        self
    }
    pub fn with_split_mode(mut self, mode: SplitMode) -> Self {
        self.split_mode = mode;
        self
    }
    pub fn with_guide_factor(mut self, factor: f64) -> Self {
        self.guide_factor = factor;
        self
    }
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

#[derive(Copy, Clone, Debug)]
struct Slot {
    segment: HatSegment,
    next: Option<usize>,
}

/// Result of a cumulative area lookup.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Lookup {
    /// Segment in slot `index`, at area `offset` past its start.
    Found { index: usize, offset: f64 },
    /// The target fell in the area freed by a split.
    Stale,
}

/// Density values at the left and right end of a step segment.
fn step_ends(segment: &HatSegment) -> (f64, f64) {
    match segment.shape {
        SegmentShape::Step {
            f_max,
            f_min,
            slope: Slope::Decreasing,
        } => (f_max, f_min),
        SegmentShape::Step {
            f_max,
            f_min,
            slope: Slope::Increasing,
        } => (f_min, f_max),
        _ => (0.0, 0.0),
    }
}

/// Adaptive sampler with a piecewise-constant hat.
#[derive(Clone, Debug)]
pub struct AdaptiveTable<D> {
    dist: D,
    slots: Vec<Slot>,
    first: usize,
    guide: GuideTable,
    lookup_area: f64,
    area_hat: f64,
    area_squeeze: f64,
    max_intervals: usize,
    max_ratio: f64,
    split_mode: SplitMode,
    guide_factor: f64,
    refining: bool,
    verifier: Verifier,
}

impl<D: DistributionView> AdaptiveTable<D> {
    /// Constructs the initial hat.
    ///
    /// Either the monotone slopes or the mode must be known.
    pub fn new(dist: D, config: &TableConfig) -> Result<Self, ConstructionError> {
        let (lo, hi) = dist.domain();
        let lo = lo.max(config.boundary.0);
        let hi = hi.min(config.boundary.1);
        if !(lo < hi) {
            return Err(ConstructionError::DegenerateDistribution(
                "the domain is empty",
            ));
        }
        if config.max_intervals == 0 {
            return Err(ConstructionError::Precondition(
                "at least one interval is required",
            ));
        }
        if !(config.guide_factor >= 0.0) {
            return Err(ConstructionError::Precondition(
                "the guide table factor must be non-negative",
            ));
        }

        let mut segments = starting_slopes(&dist, config, lo, hi)?;

        if config.use_equal_area {
            match dist.pdf_area() {
                Some(area) if area > 0.0 && area.is_finite() && config.area_fraction > 0.0 => {
                    segments =
                        split_equal_area(&dist, segments, config.area_fraction * area, config.max_intervals);
                }
                _ => tracing::debug!("equal-area splitting skipped: no area below the density"),
            }
        }

        if config.use_above_average {
            let target = config.setup_intervals.min(config.max_intervals);
            segments = split_above_average(&dist, segments, target, config.max_intervals);
        }

        let area_hat: f64 = segments.iter().map(|s| s.area_hat).sum();
        let area_squeeze: f64 = segments.iter().map(|s| s.area_squeeze).sum();
        if !area_hat.is_finite() {
            return Err(ConstructionError::Precondition(
                "the density must be bounded",
            ));
        }
        if !(area_hat > 0.0) {
            return Err(ConstructionError::DegenerateDistribution(
                "the hat has zero area",
            ));
        }

        let n = segments.len();
        let slots = segments
            .into_iter()
            .enumerate()
            .map(|(i, segment)| Slot {
                segment,
                next: if i + 1 < n { Some(i + 1) } else { None },
            })
            .collect();

        let mut table = Self {
            dist,
            slots,
            first: 0,
            guide: GuideTable::default(),
            lookup_area: area_hat,
            area_hat,
            area_squeeze,
            max_intervals: config.max_intervals,
            max_ratio: config.max_ratio,
            split_mode: config.split_mode,
            guide_factor: config.guide_factor,
            refining: false,
            verifier: Verifier::new(config.verify),
        };
        table.rebuild_guide();
        table.refining = table.may_split();

        tracing::debug!(
            intervals = table.interval_count(),
            area_hat = table.area_hat,
            area_squeeze = table.area_squeeze,
            "adaptive table constructed"
        );

        Ok(table)
    }

    /// Draws a variate, possibly refining the hat.
    pub fn sample<R: RngCore + ?Sized>(&mut self, rng: &mut R) -> f64 {
        loop {
            let (index, offset) = match self.lookup(rng.next_uniform()) {
                Lookup::Found { index, offset } => (index, offset),
                Lookup::Stale => continue,
            };
            let segment = self.slots[index].segment;
            let (f_max, f_min) = match segment.step_bounds() {
                Some(bounds) => bounds,
                None => continue,
            };

            // The area offset is uniform over the segment.
            let x = (segment.x_min + offset / f_max).min(segment.x_max);
            let y = rng.next_uniform() * f_max;
            let squeezed = y <= f_min;
            if squeezed && !self.verifier.is_enabled() {
                return x;
            }

            let fx = self.dist.pdf(x);
            if self.verifier.is_enabled() {
                if !not_above(fx, f_max) {
                    self.verifier.report("table", "density above hat", x, fx, f_max);
                }
                if !not_above(f_min, fx) {
                    self.verifier.report("table", "density below squeeze", x, fx, f_min);
                }
            }
            if squeezed {
                return x;
            }
            if self.refining {
                self.split(index, x, fx);
            }
            if y <= fx {
                return x;
            }
        }
    }
}

impl<D: DistributionView> AdaptiveTable<D> {
    fn may_split(&self) -> bool {
        self.slots.len() < self.max_intervals && self.area_squeeze < self.max_ratio * self.area_hat
    }

    // Splits the interval in slot `index`, where the density was evaluated
    // at `x` with value `fx`.
    fn split(&mut self, index: usize, x: f64, fx: f64) {
        let Slot { segment, next } = self.slots[index];
        let (f_max, f_min) = match segment.step_bounds() {
            Some(bounds) => bounds,
            None => return,
        };
        let (xs, fs) = match self.split_mode {
            SplitMode::Point => (x, fx),
            SplitMode::Mean => {
                let xs = 0.5 * (segment.x_min + segment.x_max);
                (xs, self.dist.pdf(xs))
            }
            SplitMode::ArcMean => {
                let xs = arc_mean(segment.x_min, segment.x_max);
                (xs, self.dist.pdf(xs))
            }
        };
        if !(xs > segment.x_min && xs < segment.x_max) {
            return;
        }
        if !fs.is_finite() || fs < f_min || fs > f_max {
            // Not monotone: the new pieces would not enclose the density.
            return;
        }

        let (f_left, f_right) = step_ends(&segment);
        let mut left = HatSegment::step(segment.x_min, f_left, xs, fs);
        let mut right = HatSegment::step(xs, fs, segment.x_max, f_right);
        left.cumulative_area = segment.start_area() + left.area_hat;
        right.cumulative_area = left.cumulative_area + right.area_hat;

        let right_index = self.slots.len();
        self.slots[index] = Slot {
            segment: left,
            next: Some(right_index),
        };
        self.slots.push(Slot {
            segment: right,
            next,
        });
        self.area_hat += left.area_hat + right.area_hat - segment.area_hat;
        self.area_squeeze += left.area_squeeze + right.area_squeeze - segment.area_squeeze;

        tracing::trace!(
            x = xs,
            intervals = self.slots.len(),
            area_hat = self.area_hat,
            "interval split"
        );

        if !self.may_split() {
            self.refining = false;
            self.rebuild_guide();
            tracing::debug!(
                intervals = self.slots.len(),
                squeeze_ratio = self.squeeze_ratio(),
                "adaptive refinement stopped"
            );
        } else if (self.lookup_area - self.area_hat) > MAX_STALE_FRACTION * self.lookup_area {
            self.rebuild_guide();
        }
    }
}

impl<D> AdaptiveTable<D> {
    // Locates the segment at fraction `u` of the lookup range.
    fn lookup(&self, u: f64) -> Lookup {
        let target = u * self.lookup_area;
        let mut index = match self.guide.start(u) {
            Some(index) => index,
            None => return Lookup::Stale,
        };
        loop {
            let slot = &self.slots[index];
            if slot.segment.cumulative_area > target {
                break;
            }
            match slot.next {
                Some(next) => index = next,
                None => return Lookup::Stale,
            }
        }
        let start = self.slots[index].segment.start_area();
        if target < start {
            return Lookup::Stale;
        }

        Lookup::Found {
            index,
            offset: target - start,
        }
    }

    /// Recomputes the cumulative areas and the guide table.
    pub fn rebuild_guide(&mut self) {
        let mut order = Vec::with_capacity(self.slots.len());
        let mut area_hat = 0.0;
        let mut area_squeeze = 0.0;
        let mut cursor = Some(self.first);
        while let Some(index) = cursor {
            let slot = &mut self.slots[index];
            area_hat += slot.segment.area_hat;
            area_squeeze += slot.segment.area_squeeze;
            slot.segment.cumulative_area = area_hat;
            order.push((index, area_hat));
            cursor = slot.next;
        }
        self.area_hat = area_hat;
        self.area_squeeze = area_squeeze;
        self.lookup_area = area_hat;

        let size = ((self.guide_factor * order.len() as f64) as usize).max(1);
        self.guide = GuideTable::build(order, area_hat, size);

        tracing::trace!(intervals = self.slots.len(), size, "guide table rebuilt");
    }

    /// Number of intervals.
    pub fn interval_count(&self) -> usize {
        self.slots.len()
    }

    /// Area below the hat.
    pub fn total_area(&self) -> f64 {
        self.area_hat
    }

    /// Area below the squeeze.
    pub fn squeeze_area(&self) -> f64 {
        self.area_squeeze
    }

    pub fn squeeze_ratio(&self) -> f64 {
        self.area_squeeze / self.area_hat
    }

    /// Whether sampling still refines the hat.
    pub fn is_refining(&self) -> bool {
        self.refining
    }

    /// Segments in traversal order.
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            slots: &self.slots,
            cursor: Some(self.first),
        }
    }

    pub fn set_verify(&mut self, verify: bool) {
        self.verifier.set_enabled(verify);
    }
    pub fn verify_failures(&self) -> u64 {
        self.verifier.failures()
    }
}

/// Iterator over the segments of an `AdaptiveTable` in traversal order.
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    slots: &'a [Slot],
    cursor: Option<usize>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a HatSegment;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = &self.slots[self.cursor?];
        self.cursor = slot.next;

        Some(&slot.segment)
    }
}

// Monotone slopes to start from, clipped to `[lo, hi]` and sorted.
fn starting_slopes<D: DistributionView>(
    dist: &D,
    config: &TableConfig,
    lo: f64,
    hi: f64,
) -> Result<Vec<HatSegment>, ConstructionError> {
    let mut bounds = Vec::new();
    match (&config.slopes, dist.mode()) {
        (Some(slopes), _) => {
            for &(a, b) in slopes {
                let (a, b) = if a <= b { (a, b) } else { (b, a) };
                let (a, b) = (a.max(lo), b.min(hi));
                if a < b {
                    bounds.push((a, b));
                }
            }
            bounds.sort_by(|p, q| p.0.partial_cmp(&q.0).unwrap_or(std::cmp::Ordering::Equal));
            if bounds.windows(2).any(|w| w[0].1 > w[1].0) {
                return Err(ConstructionError::Precondition("slopes must not overlap"));
            }
        }
        (None, Some(mode)) => {
            if !(mode >= lo && mode <= hi) {
                return Err(ConstructionError::Precondition(
                    "the mode lies outside the domain",
                ));
            }
            if lo < mode {
                bounds.push((lo, mode));
            }
            if mode < hi {
                bounds.push((mode, hi));
            }
        }
        (None, None) => {
            return Err(ConstructionError::Precondition(
                "either the slopes or the mode are required",
            ))
        }
    }
    if bounds.is_empty() {
        return Err(ConstructionError::DegenerateDistribution(
            "no slope intersects the domain",
        ));
    }

    let mut segments = Vec::with_capacity(bounds.len());
    for (a, b) in bounds {
        let (fa, fb) = (dist.pdf(a), dist.pdf(b));
        if !(fa >= 0.0 && fb >= 0.0) || !fa.is_finite() || !fb.is_finite() {
            return Err(ConstructionError::Precondition(
                "the density must be finite and non-negative on the slopes",
            ));
        }
        segments.push(HatSegment::step(a, fa, b, fb));
    }

    Ok(segments)
}

// Cuts slices of hat area `slice` from the peak end of each slope.
fn split_equal_area<D: DistributionView>(
    dist: &D,
    slopes: Vec<HatSegment>,
    slice: f64,
    max_intervals: usize,
) -> Vec<HatSegment> {
    let mut count = slopes.len();
    let mut segments = Vec::with_capacity(max_intervals);
    for slope in slopes {
        let (mut a, b) = match slope.peak_end() {
            Some(peak) if peak == slope.x_min => (slope.x_min, slope.x_max),
            Some(_) => (slope.x_max, slope.x_min),
            None => {
                segments.push(slope);
                continue;
            }
        };
        let direction = if b > a { 1.0 } else { -1.0 };
        let mut fa = dist.pdf(a);
        while count < max_intervals {
            if !(fa > 0.0) {
                break;
            }
            let step = slice / fa;
            if !(step < (b - a).abs()) {
                break;
            }
            let a_next = a + direction * step;
            let f_next = dist.pdf(a_next);
            segments.push(HatSegment::step(a, fa, a_next, f_next));
            count += 1;
            a = a_next;
            fa = f_next;
        }
        segments.push(HatSegment::step(a, fa, b, dist.pdf(b)));
    }
    segments.sort_by(|p, q| {
        p.x_min
            .partial_cmp(&q.x_min)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    segments
}

// Splits intervals whose excess area is above average at their arc-mean,
// until `target` intervals are reached.
fn split_above_average<D: DistributionView>(
    dist: &D,
    mut segments: Vec<HatSegment>,
    target: usize,
    max_intervals: usize,
) -> Vec<HatSegment> {
    for _ in 0..MAX_SETUP_PASSES {
        if segments.len() >= target {
            break;
        }
        let excess: f64 = segments.iter().map(|s| s.excess_area()).sum();
        let mean = excess / segments.len() as f64;

        let mut count = segments.len();
        let mut refined = Vec::with_capacity(2 * count);
        for segment in segments.drain(..) {
            if count < max_intervals && segment.excess_area() > mean {
                let xs = arc_mean(segment.x_min, segment.x_max);
                let fs = dist.pdf(xs);
                if xs > segment.x_min && xs < segment.x_max && fs.is_finite() && fs >= 0.0 {
                    let (f_left, f_right) = step_ends(&segment);
                    refined.push(HatSegment::step(segment.x_min, f_left, xs, fs));
                    refined.push(HatSegment::step(xs, fs, segment.x_max, f_right));
                    count += 1;
                    continue;
                }
            }
            refined.push(segment);
        }
        let split = refined.len() > segments.len();
        segments = refined;
        if !split {
            break;
        }
    }

    segments
}
