//! Pieces of a piecewise hat function.

/// Monotonicity of the density across a piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slope {
    Increasing,
    Decreasing,
}

/// Shape of the hat over a piece.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SegmentShape {
    /// Pole region, bounded in inverse form: for heights `y` above `floor`,
    /// the hat extends up to the distance `T⁻¹(alpha + beta y)` from the pole.
    Pole {
        c: f64,
        alpha: f64,
        beta: f64,
        floor: f64,
    },
    /// Flat piece of constant height.
    Flat { height: f64 },
    /// Tail region bounded by `T⁻¹(alpha + beta t)` where `t` is the distance
    /// from the pole.
    Tail { c: f64, alpha: f64, beta: f64 },
    /// Piecewise-constant hat with a constant squeeze; the hat is the
    /// density at the high end of the piece, the squeeze at the low end.
    Step { f_max: f64, f_min: f64, slope: Slope },
}

/// One piece of a hat.
///
/// `x_min < x_max` always holds in domain coordinates. The cumulative area
/// includes the area of this piece and of all preceding pieces in traversal
/// order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HatSegment {
    pub x_min: f64,
    pub x_max: f64,
    pub shape: SegmentShape,
    pub area_hat: f64,
    pub area_squeeze: f64,
    pub cumulative_area: f64,
}

impl HatSegment {
    /// Creates a piecewise-constant segment between `x0` (where the density
    /// equals `f0`) and `x1` (where it equals `f1`), in any order.
    pub fn step(x0: f64, f0: f64, x1: f64, f1: f64) -> Self {
        let (x_min, f_left, x_max, f_right) = if x0 < x1 {
            (x0, f0, x1, f1)
        } else {
            (x1, f1, x0, f0)
        };
        let (f_max, f_min, slope) = if f_left >= f_right {
            (f_left, f_right, Slope::Decreasing)
        } else {
            (f_right, f_left, Slope::Increasing)
        };
        let width = x_max - x_min;

        Self {
            x_min,
            x_max,
            shape: SegmentShape::Step {
                f_max,
                f_min,
                slope,
            },
            area_hat: width * f_max,
            area_squeeze: width * f_min,
            cumulative_area: 0.0,
        }
    }

    /// Area under the hat minus area under the squeeze.
    pub fn excess_area(&self) -> f64 {
        self.area_hat - self.area_squeeze
    }

    /// Cumulative area at the start of this segment.
    pub fn start_area(&self) -> f64 {
        self.cumulative_area - self.area_hat
    }

    /// Density values at the high and at the low end of a step segment.
    pub fn step_bounds(&self) -> Option<(f64, f64)> {
        match self.shape {
            SegmentShape::Step { f_max, f_min, .. } => Some((f_max, f_min)),
            _ => None,
        }
    }

    /// Abscissa where the density is largest on a step segment.
    pub fn peak_end(&self) -> Option<f64> {
        match self.shape {
            SegmentShape::Step {
                slope: Slope::Decreasing,
                ..
            } => Some(self.x_min),
            SegmentShape::Step {
                slope: Slope::Increasing,
                ..
            } => Some(self.x_max),
            _ => None,
        }
    }
}
