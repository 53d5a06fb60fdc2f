//! Inverse transformed density rejection for densities with a pole.
//!
//! The density `f` is monotone away from a pole located at one end of the
//! domain. Writing `t` for the distance to the pole, the region below `f` is
//! divided at a splitting point `bx` (with `by = f(bx)`) into:
//!
//! * a pole region `{y > by}`, bounded in inverse form: the inverse density
//!   `t = f⁻¹(y)` is `T_cp`-concave and majorized by the tangent line
//!   `T_cp(t) <= alpha_p + beta_p y` taken at design point `xp`,
//! * a rectangle `[0, bx] × [0, by]`, which lies entirely below `f`,
//! * a tail region `{t > bx}`, majorized by `T_ct(f(t)) <= alpha_t + beta_t t`
//!   taken at design point `xt`.
//!
//! The splitting point maximizes the rectangle, i.e. solves
//! `t f'(t) + f(t) = 0`; the tail design point solves
//! `(t - bx) f'(t) + f(t) = 0`.

use super::Verifier;
use crate::error::ConstructionError;
use crate::num::{not_above, UniformSource};
use crate::roots::{find_root, Direction};
use crate::segment::{HatSegment, SegmentShape};
use crate::transform::{PowerTransform, C_MAX, C_MIN};
use crate::view::{DifferentiableView, DistributionView};
use crate::Distribution;

use rand_core::RngCore;

/// Relative position of the probe next to the pole.
const NEAR_POLE: f64 = 1.0e-8;

/// Relative tolerance on the splitting and design points.
const ROOT_TOLERANCE: f64 = 1.0e-10;

/// Maximum number of tail exponent adjustments.
const MAX_TAIL_ADJUSTMENTS: u32 = 100;

/// Configuration of a `PoleHat`.
///
/// Unset fields are computed from the distribution.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PoleConfig {
    /// Splitting point between the pole and the tail region.
    pub split_point: Option<f64>,
    /// Concavity exponent of the inverse density in the pole region.
    pub pole_exponent: Option<f64>,
    /// Concavity exponent of the density in the tail region.
    pub tail_exponent: Option<f64>,
    pub verify: bool,
}

impl PoleConfig {
    pub fn with_split_point(mut self, x: f64) -> Self {
        self.split_point = Some(x);
        self
    }
    pub fn with_pole_exponent(mut self, c: f64) -> Self {
        self.pole_exponent = Some(c);
        self
    }
    pub fn with_tail_exponent(mut self, c: f64) -> Self {
        self.tail_exponent = Some(c);
        self
    }
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

// Density seen from the pole, as a function of the distance `t >= 0`.
struct Local<'a, D> {
    dist: &'a D,
    pole: f64,
    sign: f64,
}

impl<'a, D: DifferentiableView> Local<'a, D> {
    fn f(&self, t: f64) -> f64 {
        self.dist.pdf(self.pole + self.sign * t)
    }
    fn df(&self, t: f64) -> f64 {
        self.sign * self.dist.dpdf(self.pole + self.sign * t)
    }
    // Second derivative by central differences of the first derivative.
    fn d2f(&self, t: f64) -> f64 {
        let h = 1.0e-5 * t;
        (self.df(t + h) - self.df(t - h)) / (h + h)
    }
    // Local concavity of the inverse density at height f(t).
    fn inverse_lc(&self, t: f64) -> f64 {
        1.0 + t * self.d2f(t) / self.df(t)
    }
    // Local concavity of the density.
    fn lc(&self, t: f64) -> f64 {
        let df = self.df(t);
        1.0 - self.f(t) * self.d2f(t) / (df * df)
    }
}

// Tangent hat of the inverse density in the pole region.
#[derive(Copy, Clone, Debug)]
struct PoleRegion {
    transform: PowerTransform,
    alpha: f64,
    beta: f64,
    design_point: f64,
    area: f64,
}

impl PoleRegion {
    // Distance from the pole covered by the hat at height `y`.
    fn width(&self, y: f64) -> f64 {
        let z = self.alpha + self.beta * y;
        if z < 0.0 {
            self.transform.t_inv(z)
        } else {
            f64::INFINITY
        }
    }
    // Height of the hat at distance `t`.
    fn height(&self, t: f64) -> f64 {
        (self.transform.t(t) - self.alpha) / self.beta
    }
}

// Tangent hat of the density in the tail region.
#[derive(Copy, Clone, Debug)]
struct TailRegion {
    transform: PowerTransform,
    alpha: f64,
    beta: f64,
    design_point: f64,
    ft_start: f64, // FT at the splitting point
    area: f64,
}

impl TailRegion {
    fn height(&self, t: f64) -> f64 {
        let z = self.alpha + self.beta * t;
        if z < 0.0 {
            self.transform.t_inv(z)
        } else {
            f64::INFINITY
        }
    }
}

/// Sampler for monotone densities with a pole at one end of the domain.
#[derive(Clone, Debug)]
pub struct PoleHat<D> {
    dist: D,
    pole: f64,
    sign: f64,
    extent: f64,
    bx: f64,
    by: f64,
    pole_region: PoleRegion,
    tail_region: Option<TailRegion>,
    center_area: f64,
    total_area: f64,
    segments: Vec<HatSegment>,
    verifier: Verifier,
}

impl<D: DifferentiableView> PoleHat<D> {
    /// Constructs the hat.
    ///
    /// The view must provide the pole location through `mode`, and the pole
    /// must coincide with one of the domain bounds.
    pub fn new(dist: D, config: &PoleConfig) -> Result<Self, ConstructionError> {
        let (lo, hi) = dist.domain();
        if !(lo < hi) {
            return Err(ConstructionError::DegenerateDistribution(
                "the domain is empty",
            ));
        }
        let pole = dist.mode().ok_or(ConstructionError::Precondition(
            "the pole location is required",
        ))?;
        let sign = if pole == lo {
            1.0
        } else if pole == hi {
            -1.0
        } else {
            return Err(ConstructionError::Precondition(
                "the pole must lie on a domain boundary",
            ));
        };
        if !pole.is_finite() {
            return Err(ConstructionError::Precondition("the pole must be finite"));
        }
        let extent = hi - lo;

        let local = Local {
            dist: &dist,
            pole,
            sign,
        };

        // Splitting point.
        let bx = match config.split_point {
            Some(x) => {
                let t = sign * (x - pole);
                if !(t > 0.0 && t <= extent) {
                    return Err(ConstructionError::Precondition(
                        "the splitting point lies outside the domain",
                    ));
                }
                t
            }
            None => find_split_point(&local, extent)?,
        };
        let by = local.f(bx);
        if !(by > 0.0) || !by.is_finite() {
            return Err(ConstructionError::DegenerateDistribution(
                "the density vanishes at the splitting point",
            ));
        }

        let pole_region = build_pole_region(&local, bx, by, config.pole_exponent)?;
        let tail_region = if bx < extent {
            Some(build_tail_region(&local, bx, extent, config.tail_exponent)?)
        } else {
            None
        };

        let center_area = bx * by;
        let tail_area = tail_region.map_or(0.0, |r| r.area);
        let total_area = pole_region.area + center_area + tail_area;
        if !(total_area > 0.0) || !total_area.is_finite() {
            return Err(ConstructionError::NumericalInfeasibility(
                "the hat area is not finite",
            ));
        }

        // Segments in traversal order: pole, center, tail.
        let span = |t0: f64, t1: f64| {
            let (a, b) = (pole + sign * t0, pole + sign * t1);
            if a < b {
                (a, b)
            } else {
                (b, a)
            }
        };
        let mut segments = Vec::with_capacity(3);
        let (x_min, x_max) = span(0.0, bx);
        segments.push(HatSegment {
            x_min,
            x_max,
            shape: SegmentShape::Pole {
                c: pole_region.transform.exponent(),
                alpha: pole_region.alpha,
                beta: pole_region.beta,
                floor: by,
            },
            area_hat: pole_region.area,
            area_squeeze: 0.0,
            cumulative_area: pole_region.area,
        });
        segments.push(HatSegment {
            x_min,
            x_max,
            shape: SegmentShape::Flat { height: by },
            area_hat: center_area,
            area_squeeze: center_area,
            cumulative_area: pole_region.area + center_area,
        });
        if let Some(tail) = &tail_region {
            let (x_min, x_max) = span(bx, extent);
            segments.push(HatSegment {
                x_min,
                x_max,
                shape: SegmentShape::Tail {
                    c: tail.transform.exponent(),
                    alpha: tail.alpha,
                    beta: tail.beta,
                },
                area_hat: tail.area,
                area_squeeze: 0.0,
                cumulative_area: total_area,
            });
        }

        tracing::debug!(
            split_point = pole + sign * bx,
            pole_exponent = pole_region.transform.exponent(),
            tail_exponent = ?tail_region.map(|r| r.transform.exponent()),
            pole_area = pole_region.area,
            center_area,
            tail_area,
            "pole hat constructed"
        );

        Ok(Self {
            dist,
            pole,
            sign,
            extent,
            bx,
            by,
            pole_region,
            tail_region,
            center_area,
            total_area,
            segments,
            verifier: Verifier::new(config.verify),
        })
    }
}

impl<D> PoleHat<D> {
    /// Hat pieces in traversal order (pole, center, then tail if any).
    pub fn segments(&self) -> &[HatSegment] {
        &self.segments
    }
    pub fn total_area(&self) -> f64 {
        self.total_area
    }
    pub fn pole_area(&self) -> f64 {
        self.pole_region.area
    }
    pub fn center_area(&self) -> f64 {
        self.center_area
    }
    pub fn tail_area(&self) -> f64 {
        self.tail_region.map_or(0.0, |r| r.area)
    }
    pub fn pole_exponent(&self) -> f64 {
        self.pole_region.transform.exponent()
    }
    /// Exponent of the tail hat, if the domain extends past the splitting point.
    pub fn tail_exponent(&self) -> Option<f64> {
        self.tail_region.map(|r| r.transform.exponent())
    }
    pub fn split_point(&self) -> f64 {
        self.pole + self.sign * self.bx
    }
    pub fn pole_design_point(&self) -> f64 {
        self.pole + self.sign * self.pole_region.design_point
    }
    pub fn tail_design_point(&self) -> Option<f64> {
        self.tail_region
            .map(|r| self.pole + self.sign * r.design_point)
    }

    /// Value of the hat at `x`.
    pub fn hat(&self, x: f64) -> f64 {
        let t = self.sign * (x - self.pole);
        if !(t > 0.0) || t > self.extent {
            return 0.0;
        }
        if t <= self.bx {
            return self.by.max(self.pole_region.height(t));
        }
        match &self.tail_region {
            Some(tail) => tail.height(t),
            None => 0.0,
        }
    }

    pub fn set_verify(&mut self, verify: bool) {
        self.verifier.set_enabled(verify);
    }
    pub fn verify_failures(&self) -> u64 {
        self.verifier.failures()
    }
}

impl<D: DistributionView> Distribution<f64> for PoleHat<D> {
    fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> f64 {
        let ap = self.pole_region.area;
        loop {
            let u = rng.next_uniform() * self.total_area;

            if u < ap {
                // Pole region: draw the height from the area above it, then
                // the distance uniformly below the hat width.
                let region = &self.pole_region;
                let w = -region.beta * (ap - u);
                let z = region.transform.ft_inv(w);
                let y = (z - region.alpha) / region.beta;
                let t = rng.next_open_uniform() * region.transform.t_inv(z);
                if !(t > 0.0) || t > self.extent || !t.is_finite() || !y.is_finite() {
                    continue;
                }
                let fx = self.dist.pdf(self.pole + self.sign * t);
                if self.verifier.is_enabled() && fx > self.by {
                    let width = region.width(fx);
                    if !not_above(t, width) {
                        self.verifier
                            .report("pole", "density above hat", t, fx, region.height(t));
                    }
                }
                if y <= fx {
                    return self.pole + self.sign * t;
                }
                continue;
            }

            if u < ap + self.center_area {
                // The rectangle lies below the density.
                let t = rng.next_open_uniform() * self.bx;
                return self.pole + self.sign * t;
            }

            let tail = match &self.tail_region {
                Some(tail) => tail,
                None => continue,
            };
            let a = u - ap - self.center_area;
            let z = tail.transform.ft_inv(tail.ft_start + tail.beta * a);
            let t = (z - tail.alpha) / tail.beta;
            if !t.is_finite() || t <= self.bx || t >= self.extent {
                continue;
            }
            let h = tail.transform.t_inv(z);
            let y = rng.next_uniform() * h;
            let fx = self.dist.pdf(self.pole + self.sign * t);
            if self.verifier.is_enabled() && !not_above(fx, h) {
                self.verifier.report("pole", "density above hat", t, fx, h);
            }
            if y <= fx {
                return self.pole + self.sign * t;
            }
        }
    }
}

// Solves t f'(t) + f(t) = 0, i.e. maximizes the rectangle below the density.
//
// If the rectangle keeps growing up to a finite domain end, the whole domain
// belongs to the pole region.
fn find_split_point<D: DifferentiableView>(
    local: &Local<D>,
    extent: f64,
) -> Result<f64, ConstructionError> {
    let g = |t: f64| t * local.df(t) + local.f(t);

    if extent.is_finite() {
        let g_end = g(extent);
        if g_end.is_finite() && g_end >= 0.0 {
            return Ok(extent);
        }
    }

    let t0 = if extent.is_finite() { 0.5 * extent } else { 1.0 };
    let g0 = g(t0);
    if !g0.is_finite() {
        return Err(ConstructionError::NumericalInfeasibility(
            "the density or its derivative is not finite",
        ));
    }
    let bx = if g0 > 0.0 {
        find_root(&g, t0, 0.5 * t0, Direction::Up, extent, ROOT_TOLERANCE)?
    } else {
        find_root(&g, t0, 0.5 * t0, Direction::Down, 0.0, ROOT_TOLERANCE)?
    };
    if !(bx > 0.0) || !bx.is_finite() {
        return Err(ConstructionError::NumericalInfeasibility(
            "could not locate the splitting point",
        ));
    }

    Ok(bx)
}

fn build_pole_region<D: DifferentiableView>(
    local: &Local<D>,
    bx: f64,
    by: f64,
    exponent: Option<f64>,
) -> Result<PoleRegion, ConstructionError> {
    let t_near = NEAR_POLE * bx;
    // Local concavities at or below C_MIN (or not finite, e.g. where f'
    // vanishes at a finite domain end) carry no usable bound and are left to
    // the backoff below.
    let mut cp = match exponent {
        Some(c) => c,
        None => [local.inverse_lc(t_near), local.inverse_lc(bx)]
            .iter()
            .filter(|c| **c > C_MIN && c.is_finite())
            .fold(C_MAX, |cp, c| cp.min(*c)),
    };
    if !(cp > -1.0) {
        return Err(ConstructionError::NumericalInfeasibility(
            "the inverse density is not T-concave for any admissible exponent",
        ));
    }

    loop {
        let transform = PowerTransform::new(cp)?;
        let xp = bx * (1.0 + cp).powf(-1.0 / cp);
        let yp = local.f(xp);
        let dyp = local.df(xp);
        if !(dyp < 0.0) || !dyp.is_finite() || !yp.is_finite() {
            return Err(ConstructionError::Precondition(
                "the density must be strictly decreasing away from the pole",
            ));
        }
        let (alpha, beta) = transform.tangent(yp, xp, 1.0 / dyp);
        let z_floor = alpha + beta * by;

        let mut region = PoleRegion {
            transform,
            alpha,
            beta,
            design_point: xp,
            area: 0.0,
        };
        let dominates = |t: f64| not_above(t, region.width(local.f(t)));
        if z_floor < 0.0 && dominates(t_near) && dominates(bx) {
            region.area = -transform.ft(z_floor) / beta;
            if region.area > 0.0 && region.area.is_finite() {
                return Ok(region);
            }
        }

        if exponent.is_some() {
            return Err(ConstructionError::NumericalInfeasibility(
                "the pole hat does not dominate the density for the given exponent",
            ));
        }
        cp = 0.9 * cp - 0.1;
        if cp < C_MIN {
            return Err(ConstructionError::NumericalInfeasibility(
                "no pole exponent yields a dominating hat",
            ));
        }
    }
}

fn build_tail_region<D: DifferentiableView>(
    local: &Local<D>,
    bx: f64,
    extent: f64,
    exponent: Option<f64>,
) -> Result<TailRegion, ConstructionError> {
    // Design point: (t - bx) f'(t) + f(t) = 0.
    let g = |t: f64| (t - bx) * local.df(t) + local.f(t);
    let xt = if extent.is_finite() && g(extent) >= 0.0 {
        0.5 * (bx + extent)
    } else {
        find_root(&g, bx, 0.5 * bx, Direction::Up, extent, ROOT_TOLERANCE)?
    };
    let ft = local.f(xt);
    let dft = local.df(xt);
    if !(ft > 0.0) || !(dft < 0.0) || !ft.is_finite() || !dft.is_finite() {
        return Err(ConstructionError::Precondition(
            "the density must be strictly decreasing in the tail",
        ));
    }

    let target = local.lc(bx).min(C_MAX);
    let mut ct = match exponent {
        Some(c) => c,
        None => local.lc(xt).min(C_MAX),
    };
    let t_far = if extent.is_finite() {
        extent
    } else {
        xt + 10.0 * (xt - bx)
    };

    for _ in 0..MAX_TAIL_ADJUSTMENTS {
        if !(ct > -1.0) {
            break;
        }
        let transform = PowerTransform::new(ct)?;
        let (alpha, beta) = transform.tangent(xt, ft, dft);
        let z_start = alpha + beta * bx;

        let mut region = TailRegion {
            transform,
            alpha,
            beta,
            design_point: xt,
            ft_start: 0.0,
            area: 0.0,
        };
        let dominates = |t: f64| not_above(local.f(t), region.height(t));
        if beta < 0.0 && z_start < 0.0 && dominates(bx) && dominates(t_far) {
            let ft_end = if extent.is_finite() {
                transform.ft(alpha + beta * extent)
            } else {
                0.0
            };
            region.ft_start = transform.ft(z_start);
            region.area = (ft_end - region.ft_start) / beta;
            if region.area >= 0.0 && region.area.is_finite() {
                return Ok(region);
            }
        }

        if exponent.is_some() {
            return Err(ConstructionError::NumericalInfeasibility(
                "the tail hat does not dominate the density for the given exponent",
            ));
        }
        let next = 0.5 * (ct + target);
        if (next - ct).abs() < 1.0e-8 {
            break;
        }
        ct = next;
    }

    Err(ConstructionError::NumericalInfeasibility(
        "no tail exponent yields a dominating hat",
    ))
}
