//! Root bracketing and bisection.
//!
//! These are only used to locate construction points such as the splitting
//! point between the pole and the tail region, so plain bisection is
//! accurate enough.

mod error;
pub use error::*;

/// Maximum number of probes when expanding a bracket.
const MAX_EXPANSIONS: u32 = 100;

/// Maximum number of bisection steps.
const MAX_BISECTIONS: u32 = 1000;

/// Direction of bracket expansion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward increasing abscissas.
    Up,
    /// Toward decreasing abscissas.
    Down,
}

/// Expands a bracket from `x0` until function `g` changes sign.
///
/// Probes move away from `x0` with a stride that doubles at each step. A
/// probe that would step over `bound` is instead placed halfway between the
/// last probe and `bound`, so the bound itself is never evaluated. The
/// returned bracket `(lo, hi)` is ordered and contains a sign change.
///
/// An error is returned if `g` is not finite at a probe or if no sign change
/// is found within a fixed number of probes.
pub fn expand_bracket<G>(
    g: &G,
    x0: f64,
    stride: f64,
    direction: Direction,
    bound: f64,
) -> RootResult<(f64, f64)>
where
    G: Fn(f64) -> f64,
{
    let mut x = x0;
    let mut gx = g(x);
    if !gx.is_finite() {
        return Err(RootError::NonFinite);
    }
    if gx == 0.0 {
        return Ok((x, x));
    }
    let mut stride = if stride.is_finite() && stride != 0.0 {
        stride.abs()
    } else {
        x0.abs().max(1.0)
    };

    for _ in 0..MAX_EXPANSIONS {
        let mut x_next = match direction {
            Direction::Up => x + stride,
            Direction::Down => x - stride,
        };
        let overshoot = match direction {
            Direction::Up => x_next >= bound,
            Direction::Down => x_next <= bound,
        };
        if overshoot {
            x_next = 0.5 * (x + bound);
        }
        if !x_next.is_finite() || x_next == x {
            break;
        }

        let g_next = g(x_next);
        if !g_next.is_finite() {
            return Err(RootError::NonFinite);
        }
        if g_next == 0.0 || (g_next < 0.0) != (gx < 0.0) {
            return Ok(if x < x_next { (x, x_next) } else { (x_next, x) });
        }

        x = x_next;
        gx = g_next;
        stride = stride + stride;
    }

    Err(RootError::Bracket {
        iteration_count: MAX_EXPANSIONS,
    })
}

/// Finds a root of `g` within `[lo, hi]` by bisection.
///
/// `g(lo)` and `g(hi)` must have opposite signs. Bisection stops when the
/// bracket width is within `rel_tol` of the magnitude of its midpoint, or
/// when the bracket can no longer be narrowed in floating point.
pub fn bisect<G>(g: &G, lo: f64, hi: f64, rel_tol: f64) -> RootResult<f64>
where
    G: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut g_lo = g(lo);
    let g_hi = g(hi);
    if !g_lo.is_finite() || !g_hi.is_finite() {
        return Err(RootError::NonFinite);
    }
    if g_lo == 0.0 {
        return Ok(lo);
    }
    if g_hi == 0.0 {
        return Ok(hi);
    }
    if (g_lo < 0.0) == (g_hi < 0.0) {
        return Err(RootError::NoSignChange);
    }

    for _ in 0..MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if (hi - lo) <= rel_tol * mid.abs() || mid <= lo || mid >= hi {
            return Ok(mid);
        }
        let g_mid = g(mid);
        if !g_mid.is_finite() {
            return Err(RootError::NonFinite);
        }
        if g_mid == 0.0 {
            return Ok(mid);
        }
        if (g_mid < 0.0) == (g_lo < 0.0) {
            lo = mid;
            g_lo = g_mid;
        } else {
            hi = mid;
        }
    }

    Ok(0.5 * (lo + hi))
}

/// Brackets a root starting from `x0` and refines it by bisection.
pub fn find_root<G>(
    g: &G,
    x0: f64,
    stride: f64,
    direction: Direction,
    bound: f64,
    rel_tol: f64,
) -> RootResult<f64>
where
    G: Fn(f64) -> f64,
{
    let (lo, hi) = expand_bracket(g, x0, stride, direction, bound)?;
    if lo == hi {
        return Ok(lo);
    }

    bisect(g, lo, hi, rel_tol)
}
