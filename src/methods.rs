//! Rejection samplers built on automatically constructed hats.

use std::sync::atomic::{AtomicU64, Ordering};

pub mod discrete_rou;
pub mod pole;
pub mod rou;
pub mod table;

pub use discrete_rou::{DiscreteRouConfig, DiscreteRouHat};
pub use pole::{PoleConfig, PoleHat};
pub use rou::{RouConfig, RouHat};
pub use table::{AdaptiveTable, SplitMode, TableConfig};

/// Verify-mode bookkeeping shared by all samplers.
///
/// When enabled, every density evaluation made while sampling is checked
/// against the hat and the squeeze. Violations are counted and logged but
/// never interrupt sampling: rounding errors may trigger rare false
/// positives, while frequent violations point at a broken hat.
#[derive(Debug, Default)]
pub struct Verifier {
    enabled: bool,
    failures: AtomicU64,
}

impl Verifier {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            failures: AtomicU64::new(0),
        }
    }

    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Number of violations detected so far.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Records a violation at `x`, where the density `fx` crossed `bound`.
    pub fn report(&self, method: &'static str, what: &'static str, x: f64, fx: f64, bound: f64) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(method, x, fx, bound, "{}", what);
    }
}

impl Clone for Verifier {
    fn clone(&self) -> Self {
        Self {
            enabled: self.enabled,
            failures: AtomicU64::new(self.failures()),
        }
    }
}
