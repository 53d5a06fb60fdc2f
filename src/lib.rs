//! Automatic rejection samplers for univariate distributions.
//!
//! Each sampler builds, once and for all at construction, a hat function
//! that majorizes the density of the target distribution, and then draws
//! variates by acceptance-rejection against that hat. The hat is computed
//! from a [`view`] over the distribution, i.e. from the density and whatever
//! else is known about it (derivative, mode, area, CDF at the mode).
//!
//! Available methods:
//!
//! * [`PoleHat`]: densities with a pole at a domain end, using inverse
//!   transformed density rejection near the pole,
//! * [`RouHat`] and [`DiscreteRouHat`]: simple ratio-of-uniforms for
//!   `T_{-1/2}`-concave densities and mass functions,
//! * [`AdaptiveTable`]: piecewise-constant hats over monotone slopes that
//!   are refined while sampling.
//!
//! ```
//! use hatrej::view::Continuous;
//! use hatrej::{Distribution, RouConfig, RouHat};
//! use rand::SeedableRng;
//!
//! let normal = Continuous::new(|x: f64| (-0.5 * x * x).exp())
//!     .with_mode(0.0)
//!     .with_pdf_area((2.0 * std::f64::consts::PI).sqrt());
//! let hat = RouHat::new(normal, &RouConfig::default()).unwrap();
//!
//! let mut rng = rand_xoshiro::Xoshiro256StarStar::seed_from_u64(0);
//! let x = hat.sample(&mut rng);
//! assert!(x.is_finite());
//! ```

use rand_core::RngCore;

pub mod distributions;
pub mod error;
pub mod guide;
pub mod methods;
pub mod num;
pub mod roots;
pub mod segment;
pub mod transform;
pub mod view;

pub use error::ConstructionError;
pub use methods::{
    AdaptiveTable, DiscreteRouConfig, DiscreteRouHat, PoleConfig, PoleHat, RouConfig, RouHat,
    SplitMode, TableConfig,
};
pub use num::UniformSource;
pub use view::{DifferentiableView, DiscreteView, DistributionView};

/// Types that can generate random variates.
pub trait Distribution<T> {
    /// Draws a variate.
    fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> T;
}

impl<'a, T, D: Distribution<T> + ?Sized> Distribution<T> for &'a D {
    #[inline(always)]
    fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> T {
        (**self).sample(rng)
    }
}
