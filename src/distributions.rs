//! Views over common distributions.
//!
//! These views only describe the distributions; sampling is done by passing
//! them to one of the [`methods`](crate::methods).

pub use binomial::{Binomial, BinomialError};
pub use cauchy::{Cauchy, CauchyError};
pub use gamma::{Gamma, GammaError};
pub use normal::{Normal, NormalError};
pub use poisson::{Poisson, PoissonError};
pub use weibull::{Weibull, WeibullError};

mod binomial;
mod cauchy;
mod gamma;
mod normal;
mod poisson;
mod weibull;
