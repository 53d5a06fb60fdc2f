mod collisions;
mod goodness_of_fit;
mod util;

pub use collisions::collisions;
pub use goodness_of_fit::{discrete_goodness_of_fit, goodness_of_fit};
pub use util::{test_rng, TestRng};
