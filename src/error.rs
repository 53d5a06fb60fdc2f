//! Hat construction errors.

use crate::roots::RootError;
use crate::transform::TransformError;

use thiserror::Error;

/// Error type for hat construction failures.
///
/// A failed construction never yields a partial hat.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    /// A property required by the method is missing or invalid.
    #[error("precondition not met: {0}")]
    Precondition(&'static str),
    /// The automatic search for hat parameters failed; explicit exponents or
    /// an explicit splitting point may still succeed.
    #[error("numerical infeasibility: {0}")]
    NumericalInfeasibility(&'static str),
    /// The distribution is degenerate (empty domain, vanishing density...).
    #[error("degenerate distribution: {0}")]
    DegenerateDistribution(&'static str),
}

impl From<RootError> for ConstructionError {
    fn from(_: RootError) -> Self {
        ConstructionError::NumericalInfeasibility("could not locate the splitting point")
    }
}

impl From<TransformError> for ConstructionError {
    fn from(_: TransformError) -> Self {
        ConstructionError::NumericalInfeasibility("concavity exponent out of range")
    }
}
