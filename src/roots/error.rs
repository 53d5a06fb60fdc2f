use std::error::Error;
use std::fmt;

/// A type alias for `Result<T, RootError>`.
pub type RootResult<T> = Result<T, RootError>;

/// An error that can occur while bracketing or refining a root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RootError {
    /// No sign change was found before the iteration or magnitude guard tripped.
    Bracket { iteration_count: u32 },
    /// The bracket does not contain a sign change.
    NoSignChange,
    /// The function is not finite at a probe point.
    NonFinite,
}

impl fmt::Display for RootError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RootError::Bracket { iteration_count } => write!(
                f,
                "root could not be bracketed after {} iterations",
                iteration_count
            ),
            RootError::NoSignChange => write!(f, "the bracket does not contain a sign change"),
            RootError::NonFinite => write!(f, "the function is not finite at a probe point"),
        }
    }
}

impl Error for RootError {}
