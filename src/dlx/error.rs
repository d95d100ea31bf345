//! Errors produced while building a [`Matrix`](crate::dlx::Matrix).

use std::error::Error;
use std::fmt::{self, Display};

/// An error raised while consuming the caller's row/element sequences.
///
/// `Ei` is the error type the caller's own iterators raise. There is no
/// `ComparisonFailure` variant here: this crate compares elements with
/// `PartialEq`/`Eq`, which is infallible, so the only way building a
/// [`Matrix`](crate::dlx::Matrix) can fail is if the caller's input
/// iterators themselves fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError<Ei> {
    /// Iterating a row or an element within a row returned `Err`.
    Input(Ei),
}

impl<Ei: Display> Display for BuildError<Ei> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Input(e) => write!(f, "failed to read exact cover input: {}", e),
        }
    }
}

impl<Ei: Error + 'static> Error for BuildError<Ei> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BuildError::Input(e) => Some(e),
        }
    }
}
