//! A low-level API for the dancing links (DLX) algorithm and its generalizations.
//!
//! [`Matrix`] is the toroidal sparse-matrix core; [`Solutions`] drives it
//! through Knuth's backtracking search as a plain, resumable
//! [`Iterator`](std::iter::Iterator). Construction and search never spawn a
//! thread or invoke a caller callback — that richer, cancellable surface
//! lives one layer up, in [`crate::problem`] and [`crate::solver`], built
//! atop the [`multiplicity`] variant of this same matrix.

mod callback;
mod error;
mod matrix;
mod multiplicity;
mod solutions;

pub use error::BuildError;
pub use matrix::Matrix;
pub use solutions::Solutions;

pub use callback::{Callback, SolutionCallback};
pub use multiplicity::Matrix as MultiplicityMatrix;
