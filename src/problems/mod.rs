//! Worked exact cover problem generators built on top of [`crate::problem::Problem`].

pub mod polyomino;
