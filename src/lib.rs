//! An [exact cover] solver library built on Knuth's [dancing links (DLX)] algorithm.
//!
//! [exact cover]: https://en.wikipedia.org/wiki/Exact_cover
//! [dancing links (DLX)]: https://en.wikipedia.org/wiki/Dancing_Links
//!
//! # Concept
//!
//! Many puzzle-like problems — polyomino packing, Sudoku, the N-queens
//! problem, and more — can be modeled as exact cover problems: given a
//! universe of elements and a collection of subsets, find every way to
//! choose pairwise-disjoint subsets whose union is the whole universe.
//!
//! This crate has two layers. [`dlx::Matrix`]/[`dlx::Solutions`] are the
//! core: a toroidal sparse matrix and a resumable [`Iterator`] over exact
//! covers, generic over any row identifier and [`Eq`] element type, with
//! zero heap traffic once the matrix is built. [`Problem`]/[`Solver`] are a
//! higher-level, named-subset API with multiplicity ranges and a
//! pausable/abortable, channel-driven solver thread for longer-running
//! problems — see [`problems::polyomino`] for a worked example built on it.
//!
//! # Basic example (core API)
//!
//! ```
//! use dlx_exact_cover::dlx::Solutions;
//!
//! let rows = vec![
//!     ("A", vec![1, 2, 3]),
//!     ("B", vec![1]),
//!     ("C", vec![2]),
//!     ("D", vec![3]),
//!     ("E", vec![1, 2]),
//!     ("F", vec![2, 3]),
//! ];
//!
//! let solutions: Vec<_> = Solutions::new(rows).collect();
//! assert_eq!(solutions.len(), 4);
//! ```
//!
//! # Named-subset example (`Problem`/`Solver`)
//!
//! ```
//! use dlx_exact_cover::{Problem, Solver, SolverEvent};
//!
//! let mut prob = Problem::default();
//! prob.add_exact_constraints(1..=3);
//! prob.add_subset("A", vec![1, 2, 3]);
//! prob.add_subset("B", vec![1]);
//! prob.add_subset("C", vec![2]);
//! prob.add_subset("D", vec![3]);
//! prob.add_subset("E", vec![1, 2]);
//! prob.add_subset("F", vec![2, 3]);
//!
//! let mut solver = Solver::new(prob);
//! let mut solutions = vec![];
//! solver.run();
//!
//! for event in solver {
//!     if let SolverEvent::SolutionFound(sol) = event {
//!         solutions.push(sol);
//!     }
//! }
//!
//! assert_eq!(solutions.len(), 4);
//! ```

pub mod vector;

pub mod dlx;
pub mod problem;
pub mod solver;

pub mod problems;

pub use problem::Problem;
pub use solver::{Solver, SolverEvent};
