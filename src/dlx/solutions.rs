//! The resumable, non-recursive backtracking search over a [`Matrix`].

use std::rc::Rc;

use super::error::BuildError;
use super::matrix::Matrix;

/// A pull-based enumerator of exact covers.
///
/// `Solutions` owns one [`Matrix`] and a solution stack of cell indices, one
/// per currently-selected row. Each call to [`Iterator::next`] resumes the
/// depth-first search exactly where the previous call left it: the matrix is
/// left in its fully-covered state between calls, and the next call begins
/// by backtracking to explore the next branch. Dropping a `Solutions`
/// mid-enumeration uncovers every row still on the stack, restoring the
/// matrix before the arena is freed.
pub struct Solutions<R, E: Eq> {
    matrix: Matrix<R, E>,
    stack: Vec<usize>,
    first: bool,
    exhausted: bool,
}

impl<R, E: Eq> Solutions<R, E> {
    /// Builds the matrix for `rows` and returns a fresh, unstarted search.
    pub fn new<Rows, RowIter>(rows: Rows) -> Self
    where
        Rows: IntoIterator<Item = (R, RowIter)>,
        RowIter: IntoIterator<Item = E>,
    {
        Self::from_matrix(Matrix::build(rows))
    }

    /// The fallible counterpart of [`new`](Self::new); see
    /// [`Matrix::try_build`].
    pub fn try_new<Rows, RowIter, Ei>(rows: Rows) -> Result<Self, BuildError<Ei>>
    where
        Rows: IntoIterator<Item = Result<(R, RowIter), Ei>>,
        RowIter: IntoIterator<Item = Result<E, Ei>>,
    {
        Ok(Self::from_matrix(Matrix::try_build(rows)?))
    }

    fn from_matrix(matrix: Matrix<R, E>) -> Self {
        let stack = Vec::with_capacity(matrix.col_count());
        Solutions { matrix, stack, first: true, exhausted: false }
    }

    /// Undoes the most recently chosen row and tries the next sibling in its
    /// column; unwinds further up the stack if that column is exhausted.
    /// Returns `false` once the stack empties without an alternative.
    fn backtrack(&mut self) -> bool {
        while let Some(&r) = self.stack.last() {
            self.matrix.uncover_row(r);
            let next = self.matrix.cell_down(r);

            if self.matrix.is_header(next) {
                self.stack.pop();
                continue;
            }

            self.matrix.cover_row(next);
            *self.stack.last_mut().unwrap() = next;
            return true;
        }
        false
    }

    fn current_solution(&self) -> Vec<Rc<R>> {
        self.stack.iter().map(|&cell| self.matrix.row_id(cell)).collect()
    }
}

impl<R, E: Eq> Iterator for Solutions<R, E> {
    type Item = Vec<Rc<R>>;

    fn next(&mut self) -> Option<Vec<Rc<R>>> {
        if self.exhausted {
            return None;
        }

        if self.first {
            self.first = false;
        } else if !self.backtrack() {
            self.exhausted = true;
            return None;
        }

        loop {
            match self.matrix.smallest_column() {
                None => return Some(self.current_solution()),
                Some(header) if self.matrix.column_count(header) == 0 => {
                    if !self.backtrack() {
                        self.exhausted = true;
                        return None;
                    }
                }
                Some(header) => {
                    let row = self.matrix.header_down(header);
                    self.matrix.cover_row(row);
                    self.stack.push(row);
                }
            }
        }
    }
}

impl<R, E: Eq> Drop for Solutions<R, E> {
    fn drop(&mut self) {
        while let Some(r) = self.stack.pop() {
            self.matrix.uncover_row(r);
        }
        #[cfg(test)]
        self.matrix.check_invariants();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(rows: Vec<(&'static str, Vec<char>)>) -> Vec<Vec<&'static str>> {
        Solutions::new(rows)
            .map(|sol| sol.iter().map(|r| **r).collect())
            .collect()
    }

    #[test]
    fn textbook_six_by_seven_has_one_solution() {
        let sols = solve(vec![
            ("R1", vec!['c', 'e', 'f']),
            ("R2", vec!['a', 'd', 'g']),
            ("R3", vec!['b', 'c', 'f']),
            ("R4", vec!['a', 'd']),
            ("R5", vec!['b', 'g']),
            ("R6", vec!['d', 'e', 'g']),
        ]);
        assert_eq!(sols, vec![vec!["R1", "R4", "R5"]]);
    }

    #[test]
    fn unsatisfiable_universe_has_no_solutions() {
        let sols = solve(vec![("R1", vec!['a', 'b']), ("R2", vec!['a'])]);
        assert!(sols.is_empty());
    }

    #[test]
    fn multiple_covers_are_all_found() {
        let mut sols = solve(vec![("R1", vec!['a']), ("R2", vec!['b']), ("R3", vec!['a', 'b'])]);
        sols.sort();
        assert_eq!(sols, vec![vec!["R1", "R2"], vec!["R3"]]);
    }

    #[test]
    fn empty_input_yields_one_empty_solution() {
        let sols: Vec<Vec<&str>> = solve(vec![]);
        assert_eq!(sols, vec![Vec::<&str>::new()]);
    }

    #[test]
    fn duplicate_rows_are_distinct_choices() {
        let sols = solve(vec![("R1", vec!['a']), ("R2", vec!['a'])]);
        assert_eq!(sols, vec![vec!["R1"], vec!["R2"]]);
    }

    #[test]
    fn exhausted_iterator_stays_exhausted() {
        let mut it = Solutions::new(vec![("R1", vec!['a'])]);
        assert!(it.next().is_some());
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn determinism_across_runs() {
        let rows = vec![
            ("R1", vec!['c', 'e', 'f']),
            ("R2", vec!['a', 'd', 'g']),
            ("R3", vec!['b', 'c', 'f']),
            ("R4", vec!['a', 'd']),
            ("R5", vec!['b', 'g']),
            ("R6", vec!['d', 'e', 'g']),
        ];
        assert_eq!(solve(rows.clone()), solve(rows));
    }

    #[test]
    fn matrix_is_restored_after_full_enumeration() {
        let mut it = Solutions::new(vec![("R1", vec!['a']), ("R2", vec!['b']), ("R3", vec!['a', 'b'])]);
        while it.next().is_some() {}
        it.matrix.check_invariants();
        assert_eq!(it.matrix.smallest_column().map(|h| it.matrix.column_count(h)), Some(2));
    }

    #[test]
    fn drop_mid_enumeration_restores_matrix() {
        // Dropping while a branch is still selected must uncover it before
        // the arena is freed; Drop's cfg(test) invariant check panics if not.
        let mut it = Solutions::new(vec![
            ("R1", vec!['c', 'e', 'f']),
            ("R2", vec!['a', 'd', 'g']),
            ("R3", vec!['b', 'c', 'f']),
            ("R4", vec!['a', 'd']),
            ("R5", vec!['b', 'g']),
            ("R6", vec!['d', 'e', 'g']),
        ]);
        it.next();
    }
}
