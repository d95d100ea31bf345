//! Dancing links with column multiplicity ranges ("Algorithm M" in Knuth's
//! TAOCP fascicle 5): a generalized cover where each column must be
//! selected somewhere between a `min` and `max` number of times, rather than
//! exactly once.
//!
//! This is the engine behind [`crate::problem::Problem`] /
//! [`crate::solver::Solver`], which need per-element multiplicity ranges.
//! The plain exact cover core in [`super::matrix`] / [`super::solutions`]
//! does not need this generalization and stays with the simpler, strict
//! one-cover-per-column semantics.

use super::callback::Callback;

/// A single node of [`Matrix`].
#[derive(Default)]
#[cfg_attr(test, derive(Debug))]
struct Node {
    // row, col: 1-based b/c of head node (only internally)
    row: usize,
    col: usize,
    left: usize,
    right: usize,
    up: usize,
    down: usize,
}

/// A sparse matrix representation of a generalized exact cover problem,
/// where each column carries a `[min, max]` selection-count range.
#[cfg_attr(test, derive(Debug))]
pub struct Matrix {
    row_cnt: usize,
    col_cnt: usize,
    pool: Vec<Node>, // head: 0, columns: 1..=col_cnt
    col_size: Vec<usize>,

    // column multiplicity range
    min: Vec<usize>,
    max: Vec<usize>,
    weight: Vec<usize>,

    partial_sol: Vec<usize>,
    abort_requested: bool,
}

impl Default for Matrix {
    fn default() -> Matrix {
        Matrix {
            row_cnt: 0,
            col_cnt: 0,
            pool: vec![Node::default()],
            col_size: vec![0],

            min: vec![0],
            max: vec![0],
            weight: vec![0],

            partial_sol: vec![],
            abort_requested: false,
        }
    }
}

// Methods for initializing Matrix
impl Matrix {
    const HEAD: usize = 0;

    pub fn new(col_cnt: usize) -> Matrix {
        // Set multiplicity to [1, 1] by default
        let mut col_mul_default = vec![1; col_cnt + 1];
        col_mul_default[0] = 0;

        let mut mat = Matrix {
            col_cnt,
            col_size: vec![0; col_cnt + 1],
            min: col_mul_default.clone(),
            max: col_mul_default.clone(),
            weight: vec![0; col_cnt + 1],
            ..Matrix::default()
        };
        for col_num in 1..=col_cnt {
            let col = mat.create_node(0, col_num);
            mat.insert_right(col - 1, col);
        }
        mat
    }

    pub fn with_rows(col_cnt: usize, rows: &[&[usize]]) -> Matrix {
        let mut mat = Matrix::new(col_cnt);
        for row in rows { mat.add_row(row) }
        mat
    }

    pub fn add_row(&mut self, row: &[usize]) {
        self.row_cnt += 1;
        let row_num = self.row_cnt;
        let mut left_node = 0;

        for &col_num in row {
            assert!(1 <= col_num && col_num <= self.col_cnt); // TODO: write proper validation logic
            let node = self.create_node(row_num, col_num);

            self.insert_down(self.pool[col_num].up, node);
            if left_node != 0 { self.insert_right(left_node, node); }

            self.col_size[col_num] += 1;
            left_node = node;
        }
    }

    pub fn set_multiplicity(&mut self, col: usize, min: usize, max: usize) {
        self.min[col] = min;
        self.max[col] = max;
    }
}

// Main algorithm (dancing links)
impl Matrix {
    pub fn solve(&mut self, callback: &mut impl Callback<Matrix>) {
        self.abort_requested = false;
        self.recursive_solve(callback);
        callback.on_finish();
    }

    /// Algorithm M: dancing links generalized with column multiplicity.
    ///
    /// - [CHOOSE-COLUMN] In each recursion level, choose a single column c.
    /// - [TRY-ROWS] Try each row r in column c and then recurse.
    /// - [COVER-FULL] If column c becomes full after selecting any row, cover it.
    /// - [TWEAK-ROW] Otherwise, just hide the rows above row r to force row order.
    /// - [NO-SELECT] If c is already fulfilled, also recurse without selecting any row.
    /// - [UNDO] Finally, undo all modifications and backtrack.
    ///
    /// At most one row is selected in each recursion level.
    fn recursive_solve(&mut self, callback: &mut impl Callback<Matrix>) {
        if self.pool[Matrix::HEAD].right == Matrix::HEAD {
            callback.on_solution(self.partial_sol.clone(), self);
        }
        callback.on_iteration(self);
        if self.abort_requested {
            callback.on_abort(self);
            return;
        }

        // [CHOOSE-COLUMN] MRV (minimum remaining values) heuristic.
        let c = self.choose_best_col();
        if !self.col_fulfillable(c) { return; }

        // [COVER-FULL] If column c becomes full after selecting any row, cover it in advance.
        self.weight[c] += 1; // will select a row
        let mut covered = false;
        if self.col_full(c) {
            self.cover_col(c);
            covered = true;
        }

        // [TRY-ROWS]
        let first = self.pool[c].down; // to untweak rows later (UNDO)
        let mut r = first;
        while r != c {
            if !covered { // If covered, rows are already hidden.
                // [TWEAK-ROW]
                self.tweak_row(r);
            }
            self.select_row(r);
            self.partial_sol.push(self.pool[r].row);

            // If column c becomes unfulfillable after selecting a row, don't recurse.
            if self.col_fulfillable(r) {
                self.recursive_solve(callback);
            }

            self.unselect_row(r);
            self.partial_sol.pop();
            r = self.pool[r].down;
        }

        // [NO-SELECT] If column c was already fulfilled, not selecting any row is also an option.
        self.weight[c] -= 1;
        if self.col_fulfilled(c) {
            // All rows are already hidden, so just hide the column from the column list.
            let Node { left, right, .. } = self.pool[c];
            self.pool[left].right = right;
            self.pool[right].left = left;

            self.recursive_solve(callback);

            self.pool[left].right = c;
            self.pool[right].left = c;
        }

        // [UNDO] Undo all modifications
        if covered {
            self.uncover_col(c);
        } else {
            self.untweak_rows(first);
        }
    }
}

// Helper methods
impl Matrix {
    pub fn abort(&mut self) {
        self.abort_requested = true;
    }

    fn create_node(&mut self, row: usize, col: usize) -> usize {
        let idx = self.pool.len();
        self.pool.push(Node {
            row,
            col,
            left: idx,
            right: idx,
            up: idx,
            down: idx,
        });
        idx
    }

    fn insert_right(&mut self, at: usize, node: usize) {
        let right = self.pool[at].right;
        self.pool[node].right = right;
        self.pool[right].left = node;
        self.pool[node].left = at;
        self.pool[at].right = node;
    }

    fn insert_down(&mut self, at: usize, node: usize) {
        let down = self.pool[at].down;
        self.pool[node].down = down;
        self.pool[down].up = node;
        self.pool[node].up = at;
        self.pool[at].down = node;
    }

    // ======== Level 4 ========

    /// Selects (already hidden) row r by selecting each node j in the row.
    ///
    /// It doesn't add the weight to the current column, because the current
    /// column's weight is handled in the main algorithm. Selecting some node
    /// j in row r can make j's column covered, and in turn hide other rows
    /// which are also in the current column c.
    #[inline]
    fn select_row(&mut self, r: usize) {
        let mut j = self.pool[r].right;
        while j != r {
            self.select_node(j);
            j = self.pool[j].right;
        }
    }

    /// Unselects row r.
    #[inline]
    fn unselect_row(&mut self, r: usize) {
        let mut j = self.pool[r].left;
        while j != r {
            self.unselect_node(self.pool[j].col);
            j = self.pool[j].left;
        }
    }

    /// Selects (already hidden) node j. Subroutine of `select_row`.
    #[inline]
    fn select_node(&mut self, j: usize) {
        let c = self.pool[j].col;
        self.weight[c] += 1;
        if self.col_full(c) {
            self.cover_col(c);
        }
    }

    /// Unselects node j.
    #[inline]
    fn unselect_node(&mut self, j: usize) {
        let c = self.pool[j].col;
        if self.col_full(c) {
            self.uncover_col(c);
        }
        self.weight[c] -= 1;
    }

    // ======== Level 3 ========

    /// Covers column c by hiding all its rows, disabling its use entirely.
    #[inline]
    fn cover_col(&mut self, c: usize) {
        let Node { left, right, .. } = self.pool[c];
        self.pool[left].right = right;
        self.pool[right].left = left;

        let mut r = self.pool[c].down;
        while r != c {
            self.hide_row(r);
            r = self.pool[r].down;
        }
    }

    /// Uncovers column c.
    #[inline]
    fn uncover_col(&mut self, c: usize) {
        let mut r = self.pool[c].up;
        while r != c {
            self.unhide_row(r);
            r = self.pool[r].up;
        }

        let Node { left, right, .. } = self.pool[c];
        self.pool[left].right = c;
        self.pool[right].left = c;
    }

    /// Hides row r completely, including from its own column. Only valid
    /// when r is the first node in the column ("tweak" is Knuth's term).
    #[inline]
    fn tweak_row(&mut self, r: usize) {
        self.hide_row(r);
        let Node { col: c, down: d, .. } = self.pool[r];
        self.pool[c].down = d;
        self.pool[d].down = c;
    }

    /// Untweaks all rows starting from r. Relies on the fact that unhiding
    /// rows can be done in the same order as hiding.
    #[inline]
    fn untweak_rows(&mut self, mut r: usize) {
        let c = self.pool[r].col;
        while r != c {
            self.unhide_row(r);
            let Node { up: u, down: d, .. } = self.pool[r];
            self.pool[u].down = r;
            self.pool[d].down = r;
            r = d;
        }
    }

    // ======== Level 2 ========

    /// Hides row r from other columns. Does not hide node r from its own
    /// column; call it only when the column is covered or r is hidden manually.
    #[inline]
    fn hide_row(&mut self, r: usize) {
        let mut j = self.pool[r].right;
        while j != r {
            self.hide_node(j);
            j = self.pool[j].right;
        }
    }

    /// Unhides row r.
    #[inline]
    fn unhide_row(&mut self, r: usize) {
        let mut j = self.pool[r].left;
        while j != r {
            self.unhide_node(j);
            j = self.pool[j].left;
        }
    }

    // ======== Level 1 ========

    #[inline]
    fn hide_node(&mut self, j: usize) {
        let Node { col, up, down, .. } = self.pool[j];
        self.pool[up].down = down;
        self.pool[down].up = up;
        self.col_size[col] -= 1;
    }

    #[inline]
    fn unhide_node(&mut self, j: usize) {
        let Node { col, up, down, .. } = self.pool[j];
        self.pool[up].down = j;
        self.pool[down].up = j;
        self.col_size[col] += 1;
    }

    // ======== Level 0 ========

    /// Chooses the column with the lowest `col_size` (MRV heuristic).
    #[inline]
    fn choose_best_col(&self) -> usize {
        let mut best_col = self.pool[Matrix::HEAD].right;
        let mut best_size = self.col_size[best_col];

        let mut c = best_col;
        while c != Matrix::HEAD {
            if self.col_size[c] < best_size {
                best_col = c;
                best_size = self.col_size[c];
            }
            c = self.pool[c].right;
        }
        best_col
    }

    /// Whether column c is selected within its multiplicity range.
    #[inline]
    fn col_fulfilled(&self, c: usize) -> bool {
        let Matrix { weight, min, max, .. } = self;
        min[c] <= weight[c] && weight[c] <= max[c]
    }

    /// Whether column c is fully selected (at its maximum).
    #[inline]
    fn col_full(&self, c: usize) -> bool {
        self.weight[c] == self.max[c]
    }

    /// Whether it is still possible to select column c within range.
    #[inline]
    fn col_fulfillable(&self, c: usize) -> bool {
        let Matrix { weight, min, max, col_size, .. } = self;
        if weight[c] > max[c] { return false; }
        if weight[c] + col_size[c] < min[c] { return false; }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct SolutionCollector {
        solutions: Vec<Vec<usize>>,
    }

    impl Callback<Matrix> for SolutionCollector {
        fn on_solution(&mut self, sol: Vec<usize>, _mat: &mut Matrix) {
            self.solutions.push(sol);
        }
    }

    #[test]
    fn exact_multiplicity_matches_plain_exact_cover() {
        let mut mat = Matrix::with_rows(
            7,
            &[
                &[3, 5, 6],
                &[1, 4, 7],
                &[2, 3, 6],
                &[1, 4],
                &[2, 7],
                &[4, 5, 7],
            ],
        );
        let mut cb = SolutionCollector::default();
        mat.solve(&mut cb);
        assert_eq!(cb.solutions.len(), 1);
    }

    #[test]
    fn relaxed_multiplicity_allows_undercoverage() {
        let mut mat = Matrix::new(2);
        mat.set_multiplicity(1, 0, 1);
        mat.set_multiplicity(2, 0, 1);
        mat.add_row(&[1]);
        mat.add_row(&[2]);

        let mut cb = SolutionCollector::default();
        mat.solve(&mut cb);
        // Each column independently selected or not: {}, {R1}, {R2}, {R1,R2}.
        assert_eq!(cb.solutions.len(), 4);
    }
}
