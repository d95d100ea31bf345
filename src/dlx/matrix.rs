//! The toroidal four-way linked sparse matrix used by the DLX algorithm.

use std::rc::Rc;

use super::error::BuildError;

/// What an arena slot represents.
///
/// The root and every column header share the cell layout (they are the
/// sentinel of a circular list), so they are stored in the same `Vec` as
/// ordinary cells instead of as separate allocations. This keeps the
/// structure as an arena of indices rather than a graph of owned pointers.
enum Payload<R, E> {
    Root,
    Header { label: E, count: usize },
    Cell { column: usize, row_id: Rc<R> },
}

struct Node<R, E> {
    left: usize,
    right: usize,
    up: usize,
    down: usize,
    payload: Payload<R, E>,
}

impl<R, E> Node<R, E> {
    fn self_linked(payload: Payload<R, E>, idx: usize) -> Self {
        Node { left: idx, right: idx, up: idx, down: idx, payload }
    }
}

/// A sparse 0/1 matrix over columns labeled by `E` and rows identified by `R`,
/// represented as a toroidal doubly-linked structure of arena-indexed nodes.
///
/// `R` is the caller's row identifier (surfaced verbatim, via [`Rc`], in
/// yielded solutions); `E` is the universe element type, compared with
/// [`Eq`] to decide which rows share a column.
pub struct Matrix<R, E> {
    nodes: Vec<Node<R, E>>,
    col_count: usize,
}

const ROOT: usize = 0;

impl<R, E: Eq> Matrix<R, E> {
    /// Builds a matrix from a finite sequence of `(row_id, elements)` pairs.
    ///
    /// Rows and elements are consumed in order; a column header is created
    /// the first time an element is seen and reused (by equality) for every
    /// later occurrence. Rows with no elements contribute no cells and are
    /// silently dropped, since they cannot take part in any cover.
    pub fn build<Rows, RowIter>(rows: Rows) -> Self
    where
        Rows: IntoIterator<Item = (R, RowIter)>,
        RowIter: IntoIterator<Item = E>,
    {
        match Self::try_build::<_, _, std::convert::Infallible>(
            rows.into_iter().map(|(id, row)| Ok((id, row.into_iter().map(Ok)))),
        ) {
            Ok(matrix) => matrix,
            Err(_) => unreachable!("Infallible iterators cannot produce BuildError"),
        }
    }

    /// Builds a matrix from a finite sequence of fallible rows of fallible
    /// elements, propagating the first error encountered while reading the
    /// caller's input.
    pub fn try_build<Rows, RowIter, Ei>(rows: Rows) -> Result<Self, BuildError<Ei>>
    where
        Rows: IntoIterator<Item = Result<(R, RowIter), Ei>>,
        RowIter: IntoIterator<Item = Result<E, Ei>>,
    {
        let mut matrix = Matrix { nodes: vec![Node::self_linked(Payload::Root, ROOT)], col_count: 0 };

        for row in rows {
            let (row_id, elements) = row.map_err(BuildError::Input)?;
            let row_id = Rc::new(row_id);
            let mut first_in_row: Option<usize> = None;

            for element in elements {
                let element = element.map_err(BuildError::Input)?;
                let header = matrix.header_for(element);
                let cell = matrix.append_cell(header, Rc::clone(&row_id));

                match first_in_row {
                    None => first_in_row = Some(cell),
                    Some(first) => matrix.insert_right(matrix.nodes[first].left, cell),
                }
            }
        }

        Ok(matrix)
    }

    /// Finds the header labeled `element` by linear scan, or appends a new
    /// one to the right end of the header list.
    fn header_for(&mut self, element: E) -> usize {
        let mut h = self.nodes[ROOT].right;
        while h != ROOT {
            if let Payload::Header { label, .. } = &self.nodes[h].payload {
                if *label == element {
                    return h;
                }
            }
            h = self.nodes[h].right;
        }

        self.col_count += 1;
        let idx = self.nodes.len();
        self.nodes.push(Node::self_linked(Payload::Header { label: element, count: 0 }, idx));
        let root_left = self.nodes[ROOT].left;
        self.insert_right(root_left, idx);
        idx
    }

    /// Appends a new cell to the bottom of `header`'s vertical list.
    fn append_cell(&mut self, header: usize, row_id: Rc<R>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node::self_linked(Payload::Cell { column: header, row_id }, idx));
        let above = self.nodes[header].up;
        self.insert_down(above, idx);
        self.increment_count(header);
        idx
    }

    fn insert_right(&mut self, at: usize, node: usize) {
        let right = self.nodes[at].right;
        self.nodes[node].right = right;
        self.nodes[right].left = node;
        self.nodes[node].left = at;
        self.nodes[at].right = node;
    }

    fn insert_down(&mut self, at: usize, node: usize) {
        let down = self.nodes[at].down;
        self.nodes[node].down = down;
        self.nodes[down].up = node;
        self.nodes[node].up = at;
        self.nodes[at].down = node;
    }
}

impl<R, E> Matrix<R, E> {
    /// The number of columns present at build time (the initial universe size).
    pub(crate) fn col_count(&self) -> usize {
        self.col_count
    }

    fn column_of(&self, cell: usize) -> usize {
        match &self.nodes[cell].payload {
            Payload::Cell { column, .. } => *column,
            _ => unreachable!("column_of called on a non-cell node"),
        }
    }

    fn count(&self, header: usize) -> usize {
        match &self.nodes[header].payload {
            Payload::Header { count, .. } => *count,
            _ => unreachable!("count called on a non-header node"),
        }
    }

    fn increment_count(&mut self, header: usize) {
        match &mut self.nodes[header].payload {
            Payload::Header { count, .. } => *count += 1,
            _ => unreachable!("increment_count called on a non-header node"),
        }
    }

    fn decrement_count(&mut self, header: usize) {
        match &mut self.nodes[header].payload {
            Payload::Header { count, .. } => *count -= 1,
            _ => unreachable!("decrement_count called on a non-header node"),
        }
    }

    /// Whether `idx` names a column header (as opposed to an ordinary cell).
    pub(crate) fn is_header(&self, idx: usize) -> bool {
        matches!(self.nodes[idx].payload, Payload::Header { .. })
    }

    /// The row identifier shared by every cell of the row containing `cell`.
    pub(crate) fn row_id(&self, cell: usize) -> Rc<R> {
        match &self.nodes[cell].payload {
            Payload::Cell { row_id, .. } => Rc::clone(row_id),
            _ => unreachable!("row_id called on a non-cell node"),
        }
    }

    pub(crate) fn cell_down(&self, idx: usize) -> usize {
        self.nodes[idx].down
    }

    /// The header with the fewest live rows, breaking ties by leftmost
    /// (earliest inserted), or `None` if no columns remain (a solution state).
    pub(crate) fn smallest_column(&self) -> Option<usize> {
        let first = self.nodes[ROOT].right;
        if first == ROOT {
            return None;
        }

        let mut best = first;
        let mut best_count = self.count(first);
        let mut h = self.nodes[first].right;
        while h != ROOT {
            let c = self.count(h);
            if c < best_count {
                best = h;
                best_count = c;
            }
            h = self.nodes[h].right;
        }
        Some(best)
    }

    pub(crate) fn column_count(&self, header: usize) -> usize {
        self.count(header)
    }

    /// The first cell in `header`'s vertical list (its sentinel's `down`).
    pub(crate) fn header_down(&self, header: usize) -> usize {
        self.nodes[header].down
    }

    fn unlink_vertical(&mut self, idx: usize) {
        let up = self.nodes[idx].up;
        let down = self.nodes[idx].down;
        self.nodes[up].down = down;
        self.nodes[down].up = up;
        self.decrement_count(self.column_of(idx));
    }

    fn relink_vertical(&mut self, idx: usize) {
        let up = self.nodes[idx].up;
        let down = self.nodes[idx].down;
        self.nodes[up].down = idx;
        self.nodes[down].up = idx;
        self.increment_count(self.column_of(idx));
    }

    /// Removes `header` from the root's horizontal list and, for every row
    /// touching `header`, removes that row's other cells from their columns.
    fn cover_column(&mut self, header: usize) {
        let left = self.nodes[header].left;
        let right = self.nodes[header].right;
        self.nodes[left].right = right;
        self.nodes[right].left = left;

        let mut i = self.nodes[header].down;
        while i != header {
            let mut j = self.nodes[i].right;
            while j != i {
                self.unlink_vertical(j);
                j = self.nodes[j].right;
            }
            i = self.nodes[i].down;
        }
    }

    /// The exact inverse of [`cover_column`](Self::cover_column): relinking
    /// happens in the reverse traversal order (`up` then `left`) so that
    /// symmetric relinking reproduces the original topology.
    fn uncover_column(&mut self, header: usize) {
        let mut i = self.nodes[header].up;
        while i != header {
            let mut j = self.nodes[i].left;
            while j != i {
                self.relink_vertical(j);
                j = self.nodes[j].left;
            }
            i = self.nodes[i].up;
        }

        let left = self.nodes[header].left;
        let right = self.nodes[header].right;
        self.nodes[left].right = header;
        self.nodes[right].left = header;
    }

    /// Covers every column touched by row `r`, starting with `r`'s own
    /// column and then walking `right`.
    pub(crate) fn cover_row(&mut self, r: usize) {
        self.cover_column(self.column_of(r));
        let mut j = self.nodes[r].right;
        while j != r {
            self.cover_column(self.column_of(j));
            j = self.nodes[j].right;
        }
    }

    /// The exact inverse of [`cover_row`](Self::cover_row): uncovers in
    /// reverse order, walking `left` from `r.left` and finishing with `r`'s
    /// own column last.
    pub(crate) fn uncover_row(&mut self, r: usize) {
        let mut j = self.nodes[r].left;
        while j != r {
            self.uncover_column(self.column_of(j));
            j = self.nodes[j].left;
        }
        self.uncover_column(self.column_of(r));
    }
}

#[cfg(test)]
impl<R, E> Matrix<R, E> {
    /// Checks the circular-list and count invariants described in the
    /// module's design notes. Panics on the first violation found.
    pub(crate) fn check_invariants(&self) {
        for (idx, node) in self.nodes.iter().enumerate() {
            assert_eq!(self.nodes[node.left].right, idx, "left/right broken at {idx}");
            assert_eq!(self.nodes[node.right].left, idx, "right/left broken at {idx}");
            assert_eq!(self.nodes[node.up].down, idx, "up/down broken at {idx}");
            assert_eq!(self.nodes[node.down].up, idx, "down/up broken at {idx}");
        }

        let mut h = self.nodes[ROOT].right;
        while h != ROOT {
            let mut actual = 0;
            let mut c = self.nodes[h].down;
            while c != h {
                actual += 1;
                c = self.nodes[c].down;
            }
            assert_eq!(actual, self.count(h), "column count mismatch at header {h}");
            h = self.nodes[h].right;
        }

        assert_eq!(self.nodes[ROOT].up, ROOT);
        assert_eq!(self.nodes[ROOT].down, ROOT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(rows: Vec<(&'static str, Vec<char>)>) -> Matrix<&'static str, char> {
        Matrix::build(rows)
    }

    #[test]
    fn build_shares_columns_by_equality() {
        let mat = rows(vec![("A", vec!['x', 'y']), ("B", vec!['y'])]);
        assert_eq!(mat.col_count(), 2);
        mat.check_invariants();
    }

    #[test]
    fn empty_rows_are_dropped() {
        let mat: Matrix<&str, char> = rows(vec![("A", vec![]), ("B", vec!['z'])]);
        assert_eq!(mat.col_count(), 1);
        mat.check_invariants();
    }

    #[test]
    fn cover_uncover_row_restores_state() {
        let mut mat = rows(vec![
            ("R1", vec!['c', 'e', 'f']),
            ("R2", vec!['a', 'd', 'g']),
        ]);
        let r1 = mat.header_down(mat.smallest_column().unwrap());
        mat.cover_row(r1);
        mat.uncover_row(r1);
        mat.check_invariants();
        assert_eq!(mat.smallest_column().map(|h| mat.column_count(h)), Some(1));
    }

    #[test]
    fn smallest_column_breaks_ties_leftmost() {
        let mat = rows(vec![("A", vec!['x']), ("B", vec!['y'])]);
        let h = mat.smallest_column().unwrap();
        // 'x' is inserted first, so it must win the count==1 tie.
        assert!(matches!(&mat.nodes[h].payload, Payload::Header { label, .. } if *label == 'x'));
    }
}
