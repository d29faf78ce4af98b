/// Number of cells in a `rows x cols` buffer, `None` on overflow.
pub fn buffer_size(rows: usize, cols: usize) -> Option<usize> {
    rows.checked_mul(cols)
}

/// Row-major linear index.
#[inline]
pub fn coord_to_linear(row: usize, col: usize, cols: usize) -> usize {
    debug_assert!(col < cols);
    row * cols + col
}

#[inline]
pub fn linear_to_coord(linear_index: usize, cols: usize) -> (usize, usize) {
    (linear_index / cols, linear_index % cols)
}

/// True for cells on the outer border of a `rows x cols` grid.
#[inline]
pub fn is_border(row: usize, col: usize, rows: usize, cols: usize) -> bool {
    row == 0 || col == 0 || row + 1 == rows || col + 1 == cols
}
