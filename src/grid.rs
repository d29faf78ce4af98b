//! Plate temperature storage.
//!
//! A `Grid` is one row-major `rows x cols` buffer of cell values.
//! A `GridPair` holds the `current` and `next` buffers of a plate,
//! their roles are exchanged after every sweep without copying cells.
//! Storage is released on drop.

use crate::error::*;
use crate::par_slice;
use crate::util::*;

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    buffer: Vec<f64>,
}

impl Grid {
    /// Zero filled `rows x cols` grid.
    /// Fails instead of aborting when the memory is not available.
    pub fn allocate(rows: usize, cols: usize) -> Result<Self> {
        let count = buffer_size(rows, cols).ok_or(Error::Allocation {
            what: "grid",
            count: usize::MAX,
        })?;
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(count)
            .map_err(|_| Error::Allocation {
                what: "grid",
                count,
            })?;
        buffer.resize(count, 0.0);
        Ok(Grid { rows, cols, buffer })
    }

    /// Wrap an existing row-major buffer.
    pub fn from_buffer(rows: usize, cols: usize, buffer: Vec<f64>) -> Self {
        assert_eq!(Some(buffer.len()), buffer_size(rows, cols));
        Grid { rows, cols, buffer }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn buffer(&self) -> &[f64] {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut [f64] {
        &mut self.buffer
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = coord_to_linear(row, 0, self.cols);
        &self.buffer[start..start + self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = coord_to_linear(row, 0, self.cols);
        &mut self.buffer[start..start + self.cols]
    }

    #[track_caller]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.rows, "row {} >= {}", row, self.rows);
        self.buffer[coord_to_linear(row, col, self.cols)]
    }

    #[track_caller]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.rows, "row {} >= {}", row, self.rows);
        self.buffer[coord_to_linear(row, col, self.cols)] = value;
    }

    /// Set every cell from its `(row, col)`.
    pub fn par_set_values<F>(&mut self, f: F, chunk_size: usize)
    where
        F: Fn(usize, usize) -> f64 + Send + Sync,
    {
        let cols = self.cols;
        par_slice::set_from_index(
            &mut self.buffer,
            |l| {
                let (row, col) = linear_to_coord(l, cols);
                f(row, col)
            },
            chunk_size,
        );
    }

    pub fn fill(&mut self, value: f64, chunk_size: usize) {
        par_slice::set_value(&mut self.buffer, value, chunk_size);
    }

    /// Raw pointer to the first cell.
    /// The buffer never reallocates, so the pointer stays valid
    /// for as long as the grid is alive, even if the `Grid` is moved.
    pub fn as_mut_ptr(&mut self) -> *mut f64 {
        self.buffer.as_mut_ptr()
    }

    pub fn as_ptr(&self) -> *const f64 {
        self.buffer.as_ptr()
    }
}

/// The two buffers of a plate.
#[derive(Debug)]
pub struct GridPair {
    current: Grid,
    next: Grid,
}

impl GridPair {
    /// Allocate both buffers, `next` is only kept if `current` succeeded.
    pub fn allocate(rows: usize, cols: usize) -> Result<Self> {
        let current = Grid::allocate(rows, cols)?;
        let next = Grid::allocate(rows, cols)?;
        Ok(GridPair { current, next })
    }

    /// Build a pair from an initial state, `next` becomes a copy of it.
    pub fn from_current(current: Grid, chunk_size: usize) -> Result<Self> {
        let next = Grid::allocate(current.rows(), current.cols())?;
        let mut result = GridPair { current, next };
        result.sync_next(chunk_size);
        Ok(result)
    }

    pub fn rows(&self) -> usize {
        self.current.rows()
    }

    pub fn cols(&self) -> usize {
        self.current.cols()
    }

    pub fn current(&self) -> &Grid {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut Grid {
        &mut self.current
    }

    pub fn next(&self) -> &Grid {
        &self.next
    }

    /// Read `current` while writing `next`.
    pub fn split_mut(&mut self) -> (&Grid, &mut Grid) {
        (&self.current, &mut self.next)
    }

    /// Exchange the roles of the two buffers.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Make `next` a copy of `current`, border cells included.
    pub fn sync_next(&mut self, chunk_size: usize) {
        debug_assert_eq!(self.current.rows(), self.next.rows());
        debug_assert_eq!(self.current.cols(), self.next.cols());
        par_slice::copy(
            self.current.buffer(),
            self.next.buffer_mut(),
            chunk_size,
        );
    }

    /// Raw pointers to the `[current, next]` buffers.
    pub fn as_mut_ptrs(&mut self) -> [*mut f64; 2] {
        [self.current.as_mut_ptr(), self.next.as_mut_ptr()]
    }
}
