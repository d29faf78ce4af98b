use crate::error::*;
use std::ops::Range;

/// Balanced split of the interior rows `1..=rows-2` into contiguous bands,
/// one per worker. Band sizes differ by at most one row.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RowPartition {
    interior_rows: usize,
    workers: usize,
}

impl RowPartition {
    /// Clamp the requested worker count to the number of interior rows.
    pub fn new(interior_rows: usize, requested_workers: usize) -> Result<Self> {
        if requested_workers == 0 {
            return Err(Error::InvalidWorkerCount(requested_workers));
        }
        Ok(RowPartition {
            interior_rows,
            workers: requested_workers.min(interior_rows),
        })
    }

    /// Effective worker count.
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn interior_rows(&self) -> usize {
        self.interior_rows
    }

    /// Rows owned by worker `k`.
    pub fn range(&self, k: usize) -> Range<usize> {
        debug_assert!(k < self.workers);
        let start = 1 + (k * self.interior_rows) / self.workers;
        let end = 1 + ((k + 1) * self.interior_rows) / self.workers;
        start..end
    }

    pub fn iter(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.workers).map(move |k| self.range(k))
    }
}
