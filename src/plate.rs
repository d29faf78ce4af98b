use crate::error::*;
use crate::grid::*;

/// Simulation parameters of one plate, as given by its job record.
#[derive(Clone, Debug, PartialEq)]
pub struct PlateParams {
    /// Snapshot file name, relative to the job prefix.
    pub name: String,

    /// Seconds per iteration.
    pub time_step: u64,

    /// Thermal diffusivity of the material.
    pub diffusivity: f64,

    /// Width and height of a cell.
    pub spacing: f64,

    /// Convergence threshold on the largest per cell change.
    pub tolerance: f64,
}

impl PlateParams {
    /// `time_step * diffusivity / spacing^2`
    pub fn diffusion_coefficient(&self) -> f64 {
        (self.time_step as f64 * self.diffusivity)
            / (self.spacing * self.spacing)
    }
}

/// A plate being simulated: parameters, grids and progress.
#[derive(Debug)]
pub struct Plate {
    pub params: PlateParams,
    pub grids: GridPair,

    /// Completed sweeps.
    pub iterations: u64,
}

impl Plate {
    /// Build a plate from its initial temperatures.
    /// Rejects plates without a single interior cell.
    pub fn new(
        params: PlateParams,
        initial: Grid,
        chunk_size: usize,
    ) -> Result<Self> {
        let (rows, cols) = (initial.rows(), initial.cols());
        if rows < 3 || cols < 3 {
            return Err(Error::Dimensions { rows, cols });
        }
        Self::new_unchecked(params, initial, chunk_size)
    }

    /// Like `new` but accepts any size, a plate without interior cells
    /// is already at equilibrium.
    pub fn new_unchecked(
        params: PlateParams,
        initial: Grid,
        chunk_size: usize,
    ) -> Result<Self> {
        let grids = GridPair::from_current(initial, chunk_size)?;
        Ok(Plate {
            params,
            grids,
            iterations: 0,
        })
    }

    pub fn rows(&self) -> usize {
        self.grids.rows()
    }

    pub fn cols(&self) -> usize {
        self.grids.cols()
    }

    /// Rows that are updated by the stencil.
    pub fn interior_rows(&self) -> usize {
        self.rows().saturating_sub(2)
    }

    pub fn has_interior(&self) -> bool {
        self.rows() >= 3 && self.cols() >= 3
    }

    /// Latest temperatures.
    pub fn current(&self) -> &Grid {
        self.grids.current()
    }

    /// Simulated time in seconds, `time_step * iterations`.
    pub fn elapsed_seconds(&self) -> u64 {
        self.params.time_step.saturating_mul(self.iterations)
    }
}
