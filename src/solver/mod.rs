pub mod parallel;
pub mod partition;
pub mod pool;
pub mod rendezvous;
pub mod serial;
pub mod stencil;

pub use partition::*;
pub use rendezvous::*;
pub use stencil::*;

use crate::error::*;
use crate::plate::Plate;

/// All solvers implement this interface
pub trait SolverInterface {
    /// Iterate `plate` until its largest change is within tolerance.
    fn solve(&mut self, plate: &mut Plate) -> Result<()>;

    fn print_report(&self);
}

/// Single thread reference solver.
#[derive(Copy, Clone, Debug, Default)]
pub struct SerialSolver;

impl SolverInterface for SerialSolver {
    fn solve(&mut self, plate: &mut Plate) -> Result<()> {
        serial::solve(plate);
        Ok(())
    }

    fn print_report(&self) {
        log::info!("solver: serial");
    }
}

/// Barrier coordinated worker pool.
#[derive(Copy, Clone, Debug)]
pub struct ParallelSolver {
    pub workers: usize,
}

impl ParallelSolver {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::InvalidWorkerCount(workers));
        }
        Ok(ParallelSolver { workers })
    }
}

impl SolverInterface for ParallelSolver {
    fn solve(&mut self, plate: &mut Plate) -> Result<()> {
        parallel::solve(plate, self.workers)
    }

    fn print_report(&self) {
        log::info!("solver: parallel, up to {} workers", self.workers);
    }
}
