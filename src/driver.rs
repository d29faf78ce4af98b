//! Batch driver: every plate of a job manifest is loaded, solved and
//! reported in turn, then released before the next one is read.
//! The first failure stops the batch.

use crate::error::*;
use crate::manifest::*;
use crate::report::*;
use crate::snapshot;
use crate::solver::*;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Job manifest, relative to `prefix`.
    pub job_file: PathBuf,

    /// Directory holding the manifest, the snapshots and every output.
    pub prefix: PathBuf,

    /// Chunk size for parallel grid copies.
    pub chunk_size: usize,

    pub write_images: bool,
}

impl BatchConfig {
    pub fn job_path(&self) -> PathBuf {
        self.prefix.join(&self.job_file)
    }

    /// `<prefix>/<job file stem>.tsv`
    pub fn summary_path(&self) -> PathBuf {
        self.prefix.join(self.job_file.with_extension("tsv"))
    }

    pub fn plate_path<P: AsRef<Path>>(&self, name: P) -> PathBuf {
        self.prefix.join(name)
    }
}

/// What a finished batch did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub plates: usize,
    pub iterations: u64,
}

pub fn run_batch(
    config: &BatchConfig,
    solver: &mut dyn SolverInterface,
) -> Result<BatchSummary> {
    let job_path = config.job_path();
    let manifest = JobManifest::open(&job_path)?;
    let mut reporter = Reporter::create(
        config.summary_path(),
        &config.prefix,
        config.write_images,
    )?;
    log::info!("Job: {:?}", job_path);

    let mut summary = BatchSummary::default();
    for record in manifest {
        let params = record?;
        let name = params.name.clone();
        log::info!("{}: loading", name);
        let mut plate = {
            profiling::scope!("load plate");
            snapshot::load_plate(
                config.plate_path(&name),
                params,
                config.chunk_size,
            )?
        };
        log::debug!(
            "{}: {}x{}, coefficient {}",
            name,
            plate.rows(),
            plate.cols(),
            plate.params.diffusion_coefficient()
        );

        solver.solve(&mut plate)?;
        log::info!(
            "{}: converged after {} iterations",
            name,
            plate.iterations
        );

        reporter.report(&plate)?;
        summary.plates += 1;
        summary.iterations += plate.iterations;
        profiling::finish_frame!();
    }
    Ok(summary)
}
