//! Barrier coordinated convergence loop.
//!
//! Interior rows are split into one contiguous band per worker.
//! Every iteration each worker sweeps its band into `next` and records
//! its largest change, then all workers and the coordinator meet twice:
//!
//! * phase A: every band of `next` is written.
//!   The coordinator merges the local maxima into the global maximum,
//!   swaps the grid pair and counts the iteration.
//! * phase B: the swap is done, workers may read the new `current`.
//!
//! Workers and coordinator test the same global maximum against the
//! tolerance, so they either all run another sweep or all stop.

use crate::error::*;
use crate::grid::*;
use crate::plate::*;
use crate::solver::partition::*;
use crate::solver::pool::*;
use crate::solver::rendezvous::*;
use crate::solver::stencil::*;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use sync_ptr::SyncMutPtr;

/// Private result slot of one worker, padded to its own cache line.
#[repr(align(64))]
#[derive(Debug, Default)]
pub struct WorkerSlot {
    local_max_change: AtomicU64,
}

impl WorkerSlot {
    fn store(&self, value: f64) {
        self.local_max_change
            .store(value.to_bits(), Ordering::Relaxed);
    }

    fn load(&self) -> f64 {
        f64::from_bits(self.local_max_change.load(Ordering::Relaxed))
    }
}

/// State shared by the coordinator and the workers of one plate run.
///
/// Grid cells are reached through raw pointers to the two buffers of
/// the plate's `GridPair`; `active` is the index of the buffer that
/// currently plays `current`. Both only change between phase A and
/// phase B, when no worker touches the grids.
pub struct Coordination {
    stencil: FivePointStencil,
    tolerance: f64,
    rows: usize,
    cols: usize,
    buffers: [SyncMutPtr<f64>; 2],
    active: AtomicUsize,
    global_max_change: AtomicU64,
    rendezvous: Rendezvous,
    slots: Vec<WorkerSlot>,
}

impl Coordination {
    /// Size everything for the clamped worker count of `partition`.
    pub fn new(plate: &mut Plate, partition: &RowPartition) -> Result<Self> {
        let workers = partition.workers();
        let rendezvous = Rendezvous::new(workers + 1)?;

        let mut slots = Vec::new();
        slots.try_reserve_exact(workers).map_err(|_| Error::Allocation {
            what: "worker state",
            count: workers,
        })?;
        slots.resize_with(workers, WorkerSlot::default);

        let [current, next] = plate.grids.as_mut_ptrs();
        // SAFETY: the buffers outlive the run, the plate is borrowed by
        // the coordinator for its whole duration and never resized.
        let buffers =
            unsafe { [SyncMutPtr::new(current), SyncMutPtr::new(next)] };

        Ok(Coordination {
            stencil: FivePointStencil::new(
                plate.params.diffusion_coefficient(),
            ),
            tolerance: plate.params.tolerance,
            rows: plate.rows(),
            cols: plate.cols(),
            buffers,
            active: AtomicUsize::new(0),
            global_max_change: AtomicU64::new(f64::INFINITY.to_bits()),
            rendezvous,
            slots,
        })
    }

    pub fn workers(&self) -> usize {
        self.slots.len()
    }

    pub fn global_max_change(&self) -> f64 {
        f64::from_bits(self.global_max_change.load(Ordering::Relaxed))
    }

    /// Same decision for every participant.
    pub fn converged(&self) -> bool {
        self.global_max_change() <= self.tolerance
    }

    /// Release every participant, used when the pool cannot be completed.
    pub fn abort(&self) {
        self.rendezvous.abort();
    }

    /// Largest local maximum, read after phase A.
    fn merge_local_maxima(&self) -> f64 {
        self.slots
            .iter()
            .map(WorkerSlot::load)
            .fold(0.0, |global, local| {
                if local > global {
                    local
                } else {
                    global
                }
            })
    }

    fn publish(&self, global_max_change: f64) {
        self.global_max_change
            .store(global_max_change.to_bits(), Ordering::Relaxed);
    }

    /// Flip the roles of the buffers, mirrors `GridPair::swap`.
    fn flip_active(&self) {
        self.active.fetch_xor(1, Ordering::Relaxed);
    }

    fn current_ptr(&self) -> *const f64 {
        self.buffers[self.active.load(Ordering::Relaxed)].inner()
    }

    fn next_ptr(&self) -> *mut f64 {
        self.buffers[self.active.load(Ordering::Relaxed) ^ 1].inner()
    }

    /// One sweep of `rows` from `current` into `next`.
    ///
    /// # Safety
    /// Only between phase B and phase A, and `rows` must be a band no
    /// other worker writes.
    unsafe fn sweep(&self, rows: &Range<usize>) -> f64 {
        let len = self.rows * self.cols;
        let current = std::slice::from_raw_parts(self.current_ptr(), len);
        let band = std::slice::from_raw_parts_mut(
            self.next_ptr().add(rows.start * self.cols),
            rows.len() * self.cols,
        );
        self.stencil.sweep_band(current, band, self.cols, rows.start)
    }
}

/// Stencil routine of one worker thread.
pub fn run_worker(shared: &Coordination, worker: usize, rows: Range<usize>) {
    let _guard = AbortOnUnwind(&shared.rendezvous);
    log::trace!("worker {} owns rows {:?}", worker, rows);

    while !shared.converged() {
        let local_max_change = {
            profiling::scope!("heat worker sweep");
            // SAFETY: past phase B (or before the first phase A) and the
            // partition gives every worker a disjoint band.
            unsafe { shared.sweep(&rows) }
        };
        shared.slots[worker].store(local_max_change);

        if shared.rendezvous.wait().is_err() {
            return;
        }
        if shared.rendezvous.wait().is_err() {
            return;
        }
    }
}

/// Coordinator side: merge, swap, count, until converged.
fn coordinate(
    shared: &Coordination,
    grids: &mut GridPair,
    iterations: &mut u64,
) -> Result<()> {
    let aborted = |_| Error::Synchronization("rendezvous aborted");
    while !shared.converged() {
        shared.rendezvous.wait().map_err(aborted)?;
        {
            profiling::scope!("merge and swap");
            let global_max_change = shared.merge_local_maxima();
            grids.swap();
            shared.flip_active();
            debug_assert_eq!(grids.current().as_ptr(), shared.current_ptr());
            *iterations += 1;
            shared.publish(global_max_change);
            log::trace!(
                "iteration {} max change {}",
                iterations,
                global_max_change
            );
        }
        shared.rendezvous.wait().map_err(aborted)?;
    }
    Ok(())
}

/// Iterate a plate to equilibrium with up to `requested_workers` threads.
pub fn solve(plate: &mut Plate, requested_workers: usize) -> Result<()> {
    if requested_workers == 0 {
        return Err(Error::InvalidWorkerCount(requested_workers));
    }
    if !plate.has_interior() {
        log::debug!("{}: no interior cells, nothing to do", plate.params.name);
        return Ok(());
    }

    let partition =
        RowPartition::new(plate.interior_rows(), requested_workers)?;
    let shared = Coordination::new(plate, &partition)?;
    log::debug!(
        "{}: {} interior rows on {} workers",
        plate.params.name,
        partition.interior_rows(),
        shared.workers()
    );

    let grids = &mut plate.grids;
    let iterations = &mut plate.iterations;
    std::thread::scope(|scope| {
        let pool = WorkerPool::spawn(scope, &shared, &partition)?;
        let outcome = coordinate(&shared, grids, iterations);
        if outcome.is_err() {
            shared.abort();
        }
        let joined = pool.join();
        joined.and(outcome)
    })
}
