use crate::error::*;
use crate::solver::parallel::*;
use crate::solver::partition::*;
use std::thread::{Scope, ScopedJoinHandle};

/// The worker threads of one plate run.
///
/// Threads live in a `std::thread::scope`, so they are joined when the
/// scope ends on every path, `join` only collects their outcome.
pub struct WorkerPool<'scope> {
    handles: Vec<ScopedJoinHandle<'scope, ()>>,
}

impl<'scope> WorkerPool<'scope> {
    /// Start one worker per band of `partition`.
    ///
    /// If a thread cannot be started the rendezvous is aborted and the
    /// workers already running are joined before the error is returned.
    pub fn spawn<'env>(
        scope: &'scope Scope<'scope, 'env>,
        shared: &'scope Coordination,
        partition: &RowPartition,
    ) -> Result<Self> {
        let workers = partition.workers();
        debug_assert_eq!(workers, shared.workers());

        let mut handles = Vec::new();
        handles
            .try_reserve_exact(workers)
            .map_err(|_| Error::Allocation {
                what: "worker handles",
                count: workers,
            })?;

        for (worker, rows) in partition.iter().enumerate() {
            let spawned = std::thread::Builder::new()
                .name(format!("heat_worker_{}", worker))
                .spawn_scoped(scope, move || run_worker(shared, worker, rows));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    log::error!(
                        "could not start worker {}: {}",
                        worker,
                        source
                    );
                    shared.abort();
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(Error::ThreadSpawn { worker, source });
                }
            }
        }
        log::debug!("started {} workers", handles.len());
        Ok(WorkerPool { handles })
    }

    /// Adopt threads started elsewhere, in worker order.
    #[cfg(test)]
    pub(crate) fn from_handles(
        handles: Vec<ScopedJoinHandle<'scope, ()>>,
    ) -> Self {
        WorkerPool { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker, reports the first one that panicked.
    pub fn join(self) -> Result<()> {
        let mut result = Ok(());
        for (worker, handle) in self.handles.into_iter().enumerate() {
            if handle.join().is_err() && result.is_ok() {
                result = Err(Error::WorkerPanicked(worker));
            }
        }
        result
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::grid::*;
    use crate::plate::*;

    fn plate(tolerance: f64) -> Plate {
        let mut g = Grid::allocate(12, 6).unwrap();
        g.row_mut(0).fill(50.0);
        let params = PlateParams {
            name: "pool.bin".to_owned(),
            time_step: 1,
            diffusivity: 1.0,
            spacing: 2.0,
            tolerance,
        };
        Plate::new(params, g, 8).unwrap()
    }

    #[test]
    fn converged_pool_joins_cleanly() {
        // Already converged: workers exit before the first sweep
        let mut p = plate(f64::INFINITY);
        let partition = RowPartition::new(p.interior_rows(), 4).unwrap();
        let shared = Coordination::new(&mut p, &partition).unwrap();
        std::thread::scope(|s| {
            let pool = WorkerPool::spawn(s, &shared, &partition).unwrap();
            assert_eq!(pool.len(), 4);
            assert!(!pool.is_empty());
            pool.join().unwrap();
        });
    }

    #[test]
    fn aborted_pool_is_released() {
        // Nobody coordinates, aborting must free the workers
        let mut p = plate(0.0);
        let partition = RowPartition::new(p.interior_rows(), 3).unwrap();
        let shared = Coordination::new(&mut p, &partition).unwrap();
        std::thread::scope(|s| {
            let pool = WorkerPool::spawn(s, &shared, &partition).unwrap();
            shared.abort();
            pool.join().unwrap();
        });
    }
}
