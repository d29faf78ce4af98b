use crate::error::*;
use parking_lot::{Condvar, Mutex};

/// Returned by `Rendezvous::wait` once the rendezvous has been aborted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aborted;

#[derive(Debug, Default)]
struct State {
    arrived: usize,
    generation: u64,
    aborted: bool,
}

/// Reusable barrier for a fixed number of participants.
///
/// Unlike `std::sync::Barrier` it can be aborted: every blocked and
/// future `wait` returns `Err(Aborted)`, so a failed or panicking
/// participant never leaves the others stuck.
/// The internal mutex makes every write before `wait` visible to every
/// participant after it returns.
#[derive(Debug)]
pub struct Rendezvous {
    participants: usize,
    state: Mutex<State>,
    all_arrived: Condvar,
}

impl Rendezvous {
    pub fn new(participants: usize) -> Result<Self> {
        if participants < 2 {
            return Err(Error::Synchronization(
                "rendezvous needs at least two participants",
            ));
        }
        Ok(Rendezvous {
            participants,
            state: Mutex::new(State::default()),
            all_arrived: Condvar::new(),
        })
    }

    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Block until all participants arrived.
    pub fn wait(&self) -> std::result::Result<(), Aborted> {
        let mut state = self.state.lock();
        if state.aborted {
            return Err(Aborted);
        }

        state.arrived += 1;
        if state.arrived == self.participants {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.all_arrived.notify_all();
            return Ok(());
        }

        let generation = state.generation;
        while generation == state.generation && !state.aborted {
            self.all_arrived.wait(&mut state);
        }
        if generation != state.generation {
            Ok(())
        } else {
            Err(Aborted)
        }
    }

    /// Release every participant, now and for all later waits.
    pub fn abort(&self) {
        let mut state = self.state.lock();
        state.aborted = true;
        self.all_arrived.notify_all();
    }

    pub fn is_aborted(&self) -> bool {
        self.state.lock().aborted
    }
}

/// Aborts the rendezvous if the owning thread unwinds.
pub struct AbortOnUnwind<'a>(pub &'a Rendezvous);

impl Drop for AbortOnUnwind<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.abort();
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn needs_two_participants() {
        assert!(Rendezvous::new(0).is_err());
        assert!(Rendezvous::new(1).is_err());
        assert_eq!(Rendezvous::new(2).unwrap().participants(), 2);
    }

    #[test]
    fn phases_are_ordered() {
        let n = 4;
        let rounds = 50;
        let r = Rendezvous::new(n).unwrap();
        let counter = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..n {
                s.spawn(|| {
                    for round in 0..rounds {
                        counter.fetch_add(1, Ordering::Relaxed);
                        r.wait().unwrap();
                        // everyone incremented before anyone passed
                        assert!(
                            counter.load(Ordering::Relaxed) >= (round + 1) * n
                        );
                        r.wait().unwrap();
                    }
                });
            }
        });

        assert_eq!(counter.load(Ordering::Relaxed), n * rounds);
    }

    #[test]
    fn abort_releases_waiters() {
        let r = Rendezvous::new(3).unwrap();
        std::thread::scope(|s| {
            let h = s.spawn(|| r.wait());
            while r.state.lock().arrived == 0 {
                std::thread::yield_now();
            }
            r.abort();
            assert_eq!(h.join().unwrap(), Err(Aborted));
        });
        assert!(r.is_aborted());
        assert_eq!(r.wait(), Err(Aborted));
    }

    #[test]
    fn abort_on_unwind() {
        let r = Rendezvous::new(2).unwrap();
        let result = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = AbortOnUnwind(&r);
                panic!("worker failure");
            })
            .join()
        });
        assert!(result.is_err());
        assert!(r.is_aborted());

        let r = Rendezvous::new(2).unwrap();
        {
            let _guard = AbortOnUnwind(&r);
        }
        assert!(!r.is_aborted());
    }
}
