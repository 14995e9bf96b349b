use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SearchError;
use crate::media::Candidate;

type Outcome = Result<Candidate, SearchError>;

/// A search being dispatched right now, which later callers for the same
/// query wait on instead of dispatching again.
#[derive(Default)]
struct Flight {
    outcome: Mutex<Option<Outcome>>,
    done: Condvar,
}

impl Flight {
    fn wait(&self) -> Outcome {
        let mut outcome = self.outcome.lock();
        loop {
            if let Some(o) = outcome.as_ref() {
                return o.clone();
            }
            self.done.wait(&mut outcome);
        }
    }

    fn complete(&self, o: Outcome) {
        *self.outcome.lock() = Some(o);
        self.done.notify_all();
    }
}

#[derive(Default)]
struct CacheState {
    completed: HashMap<String, Candidate>,
    inflight: HashMap<String, Arc<Flight>>,
}

/// In-memory search cache with request coalescing.
///
/// Successful results are kept for the lifetime of the cache. At most one
/// computation per key is in flight at a time; concurrent callers for the same
/// key block until it finishes and receive the same outcome, errors included.
/// Failures are not cached, the next caller after a failure tries again.
///
/// The state lock is only held to read or write the maps, never while a
/// computation runs or while waiting for one.
#[derive(Default)]
pub struct SearchCache {
    state: Mutex<CacheState>,
}

/// Finishes a flight even if the computation unwinds, so waiters never hang.
struct FlightGuard<'a> {
    cache: &'a SearchCache,
    key: &'a str,
    flight: Arc<Flight>,
    finished: bool,
}

impl FlightGuard<'_> {
    fn finish(mut self, o: Outcome) {
        self.finished = true;
        self.cache.finish(self.key, &self.flight, o);
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.cache
                .finish(self.key, &self.flight, Err(SearchError::Abandoned(self.key.to_string())));
        }
    }
}

impl SearchCache {
    pub fn new() -> SearchCache {
        SearchCache::default()
    }

    /// Returns the cached value for `key`, joins an in-flight computation for
    /// it, or runs `compute` and shares its outcome.
    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> Outcome
    where
        F: FnOnce() -> Outcome,
    {
        let flight = {
            let mut state = self.state.lock();
            if let Some(hit) = state.completed.get(key) {
                log::debug!("cache hit for '{key}'");
                return Ok(hit.clone());
            }
            if let Some(flight) = state.inflight.get(key).cloned() {
                drop(state);
                log::debug!("waiting on in-flight search for '{key}'");
                return flight.wait();
            }
            let flight = Arc::new(Flight::default());
            state.inflight.insert(key.to_string(), flight.clone());
            flight
        };

        let guard = FlightGuard {
            cache: self,
            key,
            flight,
            finished: false,
        };
        let outcome = compute();
        guard.finish(outcome.clone());
        outcome
    }

    fn finish(&self, key: &str, flight: &Flight, o: Outcome) {
        {
            let mut state = self.state.lock();
            if let Ok(candidate) = &o {
                state.completed.insert(key.to_string(), candidate.clone());
            }
            state.inflight.remove(key);
        }
        flight.complete(o);
    }

    pub fn get(&self, key: &str) -> Option<Candidate> {
        self.state.lock().completed.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
