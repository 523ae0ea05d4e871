//! Last-write-wins background jobs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};

/// Holds the result of the newest job for one derived product.
///
/// Each job takes a ticket from [`JobSlot::begin`]. A result is accepted
/// only if no newer ticket has been issued since, so a slow pass started
/// from old inputs never overwrites the output of newer ones.
#[derive(Debug)]
pub struct JobSlot<T> {
    issued: AtomicU64,
    result: Mutex<Option<(u64, T)>>,
    settled: Condvar,
}

impl<T> Default for JobSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> JobSlot<T> {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            result: Mutex::new(None),
            settled: Condvar::new(),
        }
    }

    /// Issues a ticket newer than every earlier one.
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Ticket of the most recently started job, 0 before any.
    pub fn latest_ticket(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.latest_ticket()
    }

    /// Stores `value` if `ticket` is still the newest; returns whether it was kept.
    pub fn complete(&self, ticket: u64, value: T) -> bool {
        let mut result = self.result.lock().unwrap_or_else(|e| e.into_inner());
        let kept = self.is_current(ticket);
        if kept {
            *result = Some((ticket, value));
        } else {
            tracing::debug!("Discarding stale job result {} (latest {})", ticket, self.latest_ticket());
        }
        self.settled.notify_all();
        kept
    }

    /// Blocks until the job holding `ticket` settles and takes its result.
    ///
    /// Returns `None` once a newer job has superseded `ticket`.
    pub fn wait(&self, ticket: u64) -> Option<T> {
        let mut result = self.result.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if result.as_ref().is_some_and(|(t, _)| *t == ticket) {
                return result.take().map(|(_, v)| v);
            }
            if !self.is_current(ticket) {
                return None;
            }
            result = self.settled.wait(result).unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Removes and returns the accepted result.
    pub fn take(&self) -> Option<T> {
        let mut result = self.result.lock().unwrap_or_else(|e| e.into_inner());
        result.take().map(|(_, v)| v)
    }

    /// Ticket of the accepted result currently held.
    pub fn result_ticket(&self) -> Option<u64> {
        let result = self.result.lock().unwrap_or_else(|e| e.into_inner());
        result.as_ref().map(|(t, _)| *t)
    }
}

impl<T: Clone> JobSlot<T> {
    /// A copy of the accepted result.
    pub fn get(&self) -> Option<T> {
        let result = self.result.lock().unwrap_or_else(|e| e.into_inner());
        result.as_ref().map(|(_, v)| v.clone())
    }
}

impl<T: Send + 'static> JobSlot<T> {
    /// Runs `job` on the rayon pool and offers its result to the slot.
    pub fn spawn<F>(self: &Arc<Self>, job: F) -> u64
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let ticket = self.begin();
        let slot = Arc::clone(self);
        rayon::spawn(move || {
            let value = job();
            slot.complete(ticket, value);
        });
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_stale_result_is_discarded() {
        let slot = JobSlot::new();
        let old = slot.begin();
        let new = slot.begin();
        assert!(slot.complete(new, "new"));
        assert!(!slot.complete(old, "old"));
        assert_eq!(slot.get(), Some("new"));
        assert_eq!(slot.result_ticket(), Some(new));
    }

    #[test]
    fn test_newer_job_supersedes_in_flight_one() {
        let slot = JobSlot::new();
        let first = slot.begin();
        // Inputs change before the first pass finishes.
        let _second = slot.begin();
        assert!(!slot.complete(first, 1));
        assert_eq!(slot.get(), None);
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_spawned_job_completes() {
        let slot = Arc::new(JobSlot::new());
        let (tx, rx) = mpsc::channel();
        let ticket = slot.spawn(move || {
            let v = (1..=10).sum::<u32>();
            tx.send(()).ok();
            v
        });
        rx.recv_timeout(Duration::from_secs(10)).unwrap();
        // The send happens before `complete`; poll briefly for the store.
        for _ in 0..1000 {
            if slot.result_ticket() == Some(ticket) {
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(slot.get(), Some(55));
    }

    #[test]
    fn test_wait_returns_spawned_result() {
        let slot = Arc::new(JobSlot::new());
        let ticket = slot.spawn(|| {
            std::thread::sleep(Duration::from_millis(20));
            "done"
        });
        assert_eq!(slot.wait(ticket), Some("done"));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_wait_on_superseded_ticket() {
        let slot: JobSlot<u32> = JobSlot::new();
        let old = slot.begin();
        let new = slot.begin();
        assert_eq!(slot.wait(old), None);
        assert!(slot.complete(new, 2));
        assert_eq!(slot.wait(new), Some(2));
    }
}
