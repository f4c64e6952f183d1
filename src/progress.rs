//! Progress accounting shared by the transfer orchestrators

use crate::types::TransferCallbacks;
use std::sync::{Mutex, MutexGuard};

/// Tracks completions across a pool of concurrent tasks
///
/// One instance covers one orchestration run. Both callbacks fire while the
/// internal lock is held, so counts reach the caller strictly in order even
/// when tasks finish at the same moment.
pub(crate) struct ProgressTracker {
    completed: Mutex<usize>,
    total: usize,
    callbacks: TransferCallbacks,
}

impl ProgressTracker {
    pub fn new(total: usize, callbacks: TransferCallbacks) -> Self {
        Self {
            completed: Mutex::new(0),
            total,
            callbacks,
        }
    }

    /// Emit the `(0, total)` signal before any task has run
    ///
    /// Fires even for an empty run, so callers can size progress bars.
    pub fn announce_start(&self) {
        let guard = self.lock();
        if let Some(progress) = &self.callbacks.progress {
            progress(*guard, self.total);
        }
    }

    /// Record one finished task
    ///
    /// On failure the error callback fires first, then the incremented count
    /// goes to the progress callback. Every task produces exactly one
    /// progress invocation, success or not.
    pub fn task_finished(&self, label: &str, failure: Option<&str>) {
        let mut guard = self.lock();
        if let Some(message) = failure {
            if let Some(error) = &self.callbacks.error {
                error(label, message);
            }
        }
        *guard += 1;
        if let Some(progress) = &self.callbacks.progress {
            progress(*guard, self.total);
        }
    }

    /// A poisoned lock means a callback panicked in another task; the count
    /// itself is still valid, so keep going.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.completed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Callbacks that append `"error:<label>"` and `"progress:<n>/<total>"`
    /// entries to a shared event log
    fn recording_callbacks() -> (TransferCallbacks, Arc<Mutex<Vec<String>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let progress_events = Arc::clone(&events);
        let error_events = Arc::clone(&events);
        let callbacks = TransferCallbacks {
            progress: Some(Arc::new(move |completed, total| {
                progress_events
                    .lock()
                    .unwrap()
                    .push(format!("progress:{completed}/{total}"));
            })),
            error: Some(Arc::new(move |label, _message| {
                error_events.lock().unwrap().push(format!("error:{label}"));
            })),
        };
        (callbacks, events)
    }

    #[test]
    fn every_completion_advances_the_count() {
        let (callbacks, events) = recording_callbacks();
        let tracker = ProgressTracker::new(3, callbacks);

        tracker.task_finished("a", None);
        tracker.task_finished("b", None);
        tracker.task_finished("c", None);

        assert_eq!(
            *events.lock().unwrap(),
            vec!["progress:1/3", "progress:2/3", "progress:3/3"]
        );
    }

    #[test]
    fn failures_report_error_before_progress() {
        let (callbacks, events) = recording_callbacks();
        let tracker = ProgressTracker::new(2, callbacks);

        tracker.task_finished("a.pdf", Some("connection reset"));
        tracker.task_finished("b.pdf", None);

        assert_eq!(
            *events.lock().unwrap(),
            vec!["error:a.pdf", "progress:1/2", "progress:2/2"]
        );
    }

    #[test]
    fn announce_start_emits_zero_of_total() {
        let (callbacks, events) = recording_callbacks();
        ProgressTracker::new(5, callbacks).announce_start();
        assert_eq!(*events.lock().unwrap(), vec!["progress:0/5"]);
    }

    #[test]
    fn announce_start_fires_for_an_empty_run() {
        let (callbacks, events) = recording_callbacks();
        ProgressTracker::new(0, callbacks).announce_start();
        assert_eq!(*events.lock().unwrap(), vec!["progress:0/0"]);
    }

    #[test]
    fn missing_callbacks_are_tolerated() {
        let tracker = ProgressTracker::new(1, TransferCallbacks::default());
        tracker.announce_start();
        tracker.task_finished("a", Some("boom"));
    }

    #[test]
    fn concurrent_completions_arrive_strictly_in_order() {
        let (callbacks, events) = recording_callbacks();
        let tracker = Arc::new(ProgressTracker::new(8, callbacks));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || tracker.task_finished("t", None))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let expected: Vec<String> = (1..=8).map(|n| format!("progress:{n}/8")).collect();
        assert_eq!(
            *events.lock().unwrap(),
            expected,
            "counts must be monotonic regardless of completion interleaving"
        );
    }
}
