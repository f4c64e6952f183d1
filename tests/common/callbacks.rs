//! Callback recorders shared by the transfer scenario tests

use docferry::TransferCallbacks;
use std::sync::{Arc, Mutex};

/// Every `(completed, total)` pair the progress callback received, in order
pub type ProgressLog = Arc<Mutex<Vec<(usize, usize)>>>;

/// Every `(label, message)` pair the error callback received, in order
pub type ErrorLog = Arc<Mutex<Vec<(String, String)>>>;

/// Callbacks that record every invocation for later assertions
pub fn recording_callbacks() -> (TransferCallbacks, ProgressLog, ErrorLog) {
    let progress_log: ProgressLog = Arc::new(Mutex::new(Vec::new()));
    let error_log: ErrorLog = Arc::new(Mutex::new(Vec::new()));
    let progress_sink = Arc::clone(&progress_log);
    let error_sink = Arc::clone(&error_log);
    let callbacks = TransferCallbacks {
        progress: Some(Arc::new(move |completed, total| {
            progress_sink
                .lock()
                .expect("progress log lock")
                .push((completed, total));
        })),
        error: Some(Arc::new(move |label, message| {
            error_sink
                .lock()
                .expect("error log lock")
                .push((label.to_string(), message.to_string()));
        })),
    };
    (callbacks, progress_log, error_log)
}
