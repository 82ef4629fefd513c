// src/scouting/cancel.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::scouting::report::ReportError;

/// Cooperative cancellation flag for a scouting query. The pipeline checks
/// it between stages, so an abandoned query stops publishing results at the
/// next stage boundary; in-flight requests are not aborted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn ensure_active(&self) -> Result<(), ReportError> {
        if self.is_cancelled() {
            Err(ReportError::Cancelled)
        } else {
            Ok(())
        }
    }
}
