use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::error::GenerationError;

/// Cooperative cancellation flag shared between a run and whoever may stop it.
///
/// Clones observe the same flag. Batch loops check it at each iteration
/// boundary and pacing sleeps wake early when it fires.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once `cancel` has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // The sender lives as long as `self`, so this only errs after drop.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Returns `Err(Cancelled)` if already cancelled.
    pub fn check(&self) -> Result<(), GenerationError> {
        if self.is_cancelled() {
            Err(GenerationError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Sleeps for `duration` unless cancelled first.
    pub async fn sleep(&self, duration: Duration) -> Result<(), GenerationError> {
        if duration.is_zero() {
            return self.check();
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = self.cancelled() => Err(GenerationError::Cancelled),
        }
    }
}
