use tracing::info;

use super::result::BatchProgress;

/// Receives the running tally after every finished template.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, progress: &BatchProgress);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _progress: &BatchProgress) {}
}

/// Logs each update as a structured event.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, progress: &BatchProgress) {
        info!(
            run_id = %progress.run_id,
            completed = progress.completed,
            failed = progress.failed,
            total = progress.total,
            category = progress.current_category.as_deref().unwrap_or(""),
            subcategory = progress.current_subcategory.as_deref().unwrap_or(""),
            "Batch progress"
        );
    }
}

impl<F> ProgressReporter for F
where
    F: Fn(&BatchProgress) + Send + Sync,
{
    fn report(&self, progress: &BatchProgress) {
        self(progress)
    }
}
