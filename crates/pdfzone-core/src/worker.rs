use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::Serialize;

use crate::error::ZoneError;
use crate::extraction::DocumentBackend;
use crate::pipeline::{CancelToken, Pipeline};
use crate::progress::{progress_slot, ProgressReceiver};
use crate::sink;
use crate::template::Template;

/// Everything a batch needs. The worker takes ownership for the whole run.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub template: Template,
    pub documents: Vec<PathBuf>,
    pub output: PathBuf,
}

/// Outcome of a successful batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub documents: usize,
    pub rows: usize,
    pub output: PathBuf,
}

/// Extract and write in the calling thread.
///
/// The output file is only touched once every document has been extracted.
pub fn run_job<F: FnMut(u8)>(
    job: &BatchJob,
    backend: &dyn DocumentBackend,
    cancel: Option<CancelToken>,
    on_progress: F,
) -> Result<BatchReport, ZoneError> {
    let mut pipeline = Pipeline::new(backend);
    if let Some(token) = cancel {
        pipeline = pipeline.with_cancel(token);
    }

    let rows = pipeline.run(&job.template, &job.documents, on_progress)?;
    sink::write_rows(&rows, &job.output)?;

    Ok(BatchReport {
        documents: job.documents.len(),
        rows: rows.len(),
        output: job.output.clone(),
    })
}

/// A batch running on its own thread.
pub struct BatchHandle {
    progress: ProgressReceiver,
    cancel: CancelToken,
    thread: JoinHandle<Result<BatchReport, ZoneError>>,
}

impl BatchHandle {
    pub fn progress(&self) -> &ProgressReceiver {
        &self.progress
    }

    /// Ask the worker to stop before its next document.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the worker is done and return its result.
    pub fn wait(self) -> Result<BatchReport, ZoneError> {
        self.thread
            .join()
            .unwrap_or(Err(ZoneError::WorkerPanicked))
    }
}

/// Start `job` on a background thread.
pub fn spawn(job: BatchJob, backend: Arc<dyn DocumentBackend>) -> Result<BatchHandle, ZoneError> {
    let (sender, progress) = progress_slot();
    let cancel = CancelToken::new();
    let token = cancel.clone();

    let thread = thread::Builder::new()
        .name("pdfzone-batch".into())
        .spawn(move || {
            let result = run_job(&job, backend.as_ref(), Some(token), |p| sender.publish(p));
            if let Err(e) = &result {
                tracing::warn!(error = %e, "batch failed");
            }
            result
        })?;

    Ok(BatchHandle {
        progress,
        cancel,
        thread,
    })
}
