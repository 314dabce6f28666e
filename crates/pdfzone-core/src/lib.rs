pub mod collection;
pub mod editor;
pub mod error;
pub mod extraction;
pub mod pipeline;
pub mod progress;
pub mod region;
pub mod sink;
pub mod template;
pub mod worker;

use std::path::{Path, PathBuf};

use error::ZoneError;
use extraction::DocumentBackend;
use worker::{BatchJob, BatchReport};

pub use collection::RegionCollection;
pub use region::{Point, Region, Scale};
pub use template::{Template, TemplatePage};

/// Main API entry point: apply a template file to documents and write the
/// extracted text to an xlsx file.
///
/// The template is validated before any document is opened. Any failure
/// aborts the batch and nothing is written.
pub fn extract_to_file<F: FnMut(u8)>(
    template_path: &Path,
    documents: &[PathBuf],
    output: &Path,
    backend: &dyn DocumentBackend,
    on_progress: F,
) -> Result<BatchReport, ZoneError> {
    let job = BatchJob {
        template: template::load(template_path)?,
        documents: documents.to_vec(),
        output: output.to_path_buf(),
    };
    worker::run_job(&job, backend, None, on_progress)
}
