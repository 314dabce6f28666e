use pdfzone_core::error::ZoneError;
use pdfzone_core::worker::{self, BatchJob};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::output;

pub fn run(
    documents: Vec<PathBuf>,
    template_path: PathBuf,
    output_path: PathBuf,
    pdftotext: Option<PathBuf>,
    json: bool,
) -> Result<(), ZoneError> {
    // Reject a broken template before anything else happens
    let template = pdfzone_core::template::load(&template_path)?;

    let backend = super::backend(pdftotext);
    if !backend.is_available() {
        return Err(ZoneError::PdftotextNotFound);
    }

    let job = BatchJob {
        template,
        documents,
        output: output_path,
    };
    let handle = worker::spawn(job, Arc::new(backend))?;

    let mut stderr = std::io::stderr();
    while let Some(percent) = handle.progress().recv() {
        let _ = write!(stderr, "\rProcessing... {percent:>3}%");
        let _ = stderr.flush();
    }
    eprintln!();

    let report = handle.wait()?;

    if json {
        output::json::print(&report)?;
    } else {
        output::table::print_report(&report);
    }

    Ok(())
}
