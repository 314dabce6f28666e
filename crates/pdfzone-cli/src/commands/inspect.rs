use pdfzone_core::error::ZoneError;
use pdfzone_core::extraction::{DocumentBackend, PdfDocument};
use pdfzone_core::pipeline::join_fragments;
use pdfzone_core::Region;
use std::path::{Path, PathBuf};

use crate::output;

pub fn run(
    pdf: &Path,
    page: usize,
    region: Region,
    pdftotext: Option<PathBuf>,
) -> Result<(), ZoneError> {
    let backend = super::backend(pdftotext);
    let document = backend.open(pdf)?;

    let page_count = document.page_count();
    if page >= page_count {
        return Err(ZoneError::PageIndex {
            path: pdf.to_path_buf(),
            entry: 0,
            page,
            page_count,
        });
    }

    let fragments = document.fragments_in(page, &region)?;
    output::table::print_fragments(&fragments);

    println!("\nRow text:");
    println!("{}", join_fragments(&fragments));

    Ok(())
}
