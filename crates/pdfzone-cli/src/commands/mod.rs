pub mod extract;
pub mod inspect;
pub mod template;

use pdfzone_core::extraction::pdftotext::PdftotextBackend;
use std::path::PathBuf;

pub(crate) fn backend(pdftotext: Option<PathBuf>) -> PdftotextBackend {
    match pdftotext {
        Some(path) => PdftotextBackend::with_binary(path),
        None => PdftotextBackend::new(),
    }
}
