pub mod pdftotext;

use std::path::Path;

use crate::error::ZoneError;
use crate::region::Region;

/// Axis-aligned box in document space (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

/// A run of text found inside a region, with the box it was laid out in.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub bbox: BBox,
}

/// An open document. Dropping it releases whatever the backend holds.
pub trait PdfDocument {
    fn page_count(&self) -> usize;

    /// Text fragments intersecting `region` on the zero-based `page`, in
    /// reading order. `region` is in document space.
    fn fragments_in(&self, page: usize, region: &Region) -> Result<Vec<TextFragment>, ZoneError>;
}

/// Trait for document backends that can open a PDF for region queries.
pub trait DocumentBackend: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, ZoneError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
