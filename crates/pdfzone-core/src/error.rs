use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("invalid template: {0}")]
    Format(#[from] FormatError),

    #[error("failed to load template from {path}: {reason}")]
    TemplateLoad { path: PathBuf, reason: String },

    #[error("cannot open document {path}: {reason}")]
    DocumentOpen { path: PathBuf, reason: String },

    #[error(
        "document {path} has {page_count} page(s) but template entry {entry} references page index {page}"
    )]
    PageIndex {
        path: PathBuf,
        entry: usize,
        page: usize,
        page_count: usize,
    },

    #[error("text extraction failed for {path}, page {page}, region {region}: {reason}")]
    Extraction {
        path: PathBuf,
        page: usize,
        region: usize,
        reason: String,
    },

    #[error("region index {index} is out of bounds (collection holds {len})")]
    Index { index: usize, len: usize },

    #[error("failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("scale factor must be finite and greater than zero, got {0}")]
    InvalidScale(f64),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("batch cancelled after {completed} of {total} document(s)")]
    Cancelled { completed: usize, total: usize },

    #[error("extraction worker panicked")]
    WorkerPanicked,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structural problems found while decoding a template document.
///
/// Entry and area positions are zero-based indices into the JSON arrays.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("template is not valid JSON: {0}")]
    Syntax(String),

    #[error("template file must contain a list of pages")]
    NotASequence,

    #[error("entry {entry} must be an object with 'page' and 'coordinates' keys")]
    EntryNotMapping { entry: usize },

    #[error("entry {entry} is missing the 'page' key")]
    MissingPage { entry: usize },

    #[error("entry {entry} is missing the 'coordinates' key")]
    MissingCoordinates { entry: usize },

    #[error("entry {entry}: 'page' must be a non-negative integer")]
    InvalidPage { entry: usize },

    #[error("entry {entry}: 'coordinates' must be a list of areas")]
    CoordinatesNotSequence { entry: usize },

    #[error("entry {entry}, area {area} must be an object with 'x', 'y', 'width' and 'height' keys")]
    AreaNotMapping { entry: usize, area: usize },

    #[error("entry {entry}, area {area} is missing the '{key}' key")]
    MissingAreaKey {
        entry: usize,
        area: usize,
        key: &'static str,
    },

    #[error("entry {entry}, area {area}: '{key}' must be a finite number")]
    InvalidNumber {
        entry: usize,
        area: usize,
        key: &'static str,
    },

    #[error("entry {entry}, area {area}: '{key}' must not be negative")]
    NegativeExtent {
        entry: usize,
        area: usize,
        key: &'static str,
    },
}
