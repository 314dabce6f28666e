//! In-memory document backend for pipeline and worker tests.
//!
//! Documents are keyed by path and hold positioned text per page. Every
//! open and close is recorded so tests can check handle lifetimes.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pdfzone_core::error::ZoneError;
use pdfzone_core::extraction::{BBox, DocumentBackend, PdfDocument, TextFragment};
use pdfzone_core::Region;

pub type Page = Vec<(BBox, &'static str)>;

#[derive(Default, Clone)]
pub struct MockBackend {
    documents: HashMap<PathBuf, Vec<Page>>,
    unreadable: Option<Region>,
    pub events: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: &str, pages: Vec<Page>) -> Self {
        self.documents.insert(PathBuf::from(path), pages);
        self
    }

    /// Make every query for `region` fail, as a damaged content stream would.
    pub fn with_unreadable_region(mut self, region: Region) -> Self {
        self.unreadable = Some(region);
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

struct MockDocument {
    name: String,
    pages: Vec<Page>,
    unreadable: Option<Region>,
    events: Arc<Mutex<Vec<String>>>,
}

impl PdfDocument for MockDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn fragments_in(&self, page: usize, region: &Region) -> Result<Vec<TextFragment>, ZoneError> {
        if self.unreadable.as_ref() == Some(region) {
            return Err(ZoneError::Io(std::io::Error::other("damaged content stream")));
        }
        Ok(self.pages[page]
            .iter()
            .filter(|(bbox, _)| region.intersects(bbox))
            .map(|(bbox, text)| TextFragment {
                text: text.to_string(),
                bbox: *bbox,
            })
            .collect())
    }
}

impl Drop for MockDocument {
    fn drop(&mut self) {
        self.events.lock().unwrap().push(format!("close {}", self.name));
    }
}

impl DocumentBackend for MockBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, ZoneError> {
        let name = path.display().to_string();
        let pages = self
            .documents
            .get(path)
            .cloned()
            .ok_or_else(|| ZoneError::DocumentOpen {
                path: path.to_path_buf(),
                reason: "not a PDF".into(),
            })?;
        self.events.lock().unwrap().push(format!("open {name}"));
        Ok(Box::new(MockDocument {
            name,
            pages,
            unreadable: self.unreadable,
            events: Arc::clone(&self.events),
        }))
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

pub fn bbox(x: f64, y: f64, width: f64, height: f64) -> BBox {
    BBox {
        x_min: x,
        y_min: y,
        x_max: x + width,
        y_max: y + height,
    }
}

/// A page with a header line at the top and a total near the bottom.
pub fn invoice_page(header: &'static str, total: &'static str) -> Page {
    vec![
        (bbox(72.0, 70.0, 200.0, 14.0), header),
        (bbox(72.0, 700.0, 60.0, 14.0), "Total"),
        (bbox(300.0, 700.0, 80.0, 14.0), total),
    ]
}

pub fn header_region() -> Region {
    Region::new(60.0, 60.0, 300.0, 40.0)
}

pub fn total_region() -> Region {
    Region::new(290.0, 690.0, 120.0, 30.0)
}
