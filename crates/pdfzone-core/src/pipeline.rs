use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::ZoneError;
use crate::extraction::{DocumentBackend, PdfDocument, TextFragment};
use crate::template::Template;

/// One unit of output: a region's text, or an empty document separator.
pub type ExtractionRow = String;

/// Shared flag a front end can set to stop a batch at the next document
/// boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Applies a template to documents, one document at a time.
pub struct Pipeline<'a> {
    backend: &'a dyn DocumentBackend,
    cancel: Option<CancelToken>,
}

impl<'a> Pipeline<'a> {
    pub fn new(backend: &'a dyn DocumentBackend) -> Self {
        Pipeline {
            backend,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Extract every template region from every document.
    ///
    /// Rows come out in document order, then template entry order, then
    /// region order, with an empty row after each document. `on_progress`
    /// receives the rounded percentage of documents finished, once per
    /// document. The first error aborts the run and no rows are returned.
    pub fn run<P, F>(
        &self,
        template: &Template,
        documents: &[P],
        mut on_progress: F,
    ) -> Result<Vec<ExtractionRow>, ZoneError>
    where
        P: AsRef<Path>,
        F: FnMut(u8),
    {
        let total = documents.len();
        let mut rows = Vec::with_capacity(total * (template.region_count() + 1));

        tracing::info!(
            backend = self.backend.backend_name(),
            documents = total,
            regions = template.region_count(),
            "starting extraction"
        );

        for (done, path) in documents.iter().enumerate() {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                tracing::info!(completed = done, total, "extraction cancelled");
                return Err(ZoneError::Cancelled {
                    completed: done,
                    total,
                });
            }

            let path = path.as_ref();
            let _span = tracing::info_span!("document", path = %path.display()).entered();

            // The handle is dropped at the end of this iteration, or on the
            // error return, before the next document is opened.
            let document = self.backend.open(path)?;
            extract_document(document.as_ref(), path, template, &mut rows)?;
            drop(document);

            rows.push(ExtractionRow::new());
            on_progress(percent(done + 1, total));
        }

        tracing::info!(rows = rows.len(), "extraction finished");
        Ok(rows)
    }
}

fn extract_document(
    document: &dyn PdfDocument,
    path: &Path,
    template: &Template,
    rows: &mut Vec<ExtractionRow>,
) -> Result<(), ZoneError> {
    let page_count = document.page_count();

    for (entry, page_template) in template.pages().iter().enumerate() {
        let page = page_template.page;
        if page >= page_count {
            return Err(ZoneError::PageIndex {
                path: path.to_path_buf(),
                entry,
                page,
                page_count,
            });
        }

        for (region_index, region) in page_template.coordinates.iter().enumerate() {
            let fragments =
                document
                    .fragments_in(page, region)
                    .map_err(|e| ZoneError::Extraction {
                        path: path.to_path_buf(),
                        page,
                        region: region_index,
                        reason: e.to_string(),
                    })?;
            tracing::debug!(page, region = region_index, fragments = fragments.len(), "region extracted");
            rows.push(join_fragments(&fragments));
        }
    }

    Ok(())
}

/// Fragment texts, each trimmed, one per line.
pub fn join_fragments(fragments: &[TextFragment]) -> ExtractionRow {
    fragments
        .iter()
        .map(|f| f.text.trim())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `round(100 * done / total)` in integer arithmetic, halves rounded up.
fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let p = (200 * done + total) / (2 * total);
    p.min(100) as u8
}
