use std::path::{Path, PathBuf};
use std::process::Command;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ZoneError;
use crate::extraction::{BBox, DocumentBackend, PdfDocument, TextFragment};
use crate::region::Region;

/// Document backend using pdftotext (from poppler-utils).
///
/// Runs `pdftotext -bbox-layout` once per document and answers region
/// queries from the parsed word boxes. pdftotext reports coordinates in PDF
/// points with the origin at the top-left corner, which is the document space
/// templates are authored in.
pub struct PdftotextBackend {
    binary: PathBuf,
}

impl PdftotextBackend {
    pub fn new() -> Self {
        PdftotextBackend {
            binary: PathBuf::from("pdftotext"),
        }
    }

    /// Use a specific pdftotext executable instead of the one on `PATH`.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        PdftotextBackend {
            binary: binary.into(),
        }
    }

    /// Check if the configured pdftotext can be executed.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBackend for PdftotextBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, ZoneError> {
        if !path.is_file() {
            return Err(ZoneError::DocumentOpen {
                path: path.to_path_buf(),
                reason: "no such file".into(),
            });
        }

        let output = Command::new(&self.binary)
            .arg("-bbox-layout")
            .arg("-enc")
            .arg("UTF-8")
            .arg(path)
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ZoneError::PdftotextNotFound
                } else {
                    ZoneError::DocumentOpen {
                        path: path.to_path_buf(),
                        reason: format!("pdftotext failed to start: {e}"),
                    }
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ZoneError::DocumentOpen {
                path: path.to_path_buf(),
                reason: format!("pdftotext exited with code {code}: {}", stderr.trim()),
            });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let pages = parse_bbox_layout(&xml).map_err(|reason| ZoneError::DocumentOpen {
            path: path.to_path_buf(),
            reason,
        })?;

        tracing::debug!(path = %path.display(), pages = pages.len(), "parsed pdftotext layout");
        Ok(Box::new(LayoutDocument { pages }))
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Word boxes of a whole document, grouped the way pdftotext laid them out.
#[derive(Debug, Clone, Default)]
pub struct LayoutDocument {
    pages: Vec<PageLayout>,
}

#[derive(Debug, Clone, Default)]
struct PageLayout {
    blocks: Vec<LayoutBlock>,
}

#[derive(Debug, Clone, Default)]
struct LayoutBlock {
    lines: Vec<LayoutLine>,
}

#[derive(Debug, Clone, Default)]
struct LayoutLine {
    words: Vec<Word>,
}

#[derive(Debug, Clone)]
struct Word {
    bbox: BBox,
    text: String,
}

impl LayoutDocument {
    pub fn from_bbox_layout(xml: &str) -> Result<Self, String> {
        Ok(LayoutDocument {
            pages: parse_bbox_layout(xml)?,
        })
    }
}

impl PdfDocument for LayoutDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// One fragment per layout block that has at least one word inside the
    /// region. Only the intersecting words are kept: words are joined by
    /// spaces, lines by newlines.
    fn fragments_in(&self, page: usize, region: &Region) -> Result<Vec<TextFragment>, ZoneError> {
        let layout = self.pages.get(page).ok_or(ZoneError::Index {
            index: page,
            len: self.pages.len(),
        })?;

        let mut fragments = Vec::new();
        for block in &layout.blocks {
            let mut bbox: Option<BBox> = None;
            let mut lines = Vec::new();

            for line in &block.lines {
                let words: Vec<&Word> = line
                    .words
                    .iter()
                    .filter(|w| region.intersects(&w.bbox))
                    .collect();
                if words.is_empty() {
                    continue;
                }
                for w in &words {
                    bbox = Some(match bbox {
                        Some(b) => union(&b, &w.bbox),
                        None => w.bbox,
                    });
                }
                lines.push(
                    words
                        .iter()
                        .map(|w| w.text.as_str())
                        .collect::<Vec<_>>()
                        .join(" "),
                );
            }

            if let Some(bbox) = bbox {
                fragments.push(TextFragment {
                    text: lines.join("\n"),
                    bbox,
                });
            }
        }

        Ok(fragments)
    }
}

fn union(a: &BBox, b: &BBox) -> BBox {
    BBox {
        x_min: a.x_min.min(b.x_min),
        y_min: a.y_min.min(b.y_min),
        x_max: a.x_max.max(b.x_max),
        y_max: a.y_max.max(b.y_max),
    }
}

fn parse_bbox_layout(xml: &str) -> Result<Vec<PageLayout>, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<PageLayout> = Vec::new();
    let mut block: Option<LayoutBlock> = None;
    let mut line: Option<LayoutLine> = None;
    let mut word: Option<Word> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("malformed pdftotext output at byte {}: {e}", reader.buffer_position()))?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"page" => pages.push(PageLayout::default()),
                b"block" => block = Some(LayoutBlock::default()),
                b"line" => line = Some(LayoutLine::default()),
                b"word" => {
                    word = parse_bbox(&e).map(|bbox| Word {
                        bbox,
                        text: String::new(),
                    })
                }
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"page" => pages.push(PageLayout::default()),
            Event::Text(t) => {
                if let Some(w) = word.as_mut() {
                    let text = match t.unescape() {
                        Ok(s) => s.into_owned(),
                        Err(_) => String::from_utf8_lossy(&t).into_owned(),
                    };
                    w.text.push_str(&text);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"word" => {
                    if let (Some(w), Some(l)) = (word.take(), line.as_mut()) {
                        let text = w.text.trim();
                        if !text.is_empty() {
                            l.words.push(Word {
                                bbox: w.bbox,
                                text: text.to_string(),
                            });
                        }
                    }
                }
                b"line" => {
                    if let (Some(l), Some(b)) = (line.take(), block.as_mut()) {
                        if !l.words.is_empty() {
                            b.lines.push(l);
                        }
                    }
                }
                b"block" => {
                    if let (Some(b), Some(p)) = (block.take(), pages.last_mut()) {
                        if !b.lines.is_empty() {
                            p.blocks.push(b);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pages)
}

fn parse_bbox(tag: &BytesStart<'_>) -> Option<BBox> {
    Some(BBox {
        x_min: parse_attr_f64(tag, "xMin")?,
        y_min: parse_attr_f64(tag, "yMin")?,
        x_max: parse_attr_f64(tag, "xMax")?,
        y_max: parse_attr_f64(tag, "yMax")?,
    })
}

fn parse_attr_f64(tag: &BytesStart<'_>, name: &str) -> Option<f64> {
    let attr = tag.try_get_attribute(name).ok()??;
    std::str::from_utf8(&attr.value).ok()?.parse().ok()
}
