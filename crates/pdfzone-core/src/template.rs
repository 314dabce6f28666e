use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{FormatError, ZoneError};
use crate::region::Region;

const AREA_KEYS: [&str; 4] = ["x", "y", "width", "height"];

/// Regions to extract from one page of every document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplatePage {
    /// Zero-based page index in the target document.
    pub page: usize,
    pub coordinates: Vec<Region>,
}

/// Ordered list of page entries. Entry order is extraction order; a page may
/// appear more than once or not at all.
///
/// On disk a template is a JSON array:
///
/// ```json
/// [
///     {
///         "page": 0,
///         "coordinates": [
///             { "x": 72.0, "y": 90.5, "width": 200.0, "height": 18.0 }
///         ]
///     }
/// ]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Template {
    pages: Vec<TemplatePage>,
}

impl Template {
    pub fn new(pages: Vec<TemplatePage>) -> Self {
        Template { pages }
    }

    pub fn pages(&self) -> &[TemplatePage] {
        &self.pages
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of rows one document contributes, excluding its separator.
    pub fn region_count(&self) -> usize {
        self.pages.iter().map(|p| p.coordinates.len()).sum()
    }

    /// Highest page index referenced, if any.
    pub fn max_page(&self) -> Option<usize> {
        self.pages.iter().map(|p| p.page).max()
    }
}

impl From<Vec<TemplatePage>> for Template {
    fn from(pages: Vec<TemplatePage>) -> Self {
        Template::new(pages)
    }
}

// Deserializing goes through the same checks as `decode`.
impl<'de> Deserialize<'de> for Template {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Load and validate a template file.
pub fn load(path: &Path) -> Result<Template, ZoneError> {
    let content = std::fs::read_to_string(path).map_err(|e| ZoneError::TemplateLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let template = decode(&content)?;
    tracing::debug!(
        path = %path.display(),
        pages = template.pages().len(),
        regions = template.region_count(),
        "loaded template"
    );
    Ok(template)
}

/// Write a template file with 4-space indentation.
pub fn save(template: &Template, path: &Path) -> Result<(), ZoneError> {
    let json = encode(template)?;
    std::fs::write(path, json).map_err(|e| ZoneError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub fn encode(template: &Template) -> Result<String, ZoneError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    template.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Parse and validate template text. Template files come from users, so the
/// whole document is checked and the first broken rule is reported before
/// anything is extracted.
pub fn decode(raw: &str) -> Result<Template, ZoneError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| FormatError::Syntax(e.to_string()))?;
    Ok(decode_value(&value)?)
}

/// Validate an already-parsed JSON value as a template.
pub fn decode_value(value: &Value) -> Result<Template, FormatError> {
    let entries = value.as_array().ok_or(FormatError::NotASequence)?;

    let pages = entries
        .iter()
        .enumerate()
        .map(|(entry, v)| decode_entry(entry, v))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Template::new(pages))
}

fn decode_entry(entry: usize, value: &Value) -> Result<TemplatePage, FormatError> {
    let obj = value
        .as_object()
        .ok_or(FormatError::EntryNotMapping { entry })?;
    let page = obj.get("page").ok_or(FormatError::MissingPage { entry })?;
    let coordinates = obj
        .get("coordinates")
        .ok_or(FormatError::MissingCoordinates { entry })?;
    let areas = coordinates
        .as_array()
        .ok_or(FormatError::CoordinatesNotSequence { entry })?;

    let page = page
        .as_u64()
        .and_then(|p| usize::try_from(p).ok())
        .ok_or(FormatError::InvalidPage { entry })?;

    let coordinates = areas
        .iter()
        .enumerate()
        .map(|(area, v)| decode_area(entry, area, v))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TemplatePage { page, coordinates })
}

fn decode_area(entry: usize, area: usize, value: &Value) -> Result<Region, FormatError> {
    let obj = value
        .as_object()
        .ok_or(FormatError::AreaNotMapping { entry, area })?;

    if let Some(key) = AREA_KEYS.iter().find(|k| !obj.contains_key(**k)) {
        return Err(FormatError::MissingAreaKey { entry, area, key });
    }

    let x = number(obj, entry, area, "x")?;
    let y = number(obj, entry, area, "y")?;
    let width = extent(obj, entry, area, "width")?;
    let height = extent(obj, entry, area, "height")?;

    Ok(Region {
        x,
        y,
        width,
        height,
    })
}

fn number(
    obj: &Map<String, Value>,
    entry: usize,
    area: usize,
    key: &'static str,
) -> Result<f64, FormatError> {
    obj.get(key)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .ok_or(FormatError::InvalidNumber { entry, area, key })
}

fn extent(
    obj: &Map<String, Value>,
    entry: usize,
    area: usize,
    key: &'static str,
) -> Result<f64, FormatError> {
    let n = number(obj, entry, area, key)?;
    if n < 0.0 {
        return Err(FormatError::NegativeExtent { entry, area, key });
    }
    Ok(n)
}
