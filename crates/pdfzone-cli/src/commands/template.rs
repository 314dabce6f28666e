use pdfzone_core::editor::Editor;
use pdfzone_core::error::ZoneError;
use pdfzone_core::template;
use pdfzone_core::{Point, Region, RegionCollection, Scale, Template};
use std::path::Path;

use crate::output;

pub fn validate(file: &Path) -> Result<(), ZoneError> {
    let template = template::load(file)?;

    println!("Template '{}' is valid.", file.display());
    output::table::print_template(&template);

    // Check for potential issues (warnings, not errors)
    let mut warnings = Vec::new();
    if template.is_empty() {
        warnings.push("template has no pages; every document will yield only a separator row".to_string());
    }
    for (entry, page) in template.pages().iter().enumerate() {
        if page.coordinates.is_empty() {
            warnings.push(format!("entry {entry} (page {}) has no regions", page.page));
        }
        for (area, region) in page.coordinates.iter().enumerate() {
            if region.width == 0.0 || region.height == 0.0 {
                warnings.push(format!(
                    "entry {entry}, area {area} has zero area and will always be empty"
                ));
            }
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

pub fn new(
    page: usize,
    regions: Vec<Region>,
    drags: Vec<(Point, Point)>,
    scale: f64,
    out: &Path,
) -> Result<(), ZoneError> {
    let template = build(page, regions, drags, Scale::new(scale)?);
    if template.region_count() == 0 {
        eprintln!("warning: writing a template without regions");
    }

    template::save(&template, out)?;
    eprintln!(
        "Wrote {} region(s) for page {} to {}",
        template.region_count(),
        page,
        out.display()
    );
    Ok(())
}

/// Regions given in document space are taken as-is; drags go through the
/// editor so they are converted from display space the same way a pointer
/// drag would be.
fn build(page: usize, regions: Vec<Region>, drags: Vec<(Point, Point)>, scale: Scale) -> Template {
    let mut collection = RegionCollection::new();
    for region in regions {
        collection.append(region);
    }

    let mut editor = Editor::new(1);
    editor.set_scale(scale);
    for (start, end) in drags {
        editor.begin_selection(start);
        if editor.finish_selection(end).is_none() {
            eprintln!("warning: ignoring zero-area drag");
        }
    }
    for region in editor.regions().snapshot() {
        collection.append(region);
    }

    Template::new(vec![collection.to_template_page(page)])
}
