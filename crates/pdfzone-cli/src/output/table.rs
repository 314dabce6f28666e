use pdfzone_core::extraction::TextFragment;
use pdfzone_core::worker::BatchReport;
use pdfzone_core::Template;

pub fn print_report(report: &BatchReport) {
    println!(
        "Processed {} document(s), wrote {} row(s) to {}",
        report.documents,
        report.rows,
        report.output.display()
    );
}

pub fn print_template(template: &Template) {
    println!(
        "  Entries: {}  Regions: {}",
        template.pages().len(),
        template.region_count()
    );
    if let Some(max) = template.max_page() {
        println!("  Documents need at least {} page(s)", max + 1);
    }

    for (entry, page) in template.pages().iter().enumerate() {
        println!("\n  Entry {entry}: page {}", page.page);
        if page.coordinates.is_empty() {
            println!("    (no regions)");
            continue;
        }
        println!(
            "    {:>3}  {:>10}  {:>10}  {:>10}  {:>10}",
            "#", "x", "y", "width", "height"
        );
        for (i, r) in page.coordinates.iter().enumerate() {
            println!(
                "    {:>3}  {:>10.2}  {:>10.2}  {:>10.2}  {:>10.2}",
                i + 1,
                r.x,
                r.y,
                r.width,
                r.height
            );
        }
    }
}

pub fn print_fragments(fragments: &[TextFragment]) {
    if fragments.is_empty() {
        println!("No text found in region.");
        return;
    }

    println!("{} fragment(s):", fragments.len());
    for (i, f) in fragments.iter().enumerate() {
        println!(
            "\n  [{}] ({:.1}, {:.1}) - ({:.1}, {:.1})",
            i + 1,
            f.bbox.x_min,
            f.bbox.y_min,
            f.bbox.x_max,
            f.bbox.y_max
        );
        for line in f.text.lines() {
            println!("      {line}");
        }
    }
}
