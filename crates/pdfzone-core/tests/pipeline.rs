//! Integration tests for the extraction pipeline.
//!
//! Uses the in-memory MockBackend, so these tests run without poppler-utils.

mod common;

use common::{bbox, header_region, invoice_page, total_region, MockBackend};
use pdfzone_core::error::ZoneError;
use pdfzone_core::pipeline::{CancelToken, Pipeline};
use pdfzone_core::{Region, Template, TemplatePage};
use pretty_assertions::assert_eq;

fn two_region_template() -> Template {
    Template::new(vec![TemplatePage {
        page: 0,
        coordinates: vec![header_region(), total_region()],
    }])
}

fn two_invoices() -> MockBackend {
    MockBackend::new()
        .with_document("a.pdf", vec![invoice_page("Invoice 1001", "120,00")])
        .with_document("b.pdf", vec![invoice_page("Invoice 1002", "75,50")])
}

// ---------------------------------------------------------------------------
// Row order: document × template entry × region, one separator per document
// ---------------------------------------------------------------------------
#[test]
fn two_documents_two_regions_give_six_rows() {
    let backend = two_invoices();
    let rows = Pipeline::new(&backend)
        .run(&two_region_template(), &["a.pdf", "b.pdf"], |_| {})
        .unwrap();

    assert_eq!(
        rows,
        vec!["Invoice 1001", "120,00", "", "Invoice 1002", "75,50", ""]
    );
}

#[test]
fn template_entry_order_drives_output_order() {
    let backend = MockBackend::new().with_document(
        "a.pdf",
        vec![
            invoice_page("Page one", "1"),
            invoice_page("Page two", "2"),
        ],
    );
    let template = Template::new(vec![
        TemplatePage {
            page: 1,
            coordinates: vec![header_region()],
        },
        TemplatePage {
            page: 0,
            coordinates: vec![total_region(), header_region()],
        },
        TemplatePage {
            page: 1,
            coordinates: vec![total_region()],
        },
    ]);

    let rows = Pipeline::new(&backend)
        .run(&template, &["a.pdf"], |_| {})
        .unwrap();

    assert_eq!(rows, vec!["Page two", "1", "Page one", "2", ""]);
}

#[test]
fn fragments_are_trimmed_and_joined_with_newlines() {
    let backend = MockBackend::new().with_document(
        "a.pdf",
        vec![vec![
            (bbox(10.0, 10.0, 50.0, 10.0), "  Acme AB \n"),
            (bbox(10.0, 25.0, 50.0, 10.0), "\tBox 12 "),
            (bbox(400.0, 400.0, 50.0, 10.0), "elsewhere"),
        ]],
    );
    let template = Template::new(vec![TemplatePage {
        page: 0,
        coordinates: vec![Region::new(0.0, 0.0, 100.0, 100.0), Region::new(500.0, 500.0, 10.0, 10.0)],
    }]);

    let rows = Pipeline::new(&backend)
        .run(&template, &["a.pdf"], |_| {})
        .unwrap();

    assert_eq!(rows, vec!["Acme AB\nBox 12", "", ""]);
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------
#[test]
fn progress_reported_once_per_document_ending_at_100() {
    let mut backend = MockBackend::new();
    let names = ["1.pdf", "2.pdf", "3.pdf"];
    for name in names {
        backend = backend.with_document(name, vec![invoice_page("x", "y")]);
    }

    let mut seen = Vec::new();
    Pipeline::new(&backend)
        .run(&two_region_template(), &names, |p| seen.push(p))
        .unwrap();

    assert_eq!(seen, vec![33, 67, 100]);
}

#[test]
fn empty_document_list_produces_nothing() {
    let backend = MockBackend::new();
    let mut calls = 0;
    let docs: [&str; 0] = [];
    let rows = Pipeline::new(&backend)
        .run(&two_region_template(), &docs, |_| calls += 1)
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(calls, 0);
}

// ---------------------------------------------------------------------------
// Failures abort the whole run
// ---------------------------------------------------------------------------
#[test]
fn page_out_of_range_aborts_with_context() {
    let backend = MockBackend::new()
        .with_document("long.pdf", vec![invoice_page("a", "1"), invoice_page("b", "2")])
        .with_document("short.pdf", vec![invoice_page("c", "3")]);
    let template = Template::new(vec![
        TemplatePage {
            page: 0,
            coordinates: vec![header_region()],
        },
        TemplatePage {
            page: 1,
            coordinates: vec![header_region()],
        },
    ]);

    let mut progress = Vec::new();
    let err = Pipeline::new(&backend)
        .run(&template, &["long.pdf", "short.pdf"], |p| progress.push(p))
        .unwrap_err();

    match err {
        ZoneError::PageIndex {
            path,
            entry,
            page,
            page_count,
        } => {
            assert_eq!(path.to_str(), Some("short.pdf"));
            assert_eq!(entry, 1);
            assert_eq!(page, 1);
            assert_eq!(page_count, 1);
        }
        other => panic!("expected PageIndex, got {other:?}"),
    }
    assert_eq!(progress, vec![50]);
}

#[test]
fn unreadable_document_aborts() {
    let backend = two_invoices();
    let err = Pipeline::new(&backend)
        .run(&two_region_template(), &["a.pdf", "broken.pdf", "b.pdf"], |_| {})
        .unwrap_err();
    assert!(matches!(err, ZoneError::DocumentOpen { ref path, .. } if path.ends_with("broken.pdf")));
    assert!(!backend.events().contains(&"open b.pdf".to_string()));
}

#[test]
fn region_read_failure_names_document_page_and_region() {
    let backend = two_invoices().with_unreadable_region(total_region());
    let mut progress = Vec::new();
    let err = Pipeline::new(&backend)
        .run(&two_region_template(), &["a.pdf", "b.pdf"], |p| progress.push(p))
        .unwrap_err();

    match err {
        ZoneError::Extraction {
            ref path,
            page,
            region,
            ref reason,
        } => {
            assert_eq!(path.to_str(), Some("a.pdf"));
            assert_eq!(page, 0);
            assert_eq!(region, 1);
            assert!(reason.contains("damaged content stream"), "{reason}");
        }
        other => panic!("expected Extraction, got {other:?}"),
    }
    assert!(progress.is_empty());
    assert_eq!(backend.events(), vec!["open a.pdf", "close a.pdf"]);
}

#[test]
fn handles_released_before_next_open_even_on_failure() {
    let backend = two_invoices().with_document("empty.pdf", vec![]);
    Pipeline::new(&backend)
        .run(&two_region_template(), &["a.pdf", "b.pdf"], |_| {})
        .unwrap();
    assert_eq!(
        backend.events(),
        vec!["open a.pdf", "close a.pdf", "open b.pdf", "close b.pdf"]
    );

    let backend = two_invoices().with_document("empty.pdf", vec![]);
    Pipeline::new(&backend)
        .run(&two_region_template(), &["empty.pdf", "a.pdf"], |_| {})
        .unwrap_err();
    assert_eq!(backend.events(), vec!["open empty.pdf", "close empty.pdf"]);
}

#[test]
fn cancellation_checked_at_document_boundary() {
    let backend = two_invoices();
    let token = CancelToken::new();
    let trigger = token.clone();

    let err = Pipeline::new(&backend)
        .with_cancel(token)
        .run(&two_region_template(), &["a.pdf", "b.pdf"], |_| trigger.cancel())
        .unwrap_err();

    assert!(matches!(
        err,
        ZoneError::Cancelled {
            completed: 1,
            total: 2
        }
    ));
    assert_eq!(backend.events(), vec!["open a.pdf", "close a.pdf"]);
}
