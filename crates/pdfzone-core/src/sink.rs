use std::io::{Seek, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ZoneError;
use crate::pipeline::ExtractionRow;

/// Rows per worksheet in the xlsx format.
pub const MAX_ROWS: usize = 1_048_576;
/// Characters per cell in the xlsx format (UTF-16 code units).
pub const MAX_CELL_LEN: usize = 32_767;

pub const SHEET_NAME: &str = "Sheet1";

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// Write `rows` to `destination` as a single-column xlsx workbook.
///
/// One sheet, one column, no header. Every row, including the empty document
/// separators, keeps its own row number.
///
/// The workbook is assembled in a temporary file next to `destination` and
/// renamed into place, so a failed write leaves any existing file untouched.
pub fn write_rows(rows: &[ExtractionRow], destination: &Path) -> Result<(), ZoneError> {
    let write_err = |reason: String| ZoneError::Write {
        path: destination.to_path_buf(),
        reason,
    };

    if rows.len() > MAX_ROWS {
        return Err(write_err(format!(
            "{} rows exceed the xlsx limit of {MAX_ROWS}",
            rows.len()
        )));
    }

    let sheet = sheet_xml(rows).map_err(write_err)?;

    let dir = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = temp_builder()
        .tempfile_in(dir)
        .map_err(|e| write_err(e.to_string()))?;
    write_package(tmp.as_file_mut(), &sheet).map_err(write_err)?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| write_err(e.to_string()))?;
    tmp.persist(destination)
        .map_err(|e| write_err(e.error.to_string()))?;

    tracing::info!(path = %destination.display(), rows = rows.len(), "wrote workbook");
    Ok(())
}

// Temp files default to owner-only; the finished workbook should get the
// same mode as any other file the user creates.
fn temp_builder() -> tempfile::Builder<'static, 'static> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".pdfzone");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder
}

fn write_package<W: Write + Seek>(out: W, sheet: &[u8]) -> Result<(), String> {
    let mut zip = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, &[u8]); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", ROOT_RELS.as_bytes()),
        ("xl/workbook.xml", WORKBOOK.as_bytes()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
        ("xl/worksheets/sheet1.xml", sheet),
    ];
    for (name, body) in parts {
        zip.start_file(name, options).map_err(|e| e.to_string())?;
        zip.write_all(body).map_err(|e| e.to_string())?;
    }

    zip.finish().map_err(|e| e.to_string())?;
    Ok(())
}

fn sheet_xml(rows: &[ExtractionRow]) -> Result<Vec<u8>, String> {
    let mut writer = Writer::new(Vec::new());

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )?;
    let mut worksheet = BytesStart::new("worksheet");
    worksheet.push_attribute(("xmlns", SPREADSHEET_NS));
    emit(&mut writer, Event::Start(worksheet))?;
    emit(&mut writer, Event::Start(BytesStart::new("sheetData")))?;

    for (i, row) in rows.iter().enumerate() {
        let number = (i + 1).to_string();
        let mut row_tag = BytesStart::new("row");
        row_tag.push_attribute(("r", number.as_str()));

        let text = cell_text(row);
        if text.is_empty() {
            emit(&mut writer, Event::Empty(row_tag))?;
            continue;
        }
        if text.encode_utf16().count() > MAX_CELL_LEN {
            return Err(format!(
                "row {number} holds more than {MAX_CELL_LEN} characters"
            ));
        }

        let cell_ref = format!("A{number}");
        let mut cell = BytesStart::new("c");
        cell.push_attribute(("r", cell_ref.as_str()));
        cell.push_attribute(("t", "inlineStr"));
        let mut t = BytesStart::new("t");
        t.push_attribute(("xml:space", "preserve"));

        emit(&mut writer, Event::Start(row_tag))?;
        emit(&mut writer, Event::Start(cell))?;
        emit(&mut writer, Event::Start(BytesStart::new("is")))?;
        emit(&mut writer, Event::Start(t))?;
        emit(&mut writer, Event::Text(BytesText::new(&text)))?;
        emit(&mut writer, Event::End(BytesEnd::new("t")))?;
        emit(&mut writer, Event::End(BytesEnd::new("is")))?;
        emit(&mut writer, Event::End(BytesEnd::new("c")))?;
        emit(&mut writer, Event::End(BytesEnd::new("row")))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("sheetData")))?;
    emit(&mut writer, Event::End(BytesEnd::new("worksheet")))?;
    Ok(writer.into_inner())
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), String> {
    writer.write_event(event).map_err(|e| e.to_string())
}

/// Drop characters XML 1.0 cannot carry (PDF text sometimes contains form
/// feeds and other control bytes).
fn cell_text(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r')
                || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
        })
        .collect()
}
