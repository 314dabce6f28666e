use pdfzone_core::error::ZoneError;
use pdfzone_core::worker::BatchReport;

pub fn print(report: &BatchReport) -> Result<(), ZoneError> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}
