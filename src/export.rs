use std::path::Path;

use crate::model::{BatchResult, OUTPUT_COLUMNS};

fn write_into<W: std::io::Write>(result: &BatchResult, sink: W) -> Result<W, String> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(sink);
    // Header written explicitly so the contract strings (including the `*`
    // suffixes) survive bit-exactly, independent of serde field names.
    writer
        .write_record(OUTPUT_COLUMNS)
        .map_err(|e| format!("failed to write export header: {e}"))?;
    for row in &result.rows {
        writer
            .serialize(row)
            .map_err(|e| format!("failed to write export row: {e}"))?;
    }
    writer
        .into_inner()
        .map_err(|e| format!("failed to flush export: {e}"))
}

/// Renders the aggregated table as csv text.
pub fn batch_csv_string(result: &BatchResult) -> Result<String, String> {
    let bytes = write_into(result, Vec::new())?;
    String::from_utf8(bytes).map_err(|e| format!("export produced invalid utf-8: {e}"))
}

/// Writes the aggregated table to a csv file at `path`.
pub fn write_batch_csv(result: &BatchResult, path: &Path) -> Result<(), String> {
    let file = std::fs::File::create(path)
        .map_err(|e| format!("failed to create export file {}: {e}", path.to_string_lossy()))?;
    write_into(result, file)?;
    Ok(())
}
