use calamine::{open_workbook_auto, Reader};
use std::path::Path;

use crate::model::RawSheet;

pub(crate) fn trim_cell(text: &str) -> String {
    text.trim()
        .trim_start_matches('\u{feff}')
        .trim()
        .to_string()
}

/// File name without extension, used as the sheet label for csv inputs and
/// as the date-fallback / item-id-prefix source for every input.
pub fn file_stem_label(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| format!("failed to read csv: {e}"))?;

    let mut rows = Vec::new();
    for rec in reader.records() {
        let rec = rec.map_err(|e| format!("failed to read csv record: {e}"))?;
        rows.push(rec.iter().map(trim_cell).collect());
    }
    Ok(rows)
}

/// One decoded input file: the sheets that read cleanly plus an error line
/// per sheet that did not. A sheet-level read failure never fails the file.
#[derive(Debug)]
pub struct WorkbookRead {
    pub sheets: Vec<RawSheet>,
    pub sheet_errors: Vec<String>,
}

fn read_excel_sheets(path: &Path) -> Result<WorkbookRead, String> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| format!("failed to open workbook: {e}"))?;
    let sheet_names = workbook.sheet_names().to_owned();
    if sheet_names.is_empty() {
        return Err("workbook contains no worksheets".to_string());
    }

    let mut sheets = Vec::with_capacity(sheet_names.len());
    let mut sheet_errors = Vec::new();
    for name in sheet_names {
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                sheet_errors.push(format!("failed to read worksheet '{name}': {e}"));
                continue;
            }
        };
        let rows = range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| trim_cell(&cell.to_string()))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        sheets.push(RawSheet { label: name, rows });
    }
    Ok(WorkbookRead {
        sheets,
        sheet_errors,
    })
}

/// Reads one input file into raw sheet grids. Excel workbooks keep their
/// sheets in workbook order; a csv file becomes a single pseudo-sheet
/// labeled with the file stem.
pub fn read_workbook_at_path(path: &Path) -> Result<WorkbookRead, String> {
    if !path.exists() {
        return Err(format!("input file not found: {}", path.to_string_lossy()));
    }
    if !path.is_file() {
        return Err(format!(
            "input path is not a file: {}",
            path.to_string_lossy()
        ));
    }

    let suffix = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match suffix.as_str() {
        "csv" => {
            let rows = read_csv_rows(path)?;
            Ok(WorkbookRead {
                sheets: vec![RawSheet {
                    label: file_stem_label(path),
                    rows,
                }],
                sheet_errors: Vec::new(),
            })
        }
        "xlsx" | "xls" | "xlsm" => read_excel_sheets(path),
        _ => Err(format!(
            "unsupported file format: .{suffix} (expected .csv/.xlsx/.xls)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn create_temp_path(prefix: &str, ext: &str) -> PathBuf {
        let unique = format!("{prefix}_{}_{}.{}", std::process::id(), Uuid::new_v4(), ext);
        std::env::temp_dir().join(unique)
    }

    #[test]
    fn csv_becomes_one_sheet_labeled_with_file_stem() {
        let path = create_temp_path("posnorm_read_fixture", "csv");
        fs::write(&path, "a,b\n1,2\n").expect("write temp csv");

        let read = read_workbook_at_path(&path).expect("read csv");
        assert_eq!(read.sheets.len(), 1);
        assert!(read.sheet_errors.is_empty());
        assert!(read.sheets[0].label.starts_with("posnorm_read_fixture"));
        assert_eq!(read.sheets[0].rows.len(), 2);
        assert_eq!(read.sheets[0].rows[1], vec!["1".to_string(), "2".to_string()]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn ragged_csv_rows_are_kept() {
        let path = create_temp_path("posnorm_read_ragged", "csv");
        fs::write(&path, "a,b,c\nonly-one\n1,2\n").expect("write temp csv");

        let read = read_workbook_at_path(&path).expect("read ragged csv");
        assert_eq!(read.sheets[0].rows[0].len(), 3);
        assert_eq!(read.sheets[0].rows[1], vec!["only-one".to_string()]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let path = create_temp_path("posnorm_read_bad", "txt");
        fs::write(&path, "not a spreadsheet").expect("write temp txt");

        let err = read_workbook_at_path(&path).expect_err("txt should be rejected");
        assert!(err.contains("unsupported file format"), "{err}");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_a_readable_error() {
        let path = create_temp_path("posnorm_read_missing", "csv");
        let err = read_workbook_at_path(&path).expect_err("missing file");
        assert!(err.contains("not found"), "{err}");
    }
}
