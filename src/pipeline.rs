//! The one configurable pipeline. The report family this engine replaces
//! grew five near-duplicate processing variants (single-file, multi-file,
//! filename-fallback-date, prefixed item ids, with/without total row); here
//! they collapse into `PipelineOptions` threaded explicitly through every
//! call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::aggregate::{aggregate, NO_DATA_MESSAGE};
use crate::column_map::reconcile;
use crate::date_extract::{extract_date_detailed, DateExtraction, DateFallback};
use crate::header_locate::locate_header;
use crate::model::{BatchResult, RawSheet, SheetResult};
use crate::row_normalize::{normalize_rows, ItemIdStrategy, NormalizeContext};
use crate::workbook_read::{file_stem_label, read_workbook_at_path};

/// Batch cap: files beyond this are never opened and are reported as
/// skipped.
pub const DEFAULT_MAX_FILES: usize = 5;

const ERROR_SAMPLE_LIMIT: usize = 20;

/// All knobs of the pipeline, passed explicitly; there is no ambient state.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Retry date extraction on the file name when the sheet label yields
    /// nothing, before applying `date_fallback`.
    pub use_filename_date_fallback: bool,
    pub item_id_strategy: ItemIdStrategy,
    pub include_total_row: bool,
    pub date_fallback: DateFallback,
    pub max_files: usize,
    /// Verbose per-sheet events in the report.
    pub debug: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            use_filename_date_fallback: false,
            item_id_strategy: ItemIdStrategy::Raw,
            include_total_row: false,
            date_fallback: DateFallback::default(),
            max_files: DEFAULT_MAX_FILES,
            debug: false,
        }
    }
}

/// Caller-facing request shape; resolved and validated into
/// `PipelineOptions` before any file is touched.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub source_paths: Vec<String>,
    pub use_filename_date_fallback: Option<bool>,
    /// "raw", "sequence" or "file_prefixed_sequence".
    pub item_id_strategy: Option<String>,
    pub include_total_row: Option<bool>,
    /// "none" for null-on-failure, or a fixed `YYYY-MM-DD` default date.
    pub default_date: Option<String>,
    pub max_files: Option<usize>,
    pub debug: Option<bool>,
}

fn resolve_item_id_strategy(raw: Option<&str>) -> Result<ItemIdStrategy, String> {
    match raw.map(str::trim) {
        None | Some("") | Some("raw") => Ok(ItemIdStrategy::Raw),
        Some("sequence") => Ok(ItemIdStrategy::Sequence),
        Some("file_prefixed_sequence") => Ok(ItemIdStrategy::FilePrefixedSequence),
        Some(other) => Err(format!(
            "unknown item_id_strategy '{other}' (expected raw/sequence/file_prefixed_sequence)"
        )),
    }
}

fn resolve_date_fallback(raw: Option<&str>) -> Result<DateFallback, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DateFallback::default()),
        Some("none") => Ok(DateFallback::None),
        Some(text) => {
            let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map_err(|_| format!("default_date must be 'none' or YYYY-MM-DD, got '{text}'"))?;
            Ok(DateFallback::FixedDate(date))
        }
    }
}

/// Validates a request into pipeline options.
pub fn resolve_options(req: &BatchRequest) -> Result<PipelineOptions, String> {
    Ok(PipelineOptions {
        use_filename_date_fallback: req.use_filename_date_fallback.unwrap_or(false),
        item_id_strategy: resolve_item_id_strategy(req.item_id_strategy.as_deref())?,
        include_total_row: req.include_total_row.unwrap_or(false),
        date_fallback: resolve_date_fallback(req.default_date.as_deref())?,
        max_files: req.max_files.unwrap_or(DEFAULT_MAX_FILES),
        debug: req.debug.unwrap_or(false),
    })
}

#[derive(Debug, Serialize)]
pub struct SheetEntry {
    pub sheet: String,
    /// "parsed", "skipped" or "failed".
    pub status: String,
    pub row_count: usize,
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FileEntry {
    pub file: String,
    /// "parsed", "no_data", "skipped_by_cap" or "failed".
    pub status: String,
    pub row_count: usize,
    pub sheets: Vec<SheetEntry>,
    pub detail: Option<String>,
}

/// Per-batch diagnostic channel handed back to the caller. Human-readable
/// event strings; serializable for UI display.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub batch_id: String,
    /// "ok" or "no_data".
    pub status: String,
    pub message: Option<String>,
    pub files: Vec<FileEntry>,
    pub processed_file_count: usize,
    pub skipped_by_cap_count: usize,
    /// Data rows in the aggregated table, excluding the synthetic total
    /// row when one was appended.
    pub data_row_count: usize,
    pub error_count: usize,
    /// First `ERROR_SAMPLE_LIMIT` error lines.
    pub errors: Vec<String>,
    /// Per-sheet trace, populated when `debug` is on.
    pub events: Vec<String>,
}

/// What one sheet produced, with the intermediate decisions kept visible
/// for the debug trace and for tests.
#[derive(Debug)]
pub struct SheetOutcome {
    pub rows: SheetResult,
    pub header_row: usize,
    pub sales_date: Option<String>,
}

/// Runs the full per-sheet chain: header location, column reconciliation,
/// date resolution (sheet label, then file label when configured, then the
/// configured fallback), row normalization.
pub fn process_sheet(
    sheet: &RawSheet,
    file_stem: &str,
    options: &PipelineOptions,
    diagnostics: &mut Vec<String>,
) -> SheetOutcome {
    if sheet.rows.is_empty() {
        return SheetOutcome {
            rows: Vec::new(),
            header_row: 0,
            sales_date: None,
        };
    }

    let header_row = locate_header(&sheet.rows);
    let mapping = reconcile(&sheet.rows[header_row]);

    let extraction = match extract_date_detailed(&sheet.label) {
        found @ DateExtraction::Found(_) => found,
        other if options.use_filename_date_fallback => {
            match extract_date_detailed(file_stem) {
                found @ DateExtraction::Found(_) => found,
                _ => other,
            }
        }
        other => other,
    };
    let sales_date = extraction.resolve(&options.date_fallback, diagnostics);

    let ctx = NormalizeContext {
        sheet_label: &sheet.label,
        file_stem,
        sales_date: sales_date.clone(),
        item_id_strategy: options.item_id_strategy,
    };
    let rows = normalize_rows(&sheet.rows[header_row + 1..], &mapping, &ctx);

    SheetOutcome {
        rows,
        header_row,
        sales_date,
    }
}

fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

fn process_workbook(
    path: &Path,
    options: &PipelineOptions,
    errors: &mut Vec<String>,
    events: &mut Vec<String>,
) -> (FileEntry, Vec<SheetResult>) {
    let file = display_file_name(path);

    let read = match read_workbook_at_path(path) {
        Ok(read) => read,
        Err(err) => {
            errors.push(format!("{file}: {err}"));
            return (
                FileEntry {
                    file,
                    status: "failed".to_string(),
                    row_count: 0,
                    sheets: Vec::new(),
                    detail: Some(err),
                },
                Vec::new(),
            );
        }
    };

    let file_stem = file_stem_label(path);
    let mut sheet_entries = Vec::new();
    let mut results = Vec::new();
    let mut file_row_count = 0usize;

    for err in &read.sheet_errors {
        errors.push(format!("{file}: {err}"));
        sheet_entries.push(SheetEntry {
            sheet: "(unreadable)".to_string(),
            status: "failed".to_string(),
            row_count: 0,
            detail: Some(err.clone()),
        });
    }

    for sheet in read.sheets {
        let mut diagnostics = Vec::new();
        let outcome = process_sheet(&sheet, &file_stem, options, &mut diagnostics);
        for diag in diagnostics {
            errors.push(format!("{file} / {}: {diag}", sheet.label));
        }

        if options.debug {
            events.push(format!(
                "{file} / {}: header row {}, date {}, {} row(s)",
                sheet.label,
                outcome.header_row,
                outcome.sales_date.as_deref().unwrap_or("(none)"),
                outcome.rows.len()
            ));
        }

        let row_count = outcome.rows.len();
        file_row_count += row_count;
        let (status, detail) = if row_count == 0 {
            (
                "skipped".to_string(),
                Some("no usable rows after filtering".to_string()),
            )
        } else {
            ("parsed".to_string(), None)
        };
        sheet_entries.push(SheetEntry {
            sheet: sheet.label.clone(),
            status,
            row_count,
            detail,
        });
        results.push(outcome.rows);
    }

    let status = if file_row_count == 0 {
        "no_data".to_string()
    } else {
        "parsed".to_string()
    };
    (
        FileEntry {
            file,
            status,
            row_count: file_row_count,
            sheets: sheet_entries,
            detail: None,
        },
        results,
    )
}

/// The aggregated table (when any unit produced data) plus the diagnostic
/// report, which always describes every supplied unit.
#[derive(Debug)]
pub struct BatchOutcome {
    pub table: Option<BatchResult>,
    pub report: BatchReport,
}

/// Processes a batch of files sequentially: cap enforcement, per-file catch
/// scopes, aggregation, report assembly. A failure in one unit never aborts
/// the rest of the batch.
pub fn process_batch_at_paths(
    paths: &[PathBuf],
    options: &PipelineOptions,
) -> Result<BatchOutcome, String> {
    if paths.is_empty() {
        return Err("no input files supplied".to_string());
    }

    let mut files = Vec::new();
    let mut errors = Vec::new();
    let mut events = Vec::new();
    let mut all_results: Vec<SheetResult> = Vec::new();
    let mut processed_file_count = 0usize;
    let mut skipped_by_cap_count = 0usize;

    for (idx, path) in paths.iter().enumerate() {
        if idx >= options.max_files {
            skipped_by_cap_count += 1;
            files.push(FileEntry {
                file: display_file_name(path),
                status: "skipped_by_cap".to_string(),
                row_count: 0,
                sheets: Vec::new(),
                detail: Some(format!("batch is capped at {} file(s)", options.max_files)),
            });
            continue;
        }

        processed_file_count += 1;
        let (entry, results) = process_workbook(path, options, &mut errors, &mut events);
        all_results.extend(results);
        files.push(entry);
    }

    let table = aggregate(all_results, options.include_total_row);
    let (status, message) = match &table {
        Some(_) => ("ok".to_string(), None),
        None => ("no_data".to_string(), Some(NO_DATA_MESSAGE.to_string())),
    };
    let data_row_count = table.as_ref().map(|t| t.data_rows().len()).unwrap_or(0);

    let error_count = errors.len();
    errors.truncate(ERROR_SAMPLE_LIMIT);

    Ok(BatchOutcome {
        table,
        report: BatchReport {
            batch_id: Uuid::new_v4().to_string(),
            status,
            message,
            files,
            processed_file_count,
            skipped_by_cap_count,
            data_row_count,
            error_count,
            errors,
            events,
        },
    })
}

/// Request-level entry point for UI callers: resolves options, runs the
/// batch, and renders a JSON summary with the report and a 10-row preview.
pub fn process_batch_request(req: &BatchRequest) -> Result<Value, String> {
    if req.source_paths.iter().all(|p| p.trim().is_empty()) {
        return Err("source_paths is required".to_string());
    }
    let options = resolve_options(req)?;
    let paths: Vec<PathBuf> = req
        .source_paths
        .iter()
        .map(|p| PathBuf::from(p.trim()))
        .collect();
    let outcome = process_batch_at_paths(&paths, &options)?;

    let preview_rows = outcome
        .table
        .as_ref()
        .map(|t| {
            t.rows
                .iter()
                .take(10)
                .map(|row| json!(row))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    Ok(json!({
        "report": outcome.report,
        "row_count": outcome.table.as_ref().map(|t| t.rows.len()).unwrap_or(0),
        "has_total_row": outcome.table.as_ref().map(|t| t.has_total_row).unwrap_or(false),
        "preview_rows": preview_rows,
    }))
}
