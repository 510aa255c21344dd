//! Normalization engine for loosely-structured POS sales-report
//! spreadsheets: header-row detection, date extraction from sheet/file
//! names, column reconciliation, row cleanup, and batch aggregation into a
//! fixed-schema export. Upload widgets, progress bars, and download buttons
//! live in the caller; this crate takes file paths and hands back the
//! normalized table plus a diagnostic report.

mod aggregate;
mod column_map;
mod date_extract;
mod export;
mod header_locate;
mod model;
mod pipeline;
mod row_normalize;
mod workbook_read;

pub use aggregate::{aggregate, total_row, NO_DATA_MESSAGE};
pub use column_map::{
    item_id_candidates, item_name_candidates, quantity_candidates, reconcile,
    sales_amount_candidates, ColumnCandidate, ColumnMapping, MatchTier,
};
pub use date_extract::{
    extract_date, extract_date_detailed, DateExtraction, DateFallback, FALLBACK_YEAR,
};
pub use export::{batch_csv_string, write_batch_csv};
pub use header_locate::{
    header_candidates, locate_header, HeaderCandidate, HEADER_KEYWORDS, HEADER_MATCH_THRESHOLD,
    HEADER_SCAN_LIMIT,
};
pub use model::{BatchResult, CanonicalRow, RawSheet, SheetResult, OUTPUT_COLUMNS};
pub use pipeline::{
    process_batch_at_paths, process_batch_request, process_sheet, resolve_options, BatchOutcome,
    BatchReport, BatchRequest, FileEntry, PipelineOptions, SheetEntry, SheetOutcome,
    DEFAULT_MAX_FILES,
};
pub use row_normalize::{
    clean_number, normalize_rows, truncate_at_total_row, ItemIdStrategy, NormalizeContext,
};
pub use workbook_read::{file_stem_label, read_workbook_at_path, WorkbookRead};
