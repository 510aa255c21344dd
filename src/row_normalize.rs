use crate::column_map::ColumnMapping;
use crate::model::{CanonicalRow, SheetResult};

/// How the canonical item id is produced for each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemIdStrategy {
    /// Use the reconciled id column; synthesize a row sequence only when the
    /// column is absent or the cell is blank.
    #[default]
    Raw,
    /// Always a 1-based row sequence.
    Sequence,
    /// First 3 letters of the file name, upper-cased, plus a 1-based row
    /// sequence.
    FilePrefixedSequence,
}

/// Everything row assembly needs besides the grid itself. One date per
/// sheet; rows never carry their own dates.
#[derive(Debug)]
pub struct NormalizeContext<'a> {
    pub sheet_label: &'a str,
    pub file_stem: &'a str,
    pub sales_date: Option<String>,
    pub item_id_strategy: ItemIdStrategy,
}

/// Coerces a raw cell to a number: thousands commas, `$`/`₹` currency
/// symbols, and whitespace are stripped; anything still unparsable becomes 0
/// (a data-quality accommodation, not an error).
pub fn clean_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '$' && *c != '₹')
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().unwrap_or(0.0)
}

fn row_contains_total(row: &[String]) -> bool {
    row.iter().any(|cell| cell.to_uppercase().contains("TOTAL"))
}

/// Drops the first row containing the literal substring "TOTAL" in any cell
/// and everything after it. Runs before field mapping.
pub fn truncate_at_total_row(rows: &[Vec<String>]) -> &[Vec<String>] {
    match rows.iter().position(|row| row_contains_total(row)) {
        Some(idx) => &rows[..idx],
        None => rows,
    }
}

fn row_get(row: &[String], idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i).cloned()).unwrap_or_default()
}

pub(crate) fn file_prefix(file_stem: &str) -> String {
    file_stem
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect::<String>()
        .to_uppercase()
}

fn synthesize_item_id(
    raw_cell: &str,
    sequence: usize,
    file_stem: &str,
    strategy: ItemIdStrategy,
) -> String {
    match strategy {
        ItemIdStrategy::Raw => {
            if raw_cell.is_empty() {
                sequence.to_string()
            } else {
                raw_cell.to_string()
            }
        }
        ItemIdStrategy::Sequence => sequence.to_string(),
        ItemIdStrategy::FilePrefixedSequence => {
            format!("{}{}", file_prefix(file_stem), sequence)
        }
    }
}

/// Turns the data rows of one header-mapped sheet into canonical rows.
///
/// Rows at or after a "TOTAL" marker are discarded, blank rows are skipped,
/// quantities ≤ 0 are dropped, and any row whose item name still contains
/// "TOTAL" is treated as a missed boundary row. An empty result is a valid
/// "nothing usable" outcome, not an error.
pub fn normalize_rows(
    data_rows: &[Vec<String>],
    mapping: &ColumnMapping,
    ctx: &NormalizeContext,
) -> SheetResult {
    if data_rows.is_empty() {
        return Vec::new();
    }

    let rows = truncate_at_total_row(data_rows);
    let sales_date = ctx.sales_date.clone().unwrap_or_default();
    let mut result = Vec::new();
    let mut sequence = 0usize;

    for row in rows {
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        // Truncate before filtering so fractional cells like "0.5" cannot
        // slip past as positive floats and come out as a zero quantity.
        let sold_qty = match mapping.sold_qty {
            Some(idx) => clean_number(&row_get(row, Some(idx))) as i64,
            None => 1,
        };
        if sold_qty <= 0 {
            continue;
        }

        let item_name = {
            let raw = row_get(row, mapping.item_name);
            if raw.is_empty() {
                format!("Item from {}", ctx.sheet_label)
            } else {
                raw
            }
        };
        if item_name.to_uppercase().contains("TOTAL") {
            continue;
        }

        let total_sales = mapping
            .total_sales
            .map(|idx| clean_number(&row_get(row, Some(idx))))
            .unwrap_or(0.0);

        sequence += 1;
        let item_id = synthesize_item_id(
            &row_get(row, mapping.item_id),
            sequence,
            ctx.file_stem,
            ctx.item_id_strategy,
        );

        result.push(CanonicalRow {
            sales_date: sales_date.clone(),
            item_id,
            item_name,
            sold_qty,
            total_discount_value: 0.0,
            total_sales_excl_tax: total_sales,
            total_sales_incl_tax: total_sales,
            order_id: String::new(),
            sales_type_code: String::new(),
        });
    }

    result
}
