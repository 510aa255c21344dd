use crate::model::{BatchResult, CanonicalRow, SheetResult};

/// Terminal, user-visible message for a batch in which no unit produced data.
pub const NO_DATA_MESSAGE: &str = "no usable sales data was found in any sheet of the batch";

/// Synthetic summary row: "Total" in the date column, empty identity fields,
/// arithmetic sums of every numeric column over the given rows.
pub fn total_row(rows: &[CanonicalRow]) -> CanonicalRow {
    CanonicalRow {
        sales_date: "Total".to_string(),
        item_id: String::new(),
        item_name: String::new(),
        sold_qty: rows.iter().map(|r| r.sold_qty).sum(),
        total_discount_value: rows.iter().map(|r| r.total_discount_value).sum(),
        total_sales_excl_tax: rows.iter().map(|r| r.total_sales_excl_tax).sum(),
        total_sales_incl_tax: rows.iter().map(|r| r.total_sales_incl_tax).sum(),
        order_id: String::new(),
        sales_type_code: String::new(),
    }
}

/// Concatenates sheet results preserving file-then-sheet order, optionally
/// appending the synthetic total row. `None` is the distinct "no data"
/// outcome: zero sheets contributed rows, which callers surface as a
/// terminal message rather than a silent empty table.
pub fn aggregate(results: Vec<SheetResult>, include_total: bool) -> Option<BatchResult> {
    let mut rows: Vec<CanonicalRow> = Vec::new();
    for sheet_rows in results {
        rows.extend(sheet_rows);
    }
    if rows.is_empty() {
        return None;
    }
    if include_total {
        let summary = total_row(&rows);
        rows.push(summary);
    }
    Some(BatchResult {
        rows,
        has_total_row: include_total,
    })
}
