use serde::Serialize;

/// Output header row of the export contract. The `*` suffix marks columns the
/// downstream consumer treats as mandatory and must survive byte-for-byte.
pub const OUTPUT_COLUMNS: [&str; 9] = [
    "Sales Date *",
    "Pos Item Id *",
    "Pos Item Name",
    "Sold Qty *",
    "Total Discount Value",
    "Total Sales Excl. Tax *",
    "Total Sales Incl. Tax *",
    "Order Id",
    "Sales Type Code",
];

/// One worksheet as an untyped grid. Cells are trimmed and BOM-stripped on
/// read; nothing else is assumed about shape or types.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub label: String,
    pub rows: Vec<Vec<String>>,
}

/// One normalized sales line. Field order and serde names match the export
/// contract exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRow {
    #[serde(rename = "Sales Date *")]
    pub sales_date: String,
    #[serde(rename = "Pos Item Id *")]
    pub item_id: String,
    #[serde(rename = "Pos Item Name")]
    pub item_name: String,
    #[serde(rename = "Sold Qty *")]
    pub sold_qty: i64,
    #[serde(rename = "Total Discount Value")]
    pub total_discount_value: f64,
    #[serde(rename = "Total Sales Excl. Tax *")]
    pub total_sales_excl_tax: f64,
    #[serde(rename = "Total Sales Incl. Tax *")]
    pub total_sales_incl_tax: f64,
    #[serde(rename = "Order Id")]
    pub order_id: String,
    #[serde(rename = "Sales Type Code")]
    pub sales_type_code: String,
}

/// Rows for one sheet; empty means the sheet contributed no usable data,
/// which is a skip rather than an error.
pub type SheetResult = Vec<CanonicalRow>;

/// Concatenation of all sheet results in file-then-sheet order, optionally
/// carrying one synthetic total row at the end.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub rows: Vec<CanonicalRow>,
    pub has_total_row: bool,
}

impl BatchResult {
    /// Data rows only, excluding the synthetic total row when present.
    pub fn data_rows(&self) -> &[CanonicalRow] {
        if self.has_total_row && !self.rows.is_empty() {
            &self.rows[..self.rows.len() - 1]
        } else {
            &self.rows
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_row_serializes_with_contract_names() {
        let row = CanonicalRow {
            sales_date: "2025-02-01".to_string(),
            item_id: "1".to_string(),
            item_name: "Candy Bar".to_string(),
            sold_qty: 3,
            total_discount_value: 0.0,
            total_sales_excl_tax: 4.5,
            total_sales_incl_tax: 4.5,
            order_id: String::new(),
            sales_type_code: String::new(),
        };
        let value = serde_json::to_value(&row).expect("serialize canonical row");
        assert_eq!(
            value.get("Sales Date *").and_then(|v| v.as_str()),
            Some("2025-02-01")
        );
        assert_eq!(value.get("Sold Qty *").and_then(|v| v.as_i64()), Some(3));
        assert_eq!(
            value.get("Total Sales Incl. Tax *").and_then(|v| v.as_f64()),
            Some(4.5)
        );
    }

    #[test]
    fn data_rows_excludes_trailing_total_row() {
        let row = CanonicalRow {
            sales_date: "Total".to_string(),
            item_id: String::new(),
            item_name: String::new(),
            sold_qty: 3,
            total_discount_value: 0.0,
            total_sales_excl_tax: 4.5,
            total_sales_incl_tax: 4.5,
            order_id: String::new(),
            sales_type_code: String::new(),
        };
        let batch = BatchResult {
            rows: vec![row.clone(), row],
            has_total_row: true,
        };
        assert_eq!(batch.data_rows().len(), 1);
    }
}
