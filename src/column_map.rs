//! Column reconciliation: which raw column plays which canonical role.
//!
//! Each role has its own ranked-candidate function so the heuristics are
//! testable in isolation; `reconcile` folds them into a first-match-wins
//! mapping. A raw column satisfying one role stays eligible for the others;
//! roles never exclude each other.

/// Whether a candidate matched the role's primary keywords or only its
/// broader fallback set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Primary,
    Fallback,
}

/// One qualifying column for a role, in ranking order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCandidate {
    pub column_index: usize,
    pub header: String,
    pub tier: MatchTier,
}

/// Resolved raw-column index per canonical role; `None` means the field is
/// synthesized downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub item_id: Option<usize>,
    pub item_name: Option<usize>,
    pub sold_qty: Option<usize>,
    pub total_sales: Option<usize>,
}

fn normalize_header(header: &str) -> String {
    header.trim().to_uppercase()
}

fn contains_any(header: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| header.contains(k))
}

fn tiered_candidates(
    headers: &[String],
    primary: impl Fn(&str) -> bool,
    fallback: impl Fn(&str) -> bool,
) -> Vec<ColumnCandidate> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let mut candidates = Vec::new();
    for (column_index, header) in normalized.iter().enumerate() {
        if primary(header) {
            candidates.push(ColumnCandidate {
                column_index,
                header: headers[column_index].clone(),
                tier: MatchTier::Primary,
            });
        }
    }
    for (column_index, header) in normalized.iter().enumerate() {
        if !primary(header) && fallback(header) {
            candidates.push(ColumnCandidate {
                column_index,
                header: headers[column_index].clone(),
                tier: MatchTier::Fallback,
            });
        }
    }
    candidates
}

/// Item identifier: "SR" together with "NO" or "NUMBER". No fallback tier;
/// an absent column means the id is synthesized as a row sequence.
pub fn item_id_candidates(headers: &[String]) -> Vec<ColumnCandidate> {
    tiered_candidates(
        headers,
        |h| h.contains("SR") && (h.contains("NO") || h.contains("NUMBER")),
        |_| false,
    )
}

/// Item name: any of ITEM/ITEMS/PRODUCT/DESCRIPTION.
pub fn item_name_candidates(headers: &[String]) -> Vec<ColumnCandidate> {
    tiered_candidates(
        headers,
        |h| contains_any(h, &["ITEM", "ITEMS", "PRODUCT", "DESCRIPTION"]),
        |_| false,
    )
}

/// Sales amount: "TOTAL" paired with AMOUNT/SALES/PRICE/COST, falling back
/// to any money-looking column.
pub fn sales_amount_candidates(headers: &[String]) -> Vec<ColumnCandidate> {
    tiered_candidates(
        headers,
        |h| h.contains("TOTAL") && contains_any(h, &["AMOUNT", "SALES", "PRICE", "COST"]),
        |h| contains_any(h, &["PRICE", "AMOUNT", "COST", "TOTAL", "SALE"]),
    )
}

/// Quantity sold: SOLD/"SALE QTY"/"QTY SOLD"/QUANTITY, with a broader
/// count-looking fallback set.
pub fn quantity_candidates(headers: &[String]) -> Vec<ColumnCandidate> {
    tiered_candidates(
        headers,
        |h| contains_any(h, &["SOLD", "SALE QTY", "QTY SOLD", "QUANTITY"]),
        |h| contains_any(h, &["QTY", "QUANTITY", "SOLD", "COUNT", "SALE"]),
    )
}

fn first_index(candidates: Vec<ColumnCandidate>) -> Option<usize> {
    candidates.first().map(|c| c.column_index)
}

/// Builds the per-sheet mapping from a header row. Every role takes its
/// first qualifying column independently.
pub fn reconcile(headers: &[String]) -> ColumnMapping {
    ColumnMapping {
        item_id: first_index(item_id_candidates(headers)),
        item_name: first_index(item_name_candidates(headers)),
        sold_qty: first_index(quantity_candidates(headers)),
        total_sales: first_index(sales_amount_candidates(headers)),
    }
}
