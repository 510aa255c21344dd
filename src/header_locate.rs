/// Keywords that identify a header row in this report family. Matching is
/// case-insensitive substring against each cell.
pub const HEADER_KEYWORDS: [&str; 12] = [
    "sr no",
    "sr. no",
    "items",
    "beginning",
    "receival",
    "sold",
    "write-off",
    "end count",
    "variance",
    "unit price",
    "total amount",
    "expiry date",
];

/// Rows examined before giving up on header detection.
pub const HEADER_SCAN_LIMIT: usize = 15;

/// Keyword matches a row needs to qualify as the header.
pub const HEADER_MATCH_THRESHOLD: usize = 2;

/// One scanned row with the keywords it matched, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCandidate {
    pub row_index: usize,
    pub matched: Vec<&'static str>,
}

fn row_matches_keyword(row: &[String], keyword: &str) -> bool {
    row.iter()
        .any(|cell| cell.to_lowercase().contains(keyword))
}

/// Scores every row within the scan window. Exposed separately from
/// `locate_header` so the scoring heuristic is testable on its own.
pub fn header_candidates(rows: &[Vec<String>]) -> Vec<HeaderCandidate> {
    rows.iter()
        .take(HEADER_SCAN_LIMIT)
        .enumerate()
        .map(|(row_index, row)| {
            let matched = HEADER_KEYWORDS
                .iter()
                .filter(|keyword| row_matches_keyword(row, keyword))
                .copied()
                .collect();
            HeaderCandidate { row_index, matched }
        })
        .collect()
}

/// Index of the first row matching at least `HEADER_MATCH_THRESHOLD`
/// keywords. Falls back to row 0 when nothing qualifies; treating the first
/// row as the header is deliberate permissiveness, not a failure.
pub fn locate_header(rows: &[Vec<String>]) -> usize {
    header_candidates(rows)
        .into_iter()
        .find(|candidate| candidate.matched.len() >= HEADER_MATCH_THRESHOLD)
        .map(|candidate| candidate.row_index)
        .unwrap_or(0)
}
