use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Year used when a label carries only a bare month name. A fixed constant,
/// deliberately not "the current year".
pub const FALLBACK_YEAR: i32 = 2025;

/// What to do when a label yields no date at all. The report-variant family
/// this engine replaces was split between a fixed default date and a null
/// date; the choice is an explicit configuration value here.
#[derive(Debug, Clone, PartialEq)]
pub enum DateFallback {
    None,
    FixedDate(NaiveDate),
}

impl Default for DateFallback {
    fn default() -> Self {
        DateFallback::FixedDate(NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid default date"))
    }
}

/// Exact templates tried first, in priority order. chrono accepts both full
/// and abbreviated month names for `%B` and treats format whitespace as
/// flexible, so each entry covers its spacing/abbreviation variants.
const DATE_TEMPLATES: &[&str] = &[
    "%B %d, %Y",
    "%d %B %Y",
    "%d-%B-%Y",
    "%B-%d-%Y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y-%m-%d",
];

/// Sheet names that are known non-date placeholders; these produce no date
/// and no diagnostic.
const PLACEHOLDER_LABELS: &[&str] = &["sales report", "daily sales report", "summary", "data"];

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

fn sept_typo_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bsept\b").expect("invalid sept typo regex"))
}

fn febuary_typo_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bfebuary\b").expect("invalid febuary typo regex"))
}

fn month_first_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2})(?:st|nd|rd|th)?\s*,?\s*(\d{4})\b")
            .expect("invalid month-first regex")
    })
}

fn day_first_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?[\s,.-]+([a-z]{3,9})[\s,.-]+(\d{4})\b")
            .expect("invalid day-first regex")
    })
}

fn numeric_triple_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(\d{1,4})\s*[-/]\s*(\d{1,2})\s*[-/]\s*(\d{1,4})\b")
            .expect("invalid numeric triple regex")
    })
}

/// Known truncations/misspellings normalized before any parsing: "Sept" is
/// neither a full month name nor the 3-letter abbreviation, and "Febuary"
/// shows up in hand-typed sheet names.
fn normalize_month_typos(label: &str) -> String {
    let fixed = sept_typo_re().replace_all(label, "Sep");
    febuary_typo_re().replace_all(&fixed, "February").to_string()
}

/// Maps a month word (full name or any unambiguous prefix of at least 3
/// letters) to its 1-based month number.
fn month_from_token(token: &str) -> Option<u32> {
    let token = token.to_lowercase();
    if token.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.starts_with(&token))
        .map(|i| i as u32 + 1)
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// MM/DD/YYYY tried before DD/MM/YYYY; a 4-digit first group is taken as
/// year-month-day directly.
fn parse_numeric_triple(a: &str, b: &str, c: &str) -> Option<NaiveDate> {
    if a.len() == 4 {
        let year = a.parse::<i32>().ok()?;
        let month = b.parse::<u32>().ok()?;
        let day = c.parse::<u32>().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    if c.len() != 4 {
        return None;
    }
    let year = c.parse::<i32>().ok()?;
    let first = a.parse::<u32>().ok()?;
    let second = b.parse::<u32>().ok()?;
    if let Some(date) = NaiveDate::from_ymd_opt(year, first, second) {
        return Some(date);
    }
    NaiveDate::from_ymd_opt(year, second, first)
}

fn extract_by_regex(text: &str) -> Option<NaiveDate> {
    for caps in month_first_re().captures_iter(text) {
        if let Some(month) = month_from_token(&caps[1]) {
            let day = caps[2].parse::<u32>().ok()?;
            let year = caps[3].parse::<i32>().ok()?;
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
    }

    for caps in day_first_re().captures_iter(text) {
        if let Some(month) = month_from_token(&caps[2]) {
            let day = caps[1].parse::<u32>().ok()?;
            let year = caps[3].parse::<i32>().ok()?;
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
    }

    for caps in numeric_triple_re().captures_iter(text) {
        if let Some(date) = parse_numeric_triple(&caps[1], &caps[2], &caps[3]) {
            return Some(date);
        }
    }

    None
}

fn month_only_fallback(text: &str) -> Option<NaiveDate> {
    for token in text.split(|c: char| !c.is_ascii_alphabetic()) {
        if let Some(month) = month_from_token(token) {
            return NaiveDate::from_ymd_opt(FALLBACK_YEAR, month, 1);
        }
    }
    None
}

fn is_placeholder_label(text: &str) -> bool {
    let lowered = text.to_lowercase();
    PLACEHOLDER_LABELS.iter().any(|p| *p == lowered)
}

/// Outcome of date extraction for one label.
#[derive(Debug, Clone, PartialEq)]
pub enum DateExtraction {
    /// An ISO `YYYY-MM-DD` date was recognized.
    Found(String),
    /// The label is a known placeholder (or empty); no date, no diagnostic.
    Placeholder,
    /// Nothing recognizable; the configured fallback decides the date.
    Unrecognized { diagnostic: String },
}

impl DateExtraction {
    /// Resolves the extraction into a final date string, applying the
    /// configured fallback and recording the diagnostic when there is one.
    /// Placeholder labels stay dateless regardless of the fallback.
    pub fn resolve(self, fallback: &DateFallback, diagnostics: &mut Vec<String>) -> Option<String> {
        match self {
            DateExtraction::Found(date) => Some(date),
            DateExtraction::Placeholder => None,
            DateExtraction::Unrecognized { diagnostic } => {
                diagnostics.push(diagnostic);
                match fallback {
                    DateFallback::None => None,
                    DateFallback::FixedDate(date) => Some(iso(*date)),
                }
            }
        }
    }

    pub fn found(&self) -> Option<&str> {
        match self {
            DateExtraction::Found(date) => Some(date),
            _ => None,
        }
    }
}

/// Parses a human-written date out of a sheet or file name. Strict priority:
/// exact templates, regex extraction, month-only fallback, placeholder
/// suppression, then unrecognized.
pub fn extract_date_detailed(label: &str) -> DateExtraction {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return DateExtraction::Placeholder;
    }
    let text = normalize_month_typos(trimmed);

    for template in DATE_TEMPLATES {
        if let Ok(date) = NaiveDate::parse_from_str(&text, template) {
            return DateExtraction::Found(iso(date));
        }
    }

    if let Some(date) = extract_by_regex(&text) {
        return DateExtraction::Found(iso(date));
    }

    if let Some(date) = month_only_fallback(&text) {
        return DateExtraction::Found(iso(date));
    }

    if is_placeholder_label(trimmed) {
        return DateExtraction::Placeholder;
    }

    DateExtraction::Unrecognized {
        diagnostic: format!("no date recognized in label '{trimmed}'"),
    }
}

/// Convenience wrapper: the extracted ISO date, or `None` when the label
/// yields nothing (fallback handling is the caller's concern).
pub fn extract_date(label: &str) -> Option<String> {
    match extract_date_detailed(label) {
        DateExtraction::Found(date) => Some(date),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_templates_cover_supported_shapes() {
        assert_eq!(extract_date("March 1, 2025").as_deref(), Some("2025-03-01"));
        assert_eq!(extract_date("Feb 1, 2025").as_deref(), Some("2025-02-01"));
        assert_eq!(extract_date("March 1,2025").as_deref(), Some("2025-03-01"));
        assert_eq!(extract_date("1 March 2025").as_deref(), Some("2025-03-01"));
        assert_eq!(extract_date("1-Mar-2025").as_deref(), Some("2025-03-01"));
        assert_eq!(extract_date("Mar-1-2025").as_deref(), Some("2025-03-01"));
        assert_eq!(extract_date("2025-03-01").as_deref(), Some("2025-03-01"));
    }

    #[test]
    fn ambiguous_numeric_triples_prefer_month_day_year() {
        assert_eq!(extract_date("1/3/2025").as_deref(), Some("2025-01-03"));
        assert_eq!(extract_date("03/01/2025").as_deref(), Some("2025-03-01"));
    }

    #[test]
    fn day_month_order_applies_when_month_day_cannot_parse() {
        assert_eq!(extract_date("13/3/2025").as_deref(), Some("2025-03-13"));
        assert_eq!(extract_date("25-12-2025").as_deref(), Some("2025-12-25"));
    }

    #[test]
    fn embedded_dates_are_extracted_by_regex() {
        assert_eq!(
            extract_date("Sales for March 5 2025 (final)").as_deref(),
            Some("2025-03-05")
        );
        assert_eq!(
            extract_date("report 3rd March, 2025").as_deref(),
            Some("2025-03-03")
        );
        assert_eq!(
            extract_date("sheet 2025/3/9 v2").as_deref(),
            Some("2025-03-09")
        );
    }

    #[test]
    fn four_digit_leading_group_is_year_month_day() {
        assert_eq!(extract_date("2025-2-3").as_deref(), Some("2025-02-03"));
    }

    #[test]
    fn month_typos_are_normalized_before_parsing() {
        assert_eq!(extract_date("Sept 3, 2025").as_deref(), Some("2025-09-03"));
        assert_eq!(
            extract_date("Febuary 14, 2025").as_deref(),
            Some("2025-02-14")
        );
    }

    #[test]
    fn bare_month_synthesizes_first_of_month_in_fallback_year() {
        assert_eq!(extract_date("March").as_deref(), Some("2025-03-01"));
        assert_eq!(extract_date("week of august").as_deref(), Some("2025-08-01"));
    }

    #[test]
    fn placeholder_labels_yield_no_date_and_no_diagnostic() {
        for label in ["Sales Report", "daily sales report", "SUMMARY", "Data", ""] {
            assert_eq!(extract_date_detailed(label), DateExtraction::Placeholder);
        }
        let mut diags = Vec::new();
        let resolved = extract_date_detailed("Summary").resolve(&DateFallback::default(), &mut diags);
        assert_eq!(resolved, None);
        assert!(diags.is_empty());
    }

    #[test]
    fn unrecognized_labels_never_panic_and_report_a_diagnostic() {
        let extraction = extract_date_detailed("quarterly recap v3");
        match &extraction {
            DateExtraction::Unrecognized { diagnostic } => {
                assert!(diagnostic.contains("quarterly recap v3"));
            }
            other => panic!("expected unrecognized, got {other:?}"),
        }

        let mut diags = Vec::new();
        let resolved = extraction.clone().resolve(&DateFallback::default(), &mut diags);
        assert_eq!(resolved.as_deref(), Some("2025-01-01"));
        assert_eq!(diags.len(), 1);

        let mut diags = Vec::new();
        let resolved = extraction.resolve(&DateFallback::None, &mut diags);
        assert_eq!(resolved, None);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn month_token_requires_a_real_month_prefix() {
        assert_eq!(extract_date("market 1 2025"), None);
        assert_eq!(extract_date("monday standup"), None);
    }

    #[test]
    fn impossible_calendar_dates_fall_through() {
        // The day is unusable but the month token still drives the
        // month-only fallback.
        assert_eq!(
            extract_date("February 30, 2025").as_deref(),
            Some("2025-02-01")
        );
        // No month word at all: nothing to fall back to.
        assert_eq!(extract_date("45/45/2025"), None);
    }
}
