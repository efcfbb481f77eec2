use std::sync::OnceLock;

use regex::Regex;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        pub(crate) fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Monetary tokens. Group 1 is the numeric part.
re!(re_money_token, r"\$?\s*([0-9]{1,10}[,.][0-9]{2})");

// Dates, in the priority order the date rules apply them. The numeric forms are
// fenced by non-digits only, so `Date03/05/2024` matches but `24-03-05` inside
// `2024-03-05` does not. Group 0 may include one fence character.
re!(re_date_numeric, r"(?:^|[^0-9])([0-9]{1,2})[-/]([0-9]{1,2})[-/]([0-9]{2,4})(?:[^0-9]|$)");
re!(re_date_year_first, r"(?:^|[^0-9])([0-9]{4})[-/]([0-9]{1,2})[-/]([0-9]{1,2})(?:[^0-9]|$)");
re!(re_date_month_name,
    r"(?i)\b([0-9]{1,2})\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+([0-9]{2,4})\b");

// Line item cleanup.
re!(re_leading_qty_price, r"^\$?\s*[0-9]+\.?[0-9]*\s*[xX@]?\s*");
re!(re_trailing_qty_price, r"\s*[0-9]+\s*[xX@]\s*(?:\$?\s*[0-9]+(?:[.,][0-9]+)?)?\s*$");
re!(re_quantity, r"([0-9]+)\s*[xX@]");

/// Every monetary token on a line, in order of appearance.
pub(crate) fn money_tokens(line: &str) -> Vec<&str> {
    re_money_token()
        .captures_iter(line)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Case-insensitive substring test against a keyword list. `lower` must already be lowercase.
pub(crate) fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| lower.contains(kw))
}
