use super::patterns::contains_any;

/// Only the top of the document is considered for the vendor name.
const VENDOR_SCAN_LINES: usize = 10;

/// Header words that mark a line as document chrome rather than a business name.
const HEADER_NOISE: &[&str] = &["invoice", "receipt", "bill", "tax", "total"];

/// First plausible vendor line, falling back to the first line of the document.
pub(crate) fn detect_vendor<'a>(lines: &[&'a str]) -> Option<&'a str> {
    lines
        .iter()
        .take(VENDOR_SCAN_LINES)
        .copied()
        .find(|line| is_vendor_candidate(line))
        .or_else(|| lines.first().copied())
}

fn is_vendor_candidate(line: &str) -> bool {
    line.chars().count() > 3
        && !is_amount_like(line)
        && !contains_any(&line.to_lowercase(), HEADER_NOISE)
}

/// Digits only once `.`, `,` and `$` are removed.
fn is_amount_like(line: &str) -> bool {
    let mut digits = line.chars().filter(|c| !matches!(c, '.' | ',' | '$')).peekable();
    digits.peek().is_some() && digits.all(|c| c.is_ascii_digit())
}
