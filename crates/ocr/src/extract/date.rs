use chrono::NaiveDate;
use regex::{Captures, Regex};

use super::patterns::{re_date_month_name, re_date_numeric, re_date_year_first};

/// A date match: the raw text that matched and its canonical form, if it normalized.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DateMatch {
    pub raw: String,
    pub date: Option<NaiveDate>,
}

struct DateRule {
    name: &'static str,
    pattern: fn() -> &'static Regex,
    normalize: fn(&Captures<'_>) -> Option<NaiveDate>,
}

/// Tried in order against each line; the first hit ends the scan.
const DATE_RULES: [DateRule; 3] = [
    DateRule { name: "numeric", pattern: re_date_numeric, normalize: normalize_numeric },
    DateRule { name: "year_first", pattern: re_date_year_first, normalize: normalize_numeric },
    DateRule { name: "month_name", pattern: re_date_month_name, normalize: normalize_month_name },
];

pub(crate) fn detect_date(lines: &[&str]) -> Option<DateMatch> {
    lines.iter().find_map(|line| {
        DATE_RULES.iter().find_map(|rule| {
            let caps = (rule.pattern)().captures(line)?;
            let raw = line[caps.get(1)?.start()..caps.get(3)?.end()].to_string();
            let date = (rule.normalize)(&caps);
            tracing::trace!(rule = rule.name, %raw, ?date, "date rule matched");
            Some(DateMatch { raw, date })
        })
    })
}

/// `YYYY-M-D` stays as is, `M-D-YYYY` is read US-style, and a two-digit year pivots at 50.
///
/// Out-of-range parts (`13/45/2024`) yield `None` rather than a reordered string
/// such as `2024-13-45`; the caller then substitutes today's date while the field
/// still counts as found.
fn normalize_numeric(caps: &Captures<'_>) -> Option<NaiveDate> {
    let parts = [caps.get(1)?.as_str(), caps.get(2)?.as_str(), caps.get(3)?.as_str()];
    let (year, month, day) = if parts[0].len() == 4 {
        (parts[0].parse().ok()?, parts[1], parts[2])
    } else if parts[2].len() == 4 {
        (parts[2].parse().ok()?, parts[0], parts[1])
    } else {
        (expand_year(parts[2].parse().ok()?), parts[0], parts[1])
    };
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

fn normalize_month_name(caps: &Captures<'_>) -> Option<NaiveDate> {
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month = abbr_month_to_num(caps.get(2)?.as_str())?;
    let year_str = caps.get(3)?.as_str();
    let year = match year_str.len() {
        4 => year_str.parse().ok()?,
        2 => expand_year(year_str.parse().ok()?),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn expand_year(yy: i32) -> i32 {
    if yy < 50 { 2000 + yy } else { 1900 + yy }
}

fn abbr_month_to_num(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "jan" => Some(1), "feb" => Some(2), "mar" => Some(3), "apr" => Some(4),
        "may" => Some(5), "jun" => Some(6), "jul" => Some(7), "aug" => Some(8),
        "sep" => Some(9), "oct" => Some(10), "nov" => Some(11), "dec" => Some(12),
        _ => None,
    }
}
