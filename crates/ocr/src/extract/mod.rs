//! Heuristic field extraction from raw OCR text.
//!
//! Each field is found by an ordered table of line rules (see `date` and `amounts`).
//! Extraction never fails: a missing signal becomes a default value with a low
//! confidence score.

mod amounts;
mod date;
mod items;
mod patterns;
mod vendor;

use chrono::NaiveDate;

use crate::types::{ConfidenceScores, ExtractionResult};

pub use items::MAX_LINE_ITEMS;

pub const UNKNOWN_VENDOR: &str = "Unknown Vendor";

/// Values substituted when a field cannot be read from the text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionDefaults {
    pub vendor_name: String,
    /// Stands in for a missing or unreadable date.
    pub today: NaiveDate,
}

impl ExtractionDefaults {
    pub fn new(today: NaiveDate) -> Self {
        Self { vendor_name: UNKNOWN_VENDOR.to_string(), today }
    }

    /// Defaults anchored to the local calendar date.
    pub fn for_today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }
}

// ── Public extraction API ─────────────────────────────────────────────────────

pub struct Extractor;

impl Extractor {
    /// Extract structured fields from raw OCR text.
    pub fn extract(ocr_text: &str, defaults: &ExtractionDefaults) -> ExtractionResult {
        let lines: Vec<&str> = ocr_text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let vendor = vendor::detect_vendor(&lines).unwrap_or_default();
        let date = date::detect_date(&lines);
        let tally = amounts::tally_lines(&lines);
        let line_items = items::dedup_line_items(tally.candidates);
        let total = tally.total.unwrap_or_default();

        let confidence_scores = ConfidenceScores {
            vendor_name: if vendor.chars().count() > 3 { 0.8 } else { 0.3 },
            date: if date.is_some() { 0.85 } else { 0.3 },
            total_amount: if total.is_zero() { 0.3 } else { 0.9 },
            tax_amount: if tally.tax.is_some() { 0.75 } else { 0.5 },
            line_items: if line_items.is_empty() { 0.3 } else { 0.7 },
        };

        tracing::debug!(
            lines = lines.len(),
            vendor_found = !vendor.is_empty(),
            date = ?date.as_ref().map(|d| d.raw.as_str()),
            total = %total,
            items = line_items.len(),
            "extracted invoice fields"
        );
        for (field, score) in confidence_scores.iter() {
            tracing::trace!(%field, score, "field confidence");
        }

        ExtractionResult {
            vendor_name: if vendor.is_empty() { defaults.vendor_name.clone() } else { vendor.to_string() },
            date: date.and_then(|d| d.date).unwrap_or(defaults.today),
            total_amount: total,
            tax_amount: tally.tax,
            line_items,
            confidence_scores,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use slipscan_core::Money;

    fn fixed_defaults() -> ExtractionDefaults {
        ExtractionDefaults::new(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap())
    }

    fn extract(text: &str) -> ExtractionResult {
        Extractor::extract(text, &fixed_defaults())
    }

    fn money(s: &str) -> Money {
        Money::parse_token(s).unwrap()
    }

    #[test]
    fn acme_scenario() {
        let text = "ACME SUPPLIES\nItem A  2 x 5.00\nSubtotal  10.00\nTax  1.00\nTotal  11.00";
        let r = extract(text);
        assert_eq!(r.vendor_name, "ACME SUPPLIES");
        assert_eq!(r.tax_amount, Some(money("1.00")));
        assert_eq!(r.total_amount, money("11.00"));
        assert_eq!(r.line_items.len(), 1);
        let item = &r.line_items[0];
        assert_eq!(item.description, "Item A");
        assert_eq!(item.quantity, Some(Decimal::from(2)));
        assert_eq!(item.amount, money("5.00"));
        assert_eq!(item.unit_price, None);
        assert_eq!(r.confidence_scores.line_items, 0.7);
        assert_eq!(r.confidence_scores.tax_amount, 0.75);
        assert_eq!(r.confidence_scores.date, 0.3);
        assert_eq!(r.date, fixed_defaults().today);
    }

    #[test]
    fn labelled_total_is_exact() {
        let r = extract("Corner Store\nTotal: $45.67");
        assert_eq!(r.total_amount.as_decimal(), Decimal::new(4567, 2));
        assert_eq!(r.confidence_scores.total_amount, 0.9);
    }

    #[test]
    fn no_total_keyword_means_zero_total() {
        let r = extract("Corner Store\nCoffee 3.50\nBagel 2.25");
        assert!(r.total_amount.is_zero());
        assert_eq!(r.confidence_scores.total_amount, 0.3);
        assert_eq!(r.line_items.len(), 2);
    }

    #[test]
    fn dates_are_normalized() {
        assert_eq!(extract("Shop Name\n2024-03-05").date.to_string(), "2024-03-05");
        assert_eq!(extract("Shop Name\n03/05/2024").date.to_string(), "2024-03-05");
        assert_eq!(extract("Shop Name\n2024/03/05").date.to_string(), "2024-03-05");
        assert_eq!(extract("Shop Name\n2024/03/05").confidence_scores.date, 0.85);
    }

    #[test]
    fn date_glued_to_a_label_is_found() {
        let r = extract("Shop Name\nDate03/05/2024\nTotal 1.00");
        assert_eq!(r.date.to_string(), "2024-03-05");
        assert_eq!(r.confidence_scores.date, 0.85);
    }

    #[test]
    fn unreadable_date_falls_back_to_today() {
        let r = extract("Shop Name\n13/45/2024");
        assert_eq!(r.date, fixed_defaults().today);
        assert_eq!(r.confidence_scores.date, 0.85);
    }

    #[test]
    fn empty_text_yields_defaults() {
        let r = extract("");
        assert_eq!(r.vendor_name, UNKNOWN_VENDOR);
        assert_eq!(r.date, fixed_defaults().today);
        assert!(r.total_amount.is_zero());
        assert_eq!(r.tax_amount, None);
        assert!(r.line_items.is_empty());
        let scores = r.confidence_scores;
        assert_eq!(
            (scores.vendor_name, scores.date, scores.total_amount, scores.tax_amount, scores.line_items),
            (0.3, 0.3, 0.3, 0.5, 0.3)
        );
    }

    #[test]
    fn short_fallback_vendor_has_low_confidence() {
        let r = extract("Tax\nTotal 3.00");
        assert_eq!(r.vendor_name, "Tax");
        assert_eq!(r.confidence_scores.vendor_name, 0.3);
    }

    #[test]
    fn custom_sentinel_vendor() {
        let defaults = ExtractionDefaults { vendor_name: "n/a".into(), ..fixed_defaults() };
        assert_eq!(Extractor::extract("   \n\t", &defaults).vendor_name, "n/a");
    }

    #[test]
    fn line_items_never_exceed_cap() {
        let mut text = String::from("Big Warehouse\n");
        for n in 0..60 {
            text.push_str(&format!("Product number {n}  {n}.99\n"));
        }
        let r = extract(&text);
        assert_eq!(r.line_items.len(), MAX_LINE_ITEMS);
    }

    #[test]
    fn crlf_and_padding_are_tolerated() {
        let r = extract("  Blue Bottle  \r\n\r\n  Latte   4.50  \r\nTotal 4.50\r\n");
        assert_eq!(r.vendor_name, "Blue Bottle");
        assert_eq!(r.line_items[0].description, "Latte");
        assert_eq!(r.total_amount, money("4.50"));
    }

    #[test]
    fn no_panic_on_garbage_input() {
        let _ = extract("!@#$%^&*()\n\0\x01\x02\n€€€ 1,2,3,4.5.6");
    }
}
