use slipscan_core::Money;

use super::items::parse_line_item;
use super::patterns::{contains_any, money_tokens};
use crate::types::LineItem;

const TOTAL_KEYWORDS: &[&str] = &["total", "amount due", "balance", "grand total", "total amount"];
const TAX_KEYWORD: &str = "tax";
const NOT_AN_ITEM: &[&str] = &["total", "tax", "subtotal", "discount", "payment", "change", "cash"];

/// Running state of the amount pass. Later lines overwrite `total` and `tax`.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    pub total: Option<Money>,
    pub tax: Option<Money>,
    pub candidates: Vec<LineItem>,
}

struct LineRule {
    name: &'static str,
    /// Receives the lowercased line.
    applies: fn(&str) -> bool,
    /// Receives the original line; returns whether anything was recorded.
    apply: fn(&str, &mut Tally) -> bool,
}

/// Every rule is evaluated against every line, in this order.
const LINE_RULES: [LineRule; 3] = [
    LineRule { name: "total", applies: is_total_line, apply: record_total },
    LineRule { name: "tax", applies: is_tax_line, apply: record_tax },
    LineRule { name: "line_item", applies: is_item_line, apply: record_item },
];

pub(crate) fn tally_lines(lines: &[&str]) -> Tally {
    let mut tally = Tally::default();
    for &line in lines {
        let lower = line.to_lowercase();
        for rule in &LINE_RULES {
            if (rule.applies)(&lower) && (rule.apply)(line, &mut tally) {
                tracing::trace!(rule = rule.name, line = %line, "amount rule matched");
            }
        }
    }
    tally
}

fn is_total_line(lower: &str) -> bool {
    contains_any(lower, TOTAL_KEYWORDS)
}

fn is_tax_line(lower: &str) -> bool {
    lower.contains(TAX_KEYWORD) && !lower.contains("total")
}

fn is_item_line(lower: &str) -> bool {
    !contains_any(lower, NOT_AN_ITEM) && lower.chars().count() > 5
}

/// The last amount on a line is usually the one that matters.
fn last_amount(line: &str) -> Option<Money> {
    money_tokens(line).last().and_then(|t| Money::parse_token(t))
}

fn record_total(line: &str, tally: &mut Tally) -> bool {
    match last_amount(line) {
        Some(amount) => {
            tally.total = Some(amount);
            true
        }
        None => false,
    }
}

fn record_tax(line: &str, tally: &mut Tally) -> bool {
    match last_amount(line) {
        Some(amount) => {
            tally.tax = Some(amount);
            true
        }
        None => false,
    }
}

fn record_item(line: &str, tally: &mut Tally) -> bool {
    match parse_line_item(line) {
        Some(item) => {
            tally.candidates.push(item);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::parse_token(s).unwrap()
    }

    #[test]
    fn last_total_line_wins() {
        let t = tally_lines(&["Subtotal  10.00", "Total  11.00"]);
        assert_eq!(t.total, Some(money("11.00")));
    }

    #[test]
    fn last_token_on_total_line() {
        let t = tally_lines(&["Total items 3   $1.50   $45.67"]);
        assert_eq!(t.total, Some(money("45.67")));
    }

    #[test]
    fn balance_and_amount_due_count_as_total() {
        assert_eq!(tally_lines(&["Balance: 7.25"]).total, Some(money("7.25")));
        assert_eq!(tally_lines(&["AMOUNT DUE $19.99"]).total, Some(money("19.99")));
    }

    #[test]
    fn comma_in_amount_is_a_grouping_mark() {
        let t = tally_lines(&["Total 5,00"]);
        assert_eq!(t.total.map(Money::as_decimal), Some(rust_decimal::Decimal::new(500, 0)));
    }

    #[test]
    fn total_keyword_without_amount_leaves_total_unset() {
        assert_eq!(tally_lines(&["Total"]).total, None);
    }

    #[test]
    fn tax_ignores_lines_with_total() {
        let t = tally_lines(&["Tax  1.00", "Total incl. tax  11.00"]);
        assert_eq!(t.tax, Some(money("1.00")));
        assert_eq!(t.total, Some(money("11.00")));
    }

    #[test]
    fn excluded_keywords_never_become_items() {
        let t = tally_lines(&[
            "Subtotal 10.00",
            "Discount 1.00",
            "Payment 9.00",
            "Cash 20.00",
            "Change 11.00",
            "Sales Tax 0.80",
        ]);
        assert!(t.candidates.is_empty());
    }

    #[test]
    fn item_lines_collected_in_order() {
        let t = tally_lines(&["Coffee beans 12.00", "Filter papers 4.50"]);
        let names: Vec<_> = t.candidates.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(names, ["Coffee beans", "Filter papers"]);
    }

    #[test]
    fn short_descriptions_are_dropped() {
        assert!(tally_lines(&["A 1.00"]).candidates.is_empty());
        assert!(tally_lines(&["Z1.00"]).candidates.is_empty());
    }
}
