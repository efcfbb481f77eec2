use std::collections::HashSet;

use rust_decimal::Decimal;
use slipscan_core::Money;
use std::str::FromStr;

use super::patterns::{money_tokens, re_leading_qty_price, re_quantity, re_trailing_qty_price};
use crate::types::LineItem;

pub const MAX_LINE_ITEMS: usize = 15;
const MAX_DESCRIPTION_CHARS: usize = 100;
/// The first few items are kept even when their amount repeats.
const DUPLICATE_ALLOWANCE: usize = 3;

/// Build a line item from a line already known not to be a total/tax/payment line.
pub(crate) fn parse_line_item(line: &str) -> Option<LineItem> {
    let token = *money_tokens(line).last()?;
    let amount = Money::parse_token(token)?;
    let (prefix, _) = line.rsplit_once(token)?;
    let description = clean_description(prefix)?;

    Some(LineItem {
        description,
        quantity: parse_quantity(line),
        unit_price: None,
        amount,
    })
}

fn clean_description(prefix: &str) -> Option<String> {
    let desc = prefix.trim();
    if desc.is_empty() {
        return None;
    }
    let desc = re_leading_qty_price().replace(desc, "");
    let desc = re_trailing_qty_price().replace(&desc, "");
    let desc = desc.trim_matches(|c: char| c.is_whitespace() || matches!(c, '$' | '.' | ',' | '-'));

    if desc.chars().count() <= 2 {
        return None;
    }
    Some(desc.chars().take(MAX_DESCRIPTION_CHARS).collect())
}

/// `2 x`, `3X`, `4 @` anywhere on the line. Zero is not a quantity.
fn parse_quantity(line: &str) -> Option<Decimal> {
    let digits = re_quantity().captures(line)?.get(1)?.as_str();
    let qty = Decimal::from_str(digits).ok()?;
    (!qty.is_zero()).then_some(qty)
}

/// Drop repeated amounts once the first few items are in, then cap the list.
pub(crate) fn dedup_line_items(candidates: Vec<LineItem>) -> Vec<LineItem> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(candidates.len());
    for item in candidates {
        if !seen.contains(&item.amount) || kept.len() < DUPLICATE_ALLOWANCE {
            seen.insert(item.amount);
            kept.push(item);
        }
    }
    kept.truncate(MAX_LINE_ITEMS);
    kept
}
