use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use slipscan_core::Money;

/// The five fields every extraction reports a confidence for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    VendorName,
    Date,
    TotalAmount,
    TaxAmount,
    LineItems,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::VendorName,
        Field::Date,
        Field::TotalAmount,
        Field::TaxAmount,
        Field::LineItems,
    ];
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::VendorName => write!(f, "vendor_name"),
            Field::Date => write!(f, "date"),
            Field::TotalAmount => write!(f, "total_amount"),
            Field::TaxAmount => write!(f, "tax_amount"),
            Field::LineItems => write!(f, "line_items"),
        }
    }
}

/// Per-field confidence (0.0–1.0). Serializes as an object with exactly the five field keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScores {
    pub vendor_name: f32,
    pub date: f32,
    pub total_amount: f32,
    pub tax_amount: f32,
    pub line_items: f32,
}

impl ConfidenceScores {
    pub fn get(&self, field: Field) -> f32 {
        match field {
            Field::VendorName => self.vendor_name,
            Field::Date => self.date,
            Field::TotalAmount => self.total_amount,
            Field::TaxAmount => self.tax_amount,
            Field::LineItems => self.line_items,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, f32)> + '_ {
        Field::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub quantity: Option<Decimal>,
    /// Never populated by the heuristic; kept so the output shape is stable.
    pub unit_price: Option<Money>,
    pub amount: Money,
}

/// Structured fields pulled from one document's OCR text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub vendor_name: String,
    pub date: NaiveDate,
    pub total_amount: Money,
    pub tax_amount: Option<Money>,
    pub line_items: Vec<LineItem>,
    pub confidence_scores: ConfidenceScores,
}
