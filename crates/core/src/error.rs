//! Error model shared by the aggregation and layout crates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the document engine.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Which percentage of a line item failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentageField {
    Discount,
    TaxRate,
}

impl core::fmt::Display for PercentageField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PercentageField::Discount => f.write_str("discount"),
            PercentageField::TaxRate => f.write_str("tax rate"),
        }
    }
}

/// Document engine error.
///
/// Every variant is a deterministic, local failure: recomputing with the same
/// input fails the same way, so callers surface these as validation errors
/// before attempting to render.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DocumentError {
    /// A discount or tax rate outside `[0, 100]` reached the aggregator.
    #[error("{field} of {value}% on line {position} is outside [0, 100]")]
    InvalidPercentage {
        field: PercentageField,
        value: Decimal,
        position: i64,
    },

    /// A single row plus the mandatory page chrome cannot fit on an empty page.
    ///
    /// `position` is `None` when the policy's default row height is at fault.
    #[error("row height {row_height}pt exceeds the {available}pt available on an empty page")]
    RowTooLargeForPage {
        position: Option<i64>,
        row_height: f64,
        available: f64,
    },

    /// A monetary product or sum left the representable range.
    ///
    /// `position` names the offending line, `None` when a document-level
    /// figure (grand total, amount due) overflowed.
    #[error("{} exceeds the representable range", overflow_site(.position))]
    AmountOverflow { position: Option<i64> },

    /// The page geometry is not usable (negative, non-finite, or no body left).
    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// A geometry policy document could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

fn overflow_site(position: &Option<i64>) -> String {
    match position {
        Some(p) => format!("amount on line {p}"),
        None => "document total".to_string(),
    }
}

impl DocumentError {
    pub fn invalid_percentage(field: PercentageField, value: Decimal, position: i64) -> Self {
        Self::InvalidPercentage {
            field,
            value,
            position,
        }
    }

    pub fn row_too_large(position: Option<i64>, row_height: f64, available: f64) -> Self {
        Self::RowTooLargeForPage {
            position,
            row_height,
            available,
        }
    }

    pub fn amount_overflow(position: Option<i64>) -> Self {
        Self::AmountOverflow { position }
    }

    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
