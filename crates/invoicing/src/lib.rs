//! Invoicing domain: line items and financial aggregation.
//!
//! This crate turns line items into the totals printed on a quote or invoice,
//! implemented purely as deterministic domain logic (no IO, no rendering).

pub mod line_item;
pub mod totals;

pub use line_item::{DocumentKind, LineAmounts, LineItem, TrailingSection};
pub use totals::{AggregationOptions, FinancialAggregator, TaxRate, TotalsReport, aggregate};
