//! `folio-core` — value types shared by the document engine.
//!
//! This crate contains **pure** primitives (no I/O, no rendering).

pub mod error;
pub mod money;
pub mod value_object;

pub use error::{DocumentError, DocumentResult, PercentageField};
pub use money::{MONEY_SCALE, Money};
pub use value_object::{ValueObject, assert_value_object};
