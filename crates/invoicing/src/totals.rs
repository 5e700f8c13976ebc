//! Financial aggregation: line items to subtotal, per-rate tax and grand total.

use std::collections::BTreeMap;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use folio_core::{DocumentError, DocumentResult, Money, ValueObject};

use crate::line_item::LineItem;

/// Tax rate in percent, normalised so equal rates share one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Round `percent` to `precision` decimals and drop trailing zeros, so that
    /// `20`, `20.0` and `20.00` become the same key.
    pub fn normalized(percent: Decimal, precision: u32) -> Self {
        Self(
            percent
                .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
                .normalize(),
        )
    }

    pub fn percent(&self) -> Decimal {
        self.0
    }
}

impl ValueObject for TaxRate {}

impl core::fmt::Display for TaxRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Aggregation knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationOptions {
    /// Decimals kept on a tax rate before bucketing.
    pub rate_precision: u32,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self { rate_precision: 2 }
    }
}

/// Reported totals of a document, rounded to two decimals.
///
/// `grand_total == subtotal + sum(by_rate)` and
/// `amount_due == grand_total - advance` hold exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsReport {
    /// Net amount after line discounts.
    pub subtotal: Money,
    /// Sum of every line discount.
    #[serde(default)]
    pub discount_total: Money,
    /// Tax amount per distinct rate, ascending by rate.
    pub by_rate: BTreeMap<TaxRate, Money>,
    /// Taxable net base per distinct rate, ascending by rate.
    pub base_by_rate: BTreeMap<TaxRate, Money>,
    pub grand_total: Money,
    /// Deposit requested or already received; only positive amounts are kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advance: Option<Money>,
    /// Grand total minus the advance.
    #[serde(default)]
    pub amount_due: Money,
}

impl TotalsReport {
    /// Sum of `quantity * unit_price` before discounts, as printed above the
    /// discount line.
    pub fn undiscounted_subtotal(&self) -> Money {
        self.subtotal + self.discount_total
    }

    /// Whether the totals box carries an advance row.
    pub fn has_advance(&self) -> bool {
        self.advance.is_some()
    }

    pub fn tax_total(&self) -> Money {
        self.by_rate.values().sum()
    }

    /// Number of tax lines the totals box will print.
    pub fn distinct_rate_count(&self) -> usize {
        self.by_rate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_rate.is_empty() && self.subtotal.is_zero()
    }
}

impl ValueObject for TotalsReport {}

#[derive(Debug, Default)]
struct Bucket {
    base: Money,
    tax: Money,
}

fn accumulate(total: &mut Money, amount: Money, position: i64) -> DocumentResult<()> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| DocumentError::amount_overflow(Some(position)))?;
    Ok(())
}

/// Turns an ordered list of line items into a [`TotalsReport`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FinancialAggregator {
    options: AggregationOptions,
}

impl FinancialAggregator {
    pub fn new(options: AggregationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> AggregationOptions {
        self.options
    }

    /// Sum every line at full precision, then round each reported figure once.
    ///
    /// Fails with `InvalidPercentage` on the first line whose discount or tax
    /// rate lies outside `[0, 100]`, and with `AmountOverflow` when a product
    /// or sum leaves the `Decimal` range. An empty list yields an all-zero
    /// report.
    pub fn aggregate(&self, items: &[LineItem]) -> DocumentResult<TotalsReport> {
        self.aggregate_with_advance(items, None)
    }

    /// [`FinancialAggregator::aggregate`], then subtract a deposit from the
    /// grand total.
    ///
    /// A zero or negative advance is treated as no advance at all.
    #[tracing::instrument(level = "debug", skip_all, fields(items = items.len()))]
    pub fn aggregate_with_advance(
        &self,
        items: &[LineItem],
        advance: Option<Money>,
    ) -> DocumentResult<TotalsReport> {
        let mut subtotal = Money::ZERO;
        let mut discount_total = Money::ZERO;
        let mut buckets: BTreeMap<TaxRate, Bucket> = BTreeMap::new();

        for item in items {
            item.validate()?;
            let amounts = item.checked_amounts()?;

            accumulate(&mut subtotal, amounts.net, item.position)?;
            accumulate(&mut discount_total, amounts.discount, item.position)?;

            let rate = TaxRate::normalized(item.tax_rate_percent, self.options.rate_precision);
            let bucket = buckets.entry(rate).or_default();
            accumulate(&mut bucket.base, amounts.net, item.position)?;
            accumulate(&mut bucket.tax, amounts.tax, item.position)?;
        }

        let overflow = || DocumentError::amount_overflow(None);
        let subtotal = subtotal.rounded();
        let discount_total = discount_total.rounded();
        let mut by_rate = BTreeMap::new();
        let mut base_by_rate = BTreeMap::new();
        let mut grand_total = subtotal;
        for (rate, bucket) in buckets {
            let tax = bucket.tax.rounded();
            grand_total = grand_total.checked_add(tax).ok_or_else(overflow)?;
            by_rate.insert(rate, tax);
            base_by_rate.insert(rate, bucket.base.rounded());
        }

        let advance = advance
            .map(|amount| amount.rounded())
            .filter(|amount| !amount.is_zero() && !amount.is_negative());
        let amount_due = match advance {
            Some(amount) => grand_total.checked_sub(amount).ok_or_else(overflow)?,
            None => grand_total,
        };

        debug!(
            rates = by_rate.len(),
            subtotal = %subtotal,
            grand_total = %grand_total,
            amount_due = %amount_due,
            "aggregated line items"
        );

        Ok(TotalsReport {
            subtotal,
            discount_total,
            by_rate,
            base_by_rate,
            grand_total,
            advance,
            amount_due,
        })
    }
}

/// Aggregate with default options.
pub fn aggregate(items: &[LineItem]) -> DocumentResult<TotalsReport> {
    FinancialAggregator::default().aggregate(items)
}
