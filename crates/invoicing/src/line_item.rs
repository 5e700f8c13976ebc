use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_core::{DocumentError, DocumentResult, Money, PercentageField, ValueObject};

/// Kind of document being laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Quote,
    Invoice,
}

/// Block painted under the totals box on the final page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingSection {
    /// Acceptance and signature areas for the client and the issuer.
    Signature,
    /// Payment terms text.
    PaymentTerms,
}

impl DocumentKind {
    /// Quotes close with signature areas, invoices with payment terms.
    pub fn trailing_section(&self) -> TrailingSection {
        match self {
            DocumentKind::Quote => TrailingSection::Signature,
            DocumentKind::Invoice => TrailingSection::PaymentTerms,
        }
    }
}

impl core::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DocumentKind::Quote => f.write_str("quote"),
            DocumentKind::Invoice => f.write_str("invoice"),
        }
    }
}

/// One priced row of a quote or invoice.
///
/// Amounts derived from a line are returned at full precision; rounding is
/// left to the totals report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Ordering key within the document.
    pub position: i64,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Money,
    /// Discount in percent, `[0, 100]`.
    #[serde(default)]
    pub discount_percent: Decimal,
    /// Tax rate in percent, `[0, 100]`.
    #[serde(default)]
    pub tax_rate_percent: Decimal,
    /// Measured row height in points; `None` means a single-line row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_height: Option<f64>,
}

impl LineItem {
    pub fn new(
        position: i64,
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Money,
    ) -> Self {
        Self {
            position,
            description: description.into(),
            quantity,
            unit_price,
            discount_percent: Decimal::ZERO,
            tax_rate_percent: Decimal::ZERO,
            row_height: None,
        }
    }

    pub fn with_discount(mut self, percent: Decimal) -> Self {
        self.discount_percent = percent;
        self
    }

    pub fn with_tax_rate(mut self, percent: Decimal) -> Self {
        self.tax_rate_percent = percent;
        self
    }

    pub fn with_row_height(mut self, height: f64) -> Self {
        self.row_height = Some(height);
        self
    }

    /// `quantity * unit_price * (1 - discount / 100)`.
    pub fn net_amount(&self) -> Money {
        let gross = self.unit_price.times(self.quantity);
        gross - gross.percent(self.discount_percent)
    }

    /// `quantity * unit_price * discount / 100`.
    pub fn discount_amount(&self) -> Money {
        self.unit_price.times(self.quantity).percent(self.discount_percent)
    }

    /// Every derived amount of the line, or `AmountOverflow` if one of them
    /// leaves the `Decimal` range.
    pub fn checked_amounts(&self) -> DocumentResult<LineAmounts> {
        let overflow = || DocumentError::amount_overflow(Some(self.position));
        let undiscounted = self.unit_price.checked_times(self.quantity).ok_or_else(overflow)?;
        let discount = undiscounted
            .checked_percent(self.discount_percent)
            .ok_or_else(overflow)?;
        let net = undiscounted.checked_sub(discount).ok_or_else(overflow)?;
        let tax = net.checked_percent(self.tax_rate_percent).ok_or_else(overflow)?;
        Ok(LineAmounts {
            undiscounted,
            discount,
            net,
            tax,
        })
    }

    /// `net_amount * tax_rate / 100`.
    pub fn tax_amount(&self) -> Money {
        self.net_amount().percent(self.tax_rate_percent)
    }

    /// Net amount plus tax.
    pub fn gross_amount(&self) -> Money {
        let net = self.net_amount();
        net + net.percent(self.tax_rate_percent)
    }

    /// Reject discounts and tax rates outside `[0, 100]`.
    ///
    /// Negative quantities and prices are accepted and summed as-is.
    pub fn validate(&self) -> DocumentResult<()> {
        check_percentage(PercentageField::Discount, self.discount_percent, self.position)?;
        check_percentage(PercentageField::TaxRate, self.tax_rate_percent, self.position)?;
        Ok(())
    }
}

impl ValueObject for LineItem {}

/// Unrounded amounts of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    /// `quantity * unit_price`, before discount.
    pub undiscounted: Money,
    pub discount: Money,
    pub net: Money,
    pub tax: Money,
}

fn check_percentage(field: PercentageField, value: Decimal, position: i64) -> DocumentResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(DocumentError::invalid_percentage(field, value, position));
    }
    Ok(())
}
