//! Page geometry policy: fixed page measurements plus the trailing block sizing.
//!
//! All distances are in PDF points (1/72 inch), measured from the top edge.

use serde::{Deserialize, Serialize};

use folio_core::{DocumentError, DocumentResult, ValueObject};
use folio_invoicing::{DocumentKind, TotalsReport};

/// Heights of the block painted once, under the last row of the last page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailingBlockHeights {
    /// Totals box without any tax line (subtotal and grand total rows, padding).
    pub base_totals_height: f64,
    /// One tax line per distinct rate.
    pub per_rate_row_height: f64,
    /// Acceptance and signature areas printed on quotes.
    pub signature_block_height: f64,
    /// Payment terms printed on invoices.
    pub payment_terms_height: f64,
}

impl Default for TrailingBlockHeights {
    fn default() -> Self {
        Self {
            base_totals_height: 110.0,
            per_rate_row_height: 25.0,
            signature_block_height: 130.0,
            payment_terms_height: 60.0,
        }
    }
}

/// Page geometry used by the pagination engine.
///
/// Pure configuration: hosts build it in code, start from a preset, or load it
/// from JSON. Missing JSON fields fall back to the A4 preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometryPolicy {
    pub page_width: f64,
    pub page_height: f64,
    pub top_margin: f64,
    pub bottom_margin: f64,
    /// Full header (issuer, client, document metadata) on the first page.
    pub header_height: f64,
    /// Reduced header on every following page.
    pub continuation_header_height: f64,
    /// Column-header band, redrawn on every page.
    pub table_header_height: f64,
    /// Footer band (page number, legal mentions), reserved on every page.
    pub footer_height: f64,
    /// Height of a single-line row.
    pub row_height: f64,
    pub trailing: TrailingBlockHeights,
}

impl Default for PageGeometryPolicy {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageGeometryPolicy {
    /// A4 portrait, 595 x 842 pt.
    pub fn a4() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            top_margin: 40.0,
            bottom_margin: 40.0,
            header_height: 230.0,
            continuation_header_height: 50.0,
            table_header_height: 30.0,
            footer_height: 30.0,
            row_height: 22.0,
            trailing: TrailingBlockHeights::default(),
        }
    }

    /// US Letter portrait, 612 x 792 pt.
    pub fn us_letter() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            top_margin: 36.0,
            bottom_margin: 36.0,
            ..Self::a4()
        }
    }

    /// Parse a policy from JSON; absent fields keep their A4 value.
    pub fn from_json_str(json: &str) -> DocumentResult<Self> {
        let policy: Self =
            serde_json::from_str(json).map_err(|e| DocumentError::config(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn with_page_size(mut self, width: f64, height: f64) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    pub fn with_margins(mut self, top: f64, bottom: f64) -> Self {
        self.top_margin = top;
        self.bottom_margin = bottom;
        self
    }

    pub fn with_headers(mut self, first_page: f64, continuation: f64) -> Self {
        self.header_height = first_page;
        self.continuation_header_height = continuation;
        self
    }

    pub fn with_table_header_height(mut self, height: f64) -> Self {
        self.table_header_height = height;
        self
    }

    pub fn with_footer_height(mut self, height: f64) -> Self {
        self.footer_height = height;
        self
    }

    pub fn with_row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self
    }

    pub fn with_trailing(mut self, trailing: TrailingBlockHeights) -> Self {
        self.trailing = trailing;
        self
    }

    /// Height to keep free under the last row.
    ///
    /// Intermediate pages reserve nothing. On the final page the totals box
    /// grows by one line per distinct tax rate, and quotes add the signature
    /// block where invoices add the payment terms.
    pub fn reserved_trailing_height(
        &self,
        kind: DocumentKind,
        distinct_rate_count: usize,
        is_final_page: bool,
    ) -> f64 {
        if !is_final_page {
            return 0.0;
        }
        let t = &self.trailing;
        let totals_box = t.base_totals_height + distinct_rate_count as f64 * t.per_rate_row_height;
        match kind {
            DocumentKind::Quote => totals_box + t.signature_block_height,
            DocumentKind::Invoice => totals_box + t.payment_terms_height,
        }
    }

    /// Trailing block reserved for a given report: the per-rate lines plus one
    /// more row for the advance when the report carries one.
    pub fn trailing_height_for(&self, kind: DocumentKind, totals: &TotalsReport) -> f64 {
        let base = self.reserved_trailing_height(kind, totals.distinct_rate_count(), true);
        if totals.has_advance() {
            base + self.trailing.per_rate_row_height
        } else {
            base
        }
    }

    /// Page header band height for the first page or a continuation page.
    pub fn header_height_for(&self, first_page: bool) -> f64 {
        if first_page {
            self.header_height
        } else {
            self.continuation_header_height
        }
    }

    /// Cursor position where the first row of a page goes.
    pub fn body_top(&self, first_page: bool) -> f64 {
        self.top_margin + self.header_height_for(first_page) + self.table_header_height
    }

    /// Lowest cursor position a row or the trailing block may reach.
    pub fn body_bottom(&self) -> f64 {
        self.page_height - self.bottom_margin - self.footer_height
    }

    /// Room for rows on an otherwise empty page.
    pub fn body_capacity(&self, first_page: bool) -> f64 {
        self.body_bottom() - self.body_top(first_page)
    }

    /// Check that the numbers describe a usable page.
    pub fn validate(&self) -> DocumentResult<()> {
        let fields = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("top_margin", self.top_margin),
            ("bottom_margin", self.bottom_margin),
            ("header_height", self.header_height),
            ("continuation_header_height", self.continuation_header_height),
            ("table_header_height", self.table_header_height),
            ("footer_height", self.footer_height),
            ("row_height", self.row_height),
            ("trailing.base_totals_height", self.trailing.base_totals_height),
            ("trailing.per_rate_row_height", self.trailing.per_rate_row_height),
            ("trailing.signature_block_height", self.trailing.signature_block_height),
            ("trailing.payment_terms_height", self.trailing.payment_terms_height),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(DocumentError::invalid_geometry(format!(
                    "{name} must be a finite, non-negative number, got {value}"
                )));
            }
        }

        if self.row_height <= 0.0 {
            return Err(DocumentError::invalid_geometry("row_height must be positive"));
        }

        let tightest = self.body_capacity(true).min(self.body_capacity(false));
        if tightest <= 0.0 {
            return Err(DocumentError::invalid_geometry(format!(
                "margins and page chrome leave no body on a {}pt page",
                self.page_height
            )));
        }
        if self.row_height > tightest {
            return Err(DocumentError::row_too_large(None, self.row_height, tightest));
        }
        Ok(())
    }
}

impl ValueObject for PageGeometryPolicy {}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_page(height: f64) -> PageGeometryPolicy {
        PageGeometryPolicy::a4()
            .with_page_size(595.0, height)
            .with_margins(0.0, 0.0)
            .with_headers(0.0, 0.0)
            .with_table_header_height(0.0)
            .with_footer_height(0.0)
    }

    #[test]
    fn intermediate_pages_reserve_nothing() {
        let policy = PageGeometryPolicy::a4();
        assert_eq!(policy.reserved_trailing_height(DocumentKind::Quote, 3, false), 0.0);
        assert_eq!(policy.reserved_trailing_height(DocumentKind::Invoice, 3, false), 0.0);
    }

    #[test]
    fn totals_box_grows_with_each_rate() {
        let policy = PageGeometryPolicy::a4();
        let one = policy.reserved_trailing_height(DocumentKind::Invoice, 1, true);
        let three = policy.reserved_trailing_height(DocumentKind::Invoice, 3, true);
        assert_eq!(three - one, 2.0 * policy.trailing.per_rate_row_height);
        assert_eq!(one, 110.0 + 25.0 + 60.0);
    }

    #[test]
    fn quotes_reserve_more_than_invoices() {
        let policy = PageGeometryPolicy::a4();
        let quote = policy.reserved_trailing_height(DocumentKind::Quote, 2, true);
        let invoice = policy.reserved_trailing_height(DocumentKind::Invoice, 2, true);
        assert_eq!(
            quote - invoice,
            policy.trailing.signature_block_height - policy.trailing.payment_terms_height
        );
        assert!(quote > invoice);
    }

    #[test]
    fn advance_adds_one_row_to_the_totals_box() {
        use folio_core::Money;
        use folio_invoicing::{FinancialAggregator, LineItem};
        use rust_decimal_macros::dec;

        let policy = PageGeometryPolicy::a4();
        let items = vec![
            LineItem::new(1, "Dalle", dec!(2), Money::new(dec!(80))).with_tax_rate(dec!(10)),
            LineItem::new(2, "Pose", dec!(1), Money::new(dec!(120))).with_tax_rate(dec!(20)),
        ];
        let aggregator = FinancialAggregator::default();
        let plain = aggregator.aggregate(&items).unwrap();
        let with_advance = aggregator
            .aggregate_with_advance(&items, Some(Money::new(dec!(100))))
            .unwrap();

        let without = policy.trailing_height_for(DocumentKind::Quote, &plain);
        assert_eq!(without, policy.reserved_trailing_height(DocumentKind::Quote, 2, true));
        assert_eq!(
            policy.trailing_height_for(DocumentKind::Quote, &with_advance) - without,
            policy.trailing.per_rate_row_height
        );
    }

    #[test]
    fn body_measurements_follow_the_chrome() {
        let policy = PageGeometryPolicy::a4();
        assert_eq!(policy.body_top(true), 40.0 + 230.0 + 30.0);
        assert_eq!(policy.body_top(false), 40.0 + 50.0 + 30.0);
        assert_eq!(policy.body_bottom(), 842.0 - 40.0 - 30.0);
        assert_eq!(policy.body_capacity(true), 472.0);
        assert_eq!(policy.body_capacity(false), 652.0);
    }

    #[test]
    fn presets_are_valid() {
        assert!(PageGeometryPolicy::a4().validate().is_ok());
        assert!(PageGeometryPolicy::us_letter().validate().is_ok());
        assert_eq!(PageGeometryPolicy::default(), PageGeometryPolicy::a4());
    }

    #[test]
    fn negative_or_nan_measurements_are_rejected() {
        let err = PageGeometryPolicy::a4().with_margins(-1.0, 40.0).validate().unwrap_err();
        assert!(matches!(err, DocumentError::InvalidGeometry(msg) if msg.contains("top_margin")));

        let err = PageGeometryPolicy::a4().with_footer_height(f64::NAN).validate().unwrap_err();
        assert!(matches!(err, DocumentError::InvalidGeometry(msg) if msg.contains("footer_height")));
    }

    #[test]
    fn zero_row_height_is_rejected() {
        let err = PageGeometryPolicy::a4().with_row_height(0.0).validate().unwrap_err();
        assert_eq!(err, DocumentError::invalid_geometry("row_height must be positive"));
    }

    #[test]
    fn chrome_taller_than_page_is_rejected() {
        let err = bare_page(100.0).with_headers(120.0, 0.0).validate().unwrap_err();
        assert!(matches!(err, DocumentError::InvalidGeometry(_)));
    }

    #[test]
    fn default_row_taller_than_body_is_row_too_large() {
        let err = bare_page(500.0).with_row_height(501.0).validate().unwrap_err();
        assert_eq!(err, DocumentError::row_too_large(None, 501.0, 500.0));
    }

    #[test]
    fn json_overrides_only_named_fields() {
        let policy = PageGeometryPolicy::from_json_str(
            r#"{ "row_height": 18.0, "trailing": { "signature_block_height": 150.0 } }"#,
        )
        .unwrap();
        assert_eq!(policy.row_height, 18.0);
        assert_eq!(policy.trailing.signature_block_height, 150.0);
        assert_eq!(policy.trailing.payment_terms_height, 60.0);
        assert_eq!(policy.page_height, 842.0);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = PageGeometryPolicy::from_json_str("{ row_height: }").unwrap_err();
        assert!(matches!(err, DocumentError::Config(_)));
    }

    #[test]
    fn json_with_unusable_numbers_fails_validation() {
        let err = PageGeometryPolicy::from_json_str(r#"{ "row_height": -4 }"#).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidGeometry(_)));
    }
}
