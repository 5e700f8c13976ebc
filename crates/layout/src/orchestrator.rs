//! Document layout orchestration: aggregate first, then paginate.

use tracing::info;

use folio_core::{DocumentResult, Money};
use folio_invoicing::{AggregationOptions, DocumentKind, FinancialAggregator, LineItem};

use crate::geometry::PageGeometryPolicy;
use crate::pagination::{LayoutPlan, PaginationEngine};

/// Builds a [`LayoutPlan`] from line items.
///
/// The totals are computed before pagination because the trailing block's
/// height depends on the number of distinct tax rates; paginating first would
/// put page breaks in the wrong place whenever that count changes the block.
///
/// Holds only immutable configuration, so one orchestrator can serve
/// concurrent `build` calls for different documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentLayoutOrchestrator {
    policy: PageGeometryPolicy,
    aggregator: FinancialAggregator,
}

impl DocumentLayoutOrchestrator {
    pub fn new(policy: PageGeometryPolicy) -> Self {
        Self {
            policy,
            aggregator: FinancialAggregator::default(),
        }
    }

    pub fn with_aggregation(mut self, options: AggregationOptions) -> Self {
        self.aggregator = FinancialAggregator::new(options);
        self
    }

    pub fn policy(&self) -> &PageGeometryPolicy {
        &self.policy
    }

    pub fn build(&self, items: &[LineItem], kind: DocumentKind) -> DocumentResult<LayoutPlan> {
        lay_out(&self.policy, &self.aggregator, items, None, kind)
    }

    /// [`DocumentLayoutOrchestrator::build`] for a document that requests or
    /// records a deposit; the totals box gains an advance row.
    pub fn build_with_advance(
        &self,
        items: &[LineItem],
        advance: Money,
        kind: DocumentKind,
    ) -> DocumentResult<LayoutPlan> {
        lay_out(&self.policy, &self.aggregator, items, Some(advance), kind)
    }
}

/// Aggregate and paginate with default aggregation options.
pub fn build(
    items: &[LineItem],
    policy: &PageGeometryPolicy,
    kind: DocumentKind,
) -> DocumentResult<LayoutPlan> {
    lay_out(policy, &FinancialAggregator::default(), items, None, kind)
}

#[tracing::instrument(skip_all, fields(items = items.len(), kind = %kind))]
fn lay_out(
    policy: &PageGeometryPolicy,
    aggregator: &FinancialAggregator,
    items: &[LineItem],
    advance: Option<Money>,
    kind: DocumentKind,
) -> DocumentResult<LayoutPlan> {
    let totals = aggregator.aggregate_with_advance(items, advance)?;
    let plan = PaginationEngine::new(policy).paginate(items, &totals, kind)?;

    info!(
        pages = plan.page_count(),
        rates = plan.totals.distinct_rate_count(),
        grand_total = %plan.totals.grand_total,
        amount_due = %plan.totals.amount_due,
        "document laid out"
    );
    Ok(plan)
}
