//! `folio-layout` — page geometry, pagination and document layout.
//!
//! Consumes immutable line items and produces a [`LayoutPlan`]: which items go
//! on which page, where the rows start, and which page carries the trailing
//! totals block. Painting the plan is left to an external renderer.

pub mod geometry;
pub mod orchestrator;
pub mod pagination;

pub use geometry::{PageGeometryPolicy, TrailingBlockHeights};
pub use orchestrator::{DocumentLayoutOrchestrator, build};
pub use pagination::{HeaderBand, LayoutPlan, Page, PaginationEngine, paginate};
