//! Pagination: assign line items to fixed-size pages.
//!
//! The engine is a sequential scan over the items in `position` order with a
//! carried cursor. It cannot be split across items because every page break
//! depends on where the previous page ended.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use folio_core::{DocumentError, DocumentResult, ValueObject};
use folio_invoicing::{DocumentKind, LineItem, TotalsReport, TrailingSection};

use crate::geometry::PageGeometryPolicy;

/// Which header band a page carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderBand {
    /// Issuer, client and document metadata.
    Full,
    /// Document number and page reference only.
    Continuation,
}

/// One page of a [`LayoutPlan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    /// Indices into the caller's item slice, in placement order.
    pub items: Vec<usize>,
    pub is_first_page: bool,
    pub is_last_page: bool,
    pub header: HeaderBand,
    /// Cursor where the first row is painted (below header and column band).
    pub y_cursor_start: f64,
    /// Cursor after the last row; the trailing block starts here on the last page.
    pub y_cursor_end: f64,
    /// Set when the trailing block could not fit even with a single row on the
    /// page; the renderer will paint it past the body bottom.
    ///
    /// The final row is still carried onto its own page before the flag is
    /// raised, so a trailing block taller than every page body costs one extra
    /// page holding a single row.
    pub trailing_overflow: bool,
}

impl Page {
    pub fn shows_trailing_block(&self) -> bool {
        self.is_last_page
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Assignment of line items to pages, ready for a renderer to paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub kind: DocumentKind,
    pub pages: Vec<Page>,
    /// Totals painted in the trailing block of the last page.
    pub totals: TotalsReport,
    /// Height reserved for the trailing block on the last page.
    pub trailing_block_height: f64,
}

impl LayoutPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn last_page(&self) -> Option<&Page> {
        self.pages.last()
    }

    pub fn trailing_section(&self) -> TrailingSection {
        self.kind.trailing_section()
    }

    /// Page number carrying the item at `index` in the input slice.
    pub fn page_of_item(&self, index: usize) -> Option<usize> {
        self.pages
            .iter()
            .find(|page| page.items.contains(&index))
            .map(|page| page.number)
    }

    /// Every placed index, page after page.
    pub fn placed_items(&self) -> impl Iterator<Item = usize> + '_ {
        self.pages.iter().flat_map(|page| page.items.iter().copied())
    }

    pub fn to_json(&self) -> DocumentResult<String> {
        serde_json::to_string(self).map_err(|e| DocumentError::config(e.to_string()))
    }
}

impl ValueObject for LayoutPlan {}

/// Cursor states of the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    StartingPage,
    PlacingRow,
    PageFull,
    Done,
}

/// Page currently being filled.
#[derive(Debug)]
struct OpenPage {
    number: usize,
    header: HeaderBand,
    start: f64,
    cursor: f64,
    items: Vec<usize>,
    trailing_overflow: bool,
}

impl OpenPage {
    fn new(number: usize, policy: &PageGeometryPolicy) -> Self {
        let first = number == 1;
        let start = policy.body_top(first);
        Self {
            number,
            header: if first {
                HeaderBand::Full
            } else {
                HeaderBand::Continuation
            },
            start,
            cursor: start,
            items: Vec::new(),
            trailing_overflow: false,
        }
    }

    fn place(&mut self, index: usize, row_height: f64) {
        self.items.push(index);
        self.cursor += row_height;
    }

    fn finish(&mut self, is_last_page: bool) -> Page {
        Page {
            number: self.number,
            items: std::mem::take(&mut self.items),
            is_first_page: self.number == 1,
            is_last_page,
            header: self.header,
            y_cursor_start: self.start,
            y_cursor_end: self.cursor,
            trailing_overflow: self.trailing_overflow,
        }
    }
}

/// Fills pages from a [`PageGeometryPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct PaginationEngine<'a> {
    policy: &'a PageGeometryPolicy,
}

impl<'a> PaginationEngine<'a> {
    pub fn new(policy: &'a PageGeometryPolicy) -> Self {
        Self { policy }
    }

    /// Lay `items` out on pages.
    ///
    /// `totals` must come from aggregating the same items: its distinct rate
    /// count and advance row size the trailing block that has to fit under the
    /// last row.
    /// Every page holds at least one item unless `items` is empty, in which
    /// case a single page carries only the trailing block.
    #[tracing::instrument(level = "debug", skip_all, fields(items = items.len(), kind = %kind))]
    pub fn paginate(
        &self,
        items: &[LineItem],
        totals: &TotalsReport,
        kind: DocumentKind,
    ) -> DocumentResult<LayoutPlan> {
        let policy = self.policy;
        policy.validate()?;

        let order = placement_order(items);
        let row_heights = order
            .iter()
            .map(|&index| row_height_of(&items[index], policy))
            .collect::<DocumentResult<Vec<f64>>>()?;

        let trailing = policy.trailing_height_for(kind, totals);
        let bottom = policy.body_bottom();

        let mut pages: Vec<Page> = Vec::new();
        let mut page = OpenPage::new(1, policy);
        let mut next = 0usize;
        let mut state = CursorState::PlacingRow;

        loop {
            state = match state {
                CursorState::StartingPage => {
                    page = OpenPage::new(pages.len() + 1, policy);
                    CursorState::PlacingRow
                }
                CursorState::PlacingRow => {
                    if next == order.len() {
                        CursorState::Done
                    } else {
                        let index = order[next];
                        let row_height = row_heights[next];
                        let is_candidate_last = next + 1 == order.len();
                        let reserved = if is_candidate_last { trailing } else { 0.0 };
                        let available = bottom - page.cursor;

                        if row_height + reserved <= available {
                            page.place(index, row_height);
                            next += 1;
                            CursorState::PlacingRow
                        } else if page.items.is_empty() {
                            if row_height > available {
                                return Err(DocumentError::row_too_large(
                                    Some(items[index].position),
                                    row_height,
                                    available,
                                ));
                            }
                            // The last row alone fits but not with the trailing block;
                            // an empty page would never make progress.
                            warn!(
                                page = page.number,
                                position = items[index].position,
                                trailing,
                                available,
                                "trailing block overflows the last page"
                            );
                            page.place(index, row_height);
                            page.trailing_overflow = true;
                            next += 1;
                            CursorState::PlacingRow
                        } else {
                            CursorState::PageFull
                        }
                    }
                }
                CursorState::PageFull => {
                    let closed = page.finish(false);
                    debug!(
                        page = closed.number,
                        rows = closed.items.len(),
                        cursor = closed.y_cursor_end,
                        "page break"
                    );
                    pages.push(closed);
                    CursorState::StartingPage
                }
                CursorState::Done => break,
            };
        }

        if order.is_empty() && page.cursor + trailing > bottom {
            warn!(trailing, available = bottom - page.cursor, "trailing block overflows an empty document");
            page.trailing_overflow = true;
        }
        pages.push(page.finish(true));

        Ok(LayoutPlan {
            kind,
            pages,
            totals: totals.clone(),
            trailing_block_height: trailing,
        })
    }
}

/// Paginate with a borrowed policy.
pub fn paginate(
    items: &[LineItem],
    policy: &PageGeometryPolicy,
    totals: &TotalsReport,
    kind: DocumentKind,
) -> DocumentResult<LayoutPlan> {
    PaginationEngine::new(policy).paginate(items, totals, kind)
}

/// Indices of `items` sorted by `position`; ties keep input order.
fn placement_order(items: &[LineItem]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&index| items[index].position);
    order
}

fn row_height_of(item: &LineItem, policy: &PageGeometryPolicy) -> DocumentResult<f64> {
    match item.row_height {
        None => Ok(policy.row_height),
        Some(height) if height.is_finite() && height > 0.0 => Ok(height),
        Some(height) => Err(DocumentError::invalid_geometry(format!(
            "row height of line {} must be positive, got {height}",
            item.position
        ))),
    }
}
