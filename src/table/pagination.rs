use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Compact list of page links: the first `left_edge` pages, a window around
/// `current_page` and the last `right_edge` pages, with `None` marking gaps.
fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = current_page
        .saturating_add(right_current + 1)
        .min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Current page, page size and server-reported total of one table.
///
/// `page` is kept inside `[1, max(page_count, 1)]` whenever the total is
/// recomputed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationController {
    page: usize,
    page_size: usize,
    total: usize,
}

impl PaginationController {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// `ceil(total / page_size)`; zero when there are no rows.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    /// Page count shown to the user: never below one.
    pub fn display_page_count(&self) -> usize {
        self.page_count().max(1)
    }

    /// Requests `page`, lower-bounded to 1 and capped so that row offsets
    /// stay representable. The real upper bound is applied once the total
    /// for that page is known.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, usize::MAX / self.page_size);
    }

    /// Back to the first page, e.g. after the search text or scope changed.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Records a new total and clamps the page. Returns `true` when the page
    /// had to move.
    pub fn set_total(&mut self, total: usize) -> bool {
        self.total = total;
        let clamped = self.page.clamp(1, self.display_page_count());
        let moved = clamped != self.page;
        self.page = clamped;
        moved
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    /// One-based index of the first row on the current page.
    pub fn first_item(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            (self.page - 1).saturating_mul(self.page_size).saturating_add(1)
        }
    }

    /// One-based index of the last row on the current page.
    pub fn last_item(&self) -> usize {
        self.page.saturating_mul(self.page_size).min(self.total)
    }

    pub fn window(&self) -> Vec<Option<usize>> {
        // The page is unclamped while a request for it failed.
        let current = self.page.min(self.display_page_count());
        get_pages(self.page_count(), current, 2, 2, 4, 2)
    }

    pub fn view(&self) -> PaginationView {
        PaginationView {
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            page_count: self.display_page_count(),
            first_item: self.first_item(),
            last_item: self.last_item(),
            has_previous: self.has_previous(),
            has_next: self.has_next(),
            pages: self.window(),
        }
    }
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Template-facing snapshot of a [`PaginationController`].
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PaginationView {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub page_count: usize,
    pub first_item: usize,
    pub last_item: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub pages: Vec<Option<usize>>,
}
