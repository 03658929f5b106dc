use serde::Serialize;
use thiserror::Error;

/// Rows shown per page on every paginated table.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    /// A zero page size is a caller configuration bug, never defaulted over.
    #[error("page size must be greater than zero")]
    InvalidPageSize,
}

/// Requested position within a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub page: usize,
    pub per_page: usize,
}

impl PageState {
    /// Creates a page state, coercing a zero page number to the first page.
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            per_page,
        }
    }

    pub fn first(per_page: usize) -> Self {
        Self::new(1, per_page)
    }
}

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

    let current_page = current_page.clamp(1, last_page);
    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    push_gap(&mut pages, left_end, mid_start);
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    push_gap(&mut pages, mid_end, right_start);
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// A gap hiding exactly one page shows that page number; wider gaps collapse
/// into a single ellipsis marker.
fn push_gap(pages: &mut Vec<Option<usize>>, from: usize, to: usize) {
    match to.saturating_sub(from) {
        0 => {}
        1 => pages.push(Some(from)),
        _ => pages.push(None),
    }
}

/// Compressed page-number sequence: first and last page, the pages adjacent
/// to the current one, and one ellipsis marker (`None`) per hidden run.
pub fn page_links(total_pages: usize, current_page: usize) -> Vec<Option<usize>> {
    get_pages(total_pages, current_page, 1, 1, 1, 1)
}

/// One window of a paginated listing, ready for rendering.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    /// Zero-based offset of the first visible record.
    pub start_index: usize,
    /// Zero-based exclusive offset past the last visible record.
    pub end_index: usize,
    pub pages: Vec<Option<usize>>,
}

impl<T> Paginated<T> {
    /// Converts the visible records while keeping the window geometry.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
            start_index: self.start_index,
            end_index: self.end_index,
            pages: self.pages,
        }
    }
}

/// Slices one page out of an already filtered and sorted collection.
///
/// The requested page is clamped into `[1, total_pages]`; an empty collection
/// yields an empty first page with zero total pages. Input order is preserved,
/// so callers sort before paginating.
pub fn paginate<T: Clone>(records: &[T], state: &PageState) -> Result<Paginated<T>, PageError> {
    if state.per_page == 0 {
        return Err(PageError::InvalidPageSize);
    }

    let total = records.len();
    let total_pages = total.div_ceil(state.per_page);
    let page = state.page.max(1).min(total_pages.max(1));
    let start_index = (page - 1) * state.per_page;
    let end_index = (start_index + state.per_page).min(total);

    Ok(Paginated {
        items: records[start_index..end_index].to_vec(),
        page,
        per_page: state.per_page,
        total,
        total_pages,
        start_index,
        end_index,
        pages: page_links(total_pages, page),
    })
}
