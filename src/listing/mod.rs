//! Generic machinery behind every paginated, filterable table in the app.

pub mod filter;
pub mod metrics;
pub mod page;

use crate::listing::filter::FilterCriteria;
use crate::listing::page::PageState;

/// Combined filter and page position of one listing.
///
/// The page number only survives while the criteria stay the same: replacing
/// them with different criteria returns the listing to its first page, so a
/// narrowed result set is never entered on a stale page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    criteria: FilterCriteria,
    page: PageState,
}

impl ListState {
    pub fn new(per_page: usize) -> Self {
        Self {
            criteria: FilterCriteria::new(),
            page: PageState::first(per_page),
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn page(&self) -> usize {
        self.page.page
    }

    pub fn per_page(&self) -> usize {
        self.page.per_page
    }

    pub fn page_state(&self) -> PageState {
        self.page
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if criteria != self.criteria {
            self.page.page = 1;
        }
        self.criteria = criteria;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page.page = page.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changing_criteria_resets_the_page() {
        let mut state = ListState::new(10);
        state.set_page(3);
        assert_eq!(state.page(), 3);

        state.set_criteria(FilterCriteria::new().search("memory"));
        assert_eq!(state.page(), 1, "new criteria must return to page one");
    }

    #[test]
    fn resubmitting_identical_criteria_keeps_the_page() {
        let mut state = ListState::new(10);
        state.set_criteria(FilterCriteria::new().select("status", "Done"));
        state.set_page(4);

        state.set_criteria(FilterCriteria::new().select("status", "Done"));
        assert_eq!(state.page(), 4);
    }

    #[test]
    fn explicit_page_request_after_criteria_wins() {
        let mut state = ListState::new(10);
        state.set_criteria(FilterCriteria::new().search("bug"));
        state.set_page(2);
        assert_eq!(state.page(), 2);
        assert_eq!(state.per_page(), 10);
    }

    #[test]
    fn page_zero_is_coerced_to_one() {
        let mut state = ListState::new(10);
        state.set_page(0);
        assert_eq!(state.page(), 1);
    }
}
