use placesync_core::{AppConfig, Category, MergedResult, SearchableRecord};
use serde::Serialize;

/// One page of results after category filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage<'a> {
    pub items: Vec<&'a MergedResult>,
    /// Zero-based, clamped to the last page.
    pub page: usize,
    pub page_count: usize,
    /// Results matching the filter, across all pages.
    pub total: usize,
}

impl ResultPage<'_> {
    /// The records of this page, in order. This is the displayable set fed
    /// to the marker geometry pass.
    #[must_use]
    pub fn records(&self) -> Vec<SearchableRecord> {
        self.items.iter().map(|r| r.record.clone()).collect()
    }
}

/// Paging and category filter over the published results.
///
/// Changing the page or the filter changes the displayed set, so callers
/// re-run marker geometry afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    page_size: usize,
    page: usize,
    category: Option<Category>,
}

impl ResultView {
    /// A zero page size is treated as one.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 0,
            category: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.page_size)
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Switch the filter; paging restarts from the first page.
    pub fn set_category(&mut self, category: Option<Category>) {
        if self.category != category {
            self.category = category;
            self.page = 0;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Back to the first page, e.g. when a new result set arrives.
    pub fn reset(&mut self) {
        self.page = 0;
    }

    #[must_use]
    pub fn page_of<'a>(&self, results: &'a [MergedResult]) -> ResultPage<'a> {
        let matching: Vec<&MergedResult> = results
            .iter()
            .filter(|r| self.category.is_none_or(|c| r.record.category == c))
            .collect();
        let total = matching.len();
        let page_count = total.div_ceil(self.page_size).max(1);
        let page = self.page.min(page_count - 1);

        let items = matching
            .into_iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .collect();

        ResultPage {
            items,
            page,
            page_count,
            total,
        }
    }
}

impl Default for ResultView {
    fn default() -> Self {
        Self::new(10)
    }
}
