use serde::{Deserialize, Serialize};

/// Maximum number of page links offered around the current page.
const PAGE_WINDOW: u32 = 10;

/// Requested page of a listing. Page indexes start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page_index: u32,
    page_size: u32,
}

impl PageRequest {
    /// Creates a page request, clamping index and size to at least 1.
    #[must_use]
    pub fn new(page_index: u32, page_size: u32) -> Self {
        Self {
            page_index: page_index.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Returns the 1-based page index.
    #[must_use]
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    /// Returns the page size.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the number of rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page_index - 1) * u64::from(self.page_size)
    }
}

/// One page of a listing plus the navigation window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedList<T> {
    items: Vec<T>,
    page_index: u32,
    total_pages: u32,
    total_count: u64,
    pages: Vec<u32>,
}

impl<T> PaginatedList<T> {
    /// Builds a page from already sliced items and the unpaged row count.
    #[must_use]
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        let page_size = u64::from(request.page_size());
        let total_pages = u32::try_from(total_count.div_ceil(page_size)).unwrap_or(u32::MAX);
        let page_index = request.page_index();

        Self {
            items,
            page_index,
            total_pages,
            total_count,
            pages: page_window(total_pages, page_index),
        }
    }

    /// Returns the rows on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Consumes the page and returns its rows.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the 1-based page index.
    #[must_use]
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    /// Returns the number of pages.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Returns the unpaged row count.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Returns the page numbers to offer as links.
    #[must_use]
    pub fn pages(&self) -> &[u32] {
        self.pages.as_slice()
    }

    /// Returns whether a previous page exists.
    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.page_index > 1
    }

    /// Returns whether a next page exists.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.page_index < self.total_pages
    }

    /// Maps every row, keeping the navigation state.
    #[must_use]
    pub fn map<U>(self, mapper: impl FnMut(T) -> U) -> PaginatedList<U> {
        PaginatedList {
            items: self.items.into_iter().map(mapper).collect(),
            page_index: self.page_index,
            total_pages: self.total_pages,
            total_count: self.total_count,
            pages: self.pages,
        }
    }
}

fn page_window(total_pages: u32, current_page: u32) -> Vec<u32> {
    // Requested pages past the end share the last page's window.
    let current_page = current_page.min(total_pages);
    let (start, end) = if total_pages <= PAGE_WINDOW {
        (1, total_pages)
    } else if current_page <= 6 {
        (1, PAGE_WINDOW)
    } else if current_page.saturating_add(4) >= total_pages {
        (total_pages - (PAGE_WINDOW - 1), total_pages)
    } else {
        (current_page - 5, current_page + 4)
    };

    (start..=end).collect()
}
