use serde::{Deserialize, Serialize};

/// Upper bound on `page_size` accepted from callers.
pub const MAX_PAGE_SIZE: usize = 100;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Offset-based page request
///
/// # Example
/// ```
/// use kyc_review_db::repository::pagination::PageRequest;
///
/// let first = PageRequest::for_page(20, 1);
/// assert_eq!(first.offset, 0);
/// let third = PageRequest::for_page(20, 3);
/// assert_eq!(third.offset, 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of items to return
    pub limit: usize,
    /// Number of items to skip
    pub offset: usize,
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Request for a 1-based `page_number`. `page_size` is clamped to
    /// `1..=MAX_PAGE_SIZE` and page 0 is treated as page 1.
    pub fn for_page(page_size: usize, page_number: usize) -> Self {
        let limit = page_size.clamp(1, MAX_PAGE_SIZE);
        let page_number = page_number.max(1);
        Self {
            limit,
            offset: (page_number - 1) * limit,
        }
    }

    pub fn page_number(&self) -> usize {
        if self.limit == 0 {
            1
        } else {
            (self.offset / self.limit) + 1
        }
    }

    /// Slices an in-memory, already ordered result set.
    pub fn apply<T: Clone>(&self, ordered: &[T]) -> Page<T> {
        let items = ordered.iter().skip(self.offset).take(self.limit).cloned().collect();
        Page::new(items, ordered.len(), self.limit, self.offset)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// One page of a listing plus the metadata needed to render navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    pub fn has_more(&self) -> bool {
        self.offset + self.items.len() < self.total
    }

    pub fn page_number(&self) -> usize {
        if self.limit == 0 {
            1
        } else {
            (self.offset / self.limit) + 1
        }
    }

    pub fn total_pages(&self) -> usize {
        if self.limit == 0 {
            1
        } else {
            self.total.div_ceil(self.limit)
        }
    }

    /// Converts the items while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}
