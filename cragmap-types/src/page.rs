use serde::{Deserialize, Serialize};

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: usize,
    /// `None` means "use the configured default page size".
    pub page_size: Option<usize>,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size: Some(page_size),
        }
    }

    /// First page with the default page size.
    pub fn first() -> Self {
        Self {
            page: 1,
            page_size: None,
        }
    }

    /// Row offset for this page given the effective page size.
    pub fn offset(&self, page_size: usize) -> usize {
        self.page.saturating_sub(1).saturating_mul(page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Pagination metadata returned alongside a page of results.
///
/// # Examples
///
/// ```
/// use cragmap_types::page::Pagination;
///
/// let p = Pagination::new(2, 50, 120);
/// assert_eq!(p.total_pages, 3);
/// assert!(p.has_next);
/// assert!(p.has_previous);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Pagination {
    pub fn new(current_page: usize, page_size: usize, total_items: usize) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_items.div_ceil(page_size)
        };

        Self {
            current_page,
            page_size,
            total_items,
            total_pages,
            has_next: current_page < total_pages,
            has_previous: current_page > 1,
        }
    }
}
