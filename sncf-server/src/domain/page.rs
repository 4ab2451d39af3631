//! Pagination over an ordered result sequence.
//!
//! Nothing is persisted between calls: each request names the page it
//! wants and the slice is recomputed from the full sequence.

/// Which slice of a result sequence to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_size: usize,
    page_index: usize,
}

impl PageRequest {
    /// Create a request for the 0-based `page_index`.
    ///
    /// A page size of zero is bumped to one.
    pub fn new(page_size: usize, page_index: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page_index,
        }
    }

    /// The first page.
    pub fn first(page_size: usize) -> Self {
        Self::new(page_size, 0)
    }

    /// Create a request from a 1-based page number, as users count pages.
    ///
    /// Returns `None` for page 0.
    pub fn from_page_number(page_size: usize, page_number: usize) -> Option<Self> {
        page_number
            .checked_sub(1)
            .map(|index| Self::new(page_size, index))
    }

    /// Number of items per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 0-based page index.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Index of the first item on this page.
    pub fn start_index(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }

    /// Number of pages needed for `total` items.
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Select this page's slice of `items`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sncf_server::domain::{PageRequest, PageSlice};
    ///
    /// let items: Vec<u32> = (0..25).collect();
    ///
    /// let PageSlice::Page(page) = PageRequest::new(10, 2).slice(&items) else { panic!() };
    /// assert_eq!(page.items, &[20, 21, 22, 23, 24]);
    ///
    /// assert!(matches!(PageRequest::new(10, 3).slice(&items), PageSlice::Exhausted { .. }));
    /// assert!(matches!(PageRequest::new(10, 0).slice::<u32>(&[]), PageSlice::Empty));
    /// ```
    pub fn slice<'a, T>(&self, items: &'a [T]) -> PageSlice<'a, T> {
        let total = items.len();
        if total == 0 {
            return PageSlice::Empty;
        }

        let total_pages = self.total_pages(total);
        let start = self.start_index();
        if start >= total {
            return PageSlice::Exhausted {
                page_number: self.page_index.saturating_add(1),
                total_pages,
                total,
            };
        }

        let end = start.saturating_add(self.page_size).min(total);
        PageSlice::Page(Page {
            items: &items[start..end],
            start_index: start,
            total,
            page_number: self.page_index + 1,
            total_pages,
        })
    }
}

/// Outcome of slicing a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSlice<'a, T> {
    /// The sequence itself is empty
    Empty,
    /// The requested page lies past the end of a non-empty sequence
    Exhausted {
        /// 1-based number of the page that was asked for
        page_number: usize,
        total_pages: usize,
        total: usize,
    },
    /// A non-empty page
    Page(Page<'a, T>),
}

/// A non-empty slice of a result sequence with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Index of `items[0]` in the full sequence
    pub start_index: usize,
    /// Length of the full sequence
    pub total: usize,
    /// 1-based page number
    pub page_number: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    /// 1-based position of the last item on the page.
    pub fn end_position(&self) -> usize {
        self.start_index + self.items.len()
    }
}
