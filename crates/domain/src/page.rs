//! Pagination vocabulary shared by every listing operation.

use serde::{Deserialize, Serialize};

use crate::error::{TestmonError, ValidationError};

/// A (page number, page size) pair describing one slice of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    page_no: usize,
    page_size: usize,
}

impl PageSpec {
    /// Build a page specification.
    ///
    /// # Errors
    ///
    /// Returns [`TestmonError::Validation`] when `page_size` is zero.
    pub fn new(page_no: usize, page_size: usize) -> Result<Self, TestmonError> {
        if page_size == 0 {
            return Err(ValidationError::ZeroPageSize.into());
        }
        Ok(Self { page_no, page_size })
    }

    #[must_use]
    pub fn page_no(self) -> usize {
        self.page_no
    }

    #[must_use]
    pub fn page_size(self) -> usize {
        self.page_size
    }

    /// Number of elements preceding this page.
    #[must_use]
    pub fn offset(self) -> usize {
        self.page_no * self.page_size
    }
}

/// One page of data plus its cursor metadata.
///
/// `page_no = None` marks an unpaginated (complete) listing; this is
/// distinct from a paginated listing whose `next_page` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page_no: Option<usize>,
    pub next_page: Option<usize>,
}

impl<T> Page<T> {
    /// A complete, unpaginated listing.
    #[must_use]
    pub fn complete(data: Vec<T>) -> Self {
        Self {
            data,
            page_no: None,
            next_page: None,
        }
    }

    /// One slice of a listing with `total` elements overall.
    ///
    /// The last page index is `total / page_size`, pulled back by one
    /// when that index would start at or past `total` (an empty
    /// overflow page must not be advertised).
    #[must_use]
    pub fn paginated(data: Vec<T>, spec: PageSpec, total: usize) -> Self {
        let mut page_count = total / spec.page_size();
        if page_count * spec.page_size() >= total {
            page_count = page_count.saturating_sub(1);
        }
        let next_page = if spec.page_no() >= page_count {
            None
        } else {
            Some(spec.page_no() + 1)
        };
        Self {
            data,
            page_no: Some(spec.page_no()),
            next_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(page_no: usize, page_size: usize) -> PageSpec {
        PageSpec::new(page_no, page_size).unwrap()
    }

    #[test]
    fn should_reject_zero_page_size() {
        assert!(matches!(
            PageSpec::new(0, 0),
            Err(TestmonError::Validation(ValidationError::ZeroPageSize))
        ));
    }

    #[test]
    fn should_compute_offset_from_page_no_and_size() {
        assert_eq!(spec(0, 5).offset(), 0);
        assert_eq!(spec(3, 5).offset(), 15);
    }

    #[test]
    fn should_point_to_next_page_when_more_elements_remain() {
        let page = Page::paginated(vec![0; 5], spec(0, 5), 30);
        assert_eq!(page.page_no, Some(0));
        assert_eq!(page.next_page, Some(1));
    }

    #[test]
    fn should_stop_at_last_full_page() {
        // 30 elements in pages of 5: the last page is page 5.
        let page = Page::paginated(vec![0; 5], spec(5, 5), 30);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn should_not_advertise_overflow_page_past_the_end() {
        let page = Page::<u8>::paginated(Vec::new(), spec(10, 5), 30);
        assert_eq!(page.page_no, Some(10));
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn should_point_to_partial_last_page() {
        // 12 elements in pages of 5: pages 0, 1 and a partial page 2.
        let page = Page::paginated(vec![0; 5], spec(1, 5), 12);
        assert_eq!(page.next_page, Some(2));
        let last = Page::paginated(vec![0; 2], spec(2, 5), 12);
        assert_eq!(last.next_page, None);
    }

    #[test]
    fn should_handle_empty_listing() {
        let page = Page::<u8>::paginated(Vec::new(), spec(0, 5), 0);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn should_mark_complete_listing_with_no_cursor() {
        let page = Page::complete(vec![1, 2, 3]);
        assert_eq!(page.page_no, None);
        assert_eq!(page.next_page, None);
        assert_eq!(page.data, vec![1, 2, 3]);
    }
}
