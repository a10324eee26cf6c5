//! Client-side pagination and sorting for directory tables.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Position of a page within a listing. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl PageInfo {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// "Showing 11-20 of 45", or "No results" for an empty listing.
    pub fn summary(&self) -> String {
        if self.total_items == 0 {
            return "No results".to_string();
        }
        let first = (self.page - 1) * self.per_page + 1;
        let last = (first + self.per_page - 1).min(self.total_items);
        format!("Showing {}-{} of {}", first, last, self.total_items)
    }
}

/// Slice `items` for `page`; out-of-range pages clamp to the nearest valid
/// page and a zero page size is treated as one.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> (&[T], PageInfo) {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let start = ((page - 1) * per_page).min(total_items);
    let end = (start + per_page).min(total_items);
    let info = PageInfo {
        page,
        per_page,
        total_items,
        total_pages,
    };
    (&items[start..end], info)
}

/// Stable sort; equal keys keep their original order in both directions.
pub fn sort_by_key<T, K, F>(items: &mut [T], direction: SortDirection, mut key: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    items.sort_by(|a, b| direction.apply(key(a).cmp(&key(b))));
}
