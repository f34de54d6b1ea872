//! Zero-based page windows and the list response envelope.
//!
//! ```json
//! { "result": [...], "page": 0, "size": 10, "count": 23, "totalPages": 3 }
//! ```

use database::MAX_OFFSET;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw `page` / `size` query parameters, clamped by [`PageParams::window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page index
    #[serde(default)]
    #[param(default = 0, minimum = 0)]
    pub page: i64,

    #[serde(default = "default_size")]
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub size: i64,
}

fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    pub fn new(page: i64, size: i64) -> Self {
        Self { page, size }
    }

    /// `page` raised to 0, `size` clamped into `[1, MAX_PAGE_SIZE]`.
    pub fn window(&self) -> Window {
        Window {
            page: self.page.max(0) as u64,
            size: self.size.clamp(1, MAX_PAGE_SIZE) as u64,
        }
    }
}

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub page: u64,
    pub size: u64,
}

impl Window {
    /// First row of this page; pages past the bigint range collapse to the
    /// last representable offset and read back empty.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size).min(MAX_OFFSET)
    }

    pub fn paginate<T>(&self, items: Vec<T>, count: u64) -> Page<T> {
        paginate(items, self.page, self.size, count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub result: Vec<T>,
    pub page: u64,
    pub size: u64,
    /// Total number of matching rows
    pub count: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            result: self.result.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            count: self.count,
            total_pages: self.total_pages,
        }
    }
}

/// Wraps one page of `items`; no clamping happens here.
pub fn paginate<T>(items: Vec<T>, page: u64, size: u64, count: u64) -> Page<T> {
    let total_pages = if size == 0 { 0 } else { count.div_ceil(size) };

    Page {
        result: items,
        page,
        size,
        count,
        total_pages,
    }
}
