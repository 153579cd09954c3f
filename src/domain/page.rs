/// Number of rows returned by every paginated query.
pub const PAGE_SIZE: u32 = 20;

/// 1-based page number. Anything below 1 is clamped to the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
}

impl PageRequest {
    pub fn new(page: i64) -> Self {
        Self {
            page: page.clamp(1, u32::MAX as i64) as u32,
        }
    }

    pub fn first() -> Self {
        Self { page: 1 }
    }

    pub fn number(&self) -> u32 {
        self.page
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * PAGE_SIZE as i64
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

impl From<Option<i64>> for PageRequest {
    fn from(page: Option<i64>) -> Self {
        page.map(Self::new).unwrap_or_default()
    }
}

/// One page of results plus the total row count of the unpaginated query.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: i64,
    pub page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, count: i64, request: PageRequest) -> Self {
        Self {
            items,
            count,
            page: request.number(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
            page: self.page,
        }
    }
}
