use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// PageError
///
/// Caller input errors detected while validating a page request. These map to
/// `400 Bad Request`; values are never clamped into range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("Page number cannot be less than zero.")]
    NegativePage(i64),
    #[error("Page size must be greater than zero.")]
    NonPositiveSize(i64),
    #[error("Page size must not be greater than {max}.")]
    SizeTooLarge { size: i64, max: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Columns a listing may be ordered by. The mapping to SQL is a fixed whitelist;
/// stores add `id` as a tie-breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
}

impl SortField {
    pub fn column(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub const NEWEST_FIRST: Sort = Sort {
        field: SortField::CreatedAt,
        direction: SortDirection::Desc,
    };

    pub const OLDEST_FIRST: Sort = Sort {
        field: SortField::CreatedAt,
        direction: SortDirection::Asc,
    };
}

/// PageQuery
///
/// The raw `page` / `size` query parameters accepted by every listing endpoint.
/// Signed on purpose so a negative value reaches validation and gets a clear message.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Zero-based page index.
    pub page: Option<i64>,
    /// Number of elements per page.
    pub size: Option<i64>,
}

/// PageRequest
///
/// A zero-based page index, a page size and an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    pub sort: Sort,
}

impl PageRequest {
    pub fn new(page: i64, size: i64, sort: Sort) -> Self {
        Self { page, size, sort }
    }

    /// Builds a request from query parameters, filling in the configured defaults.
    pub fn from_query(query: PageQuery, default_size: i64, sort: Sort) -> Self {
        Self::new(query.page.unwrap_or(0), query.size.unwrap_or(default_size), sort)
    }

    /// Row offset for the backing store. Saturates instead of overflowing for absurd indices,
    /// which simply yields an empty slice.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }
}

/// Paginator
///
/// Validates page requests against an upper bound on page size. Holds only that
/// bound, so it is `Copy` and can be shared freely between concurrent requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    max_size: i64,
}

impl Paginator {
    pub fn new(max_size: i64) -> Self {
        Self { max_size }
    }

    pub fn max_size(&self) -> i64 {
        self.max_size
    }

    /// Accepts `index >= 0` and `0 < size <= max_size`; anything else is a caller error.
    pub fn validate(&self, request: PageRequest) -> Result<PageRequest, PageError> {
        if request.page < 0 {
            return Err(PageError::NegativePage(request.page));
        }
        if request.size <= 0 {
            return Err(PageError::NonPositiveSize(request.size));
        }
        if request.size > self.max_size {
            return Err(PageError::SizeTooLarge {
                size: request.size,
                max: self.max_size,
            });
        }
        Ok(request)
    }
}

/// PagedEnvelope
///
/// The uniform response shape for every listing endpoint.
///
/// Invariants, upheld by [`PagedEnvelope::assemble`]:
/// - `total_pages == ceil(total_elements / size)`, and 0 when there are no elements.
/// - `is_last` is true when there are no pages or `page >= total_pages - 1`.
/// - `content` is exactly what the store returned for the requested slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagedEnvelope<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
    pub is_last: bool,
}

impl<T> PagedEnvelope<T> {
    /// Wraps an already-sliced `content` with its page metadata. The content is
    /// passed through untouched: an out-of-range page yields whatever the store
    /// returned (nothing) and is reported as the last page.
    pub fn assemble(content: Vec<T>, page: i64, size: i64, total_elements: i64) -> Self {
        let total_pages = total_pages(total_elements, size);
        let is_last = total_pages == 0 || page >= total_pages - 1;
        Self {
            content,
            page,
            size,
            total_elements,
            total_pages,
            is_last,
        }
    }
}

fn total_pages(total_elements: i64, size: i64) -> i64 {
    if total_elements <= 0 || size <= 0 {
        return 0;
    }
    total_elements / size + i64::from(total_elements % size != 0)
}
