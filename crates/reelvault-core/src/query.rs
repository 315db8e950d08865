use crate::types::{EntryKind, UserId};
use serde::Serialize;

/// The listing partition a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Entries owned by the given user, released or not.
    Mine(UserId),
    /// Released entries only; the public community feed.
    Community,
    /// Every entry regardless of owner or release state; the search
    /// endpoint is deliberately not restricted to released entries.
    All,
}

impl Scope {
    /// The ordering applied when the caller does not pick one.
    pub fn default_sort(&self) -> Sort {
        let field = match self {
            Scope::Community => SortField::Likes,
            Scope::Mine(_) | Scope::All => SortField::CreatedAt,
        };
        Sort {
            field,
            order: SortOrder::Desc,
        }
    }
}

/// Optional filter predicates; every present predicate must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryFilter {
    /// Case-insensitive substring over title, director, and location.
    pub search: Option<String>,
    /// Case-insensitive substring over title and director.
    pub query: Option<String>,
    /// Exact kind match.
    pub kind: Option<EntryKind>,
    /// Substring over the free-text `year_time` field.
    pub year: Option<String>,
    /// Case-insensitive substring over director.
    pub director: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    Title,
    Director,
    YearTime,
    Likes,
}

impl SortField {
    /// Parses the wire spelling used by the listing endpoints.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "createdAt" => Some(SortField::CreatedAt),
            "title" => Some(SortField::Title),
            "director" => Some(SortField::Director),
            "yearTime" => Some(SortField::YearTime),
            "likes" => Some(SortField::Likes),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Builds a page request, rejecting `page == 0` and limits outside
    /// 1..=[`MAX_PAGE_LIMIT`].
    pub fn new(page: u32, limit: u32) -> std::result::Result<Self, String> {
        if page == 0 {
            return Err("page must be a positive integer".to_string());
        }
        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(format!("limit must be between 1 and {MAX_PAGE_LIMIT}"));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items to skip before this page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Pagination metadata returned alongside every listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    pub fn compute(request: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(request.limit));
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
            has_next: u64::from(request.page) < total_pages,
            has_prev: request.page > 1,
        }
    }
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

/// A caller's listing request before scope and sort defaults are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRequest {
    pub filter: EntryFilter,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub page: PageRequest,
}

/// A fully-resolved listing query as executed by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub scope: Scope,
    pub filter: EntryFilter,
    pub sort: Sort,
    pub page: PageRequest,
}

impl ListQuery {
    /// Resolves a [`ListRequest`] against a scope, filling in the scope's
    /// default ordering where the caller left it open.
    pub fn resolve(scope: Scope, request: ListRequest) -> Self {
        let default = scope.default_sort();
        Self {
            scope,
            filter: request.filter,
            sort: Sort {
                field: request.sort_by.unwrap_or(default.field),
                order: request.sort_order.unwrap_or(default.order),
            },
            page: request.page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_bounds() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert!(PageRequest::new(1, 101).is_err());
        assert!(PageRequest::new(1, 100).is_ok());
    }

    #[test]
    fn page_info_middle_page() {
        let request = PageRequest::new(2, 10).unwrap();
        let info = PageInfo::compute(request, 25);

        assert_eq!(info.total_pages, 3);
        assert!(info.has_next);
        assert!(info.has_prev);
    }

    #[test]
    fn page_info_single_page() {
        let request = PageRequest::new(1, 10).unwrap();
        let info = PageInfo::compute(request, 7);

        assert_eq!(info.total_pages, 1);
        assert!(!info.has_next);
        assert!(!info.has_prev);
    }

    #[test]
    fn page_info_empty_set() {
        let info = PageInfo::compute(PageRequest::default(), 0);

        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next);
        assert!(!info.has_prev);
    }

    #[test]
    fn page_info_exact_division() {
        let request = PageRequest::new(3, 10).unwrap();
        let info = PageInfo::compute(request, 30);

        assert_eq!(info.total_pages, 3);
        assert!(!info.has_next);
        assert!(info.has_prev);
    }

    #[test]
    fn offsets_are_one_based() {
        assert_eq!(PageRequest::new(1, 10).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(3, 20).unwrap().offset(), 40);
    }

    #[test]
    fn community_defaults_to_likes_desc() {
        let query = ListQuery::resolve(Scope::Community, ListRequest::default());
        assert_eq!(query.sort.field, SortField::Likes);
        assert_eq!(query.sort.order, SortOrder::Desc);
    }

    #[test]
    fn mine_defaults_to_created_at_desc() {
        let query = ListQuery::resolve(Scope::Mine(1), ListRequest::default());
        assert_eq!(query.sort.field, SortField::CreatedAt);
        assert_eq!(query.sort.order, SortOrder::Desc);
    }

    #[test]
    fn explicit_sort_overrides_default() {
        let request = ListRequest {
            sort_by: Some(SortField::Title),
            sort_order: Some(SortOrder::Asc),
            ..ListRequest::default()
        };
        let query = ListQuery::resolve(Scope::Community, request);
        assert_eq!(query.sort.field, SortField::Title);
        assert_eq!(query.sort.order, SortOrder::Asc);
    }

    #[test]
    fn sort_field_wire_spellings() {
        assert_eq!(SortField::parse("createdAt"), Some(SortField::CreatedAt));
        assert_eq!(SortField::parse("yearTime"), Some(SortField::YearTime));
        assert_eq!(SortField::parse("rating"), None);
        assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("ASC"), None);
    }
}
