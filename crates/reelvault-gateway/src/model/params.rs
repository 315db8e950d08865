//! Query-parameter parsing for the listing endpoints.
//!
//! Parameters arrive as raw strings and are checked here, before any
//! store access; failures carry field-level details and collect across
//! fields rather than stopping at the first.

use crate::error::ApiError;
use reelvault_core::{
    EntryFilter, EntryId, EntryKind, FieldError, ListRequest, PageRequest, SortField, SortOrder,
    DEFAULT_PAGE_LIMIT,
};
use serde::Deserialize;

/// Parameters of `GET /entries/my` and `GET /entries/community`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListParams {
    pub fn into_request(self) -> Result<ListRequest, ApiError> {
        let mut errors = Vec::new();

        let page = parse_page(self.page.as_deref(), self.limit.as_deref(), &mut errors);
        let kind = parse_kind(self.kind.as_deref(), &mut errors);
        let sort_by = parse_sort_field(self.sort_by.as_deref(), &mut errors);
        let sort_order = parse_sort_order(self.sort_order.as_deref(), &mut errors);

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok(ListRequest {
            filter: EntryFilter {
                search: non_empty(self.search),
                kind,
                ..EntryFilter::default()
            },
            sort_by,
            sort_order,
            page,
        })
    }
}

/// Parameters of `GET /entries/search`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub year: Option<String>,
    pub director: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl SearchParams {
    pub fn into_request(self) -> Result<ListRequest, ApiError> {
        let mut errors = Vec::new();

        let page = parse_page(self.page.as_deref(), self.limit.as_deref(), &mut errors);
        let kind = parse_kind(self.kind.as_deref(), &mut errors);

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok(ListRequest {
            filter: EntryFilter {
                query: non_empty(self.query),
                kind,
                year: non_empty(self.year),
                director: non_empty(self.director),
                ..EntryFilter::default()
            },
            sort_by: None,
            sort_order: None,
            page,
        })
    }
}

/// Parses a path id; ids are positive integers.
pub fn parse_entry_id(raw: &str) -> Result<EntryId, ApiError> {
    raw.parse::<EntryId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::Validation(vec![FieldError::new("id", "Invalid ID")]))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn parse_page(
    page: Option<&str>,
    limit: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> PageRequest {
    let page_number = match page {
        None | Some("") => 1,
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => {
                errors.push(FieldError::new("page", "page must be a positive integer"));
                1
            }
        },
    };

    let limit_number = match limit {
        None | Some("") => DEFAULT_PAGE_LIMIT,
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                errors.push(FieldError::new("limit", "limit must be a positive integer"));
                DEFAULT_PAGE_LIMIT
            }
        },
    };

    match PageRequest::new(page_number, limit_number) {
        Ok(request) => request,
        Err(message) => {
            errors.push(FieldError::new("limit", message));
            PageRequest::default()
        }
    }
}

fn parse_kind(raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<EntryKind> {
    match raw {
        None | Some("") => None,
        Some(raw) => match raw.parse::<EntryKind>() {
            Ok(kind) => Some(kind),
            Err(()) => {
                errors.push(FieldError::new("type", "Type must be either Movie or TV"));
                None
            }
        },
    }
}

fn parse_sort_field(raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<SortField> {
    match raw {
        None | Some("") => None,
        Some(raw) => match SortField::parse(raw) {
            Some(field) => Some(field),
            None => {
                errors.push(FieldError::new(
                    "sortBy",
                    "sortBy must be one of createdAt, title, director, yearTime, likes",
                ));
                None
            }
        },
    }
}

fn parse_sort_order(raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<SortOrder> {
    match raw {
        None | Some("") => None,
        Some(raw) => match SortOrder::parse(raw) {
            Some(order) => Some(order),
            None => {
                errors.push(FieldError::new("sortOrder", "sortOrder must be asc or desc"));
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_params() {
        let request = ListParams::default().into_request().unwrap();
        assert_eq!(request.page, PageRequest::default());
        assert_eq!(request.sort_by, None);
        assert_eq!(request.filter, EntryFilter::default());
    }

    #[test]
    fn parses_full_param_set() {
        let params = ListParams {
            page: Some("2".to_string()),
            limit: Some("25".to_string()),
            search: Some("nolan".to_string()),
            kind: Some("TV".to_string()),
            sort_by: Some("likes".to_string()),
            sort_order: Some("asc".to_string()),
        };
        let request = params.into_request().unwrap();

        assert_eq!(request.page.page(), 2);
        assert_eq!(request.page.limit(), 25);
        assert_eq!(request.filter.search.as_deref(), Some("nolan"));
        assert_eq!(request.filter.kind, Some(EntryKind::Tv));
        assert_eq!(request.sort_by, Some(SortField::Likes));
        assert_eq!(request.sort_order, Some(SortOrder::Asc));
    }

    #[test]
    fn collects_every_invalid_field() {
        let params = ListParams {
            page: Some("zero".to_string()),
            limit: Some("500".to_string()),
            search: None,
            kind: Some("Documentary".to_string()),
            sort_by: Some("rating".to_string()),
            sort_order: Some("sideways".to_string()),
        };
        let err = params.into_request().unwrap_err();

        let ApiError::Validation(details) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = details.iter().map(|d| d.field).collect();
        assert_eq!(fields, vec!["page", "limit", "type", "sortBy", "sortOrder"]);
    }

    #[test]
    fn entry_ids_must_be_positive_integers() {
        assert!(parse_entry_id("17").is_ok());
        assert!(parse_entry_id("0").is_err());
        assert!(parse_entry_id("-3").is_err());
        assert!(parse_entry_id("abc").is_err());
    }

    #[test]
    fn search_params_build_cross_scope_filter() {
        let params = SearchParams {
            query: Some("Inception".to_string()),
            kind: None,
            year: Some("2010".to_string()),
            director: Some("nolan".to_string()),
            page: None,
            limit: None,
        };
        let request = params.into_request().unwrap();

        assert_eq!(request.filter.query.as_deref(), Some("Inception"));
        assert_eq!(request.filter.year.as_deref(), Some("2010"));
        assert_eq!(request.filter.director.as_deref(), Some("nolan"));
        assert_eq!(request.filter.search, None);
    }
}
