//! Paging query parameters and paged response envelope.

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

use crate::domain::pagination::{
    DEFAULT_PAGE_SIZE, Direction, MAX_PAGE_SIZE, Page, PageRequest, SortKey,
};
use crate::error::AppError;

/// `?page=0&size=10&sortBy=id&direction=ASC`
///
/// Numbers are parsed with `serde_with` so that malformed values are
/// rejected by the query extractor.
#[serde_as]
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// 0-based page index (default 0).
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[param(value_type = Option<u32>)]
    pub page: Option<u32>,

    /// Page size, 1..=100 (default 10).
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[param(value_type = Option<u32>)]
    pub size: Option<u32>,

    /// Sort field (default `id`).
    #[serde(default)]
    pub sort_by: Option<String>,

    /// `ASC` or `DESC` (default `ASC`).
    #[serde(default)]
    pub direction: Option<String>,
}

impl PaginationParams {
    /// Validates the parameters and resolves defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an out-of-range size or an unknown
    /// sort field or direction.
    pub fn into_page_request<S>(self) -> Result<PageRequest<S>, AppError>
    where
        S: SortKey + Default + FromStr<Err = String>,
    {
        let page = self.page.unwrap_or(0);
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);

        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(AppError::bad_request(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({ "size": size }),
            ));
        }

        let sort = match self.sort_by.as_deref() {
            None | Some("") => S::default(),
            Some(raw) => raw
                .parse::<S>()
                .map_err(|e| AppError::bad_request(e, json!({ "sortBy": raw })))?,
        };

        let direction = match self.direction.as_deref() {
            None | Some("") => Direction::Asc,
            Some(raw) => raw
                .parse::<Direction>()
                .map_err(|e| AppError::bad_request(e, json!({ "direction": raw })))?,
        };

        Ok(PageRequest::new(page, size, sort, direction))
    }
}

/// One page of results with navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        let total_pages = page.total_pages();
        let first = page.is_first();
        let last = page.is_last();

        Self {
            content: page.items,
            page: page.page,
            size: page.size,
            total_elements: page.total,
            total_pages,
            first,
            last,
        }
    }
}
