use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::filters::SearchFilters;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 50;

/// Direction of the `rating` ordering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Validated pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub sort: SortOrder,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32, sort: SortOrder) -> Result<Self, AppError> {
        if page < 1 {
            return Err(AppError::Validation("page must be greater than or equal to 1".into()));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok(Self { page, limit, sort })
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

/// Query string of `GET /api/recipes`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub sort: SortOrder,
}

impl ListParams {
    pub fn validate(&self) -> Result<PageRequest, AppError> {
        PageRequest::new(self.page, self.limit, self.sort)
    }
}

/// Query string of `GET /api/recipes/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub sort: SortOrder,
    pub calories_min: Option<f64>,
    pub calories_max: Option<f64>,
    pub cuisine: Option<String>,
    pub title: Option<String>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    pub total_time_min: Option<i32>,
    pub total_time_max: Option<i32>,
}

impl SearchParams {
    pub fn validate(self) -> Result<(PageRequest, SearchFilters), AppError> {
        let page = PageRequest::new(self.page, self.limit, self.sort)?;
        for (name, bound) in [
            ("calories_min", self.calories_min),
            ("calories_max", self.calories_max),
            ("rating_min", self.rating_min),
            ("rating_max", self.rating_max),
        ] {
            if bound.is_some_and(|v| !v.is_finite()) {
                return Err(AppError::Validation(format!("{name} must be a finite number")));
            }
        }
        let filters = SearchFilters {
            calories_min: self.calories_min,
            calories_max: self.calories_max,
            cuisine: self.cuisine,
            title: self.title,
            rating_min: self.rating_min,
            rating_max: self.rating_max,
            total_time_min: self.total_time_min,
            total_time_max: self.total_time_max,
        };
        Ok((page, filters))
    }
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Response envelope shared by list and search.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub data: Vec<T>,
}
