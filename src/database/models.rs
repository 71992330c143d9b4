use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// An ad joined with its owner's login, as returned by listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Ad {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub user_id: i64,
    pub login: String,
    pub created_at: DateTime<Utc>,
    /// Computed per viewer at read time, never persisted.
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_owner: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAd {
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    Price,
}

impl SortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "created_at" => Some(SortField::CreatedAt),
            "price" => Some(SortField::Price),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "a.created_at",
            SortField::Price => "a.price",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Page, ordering and inclusive price range for an ad listing.
#[derive(Debug, Clone, PartialEq)]
pub struct AdQuery {
    pub page: i64,
    pub page_size: i64,
    pub sort_by: SortField,
    pub sort_order: SortDirection,
    pub min_price: Decimal,
    pub max_price: Decimal,
}

impl Default for AdQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: SortField::default(),
            sort_order: SortDirection::default(),
            min_price: Decimal::ZERO,
            max_price: MAX_PRICE,
        }
    }
}

impl AdQuery {
    /// Clamp out-of-range paging to the defaults: page < 1 becomes 1 and a
    /// page size outside [1, 100] becomes 10.
    pub fn normalized(mut self) -> Self {
        if self.page < 1 {
            self.page = 1;
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        self
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}
