//! Short URL records, list pagination and ordering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// A shortened redirect record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrl {
    pub short_code: String,
    pub short_url: String,
    pub long_url: String,
    pub date_created: DateTime<Utc>,
    #[serde(default)]
    pub visits_count: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
}

/// Body of `POST /rest/v2/short-urls`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlData {
    pub long_url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ShortUrlData {
    /// Trimmed copy ready to send. The long URL must be an absolute http(s) URL;
    /// a blank title is dropped.
    pub fn normalized(&self) -> Result<ShortUrlData> {
        let long_url = self.long_url.trim();
        if long_url.is_empty() {
            return Err(Error::invalid_short_url("long URL is required"));
        }
        let parsed = Url::parse(long_url)
            .map_err(|e| Error::invalid_short_url(format!("invalid long URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::invalid_short_url(format!(
                "unsupported URL scheme '{}'",
                parsed.scheme()
            )));
        }

        Ok(ShortUrlData {
            long_url: long_url.to_string(),
            tags: self.tags.clone(),
            title: self
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        })
    }
}

/// Pagination metadata as reported by the Shlink API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub pages_count: u32,
    pub items_per_page: u32,
    pub items_in_current_page: u32,
    pub total_items: u64,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.current_page < self.pages_count
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

/// One page of short URLs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShortUrlsList {
    pub data: Vec<ShortUrl>,
    pub pagination: Pagination,
}

/// Fields the short URL list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderableField {
    DateCreated,
    ShortCode,
    LongUrl,
    Title,
    Visits,
}

impl OrderableField {
    pub const ALL: [OrderableField; 5] = [
        OrderableField::DateCreated,
        OrderableField::ShortCode,
        OrderableField::LongUrl,
        OrderableField::Title,
        OrderableField::Visits,
    ];

    /// Header label
    pub fn label(&self) -> &'static str {
        match self {
            OrderableField::DateCreated => "Created at",
            OrderableField::ShortCode => "Short URL",
            OrderableField::LongUrl => "Long URL",
            OrderableField::Title => "Title",
            OrderableField::Visits => "Visits",
        }
    }

    /// Name used in the API `orderBy` query parameter
    pub fn api_name(&self) -> &'static str {
        match self {
            OrderableField::DateCreated => "dateCreated",
            OrderableField::ShortCode => "shortCode",
            OrderableField::LongUrl => "longUrl",
            OrderableField::Title => "title",
            OrderableField::Visits => "visits",
        }
    }

    /// Sortable columns for a server, title only when supported
    pub fn sortable(supports_titles: bool) -> Vec<OrderableField> {
        Self::ALL
            .into_iter()
            .filter(|f| supports_titles || *f != OrderableField::Title)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDir {
    Asc,
    Desc,
}

impl OrderDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDir::Asc => "ASC",
            OrderDir::Desc => "DESC",
        }
    }
}

/// Active ordering of the list. `field: None` means no explicit ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub field: Option<OrderableField>,
    #[serde(default)]
    pub dir: Option<OrderDir>,
}

impl Order {
    pub fn new(field: OrderableField, dir: OrderDir) -> Self {
        Self {
            field: Some(field),
            dir: Some(dir),
        }
    }

    pub fn unordered() -> Self {
        Self::default()
    }

    /// Direction currently applied to `field`, if any
    pub fn dir_for(&self, field: OrderableField) -> Option<OrderDir> {
        if self.field == Some(field) {
            self.dir
        } else {
            None
        }
    }

    /// Toggle ordering after a header activation.
    ///
    /// Same field cycles ASC → DESC → unordered → ASC. Any other field starts at
    /// ASC, which implicitly resets the previously ordered field.
    pub fn toggle(self, field: OrderableField) -> Order {
        match determine_order_dir(field, self.field, self.dir) {
            Some(dir) => Order::new(field, dir),
            None => Order::unordered(),
        }
    }

    /// `orderBy` query value, e.g. `visits-DESC`
    pub fn to_query(&self) -> Option<String> {
        match (self.field, self.dir) {
            (Some(field), Some(dir)) => Some(format!("{}-{}", field.api_name(), dir.as_str())),
            _ => None,
        }
    }
}

/// Next direction for `new_field` given the current ordering
pub fn determine_order_dir(
    new_field: OrderableField,
    current_field: Option<OrderableField>,
    current_dir: Option<OrderDir>,
) -> Option<OrderDir> {
    if current_field != Some(new_field) {
        return Some(OrderDir::Asc);
    }

    match current_dir {
        None => Some(OrderDir::Asc),
        Some(OrderDir::Asc) => Some(OrderDir::Desc),
        Some(OrderDir::Desc) => None,
    }
}
