use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

lazy_static! {
    // Hex color with leading '#', e.g. "#A0B1C2"
    static ref COLOR_REGEX: Regex = Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap();
}

/// Statuses which a card can have.
/// Corresponds to the `card_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "card_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CardStatus {
    /// Card is yet to be started. Forced initial status on creation.
    Todo,
    /// Card is currently being worked on.
    InProgress,
    /// Card is completed.
    Done,
}

/// A card entity as stored in the database and returned by the API.
///
/// The owner id is persisted but never serialized; clients only ever see
/// their own cards (or, for admins, cards they are entitled to manage).
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    /// Server-assigned at creation, never client-supplied, never updated.
    pub creation_date: DateTime<Utc>,
    pub status: CardStatus,
    #[serde(skip)]
    pub user_id: i32,
}

/// Input for creating a card. Status and creation date are server-assigned
/// and deliberately absent here.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateCardRequest {
    #[validate(
        length(min = 1, message = "Name card is required"),
        custom(function = "not_blank", message = "Name of the card cannot be blank")
    )]
    pub name: String,
    pub description: Option<String>,
    #[validate(regex(
        path = "COLOR_REGEX",
        message = "Color should be 6 alphanumeric characters prefixed with #"
    ))]
    pub color: Option<String>,
}

/// Input for updating a card. The card id travels in the body; every field
/// overwrites the stored value unconditionally once authorization passes.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    pub card_id: i32,
    #[validate(
        length(min = 1, message = "Name card is required"),
        custom(function = "not_blank", message = "Name of the card cannot be blank")
    )]
    pub name: String,
    pub description: Option<String>,
    #[validate(regex(
        path = "COLOR_REGEX",
        message = "Color should be 6 alphanumeric characters prefixed with #"
    ))]
    pub color: Option<String>,
    pub status: CardStatus,
}

/// One sort entry of a search request. Field name and direction are kept as
/// raw strings so the query builder can reject them with `InvalidCriteria`
/// instead of a generic deserialization failure.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SortBy {
    pub field_name: String,
    pub direction: String,
}

/// Search criteria for cards. Absent filters impose no constraint.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchCardCriteria {
    pub name: Option<String>,
    pub color: Option<String>,
    pub status: Option<CardStatus>,
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub page: i64,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1))]
    pub size: i64,
    #[serde(default)]
    pub sort_map: Vec<SortBy>,
}

fn default_page_size() -> i64 {
    10
}

/// One page of search results with offset/limit pagination metadata.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, page: i64, size: i64, total_elements: i64) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + size - 1) / size
        };
        Self {
            content,
            page,
            size,
            total_elements,
            total_pages,
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}
