//! Search/sort query builder for cards.
//!
//! Translates a structured search request into a parameterized SQL query.
//! Sort fields are checked against an explicit static whitelist (no column
//! identifier ever comes from user input), filters are composed
//! conjunctively, and the caller's ownership scope is injected as the first
//! condition for non-admin requesters.

use crate::error::AppError;
use crate::models::{SearchCardCriteria, SortBy};

/// Sort keys accepted by the search endpoint, mapped to the column
/// identifier used in the generated query. Declared once; anything outside
/// this set is rejected with `InvalidCriteria`.
pub const SORTABLE_FIELDS: &[(&str, &str)] = &[
    ("id", "id"),
    ("name", "name"),
    ("description", "description"),
    ("color", "color"),
    ("creation_date", "creation_date"),
    ("status", "status"),
    ("user_id", "user_id"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive parse per standard convention.
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "ASC" => Some(SortDirection::Asc),
            "DESC" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

fn lookup_column(field_name: &str) -> Result<&'static str, AppError> {
    SORTABLE_FIELDS
        .iter()
        .find(|(key, _)| *key == field_name)
        .map(|(_, column)| *column)
        .ok_or_else(|| {
            let accepted: Vec<&str> = SORTABLE_FIELDS.iter().map(|(key, _)| *key).collect();
            AppError::InvalidCriteria(format!(
                "Given fieldName is not correct: {}. Accepted keys: {:?}",
                field_name, accepted
            ))
        })
}

/// Validates the sort list and renders it as an ORDER BY clause, preserving
/// the order given (first entry is the primary sort key). An empty list
/// yields an empty clause.
pub fn build_order_by(sort_map: &[SortBy]) -> Result<String, AppError> {
    if sort_map.is_empty() {
        return Ok(String::new());
    }

    let mut clauses = Vec::with_capacity(sort_map.len());
    for sort in sort_map {
        let column = lookup_column(&sort.field_name)?;
        let direction = SortDirection::parse(&sort.direction).ok_or_else(|| {
            AppError::InvalidCriteria(format!(
                "Given direction is not correct: {}. Accepted values: [\"ASC\", \"DESC\"]",
                sort.direction
            ))
        })?;
        clauses.push(format!("{} {}", column, direction.as_sql()));
    }
    Ok(format!(" ORDER BY {}", clauses.join(", ")))
}

/// Row offset for a page. Page and size are validated as non-negative but
/// otherwise unbounded, so the product is checked instead of trusted.
pub fn page_offset(page: i64, size: i64) -> Result<i64, AppError> {
    page.checked_mul(size)
        .ok_or_else(|| AppError::InvalidCriteria(format!("Given page is out of range: {}", page)))
}

/// The generated SQL for one search: the paged select and the matching
/// count query. Bind order is: owner id (if scoped), name pattern, color
/// pattern, status, creation date, then limit and offset (select only).
pub struct SearchQuery {
    pub select_sql: String,
    pub count_sql: String,
}

/// Builds the search query for the given criteria.
///
/// `owner_id` is `Some` for non-admin requesters and injects the ownership
/// scope; admins pass `None` and see all cards.
pub fn build_search_query(
    criteria: &SearchCardCriteria,
    owner_id: Option<i32>,
) -> Result<SearchQuery, AppError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_count = 1;

    if owner_id.is_some() {
        conditions.push(format!("user_id = ${}", param_count));
        param_count += 1;
    }
    if criteria.name.is_some() {
        conditions.push(format!("name ILIKE ${}", param_count));
        param_count += 1;
    }
    if criteria.color.is_some() {
        conditions.push(format!("color ILIKE ${}", param_count));
        param_count += 1;
    }
    if criteria.status.is_some() {
        conditions.push(format!("status = ${}", param_count));
        param_count += 1;
    }
    if criteria.creation_date.is_some() {
        conditions.push(format!("creation_date = ${}", param_count));
        param_count += 1;
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let order_by = build_order_by(&criteria.sort_map)?;

    let select_sql = format!(
        "SELECT id, name, description, color, creation_date, status, user_id FROM cards{}{} LIMIT ${} OFFSET ${}",
        where_clause,
        order_by,
        param_count,
        param_count + 1
    );
    let count_sql = format!("SELECT COUNT(*) FROM cards{}", where_clause);

    Ok(SearchQuery {
        select_sql,
        count_sql,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardStatus;

    fn criteria() -> SearchCardCriteria {
        SearchCardCriteria {
            name: None,
            color: None,
            status: None,
            creation_date: None,
            page: 0,
            size: 10,
            sort_map: vec![],
        }
    }

    fn sort(field_name: &str, direction: &str) -> SortBy {
        SortBy {
            field_name: field_name.to_string(),
            direction: direction.to_string(),
        }
    }

    #[test]
    fn test_order_by_accepts_whitelisted_fields() {
        for (key, _) in SORTABLE_FIELDS.iter().copied() {
            let clause = build_order_by(&[sort(key, "asc")]).unwrap();
            assert!(clause.contains(key), "missing {} in {}", key, clause);
        }
    }

    #[test]
    fn test_order_by_rejects_unknown_field() {
        for direction in ["ASC", "DESC"] {
            let err = build_order_by(&[sort("password_hash", direction)]).unwrap_err();
            match err {
                AppError::InvalidCriteria(msg) => {
                    assert!(msg.contains("password_hash"));
                    assert!(msg.contains("Accepted keys"));
                }
                other => panic!("expected InvalidCriteria, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_order_by_direction_case_insensitive() {
        assert_eq!(
            build_order_by(&[sort("name", "asc")]).unwrap(),
            " ORDER BY name ASC"
        );
        assert_eq!(
            build_order_by(&[sort("name", "Desc")]).unwrap(),
            " ORDER BY name DESC"
        );
    }

    #[test]
    fn test_order_by_rejects_bad_direction() {
        let err = build_order_by(&[sort("name", "sideways")]).unwrap_err();
        match err {
            AppError::InvalidCriteria(msg) => {
                assert!(msg.contains("sideways"));
                assert!(msg.contains("Accepted values"));
            }
            other => panic!("expected InvalidCriteria, got {:?}", other),
        }
    }

    #[test]
    fn test_order_by_preserves_order() {
        let clause =
            build_order_by(&[sort("status", "desc"), sort("creation_date", "asc")]).unwrap();
        assert_eq!(clause, " ORDER BY status DESC, creation_date ASC");
    }

    #[test]
    fn test_admin_unfiltered_query_has_no_where() {
        let query = build_search_query(&criteria(), None).unwrap();
        assert!(!query.select_sql.contains("WHERE"));
        assert!(query.select_sql.contains("LIMIT $1 OFFSET $2"));
        assert_eq!(query.count_sql, "SELECT COUNT(*) FROM cards");
    }

    #[test]
    fn test_owner_scope_is_injected_for_users() {
        let query = build_search_query(&criteria(), Some(42)).unwrap();
        assert!(query.select_sql.contains("WHERE user_id = $1"));
        assert!(query.count_sql.contains("WHERE user_id = $1"));
        assert!(query.select_sql.contains("LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn test_filters_are_conjunctive_and_numbered() {
        let mut criteria = criteria();
        criteria.name = Some("shopping".to_string());
        criteria.color = Some("#00".to_string());
        criteria.status = Some(CardStatus::Todo);
        criteria.creation_date = Some(chrono::Utc::now());

        let query = build_search_query(&criteria, Some(7)).unwrap();
        assert!(query.select_sql.contains("user_id = $1"));
        assert!(query.select_sql.contains("name ILIKE $2"));
        assert!(query.select_sql.contains("color ILIKE $3"));
        assert!(query.select_sql.contains("status = $4"));
        assert!(query.select_sql.contains("creation_date = $5"));
        assert!(query.select_sql.contains(" AND "));
        assert!(query.select_sql.contains("LIMIT $6 OFFSET $7"));

        // Count query shares the filters but not the pagination.
        assert!(query.count_sql.contains("creation_date = $5"));
        assert!(!query.count_sql.contains("LIMIT"));
    }

    #[test]
    fn test_page_offset_overflow_is_invalid_criteria() {
        assert_eq!(page_offset(0, 10).unwrap(), 0);
        assert_eq!(page_offset(3, 25).unwrap(), 75);

        match page_offset(i64::MAX, 2) {
            Err(AppError::InvalidCriteria(msg)) => assert!(msg.contains("out of range")),
            other => panic!("expected InvalidCriteria, got {:?}", other),
        }
    }

    #[test]
    fn test_sort_errors_propagate_from_builder() {
        let mut criteria = criteria();
        criteria.sort_map = vec![sort("owner", "asc")];
        assert!(matches!(
            build_search_query(&criteria, None),
            Err(AppError::InvalidCriteria(_))
        ));
    }
}
