//! Paginated response envelope

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Paginated response wrapper
///
/// Pages are 1-indexed. `from` and `to` are the 1-based positions of the
/// first and last record of the page within the full result set, null when
/// the page is empty. `last_page` is never below 1.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Paginated<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub current_page: i64,
    pub data: Vec<T>,
    pub from: Option<i64>,
    pub last_page: i64,
    pub per_page: i64,
    pub to: Option<i64>,
    pub total: i64,
}

impl<T> Paginated<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Wrap one page of records with its metadata
    pub fn new(data: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        let last_page = if total == 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let from = (page - 1) * per_page + 1;
            (Some(from), Some(from + data.len() as i64 - 1))
        };
        Self {
            current_page: page,
            data,
            from,
            last_page,
            per_page,
            to,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, serde::Deserialize, ToSchema)]
    struct Row {
        id: i32,
    }

    fn rows(n: i32) -> Vec<Row> {
        (0..n).map(|id| Row { id }).collect()
    }

    #[test]
    fn test_single_page() {
        let page = Paginated::new(rows(3), 3, 1, 10);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.last_page, 1);
        assert_eq!(page.from, Some(1));
        assert_eq!(page.to, Some(3));
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_middle_page() {
        let page = Paginated::new(rows(10), 25, 2, 10);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.from, Some(11));
        assert_eq!(page.to, Some(20));
    }

    #[test]
    fn test_partial_last_page() {
        let page = Paginated::new(rows(5), 25, 3, 10);
        assert_eq!(page.from, Some(21));
        assert_eq!(page.to, Some(25));
    }

    #[test]
    fn test_empty_result() {
        let page = Paginated::new(rows(0), 0, 1, 10);
        assert_eq!(page.last_page, 1);
        assert_eq!(page.from, None);
        assert_eq!(page.to, None);
        assert_eq!(page.total, 0);
    }
}
