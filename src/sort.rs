/// Sort options and the row comparator.
///
/// The default order is by row key, ascending. Sorting by any other column
/// disables row spans until the store is sorted by row key again, because
/// span groups are only contiguous in key order.

use crate::row::Row;
use crate::schema::ROW_KEY_COLUMN;
use crate::value::CellValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort order specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(is_ascending: bool) -> Self {
        if is_ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOptions {
    pub column_name: String,
    pub is_ascending: bool,
    pub use_client_sort: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        SortOptions {
            column_name: ROW_KEY_COLUMN.to_string(),
            is_ascending: true,
            use_client_sort: true,
        }
    }
}

/// Payload describing an accepted change of sort options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortChange {
    pub column_name: String,
    pub is_ascending: bool,
    pub is_require_fetch: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SortController {
    options: SortOptions,
}

impl SortController {
    pub fn new(use_client_sort: bool) -> Self {
        SortController {
            options: SortOptions {
                use_client_sort,
                ..SortOptions::default()
            },
        }
    }

    pub fn options(&self) -> &SortOptions {
        &self.options
    }

    pub fn order(&self) -> SortOrder {
        SortOrder::from_ascending(self.options.is_ascending)
    }

    pub fn is_sorted_by_field(&self) -> bool {
        self.options.column_name != ROW_KEY_COLUMN
    }

    pub fn is_row_span_enable(&self) -> bool {
        !self.is_sorted_by_field()
    }

    /// Direction for `sort_by_field` when the caller gave none: toggle when
    /// re-sorting the current column, ascending otherwise.
    pub fn resolve_direction(&self, column_name: &str, is_ascending: Option<bool>) -> bool {
        is_ascending.unwrap_or_else(|| {
            if self.options.column_name == column_name {
                !self.options.is_ascending
            } else {
                true
            }
        })
    }

    /// Store new option values. Returns the change when something differed.
    pub fn set_values(
        &mut self,
        column_name: Option<&str>,
        is_ascending: Option<bool>,
        is_require_fetch: bool,
    ) -> Option<SortChange> {
        let column_name = column_name.unwrap_or(ROW_KEY_COLUMN);
        let is_ascending = is_ascending.unwrap_or(true);

        let changed = self.options.column_name != column_name || self.options.is_ascending != is_ascending;
        self.options.column_name = column_name.to_string();
        self.options.is_ascending = is_ascending;

        changed.then(|| SortChange {
            column_name: column_name.to_string(),
            is_ascending,
            is_require_fetch,
        })
    }

    /// Compare two rows on the configured column and direction.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let base = if self.is_sorted_by_field() {
            let column = self.options.column_name.as_str();
            compare_cells(a.get(column), b.get(column))
        } else {
            a.key().cmp(b.key())
        };

        match self.order() {
            SortOrder::Ascending => base,
            SortOrder::Descending => base.reverse(),
        }
    }

    /// Stable in-place sort; rows that compare equal keep their relative order.
    pub fn sort(&self, rows: &mut [Row]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }
}

fn compare_cells(a: Option<&CellValue>, b: Option<&CellValue>) -> Ordering {
    let empty = CellValue::empty();
    a.unwrap_or(&empty).compare(b.unwrap_or(&empty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::RowState;
    use crate::value::RowKey;

    fn row(key: i64, score: i64, name: &str) -> Row {
        Row::new(
            RowKey::Int(key),
            vec![
                ("score".to_string(), CellValue::from(score)),
                ("name".to_string(), CellValue::from(name)),
            ],
            RowState::Normal,
        )
    }

    fn keys(rows: &[Row]) -> Vec<i64> {
        rows.iter().filter_map(|r| r.key().as_int()).collect()
    }

    #[test]
    fn test_default_options() {
        let sort = SortController::new(true);
        assert_eq!(sort.options().column_name, "rowKey");
        assert!(sort.options().is_ascending);
        assert!(sort.is_row_span_enable());
    }

    #[test]
    fn test_resolve_direction_toggles_same_column() {
        let mut sort = SortController::new(true);
        sort.set_values(Some("score"), Some(true), false);
        assert!(!sort.resolve_direction("score", None));
        assert!(sort.resolve_direction("name", None));
        assert!(!sort.resolve_direction("name", Some(false)));
    }

    #[test]
    fn test_set_values_reports_changes_only() {
        let mut sort = SortController::new(true);
        assert!(sort.set_values(None, None, false).is_none());

        let change = sort.set_values(Some("name"), Some(false), true).unwrap();
        assert_eq!(change.column_name, "name");
        assert!(!change.is_ascending);
        assert!(change.is_require_fetch);
        assert!(!sort.is_row_span_enable());
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut sort = SortController::new(true);
        let mut rows = vec![row(0, 2, "a"), row(1, 1, "b"), row(2, 2, "c"), row(3, 1, "d")];

        sort.set_values(Some("score"), Some(true), false);
        sort.sort(&mut rows);
        assert_eq!(keys(&rows), vec![1, 3, 0, 2]);

        sort.set_values(Some("score"), Some(false), false);
        sort.sort(&mut rows);
        assert_eq!(keys(&rows), vec![0, 2, 1, 3]);

        sort.set_values(None, None, false);
        sort.sort(&mut rows);
        assert_eq!(keys(&rows), vec![0, 1, 2, 3]);
    }
}
