/// Change tracking against a committed baseline.
///
/// The tracker keeps an independent copy of the rows as they were at the last
/// commit point (initial load, `set_original_row_list`, `set_row_list`).
/// Ordinary mutations never touch it, which is what makes the diff meaningful.
///
/// # Diff rules
///
/// - `create_list`: keys present now but not in the baseline
/// - `update_list`: keys in both whose non-ignored fields differ
/// - `delete_list`: keys in the baseline but gone now

use crate::row::Row;
use crate::value::RowKey;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Options for `RowStore::get_modified_row_list`.
#[derive(Debug, Clone, Default)]
pub struct ModifiedRowOptions {
    /// Only report created/updated rows whose checkbox is checked
    pub is_only_checked: bool,
    /// Keep internal fields in the output and compare them too
    pub is_raw: bool,
    /// Columns whose changes do not count as modifications
    pub filtering_column_list: Vec<String>,
}

impl ModifiedRowOptions {
    pub fn only_checked(mut self) -> Self {
        self.is_only_checked = true;
        self
    }

    pub fn raw(mut self) -> Self {
        self.is_raw = true;
        self
    }

    pub fn filtering(mut self, columns: &[&str]) -> Self {
        self.filtering_column_list = columns.iter().map(|c| c.to_string()).collect();
        self
    }
}

/// Created, updated and deleted entries, either full records or bare keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedRows<T> {
    pub create_list: Vec<T>,
    pub update_list: Vec<T>,
    pub delete_list: Vec<T>,
}

impl<T> Default for ModifiedRows<T> {
    fn default() -> Self {
        ModifiedRows {
            create_list: Vec::new(),
            update_list: Vec::new(),
            delete_list: Vec::new(),
        }
    }
}

impl<T> ModifiedRows<T> {
    pub fn is_empty(&self) -> bool {
        self.create_list.is_empty() && self.update_list.is_empty() && self.delete_list.is_empty()
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> ModifiedRows<U> {
        ModifiedRows {
            create_list: self.create_list.into_iter().map(&mut f).collect(),
            update_list: self.update_list.into_iter().map(&mut f).collect(),
            delete_list: self.delete_list.into_iter().map(&mut f).collect(),
        }
    }
}

/// Owner of the baseline snapshot.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    rows: Vec<Row>,
    index: HashMap<RowKey, usize>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the baseline with `rows`.
    pub fn capture(&mut self, rows: Vec<Row>) {
        self.index = rows
            .iter()
            .enumerate()
            .map(|(pos, row)| (row.key().clone(), pos))
            .collect();
        self.rows = rows;
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &RowKey) -> Option<&Row> {
        self.index.get(key).map(|&pos| &self.rows[pos])
    }

    /// Drop one row from the baseline. Returns false if it was not there.
    pub fn forget(&mut self, key: &RowKey) -> bool {
        let Some(pos) = self.index.remove(key) else {
            return false;
        };
        self.rows.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        true
    }

    /// Compare `current` against the baseline.
    ///
    /// Entries are references into `current` (created/updated) and into the
    /// baseline (deleted), in their respective iteration orders.
    pub fn diff<'a>(
        &'a self,
        current: &'a [Row],
        options: &ModifiedRowOptions,
        ignored: &HashSet<&str>,
    ) -> ModifiedRows<&'a Row> {
        let mut result = ModifiedRows::default();
        let mut current_keys = HashSet::with_capacity(current.len());

        for row in current {
            current_keys.insert(row.key());
            if options.is_only_checked && !row.is_checked() {
                continue;
            }
            match self.get(row.key()) {
                None => result.create_list.push(row),
                Some(original) if row.differs_from(original, ignored, options.is_raw) => {
                    result.update_list.push(row)
                }
                Some(_) => {}
            }
        }

        for original in &self.rows {
            if !current_keys.contains(original.key()) {
                result.delete_list.push(original);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::RowState;
    use crate::value::CellValue;
    use pretty_assertions::assert_eq;

    fn row(key: i64, value: &str) -> Row {
        Row::new(RowKey::Int(key), vec![("v".to_string(), CellValue::from(value))], RowState::Normal)
    }

    fn keys(rows: &[&Row]) -> Vec<RowKey> {
        rows.iter().map(|r| r.key().clone()).collect()
    }

    #[test]
    fn test_diff_create_update_delete() {
        let mut tracker = ChangeTracker::new();
        tracker.capture(vec![row(0, "a"), row(1, "b"), row(2, "c")]);

        let current = vec![row(0, "a"), row(2, "changed"), row(3, "new")];
        let diff = tracker.diff(&current, &ModifiedRowOptions::default(), &HashSet::new());

        assert_eq!(keys(&diff.create_list), vec![RowKey::Int(3)]);
        assert_eq!(keys(&diff.update_list), vec![RowKey::Int(2)]);
        assert_eq!(keys(&diff.delete_list), vec![RowKey::Int(1)]);
    }

    #[test]
    fn test_diff_ignores_filtered_columns() {
        let mut tracker = ChangeTracker::new();
        tracker.capture(vec![row(0, "a")]);
        let current = vec![row(0, "b")];

        let diff = tracker.diff(&current, &ModifiedRowOptions::default(), &HashSet::from(["v"]));
        assert!(diff.is_empty());
    }

    #[test]
    fn test_diff_only_checked() {
        let mut tracker = ChangeTracker::new();
        tracker.capture(vec![row(0, "a"), row(1, "b")]);

        let mut checked = row(1, "B");
        checked.set_checked(true);
        let current = vec![row(0, "A"), checked, row(5, "x")];

        let diff = tracker.diff(&current, &ModifiedRowOptions::default().only_checked(), &HashSet::new());
        assert!(diff.create_list.is_empty());
        assert_eq!(keys(&diff.update_list), vec![RowKey::Int(1)]);
    }

    #[test]
    fn test_forget_keeps_index_consistent() {
        let mut tracker = ChangeTracker::new();
        tracker.capture(vec![row(0, "a"), row(1, "b"), row(2, "c")]);

        assert!(tracker.forget(&RowKey::Int(0)));
        assert!(!tracker.forget(&RowKey::Int(0)));
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.get(&RowKey::Int(2)).unwrap().get("v"), Some(&CellValue::from("c")));
    }

    #[test]
    fn test_modified_rows_map_and_serialize() {
        let rows = ModifiedRows {
            create_list: vec![1],
            update_list: vec![],
            delete_list: vec![2, 3],
        };
        let doubled = rows.map(|v| v * 2);
        assert_eq!(doubled.delete_list, vec![4, 6]);
        assert_eq!(
            serde_json::to_value(&doubled).unwrap(),
            serde_json::json!({"createList": [2], "updateList": [], "deleteList": [4, 6]})
        );
    }
}
