/// Rectangular paste into the grid.
///
/// Pasted data is a list of rows of values, addressed from a start position
/// in visible coordinates (hidden columns are not counted). Rows beyond the
/// end of the store are appended as blank rows. Columns beyond the last
/// visible column are dropped.

use crate::events::StoreEvent;
use crate::store::{AppendOptions, RowStore};
use crate::value::CellValue;
use serde::{Deserialize, Serialize};

/// A cell address: row position and visible column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPosition {
    pub row: usize,
    pub column: usize,
}

impl GridPosition {
    pub fn new(row: usize, column: usize) -> Self {
        GridPosition { row, column }
    }
}

/// The rectangle a paste covered, both corners inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteRange {
    pub start: GridPosition,
    pub end: GridPosition,
}

impl RowStore {
    /// Bottom-right corner a paste of `data` at `start` would reach.
    /// `None` when there is nothing to paste.
    pub fn paste_end_index(&self, data: &[Vec<CellValue>], start: GridPosition) -> Option<GridPosition> {
        let width = data.first()?.len();
        let column = (start.column + width)
            .min(self.schema.visible_len())
            .checked_sub(1)?;
        Some(GridPosition {
            row: start.row + data.len() - 1,
            column,
        })
    }

    /// Paste `data` with its top-left cell at `start`.
    ///
    /// Only writable cells are written, and never span siblings; a value
    /// written to a span main row is copied to the rest of its group. Values
    /// are stored as given. Returns the covered range, `None` when `data` is
    /// empty or there are no visible columns.
    pub fn paste(&mut self, data: &[Vec<CellValue>], start: GridPosition) -> Option<PasteRange> {
        let end = self.paste_end_index(data, start)?;
        if start.column > end.column {
            log::warn!(
                "paste start column {} is past the last visible column {}",
                start.column,
                end.column
            );
        }

        for (offset, values) in data.iter().enumerate() {
            let mut pos = start.row + offset;
            if pos >= self.rows.len() {
                if let Err(err) = self.append(Vec::new(), AppendOptions::default()) {
                    log::warn!("paste stopped at row {}: {}", pos, err);
                    break;
                }
                pos = self.rows.len() - 1;
            }

            let writes: Vec<(String, CellValue)> = (start.column..=end.column)
                .filter_map(|column_index| {
                    let column = self.schema.column_at(column_index)?;
                    let value = values.get(column_index - start.column)?;
                    self.can_paste_into(pos, column.name())
                        .then(|| (column.name().to_string(), value.clone()))
                })
                .collect();

            for (column, value) in writes {
                self.rows[pos].set(&column, value);
                if self.is_row_span_enable()
                    && self.rows[pos].span_data(&column).is_some_and(|span| span.is_main_row)
                {
                    self.propagate_span_value(pos, &column);
                }
                self.events.emit(StoreEvent::Change {
                    row_key: self.rows[pos].key().clone(),
                    column_name: column,
                });
            }
        }

        self.events.emit(StoreEvent::Paste { start, end });
        Some(PasteRange { start, end })
    }

    fn can_paste_into(&self, pos: usize, column: &str) -> bool {
        let is_sibling = self.is_row_span_enable()
            && self.rows[pos].span_data(column).is_some_and(|span| span.count < 0);
        !is_sibling && self.cell_state_at(pos, column).is_writable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::RowInput;
    use crate::schema::{ColumnDef, ColumnSchema, EditType, StoreOptions};
    use crate::value::RowKey;
    use pretty_assertions::assert_eq;

    fn schema() -> ColumnSchema {
        ColumnSchema::new(vec![
            ColumnDef::new("a").edit_type(EditType::Text),
            ColumnDef::new("hidden").edit_type(EditType::Text).hidden(),
            ColumnDef::new("b").edit_type(EditType::Text),
            ColumnDef::new("c"),
        ])
    }

    fn grid(values: &[&[&str]]) -> Vec<Vec<CellValue>> {
        values
            .iter()
            .map(|row| row.iter().map(|v| CellValue::from(*v)).collect())
            .collect()
    }

    fn column(store: &RowStore, name: &str) -> Vec<String> {
        store.get_column_values(name).iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_paste_appends_missing_rows() {
        let mut store = RowStore::from_rows(schema(), StoreOptions::default(), vec![RowInput::new()]).unwrap();
        let range = store
            .paste(&grid(&[&["1", "2"], &["3", "4"], &["5", "6"]]), GridPosition::new(0, 0))
            .unwrap();

        assert_eq!(range.end, GridPosition::new(2, 1));
        assert_eq!(store.len(), 3);
        assert_eq!(column(&store, "a"), vec!["1", "3", "5"]);
        assert_eq!(column(&store, "b"), vec!["2", "4", "6"]);
        assert_eq!(column(&store, "hidden"), vec!["", "", ""]);
    }

    #[test]
    fn test_paste_clips_to_visible_columns_and_skips_read_only() {
        let mut store = RowStore::from_rows(schema(), StoreOptions::default(), vec![RowInput::new()]).unwrap();
        let range = store.paste(&grid(&[&["x", "y", "z"]]), GridPosition::new(0, 1)).unwrap();

        // visible columns are a, b, c; c has no edit type
        assert_eq!(range.end.column, 2);
        assert_eq!(column(&store, "b"), vec!["x"]);
        assert_eq!(column(&store, "c"), vec![""]);
    }

    #[test]
    fn test_paste_skips_span_siblings_and_propagates_from_main() {
        let mut store = RowStore::from_rows(
            schema(),
            StoreOptions::default(),
            vec![RowInput::new().cell("a", "M").span("a", 2), RowInput::new(), RowInput::new()],
        )
        .unwrap();

        store.paste(&grid(&[&["top"], &["mid"], &["low"]]), GridPosition::new(0, 0));
        assert_eq!(column(&store, "a"), vec!["top", "top", "low"]);
    }

    #[test]
    fn test_paste_skips_disabled_rows() {
        let mut store = RowStore::from_rows(schema(), StoreOptions::default(), vec![RowInput::new(); 2]).unwrap();
        store.disable_row(&RowKey::Int(0));
        store.paste(&grid(&[&["p"], &["q"]]), GridPosition::new(0, 0));
        assert_eq!(column(&store, "a"), vec!["", "q"]);
    }

    #[test]
    fn test_paste_nothing() {
        let mut store = RowStore::new(schema());
        assert!(store.paste(&[], GridPosition::new(0, 0)).is_none());
        assert!(store.paste(&[vec![]], GridPosition::new(0, 0)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_paste_values_are_not_trimmed() {
        let mut store = RowStore::from_rows(schema(), StoreOptions::default(), vec![RowInput::new()]).unwrap();
        store.paste(&grid(&[&["  padded "]]), GridPosition::new(0, 0));
        assert_eq!(column(&store, "a"), vec!["  padded "]);
    }
}
