/// Row records, row input and cell state.
///
/// A `Row` owns its key, an ordered list of `(column, value)` cells, its
/// checkbox state and the span descriptors for every column in which it takes
/// part in a merge.

use crate::error::{GridError, GridResult};
use crate::schema::{ColumnDef, CHECKED_COLUMN, ROW_KEY_COLUMN};
use crate::value::{CellValue, RowKey};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

/// A row as handed to collaborators: a JSON object keyed by column name.
pub type JsonRow = Map<String, JsonValue>;

/// Checkbox/enable state of a row, orthogonal to cell editability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowState {
    #[default]
    Normal,
    /// Row cells and checkbox disabled
    Disabled,
    /// Only the checkbox disabled
    DisabledCheck,
    /// Loaded as checked
    Checked,
}

impl RowState {
    pub fn is_disabled(&self) -> bool {
        matches!(self, RowState::Disabled)
    }

    pub fn is_check_disabled(&self) -> bool {
        matches!(self, RowState::Disabled | RowState::DisabledCheck)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RowState::Normal => "",
            RowState::Disabled => "DISABLED",
            RowState::DisabledCheck => "DISABLED_CHECK",
            RowState::Checked => "CHECKED",
        }
    }
}

impl FromStr for RowState {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "NORMAL" => Ok(RowState::Normal),
            "DISABLED" => Ok(RowState::Disabled),
            "DISABLED_CHECK" => Ok(RowState::DisabledCheck),
            "CHECKED" => Ok(RowState::Checked),
            _ => Err(GridError::UnknownRowState(s.to_string())),
        }
    }
}

/// Membership of a row in a vertical merge for one column.
///
/// `count` is the block length on the main row and the negative distance to
/// the main row on every other member (`-1` directly below the main row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanDescriptor {
    pub is_main_row: bool,
    pub main_row_key: RowKey,
    pub count: i64,
}

impl SpanDescriptor {
    pub fn main(key: RowKey, count: i64) -> Self {
        SpanDescriptor {
            is_main_row: true,
            main_row_key: key,
            count,
        }
    }

    pub fn sibling(main_key: RowKey, offset: i64) -> Self {
        SpanDescriptor {
            is_main_row: false,
            main_row_key: main_key,
            count: -offset,
        }
    }

    /// Distance from the main row (0 for the main row itself).
    pub fn offset(&self) -> i64 {
        if self.is_main_row {
            0
        } else {
            -self.count
        }
    }
}

/// Unformatted row data: cells plus the `_extraData` declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowInput {
    pub cells: Vec<(String, CellValue)>,
    pub row_state: Option<RowState>,
    /// Declared merges: column name -> number of rows, counted from this row
    pub row_span: BTreeMap<String, usize>,
}

impl RowInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        set_cell(&mut self.cells, column.into(), value.into());
        self
    }

    pub fn span(mut self, column: impl Into<String>, count: usize) -> Self {
        self.row_span.insert(column.into(), count);
        self
    }

    pub fn state(mut self, state: RowState) -> Self {
        self.row_state = Some(state);
        self
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(name, _)| name == column).map(|(_, v)| v)
    }

    /// Parse a JSON object row.
    ///
    /// `_extraData.rowSpan` and `_extraData.rowState` are read; the private
    /// `rowKey`, `_button` and `_extraData` fields never become cells.
    pub fn from_json(value: &JsonValue) -> GridResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| GridError::InvalidRowData(format!("expected an object, got {}", value)))?;

        let mut input = RowInput::new();
        for (name, value) in obj {
            match name.as_str() {
                "_extraData" => input.read_extra_data(value)?,
                ROW_KEY_COLUMN | CHECKED_COLUMN => {}
                _ => set_cell(&mut input.cells, name.clone(), CellValue::from(value.clone())),
            }
        }
        Ok(input)
    }

    /// Parse a JSON array of rows, or an object wrapping one under `contents`.
    /// Entries that are not objects are skipped.
    pub fn list_from_json(value: &JsonValue) -> GridResult<Vec<Self>> {
        let list = match value {
            JsonValue::Object(obj) => obj.get("contents").and_then(|c| c.as_array()),
            JsonValue::Array(list) => Some(list),
            _ => None,
        }
        .ok_or_else(|| GridError::InvalidRowData("expected an array of rows".to_string()))?;

        list.iter()
            .filter(|v| {
                let keep = v.is_object();
                if !keep {
                    log::debug!("skipping non-object row entry: {}", v);
                }
                keep
            })
            .map(RowInput::from_json)
            .collect()
    }

    pub fn list_from_json_str(json: &str) -> GridResult<Vec<Self>> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::list_from_json(&value)
    }

    fn read_extra_data(&mut self, extra: &JsonValue) -> GridResult<()> {
        if extra.is_null() {
            return Ok(());
        }
        let extra = extra
            .as_object()
            .ok_or_else(|| GridError::InvalidRowData("_extraData must be an object".to_string()))?;

        if let Some(state) = extra.get("rowState").and_then(|s| s.as_str()) {
            self.row_state = Some(state.parse()?);
        }
        if let Some(spans) = extra.get("rowSpan").and_then(|s| s.as_object()) {
            for (column, count) in spans {
                let count = count.as_u64().ok_or_else(|| {
                    GridError::InvalidRowData(format!("rowSpan for '{}' must be a positive integer", column))
                })?;
                self.row_span.insert(column.clone(), count as usize);
            }
        }
        Ok(())
    }
}

fn set_cell(cells: &mut Vec<(String, CellValue)>, column: String, value: CellValue) {
    match cells.iter_mut().find(|(name, _)| *name == column) {
        Some(slot) => slot.1 = value,
        None => cells.push((column, value)),
    }
}

/// A formatted row owned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    key: RowKey,
    cells: Vec<(String, CellValue)>,
    state: RowState,
    checked: bool,
    span: BTreeMap<String, SpanDescriptor>,
}

impl Row {
    pub fn new(key: RowKey, cells: Vec<(String, CellValue)>, state: RowState) -> Self {
        Row {
            key,
            cells,
            checked: state == RowState::Checked,
            state,
            span: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &RowKey {
        &self.key
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(name, _)| name == column).map(|(_, v)| v)
    }

    /// Value used for display and comparison: missing cells read as "".
    pub fn value_or_empty(&self, column: &str) -> CellValue {
        self.get(column).cloned().unwrap_or_default()
    }

    pub fn set(&mut self, column: &str, value: CellValue) {
        set_cell(&mut self.cells, column.to_string(), value);
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(name, v)| (name.as_str(), v))
    }

    pub fn state(&self) -> RowState {
        self.state
    }

    pub fn set_state(&mut self, state: RowState) {
        self.state = state;
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn span_data(&self, column: &str) -> Option<&SpanDescriptor> {
        self.span.get(column)
    }

    pub fn span_entries(&self) -> &BTreeMap<String, SpanDescriptor> {
        &self.span
    }

    pub fn set_span_data(&mut self, column: &str, data: Option<SpanDescriptor>) {
        match data {
            Some(data) => {
                self.span.insert(column.to_string(), data);
            }
            None => {
                self.span.remove(column);
            }
        }
    }

    /// True when any non-ignored visible field differs from `other`.
    ///
    /// With `raw` the checkbox flag, row state and span data are compared too.
    pub fn differs_from(&self, other: &Row, ignored: &HashSet<&str>, raw: bool) -> bool {
        let columns = self
            .cells
            .iter()
            .chain(other.cells.iter())
            .map(|(name, _)| name.as_str())
            .filter(|name| !ignored.contains(name));

        for column in columns {
            if self.value_or_empty(column) != other.value_or_empty(column) {
                return true;
            }
        }

        raw && (self.checked != other.checked || self.state != other.state || self.span != other.span)
    }

    /// JSON record of the row. Without `raw`, internal fields are stripped.
    pub fn to_json(&self, raw: bool) -> JsonRow {
        let mut obj = Map::new();
        for (name, value) in &self.cells {
            obj.insert(name.clone(), value.to_json());
        }
        obj.insert(ROW_KEY_COLUMN.to_string(), self.key.to_json());

        if raw {
            let mut extra = Map::new();
            extra.insert(
                "rowState".to_string(),
                match self.state {
                    RowState::Normal => JsonValue::Null,
                    state => JsonValue::String(state.as_str().to_string()),
                },
            );
            extra.insert(
                "rowSpanData".to_string(),
                if self.span.is_empty() {
                    JsonValue::Null
                } else {
                    serde_json::to_value(&self.span).unwrap_or(JsonValue::Null)
                },
            );
            obj.insert("_extraData".to_string(), JsonValue::Object(extra));
            obj.insert(CHECKED_COLUMN.to_string(), JsonValue::Bool(self.checked));
        }
        obj
    }
}

/// Editability of a single cell as resolved by a `CellStateProvider`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellState {
    pub is_editable: bool,
    pub is_disabled: bool,
}

impl CellState {
    pub fn is_writable(&self) -> bool {
        self.is_editable && !self.is_disabled
    }
}

/// Resolves per-cell editable/disabled state. Hosts can plug in their own
/// rules; the store only queries it.
pub trait CellStateProvider {
    fn cell_state(&self, row: &Row, column: &ColumnDef, store_disabled: bool) -> CellState;
}

/// Editable when the column has an edit type and is not read-only; disabled
/// when the store, the row or the column is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCellState;

impl CellStateProvider for DefaultCellState {
    fn cell_state(&self, row: &Row, column: &ColumnDef, store_disabled: bool) -> CellState {
        CellState {
            is_editable: column.is_editable && column.edit_type.is_editable(),
            is_disabled: store_disabled || row.state().is_disabled() || column.is_disabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EditType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_row_input_from_json_reads_extra_data() {
        let input = RowInput::from_json(&json!({
            "name": "A",
            "rowKey": 9,
            "_button": true,
            "_extraData": {"rowSpan": {"name": 3}, "rowState": "DISABLED_CHECK"}
        }))
        .unwrap();

        assert_eq!(input.cells, vec![("name".to_string(), CellValue::from("A"))]);
        assert_eq!(input.row_span.get("name"), Some(&3));
        assert_eq!(input.row_state, Some(RowState::DisabledCheck));
    }

    #[test]
    fn test_list_from_json_skips_non_objects() {
        let rows = RowInput::list_from_json(&json!([{"a": 1}, 5, "x", {"a": 2}])).unwrap();
        assert_eq!(rows.len(), 2);

        let wrapped = RowInput::list_from_json(&json!({"contents": [{"a": 1}]})).unwrap();
        assert_eq!(wrapped.len(), 1);
    }

    #[test]
    fn test_invalid_row_state_is_rejected() {
        let err = RowInput::from_json(&json!({"_extraData": {"rowState": "ON"}})).unwrap_err();
        assert!(matches!(err, GridError::UnknownRowState(_)));
    }

    #[test]
    fn test_row_json_strips_private_fields() {
        let mut row = Row::new(RowKey::Int(1), vec![("a".to_string(), CellValue::from("x"))], RowState::Checked);
        row.set_span_data("a", Some(SpanDescriptor::main(RowKey::Int(1), 2)));

        let public = row.to_json(false);
        assert_eq!(JsonValue::Object(public), json!({"a": "x", "rowKey": 1}));

        let raw = row.to_json(true);
        assert_eq!(raw["_button"], json!(true));
        assert_eq!(raw["_extraData"]["rowState"], json!("CHECKED"));
        assert_eq!(
            raw["_extraData"]["rowSpanData"]["a"],
            json!({"isMainRow": true, "mainRowKey": 1, "count": 2})
        );
    }

    #[test]
    fn test_differs_from_treats_missing_as_empty() {
        let a = Row::new(RowKey::Int(0), vec![("x".to_string(), CellValue::empty())], RowState::Normal);
        let b = Row::new(RowKey::Int(0), vec![], RowState::Normal);
        let none = HashSet::new();
        assert!(!a.differs_from(&b, &none, false));

        let c = Row::new(RowKey::Int(0), vec![("x".to_string(), CellValue::from("v"))], RowState::Normal);
        assert!(a.differs_from(&c, &none, false));
        assert!(!a.differs_from(&c, &HashSet::from(["x"]), false));
    }

    #[test]
    fn test_differs_from_raw_compares_checkbox() {
        let a = Row::new(RowKey::Int(0), vec![], RowState::Normal);
        let mut b = a.clone();
        b.set_checked(true);
        let none = HashSet::new();
        assert!(!a.differs_from(&b, &none, false));
        assert!(a.differs_from(&b, &none, true));
    }

    #[test]
    fn test_default_cell_state() {
        let row = Row::new(RowKey::Int(0), vec![], RowState::Disabled);
        let column = ColumnDef::new("a").edit_type(EditType::Text);
        let state = DefaultCellState.cell_state(&row, &column, false);
        assert!(state.is_editable);
        assert!(state.is_disabled);
        assert!(!state.is_writable());

        let plain = ColumnDef::new("b");
        let normal_row = Row::new(RowKey::Int(1), vec![], RowState::Normal);
        assert!(!DefaultCellState.cell_state(&normal_row, &plain, false).is_editable);
    }
}
