/// Column schema and store configuration.
///
/// `ColumnSchema` is the collaborator the row store consults for column
/// order, visibility, required flags, edit types and columns that are ignored
/// when computing changes.
///
/// # Examples
///
/// ```
/// use gridstore::{ColumnDef, ColumnSchema, EditType};
///
/// let schema = ColumnSchema::new(vec![
///     ColumnDef::new("name").edit_type(EditType::Text).required(),
///     ColumnDef::new("memo").hidden(),
///     ColumnDef::new("age").edit_type(EditType::Text),
/// ]);
///
/// assert_eq!(schema.visible_len(), 2);
/// assert_eq!(schema.column_at(1).map(|c| c.name()), Some("age"));
/// ```

use crate::error::{GridError, GridResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name under which the row key is exposed in row records and sort options.
pub const ROW_KEY_COLUMN: &str = "rowKey";

/// Name of the selection checkbox field in raw row records.
pub const CHECKED_COLUMN: &str = "_button";

/// How a cell is edited by the grid. Only the text family can be cleared by `del`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditType {
    /// Display only
    #[default]
    Normal,
    Text,
    TextConvertible,
    TextPassword,
    Select,
    Checkbox,
    Radio,
}

impl EditType {
    pub fn is_editable(&self) -> bool {
        !matches!(self, EditType::Normal)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, EditType::Text | EditType::TextConvertible | EditType::TextPassword)
    }
}

impl FromStr for EditType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" | "" => Ok(EditType::Normal),
            "text" => Ok(EditType::Text),
            "text-convertible" => Ok(EditType::TextConvertible),
            "text-password" => Ok(EditType::TextPassword),
            "select" => Ok(EditType::Select),
            "checkbox" => Ok(EditType::Checkbox),
            "radio" => Ok(EditType::Radio),
            _ => Err(GridError::UnknownEditType(s.to_string())),
        }
    }
}

/// Selection mode of the row checkbox column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectType {
    /// No selection column; `check` has no effect
    #[default]
    None,
    Checkbox,
    /// Single-select: checking a row unchecks every other row
    Radio,
}

impl FromStr for SelectType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "none" => Ok(SelectType::None),
            "checkbox" => Ok(SelectType::Checkbox),
            "radio" => Ok(SelectType::Radio),
            _ => Err(GridError::UnknownSelectType(s.to_string())),
        }
    }
}

/// Definition of a single data column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub column_name: String,
    #[serde(default)]
    pub edit_type: EditType,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_hidden: bool,
    /// Excluded from change detection
    #[serde(default)]
    pub is_ignored: bool,
    #[serde(default = "default_true")]
    pub is_editable: bool,
    #[serde(default)]
    pub is_disabled: bool,
}

fn default_true() -> bool {
    true
}

impl ColumnDef {
    pub fn new(name: impl Into<String>) -> Self {
        ColumnDef {
            column_name: name.into(),
            edit_type: EditType::Normal,
            is_required: false,
            is_hidden: false,
            is_ignored: false,
            is_editable: true,
            is_disabled: false,
        }
    }

    pub fn edit_type(mut self, edit_type: EditType) -> Self {
        self.edit_type = edit_type;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.is_ignored = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.is_editable = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.is_disabled = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.column_name
    }
}

/// Ordered column list plus the key column and selection mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    #[serde(rename = "columnModelList")]
    columns: Vec<ColumnDef>,
    /// Column whose value becomes the row key; auto-increment keys when absent
    #[serde(default)]
    key_column_name: Option<String>,
    #[serde(default)]
    select_type: SelectType,
}

impl ColumnSchema {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        ColumnSchema {
            columns,
            key_column_name: None,
            select_type: SelectType::None,
        }
    }

    pub fn from_json(json: &str) -> GridResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_key_column(mut self, name: impl Into<String>) -> Self {
        self.key_column_name = Some(name.into());
        self
    }

    pub fn with_select_type(mut self, select_type: SelectType) -> Self {
        self.select_type = select_type;
        self
    }

    pub fn key_column_name(&self) -> Option<&str> {
        self.key_column_name.as_deref()
    }

    pub fn select_type(&self) -> SelectType {
        self.select_type
    }

    /// All data columns, hidden ones included.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.column_name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.column_name == name)
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| !c.is_hidden)
    }

    pub fn visible_len(&self) -> usize {
        self.visible_columns().count()
    }

    /// Column at a visible position, as the grid counts columns.
    pub fn column_at(&self, visible_index: usize) -> Option<&ColumnDef> {
        self.visible_columns().nth(visible_index)
    }

    pub fn edit_type(&self, name: &str) -> EditType {
        self.column(name).map(|c| c.edit_type).unwrap_or_default()
    }

    pub fn required_column_names(&self) -> Vec<&str> {
        self.visible_columns()
            .filter(|c| c.is_required)
            .map(|c| c.column_name.as_str())
            .collect()
    }

    pub fn ignored_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_ignored)
            .map(|c| c.column_name.as_str())
            .collect()
    }
}

/// Store-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreOptions {
    /// Sort in memory; when false, sorting only records the requested order
    /// and the caller is expected to refetch.
    pub use_client_sort: bool,
    /// Resets with more rows than this are deferred to `run_pending_tasks`.
    pub deferred_reset_threshold: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            use_client_sort: true,
            deferred_reset_threshold: 500,
        }
    }
}

impl StoreOptions {
    pub fn from_json(json: &str) -> GridResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
