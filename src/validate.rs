/// Required-field validation.
///
/// Only visible columns marked required are checked. A cell fails when it is
/// blank and not disabled; disabled cells cannot be fixed by the user and are
/// never reported.

use crate::row::Row;
use crate::schema::ColumnDef;
use crate::store::RowStore;
use crate::value::RowKey;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Required,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Required => "REQUIRED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellError {
    pub column_name: String,
    pub error_code: ErrorCode,
}

/// Failures of one row, in visible column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowValidation {
    pub row_key: RowKey,
    pub errors: Vec<CellError>,
}

impl RowStore {
    /// Validate every row. Rows without failures are omitted; the result is
    /// in row order.
    pub fn validate(&self) -> Vec<RowValidation> {
        let required: Vec<&ColumnDef> = self
            .schema
            .required_column_names()
            .into_iter()
            .filter_map(|name| self.schema.column(name))
            .collect();
        if required.is_empty() {
            return Vec::new();
        }

        self.rows
            .iter()
            .enumerate()
            .filter_map(|(pos, row)| {
                let errors: Vec<CellError> = required
                    .iter()
                    .filter_map(|column| {
                        self.check_cell(pos, row, column).map(|error_code| CellError {
                            column_name: column.column_name.clone(),
                            error_code,
                        })
                    })
                    .collect();
                (!errors.is_empty()).then(|| RowValidation {
                    row_key: row.key().clone(),
                    errors,
                })
            })
            .collect()
    }

    /// Validate a single cell. `None` when it passes or does not exist.
    pub fn validate_cell(&self, key: &RowKey, column: &str) -> Option<ErrorCode> {
        let pos = self.index_of_row_key(key)?;
        let def = self.schema.column(column).filter(|c| !c.is_hidden)?;
        self.check_cell(pos, &self.rows[pos], def)
    }

    fn check_cell(&self, pos: usize, row: &Row, column: &ColumnDef) -> Option<ErrorCode> {
        let failed = column.is_required
            && !self.cell_state_at(pos, &column.column_name).is_disabled
            && row.value_or_empty(&column.column_name).is_blank();
        failed.then_some(ErrorCode::Required)
    }
}
