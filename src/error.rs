/// Error type for GridStore operations.
///
/// Mutations that target an unknown row are not errors: they are reported as
/// `false`/`None` by the store. `GridError` covers malformed input and
/// violations of the store's key invariants.

use crate::value::RowKey;

pub type GridResult<T> = Result<T, GridError>;

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("duplicate row key: {0}")]
    DuplicateRowKey(RowKey),

    #[error("row is missing a value for key column '{column}'")]
    MissingRowKey { column: String },

    #[error("invalid row data: {0}")]
    InvalidRowData(String),

    #[error("unknown select type: '{0}'. Use 'checkbox' or 'radio'")]
    UnknownSelectType(String),

    #[error("unknown row state: '{0}'")]
    UnknownRowState(String),

    #[error("unknown edit type: '{0}'")]
    UnknownEditType(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
