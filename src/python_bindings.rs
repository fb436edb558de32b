/// Python bindings for GridStore using PyO3
///
/// Rows cross the boundary as plain dicts (the same shape as the JSON row
/// records), row keys as `int` or `str`.

use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList, PyString, PyTuple};
use serde_json::{Map, Value as JsonValue};

use crate::changeset::ModifiedRowOptions;
use crate::error::GridError;
use crate::paste::GridPosition;
use crate::row::RowInput;
use crate::schema::{ColumnSchema, StoreOptions};
use crate::store::{AppendOptions, RemoveOptions, RowStore as RustRowStore};
use crate::value::{CellValue, RowKey};

impl From<GridError> for PyErr {
    fn from(err: GridError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

// ============================================================================
// Value Conversions
// ============================================================================

fn py_to_json(value: &Bound<'_, PyAny>) -> PyResult<JsonValue> {
    if value.is_none() {
        return Ok(JsonValue::Null);
    }
    // bool before int: bool is a subclass of int in Python
    if value.is_instance_of::<PyBool>() {
        return Ok(JsonValue::Bool(value.extract()?));
    }
    if value.is_instance_of::<PyInt>() {
        return Ok(JsonValue::from(value.extract::<i64>()?));
    }
    if value.is_instance_of::<PyFloat>() {
        let v: f64 = value.extract()?;
        return Ok(serde_json::Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number));
    }
    if value.is_instance_of::<PyString>() {
        return Ok(JsonValue::String(value.extract()?));
    }
    if let Ok(dict) = value.downcast::<PyDict>() {
        let mut obj = Map::new();
        for (k, v) in dict.iter() {
            obj.insert(k.extract::<String>()?, py_to_json(&v)?);
        }
        return Ok(JsonValue::Object(obj));
    }
    if let Ok(list) = value.downcast::<PyList>() {
        return list.iter().map(|v| py_to_json(&v)).collect::<PyResult<Vec<_>>>().map(JsonValue::Array);
    }
    if let Ok(tuple) = value.downcast::<PyTuple>() {
        return tuple.iter().map(|v| py_to_json(&v)).collect::<PyResult<Vec<_>>>().map(JsonValue::Array);
    }
    Err(PyTypeError::new_err(format!(
        "Unsupported value type: {}",
        value.get_type().name()?
    )))
}

fn json_to_py(py: Python, value: &JsonValue) -> PyResult<PyObject> {
    match value {
        JsonValue::Null => Ok(py.None()),
        JsonValue::Bool(b) => Ok(b.to_object(py)),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Ok(i.to_object(py)),
            None => Ok(n.as_f64().unwrap_or(f64::NAN).to_object(py)),
        },
        JsonValue::String(s) => Ok(s.to_object(py)),
        JsonValue::Array(items) => {
            let list = PyList::empty_bound(py);
            for item in items {
                list.append(json_to_py(py, item)?)?;
            }
            Ok(list.to_object(py))
        }
        JsonValue::Object(obj) => object_to_py(py, obj),
    }
}

fn object_to_py(py: Python, obj: &Map<String, JsonValue>) -> PyResult<PyObject> {
    let dict = PyDict::new_bound(py);
    for (k, v) in obj {
        dict.set_item(k, json_to_py(py, v)?)?;
    }
    Ok(dict.to_object(py))
}

fn py_to_row_key(value: &Bound<'_, PyAny>) -> PyResult<RowKey> {
    if value.is_instance_of::<PyInt>() && !value.is_instance_of::<PyBool>() {
        return Ok(RowKey::Int(value.extract()?));
    }
    if value.is_instance_of::<PyString>() {
        return Ok(RowKey::Str(value.extract()?));
    }
    Err(PyTypeError::new_err("row key must be an int or a str"))
}

fn row_key_to_py(py: Python, key: &RowKey) -> PyObject {
    match key {
        RowKey::Int(v) => v.to_object(py),
        RowKey::Str(s) => s.to_object(py),
    }
}

fn py_to_rows(rows: Option<&Bound<'_, PyAny>>) -> PyResult<Vec<RowInput>> {
    match rows {
        None => Ok(Vec::new()),
        Some(rows) => {
            let json = py_to_json(rows)?;
            let json = if json.is_object() && json.get("contents").is_none() {
                JsonValue::Array(vec![json])
            } else {
                json
            };
            Ok(RowInput::list_from_json(&json)?)
        }
    }
}

// ============================================================================
// RowStore
// ============================================================================

#[pyclass(name = "RowStore", unsendable)]
pub struct PyRowStore {
    inner: RustRowStore,
}

#[pymethods]
impl PyRowStore {
    /// Create a store.
    ///
    /// Args:
    ///     schema: dict with `columnModelList`, optional `keyColumnName` and `selectType`
    ///     options: dict with `useClientSort` and `deferredResetThreshold`
    ///     rows: initial rows, also committed as the baseline
    ///
    /// Examples:
    ///     store = RowStore({"columnModelList": [{"columnName": "name", "editType": "text"}]})
    #[new]
    #[pyo3(signature = (schema, options=None, rows=None))]
    fn new(
        schema: &Bound<'_, PyAny>,
        options: Option<&Bound<'_, PyAny>>,
        rows: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<Self> {
        let schema: ColumnSchema = serde_json::from_value(py_to_json(schema)?).map_err(GridError::from)?;
        let options: StoreOptions = match options {
            Some(options) => serde_json::from_value(py_to_json(options)?).map_err(GridError::from)?,
            None => StoreOptions::default(),
        };
        let inner = RustRowStore::from_rows(schema, options, py_to_rows(rows)?)?;
        Ok(PyRowStore { inner })
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "RowStore(rows={}, columns={}, sorted_by='{}')",
            self.inner.len(),
            self.inner.schema().columns().len(),
            self.inner.sort_options().column_name
        )
    }

    /// Insert rows (a dict or a list of dicts); no rows inserts one blank row.
    /// Returns the new row keys.
    #[pyo3(signature = (rows=None, at=None, extend_prev_row_span=false))]
    fn append(
        &mut self,
        py: Python,
        rows: Option<&Bound<'_, PyAny>>,
        at: Option<usize>,
        extend_prev_row_span: bool,
    ) -> PyResult<Vec<PyObject>> {
        let options = AppendOptions { at, extend_prev_row_span };
        let keys = self.inner.append(py_to_rows(rows)?, options)?;
        Ok(keys.iter().map(|k| row_key_to_py(py, k)).collect())
    }

    #[pyo3(signature = (rows=None))]
    fn prepend(&mut self, py: Python, rows: Option<&Bound<'_, PyAny>>) -> PyResult<Vec<PyObject>> {
        let keys = self.inner.prepend(py_to_rows(rows)?, AppendOptions::default())?;
        Ok(keys.iter().map(|k| row_key_to_py(py, k)).collect())
    }

    #[pyo3(signature = (row_key, remove_original_data=false, keep_row_span_data=false))]
    fn remove_row(
        &mut self,
        row_key: &Bound<'_, PyAny>,
        remove_original_data: bool,
        keep_row_span_data: bool,
    ) -> PyResult<bool> {
        let options = RemoveOptions {
            remove_original_data,
            keep_row_span_data,
        };
        Ok(self.inner.remove_row(&py_to_row_key(row_key)?, options))
    }

    #[pyo3(signature = (row_key, column_name, is_original=false))]
    fn get_value(
        &self,
        py: Python,
        row_key: &Bound<'_, PyAny>,
        column_name: &str,
        is_original: bool,
    ) -> PyResult<PyObject> {
        match self.inner.get_value(&py_to_row_key(row_key)?, column_name, is_original) {
            Some(value) => json_to_py(py, &value.to_json()),
            None => Ok(py.None()),
        }
    }

    #[pyo3(signature = (row_key, column_name, value, silent=false))]
    fn set_value(
        &mut self,
        row_key: &Bound<'_, PyAny>,
        column_name: &str,
        value: &Bound<'_, PyAny>,
        silent: bool,
    ) -> PyResult<bool> {
        let value = CellValue::from(py_to_json(value)?);
        Ok(self.inner.set_value(&py_to_row_key(row_key)?, column_name, value, silent))
    }

    fn get_row_data(&self, py: Python, row_key: &Bound<'_, PyAny>) -> PyResult<PyObject> {
        match self.inner.get_row_data(&py_to_row_key(row_key)?) {
            Some(row) => object_to_py(py, &row),
            None => Ok(py.None()),
        }
    }

    fn get_column_values(&self, py: Python, column_name: &str) -> PyResult<Vec<PyObject>> {
        self.inner
            .get_column_values(column_name)
            .iter()
            .map(|v| json_to_py(py, &v.to_json()))
            .collect()
    }

    fn index_of_row_key(&self, row_key: &Bound<'_, PyAny>) -> PyResult<Option<usize>> {
        Ok(self.inner.index_of_row_key(&py_to_row_key(row_key)?))
    }

    fn get_main_row_key(&self, py: Python, row_key: &Bound<'_, PyAny>, column_name: &str) -> PyResult<PyObject> {
        let key = self.inner.get_main_row_key(&py_to_row_key(row_key)?, column_name);
        Ok(row_key_to_py(py, &key))
    }

    /// Sort by a column; `is_ascending=None` toggles when re-sorting the same column.
    #[pyo3(signature = (column_name, is_ascending=None))]
    fn sort_by_field(&mut self, column_name: &str, is_ascending: Option<bool>) {
        self.inner.sort_by_field(column_name, is_ascending);
    }

    #[pyo3(signature = (is_only_checked=false, is_raw=false))]
    fn get_row_list(&self, py: Python, is_only_checked: bool, is_raw: bool) -> PyResult<Vec<PyObject>> {
        self.inner
            .get_row_list(is_only_checked, is_raw)
            .iter()
            .map(|row| object_to_py(py, row))
            .collect()
    }

    /// Returns a dict with `createList`, `updateList` and `deleteList`.
    #[pyo3(signature = (is_only_checked=false, is_raw=false, filtering_column_list=None))]
    fn get_modified_row_list(
        &self,
        py: Python,
        is_only_checked: bool,
        is_raw: bool,
        filtering_column_list: Option<Vec<String>>,
    ) -> PyResult<PyObject> {
        let options = ModifiedRowOptions {
            is_only_checked,
            is_raw,
            filtering_column_list: filtering_column_list.unwrap_or_default(),
        };
        let modified = serde_json::to_value(self.inner.get_modified_row_list(&options)).map_err(GridError::from)?;
        json_to_py(py, &modified)
    }

    fn is_changed(&self) -> bool {
        self.inner.is_changed()
    }

    /// Paste a list of rows of values at (row, column); returns the covered
    /// `((start_row, start_col), (end_row, end_col))` or None.
    fn paste(&mut self, data: &Bound<'_, PyList>, row: usize, column: usize) -> PyResult<Option<((usize, usize), (usize, usize))>> {
        let mut grid = Vec::with_capacity(data.len());
        for line in data.iter() {
            let values = match py_to_json(&line)? {
                JsonValue::Array(values) => values.into_iter().map(CellValue::from).collect(),
                other => vec![CellValue::from(other)],
            };
            grid.push(values);
        }
        Ok(self
            .inner
            .paste(&grid, GridPosition::new(row, column))
            .map(|r| ((r.start.row, r.start.column), (r.end.row, r.end.column))))
    }

    /// Returns a list of `{"rowKey": ..., "errors": [...]}` dicts.
    fn validate(&self, py: Python) -> PyResult<PyObject> {
        let result = serde_json::to_value(self.inner.validate()).map_err(GridError::from)?;
        json_to_py(py, &result)
    }

    fn set_row_list(&mut self, rows: &Bound<'_, PyAny>) -> PyResult<()> {
        Ok(self.inner.set_row_list(py_to_rows(Some(rows))?, None)?)
    }

    fn replace_row_list(&mut self, rows: &Bound<'_, PyAny>) -> PyResult<()> {
        Ok(self.inner.replace_row_list(py_to_rows(Some(rows))?, None)?)
    }

    fn restore(&mut self) {
        self.inner.restore();
    }

    /// Complete deferred resets; returns how many ran.
    fn run_pending_tasks(&mut self) -> usize {
        self.inner.run_pending_tasks()
    }

    fn has_pending_tasks(&self) -> bool {
        self.inner.has_pending_tasks()
    }

    #[pyo3(signature = (row_key, silent=false))]
    fn check(&mut self, row_key: &Bound<'_, PyAny>, silent: bool) -> PyResult<bool> {
        Ok(self.inner.check(&py_to_row_key(row_key)?, silent))
    }

    #[pyo3(signature = (row_key, silent=false))]
    fn uncheck(&mut self, row_key: &Bound<'_, PyAny>, silent: bool) -> PyResult<bool> {
        Ok(self.inner.uncheck(&py_to_row_key(row_key)?, silent))
    }

    fn check_all(&mut self) {
        self.inner.check_all();
    }

    fn uncheck_all(&mut self) {
        self.inner.uncheck_all();
    }

    fn enable_row(&mut self, row_key: &Bound<'_, PyAny>) -> PyResult<bool> {
        Ok(self.inner.enable_row(&py_to_row_key(row_key)?))
    }

    fn disable_row(&mut self, row_key: &Bound<'_, PyAny>) -> PyResult<bool> {
        Ok(self.inner.disable_row(&py_to_row_key(row_key)?))
    }

    fn enable_check(&mut self, row_key: &Bound<'_, PyAny>) -> PyResult<bool> {
        Ok(self.inner.enable_check(&py_to_row_key(row_key)?))
    }

    fn disable_check(&mut self, row_key: &Bound<'_, PyAny>) -> PyResult<bool> {
        Ok(self.inner.disable_check(&py_to_row_key(row_key)?))
    }

    fn set_disabled(&mut self, is_disabled: bool) {
        self.inner.set_disabled(is_disabled);
    }

    fn is_disabled(&self) -> bool {
        self.inner.is_disabled()
    }
}

#[pymodule]
fn gridstore(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyRowStore>()?;
    Ok(())
}
