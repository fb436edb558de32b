/// RowStore - the grid's data source.
///
/// Holds the ordered rows, a key -> position index, the baseline used for
/// change tracking, sort options and the store-wide disabled flag. Every
/// structural change goes through the store so that row keys stay unique,
/// span groups stay consistent and the index matches the row order.
///
/// # Examples
///
/// ```
/// use gridstore::{AppendOptions, ColumnDef, ColumnSchema, EditType, RowInput, RowKey, RowStore};
///
/// let schema = ColumnSchema::new(vec![
///     ColumnDef::new("name").edit_type(EditType::Text),
///     ColumnDef::new("team").edit_type(EditType::Text),
/// ]);
/// let mut store = RowStore::new(schema);
///
/// store.set_row_list(vec![
///     RowInput::new().cell("name", "Kim").cell("team", "A").span("team", 2),
///     RowInput::new().cell("name", "Lee"),
/// ], None).unwrap();
///
/// assert_eq!(store.len(), 2);
/// assert_eq!(store.get_value(&RowKey::Int(1), "team", false).unwrap().as_str(), Some("A"));
///
/// store.append(vec![RowInput::new().cell("name", "Park")], AppendOptions::default()).unwrap();
/// assert!(store.is_changed());
/// ```

use crate::changeset::{ChangeTracker, ModifiedRowOptions, ModifiedRows};
use crate::error::{GridError, GridResult};
use crate::events::{EventEmitter, ListenerId, StoreEvent};
use crate::row::{CellState, CellStateProvider, DefaultCellState, JsonRow, Row, RowInput, RowState, SpanDescriptor};
use crate::schema::{ColumnSchema, SelectType, StoreOptions, CHECKED_COLUMN};
use crate::sort::{SortController, SortOptions};
use crate::span::SpanIndex;
use crate::value::{CellValue, RowKey};
use std::collections::{HashMap, HashSet, VecDeque};

/// Continuation run once a (possibly deferred) reset has completed.
pub type ResetCallback = Box<dyn FnOnce(&mut RowStore)>;

/// Options for `append`/`prepend`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendOptions {
    /// Insert position; defaults to the end
    pub at: Option<usize>,
    /// Join the span group of the row above even when it ends there
    pub extend_prev_row_span: bool,
}

impl AppendOptions {
    pub fn at(index: usize) -> Self {
        AppendOptions {
            at: Some(index),
            extend_prev_row_span: false,
        }
    }

    pub fn extend_prev_row_span(mut self) -> Self {
        self.extend_prev_row_span = true;
        self
    }
}

/// Options for `remove_row`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Also drop the row from the baseline
    pub remove_original_data: bool,
    /// When removing a span main row, the promoted row keeps its own value
    /// instead of inheriting the removed row's value. Remaining siblings are
    /// relinked to that value; nothing of the removed row is carried forward.
    pub keep_row_span_data: bool,
}

struct PendingReset {
    rows: Vec<Row>,
    last_row_key: i64,
    callback: Option<ResetCallback>,
}

pub struct RowStore {
    pub(crate) schema: ColumnSchema,
    pub(crate) options: StoreOptions,
    pub(crate) rows: Vec<Row>,
    pub(crate) row_index: HashMap<RowKey, usize>,
    last_row_key: i64,
    tracker: ChangeTracker,
    sort: SortController,
    is_disabled: bool,
    pub(crate) events: EventEmitter,
    cell_states: Box<dyn CellStateProvider>,
    pending: VecDeque<PendingReset>,
}

impl RowStore {
    /// Empty store with default options.
    pub fn new(schema: ColumnSchema) -> Self {
        Self::with_options(schema, StoreOptions::default())
    }

    pub fn with_options(schema: ColumnSchema, options: StoreOptions) -> Self {
        RowStore {
            sort: SortController::new(options.use_client_sort),
            schema,
            options,
            rows: Vec::new(),
            row_index: HashMap::new(),
            last_row_key: -1,
            tracker: ChangeTracker::new(),
            is_disabled: false,
            events: EventEmitter::new(),
            cell_states: Box::new(DefaultCellState),
            pending: VecDeque::new(),
        }
    }

    /// Store loaded with `rows`, which also become the baseline.
    /// The load is synchronous regardless of its size.
    pub fn from_rows(schema: ColumnSchema, options: StoreOptions, rows: Vec<RowInput>) -> GridResult<Self> {
        let mut store = Self::with_options(schema, options);
        let mut counter = -1;
        let rows = store.format_rows(rows, &mut counter, None)?;
        store.apply_reset(rows, counter, None);
        store.set_original_row_list(None)?;
        Ok(store)
    }

    /// Replace the collaborator that decides cell editability.
    pub fn with_cell_state_provider(mut self, provider: impl CellStateProvider + 'static) -> Self {
        self.cell_states = Box::new(provider);
        self
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, key: &RowKey) -> Option<&Row> {
        self.row_index.get(key).map(|&pos| &self.rows[pos])
    }

    pub fn row_at(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_keys(&self) -> Vec<RowKey> {
        self.rows.iter().map(|r| r.key().clone()).collect()
    }

    pub fn last_row_key(&self) -> i64 {
        self.last_row_key
    }

    pub fn index_of_row_key(&self, key: &RowKey) -> Option<usize> {
        self.row_index.get(key).copied()
    }

    // ==================== Events ====================

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    // ==================== Formatting ====================

    /// Turn inputs into rows: assign keys, fill missing schema columns with
    /// "" and materialise declared spans. `counter` is the auto-key counter;
    /// keys are checked against each other and against `existing`.
    fn format_rows(
        &self,
        inputs: Vec<RowInput>,
        counter: &mut i64,
        existing: Option<&HashMap<RowKey, usize>>,
    ) -> GridResult<Vec<Row>> {
        let mut seen = HashSet::with_capacity(inputs.len());
        let mut rows = Vec::with_capacity(inputs.len());
        let mut declared = Vec::with_capacity(inputs.len());

        for input in inputs {
            let key = match self.schema.key_column_name() {
                Some(column) => input
                    .get(column)
                    .and_then(RowKey::from_cell)
                    .ok_or_else(|| GridError::MissingRowKey {
                        column: column.to_string(),
                    })?,
                None => {
                    *counter += 1;
                    RowKey::Int(*counter)
                }
            };
            if !seen.insert(key.clone()) || existing.is_some_and(|index| index.contains_key(&key)) {
                return Err(GridError::DuplicateRowKey(key));
            }

            let RowInput {
                mut cells,
                row_state,
                row_span,
            } = input;
            for name in self.schema.column_names() {
                if !cells.iter().any(|(existing, _)| existing == name) {
                    cells.push((name.to_string(), CellValue::empty()));
                }
            }
            rows.push(Row::new(key, cells, row_state.unwrap_or_default()));
            declared.push(row_span);
        }

        if self.is_row_span_enable() {
            SpanIndex::apply_declared(&mut rows, &declared);
        }
        Ok(rows)
    }

    /// Blank row used by `append`/`prepend` without data and by paste.
    fn create_dummy_row(&self) -> RowInput {
        self.schema
            .column_names()
            .into_iter()
            .fold(RowInput::new(), |input, name| input.cell(name, CellValue::empty()))
    }

    /// Re-point the index at every row from `from` to the end.
    fn reindex_from(&mut self, from: usize) {
        for (pos, row) in self.rows.iter().enumerate().skip(from) {
            self.row_index.insert(row.key().clone(), pos);
        }
        debug_assert_eq!(self.row_index.len(), self.rows.len(), "row index out of sync");
    }

    fn rebuild_index(&mut self) {
        self.row_index.clear();
        self.reindex_from(0);
    }

    // ==================== Structural mutations ====================

    /// Insert rows at `options.at` (default: end). An empty `data` inserts one
    /// blank row. Returns the keys of the new rows.
    pub fn append(&mut self, data: Vec<RowInput>, options: AppendOptions) -> GridResult<Vec<RowKey>> {
        let data = if data.is_empty() {
            vec![self.create_dummy_row()]
        } else {
            data
        };

        let mut counter = self.last_row_key;
        let new_rows = self.format_rows(data, &mut counter, Some(&self.row_index))?;
        self.last_row_key = counter;

        let at = options.at.unwrap_or(self.rows.len()).min(self.rows.len());
        let length = new_rows.len();
        let row_keys: Vec<RowKey> = new_rows.iter().map(|r| r.key().clone()).collect();

        self.rows.splice(at..at, new_rows);
        self.reindex_from(at);
        if self.is_row_span_enable() {
            SpanIndex::extend_for_insert(&mut self.rows, &self.row_index, at, length, options.extend_prev_row_span);
        }

        self.events.emit(StoreEvent::Add {
            row_keys: row_keys.clone(),
            at,
            extend_prev_row_span: options.extend_prev_row_span,
        });
        Ok(row_keys)
    }

    /// `append` at position 0.
    pub fn prepend(&mut self, data: Vec<RowInput>, options: AppendOptions) -> GridResult<Vec<RowKey>> {
        self.append(
            data,
            AppendOptions {
                at: Some(0),
                ..options
            },
        )
    }

    /// Remove one row. Unknown keys are ignored and return false.
    pub fn remove_row(&mut self, key: &RowKey, options: RemoveOptions) -> bool {
        let Some(pos) = self.index_of_row_key(key) else {
            log::debug!("remove_row: unknown row key {}", key);
            return false;
        };

        let removed = self.rows.remove(pos);
        self.row_index.remove(key);
        self.reindex_from(pos);
        SpanIndex::sync_for_remove(&mut self.rows, &self.row_index, &removed, options.keep_row_span_data);

        if options.remove_original_data {
            self.tracker.forget(key);
        }
        self.events.emit(StoreEvent::Remove { row_key: key.clone() });
        true
    }

    // ==================== Cell values ====================

    /// Current value, or the baseline value with `is_original`.
    pub fn get_value(&self, key: &RowKey, column: &str, is_original: bool) -> Option<CellValue> {
        if is_original {
            self.get_original(key, column)
        } else {
            self.row(key).and_then(|row| row.get(column)).cloned()
        }
    }

    /// Write one cell (strings are trimmed). Does not touch span siblings.
    /// Returns whether the row exists.
    pub fn set_value(&mut self, key: &RowKey, column: &str, value: impl Into<CellValue>, silent: bool) -> bool {
        let Some(pos) = self.index_of_row_key(key) else {
            log::debug!("set_value: unknown row key {}", key);
            return false;
        };
        self.rows[pos].set(column, value.into().trimmed());
        if !silent {
            self.events.emit(StoreEvent::Change {
                row_key: key.clone(),
                column_name: column.to_string(),
            });
        }
        true
    }

    /// Write `value` to the whole span group `key` belongs to in `column`.
    ///
    /// A write aimed at a sibling is redirected to the main row, and the main
    /// row's value is copied to every sibling. Does nothing while spans are
    /// disabled or when the cell is not spanned. Returns whether it wrote.
    pub fn sync_row_spanned_data(&mut self, key: &RowKey, column: &str, value: impl Into<CellValue>) -> bool {
        if !self.is_row_span_enable() {
            return false;
        }
        let Some(main_key) = self
            .row(key)
            .and_then(|row| row.span_data(column))
            .map(|span| span.main_row_key.clone())
        else {
            return false;
        };
        let Some(main_pos) = self.index_of_row_key(&main_key) else {
            return false;
        };

        self.rows[main_pos].set(column, value.into());
        self.propagate_span_value(main_pos, column);
        true
    }

    /// Copy the main row's value in `column` to its span siblings.
    pub(crate) fn propagate_span_value(&mut self, main_pos: usize, column: &str) {
        let main_key = self.rows[main_pos].key().clone();
        let value = self.rows[main_pos].value_or_empty(column);
        for pos in SpanIndex::member_positions(&self.rows, &main_key, column) {
            self.rows[pos].set(column, value.clone());
        }
    }

    /// Values of one column in row order.
    pub fn get_column_values(&self, column: &str) -> Vec<CellValue> {
        self.rows.iter().map(|row| row.value_or_empty(column)).collect()
    }

    /// Write `value` into `column` of every row. With `check_cell_state`,
    /// cells that are not editable or are disabled are skipped.
    pub fn set_column_values(&mut self, column: &str, value: impl Into<CellValue>, check_cell_state: bool, silent: bool) {
        let value = value.into();
        for pos in 0..self.rows.len() {
            if check_cell_state && !self.cell_state_at(pos, column).is_writable() {
                continue;
            }
            self.rows[pos].set(column, value.clone());
            if !silent {
                self.events.emit(StoreEvent::Change {
                    row_key: self.rows[pos].key().clone(),
                    column_name: column.to_string(),
                });
            }
        }
    }

    /// Clear a text cell. The write goes to the span main row; it only
    /// happens for text edit types on editable, enabled cells.
    pub fn del(&mut self, key: &RowKey, column: &str) -> bool {
        let main_key = self.get_main_row_key(key, column);
        let Some(pos) = self.index_of_row_key(&main_key) else {
            return false;
        };
        if !self.schema.edit_type(column).is_text() || !self.cell_state_at(pos, column).is_writable() {
            return false;
        }
        self.set_value(&main_key, column, CellValue::empty(), false)
    }

    // ==================== Cell state ====================

    pub(crate) fn cell_state_at(&self, pos: usize, column: &str) -> CellState {
        let row = &self.rows[pos];
        match self.schema.column(column) {
            Some(def) => self.cell_states.cell_state(row, def, self.is_disabled),
            None => CellState {
                is_editable: false,
                is_disabled: self.is_disabled || row.state().is_disabled(),
            },
        }
    }

    pub fn get_cell_state(&self, key: &RowKey, column: &str) -> Option<CellState> {
        self.index_of_row_key(key).map(|pos| self.cell_state_at(pos, column))
    }

    // ==================== Row spans ====================

    /// Span descriptor of a cell; `None` while spans are disabled by sorting.
    pub fn get_row_span_data(&self, key: &RowKey, column: &str) -> Option<&SpanDescriptor> {
        if !self.is_row_span_enable() {
            return None;
        }
        self.row(key).and_then(|row| row.span_data(column))
    }

    /// Key of the main row owning the cell, or `key` itself when not spanned.
    pub fn get_main_row_key(&self, key: &RowKey, column: &str) -> RowKey {
        self.get_row_span_data(key, column)
            .map(|span| span.main_row_key.clone())
            .unwrap_or_else(|| key.clone())
    }

    pub fn is_row_span_enable(&self) -> bool {
        self.sort.is_row_span_enable()
    }

    pub fn is_sorted_by_field(&self) -> bool {
        self.sort.is_sorted_by_field()
    }

    // ==================== Sorting ====================

    pub fn sort_options(&self) -> &SortOptions {
        self.sort.options()
    }

    /// Store sort options, emitting `SortChanged` when they differ.
    pub fn set_sort_option_values(&mut self, column_name: Option<&str>, is_ascending: Option<bool>, is_require_fetch: bool) {
        if let Some(change) = self.sort.set_values(column_name, is_ascending, is_require_fetch) {
            self.events.emit(StoreEvent::SortChanged {
                column_name: change.column_name,
                is_ascending: change.is_ascending,
                is_require_fetch: change.is_require_fetch,
            });
        }
    }

    /// Sort by `column_name`. Without a direction the order toggles for the
    /// current column and is ascending otherwise. With client sort disabled
    /// only the options change and the caller must refetch.
    pub fn sort_by_field(&mut self, column_name: &str, is_ascending: Option<bool>) {
        let is_ascending = self.sort.resolve_direction(column_name, is_ascending);
        let use_client_sort = self.sort.options().use_client_sort;
        self.set_sort_option_values(Some(column_name), Some(is_ascending), !use_client_sort);

        if use_client_sort {
            self.sort.sort(&mut self.rows);
            self.rebuild_index();
            self.events.emit(StoreEvent::Sort);
        }
    }

    // ==================== Row lists ====================

    /// All rows, or only checked ones. Without `is_raw` internal fields are stripped.
    pub fn get_row_list(&self, is_only_checked: bool, is_raw: bool) -> Vec<JsonRow> {
        self.rows
            .iter()
            .filter(|row| !is_only_checked || row.is_checked())
            .map(|row| row.to_json(is_raw))
            .collect()
    }

    pub fn get_row_data(&self, key: &RowKey) -> Option<JsonRow> {
        self.row(key).map(|row| row.to_json(false))
    }

    pub fn get_row_data_at(&self, index: usize) -> Option<JsonRow> {
        self.rows.get(index).map(|row| row.to_json(false))
    }

    pub fn get_row_data_json(&self, key: &RowKey) -> Option<String> {
        self.get_row_data(key)
            .and_then(|row| serde_json::to_string(&row).ok())
    }

    // ==================== Baseline & changes ====================

    /// Commit a baseline: `rows` formatted like `append` input (with a fresh
    /// auto-key counter), or the current content when `None`.
    pub fn set_original_row_list(&mut self, rows: Option<Vec<RowInput>>) -> GridResult<()> {
        let baseline = match rows {
            Some(rows) => {
                let mut counter = -1;
                self.format_rows(rows, &mut counter, None)?
            }
            None => self.rows.clone(),
        };
        self.tracker.capture(baseline);
        Ok(())
    }

    pub fn get_original_row_list(&self) -> &[Row] {
        self.tracker.rows()
    }

    pub fn get_original_row(&self, key: &RowKey) -> Option<&Row> {
        self.tracker.get(key)
    }

    pub fn get_original(&self, key: &RowKey, column: &str) -> Option<CellValue> {
        self.tracker.get(key).and_then(|row| row.get(column)).cloned()
    }

    fn ignored_columns<'a>(&'a self, options: &'a ModifiedRowOptions) -> HashSet<&'a str> {
        options
            .filtering_column_list
            .iter()
            .map(String::as_str)
            .chain(self.schema.ignored_column_names())
            .collect()
    }

    /// Created, updated and deleted rows relative to the baseline.
    pub fn get_modified_row_list(&self, options: &ModifiedRowOptions) -> ModifiedRows<JsonRow> {
        let ignored = self.ignored_columns(options);
        self.tracker
            .diff(&self.rows, options, &ignored)
            .map(|row| row.to_json(options.is_raw))
    }

    /// Same as `get_modified_row_list`, reduced to row keys.
    pub fn get_modified_row_keys(&self, options: &ModifiedRowOptions) -> ModifiedRows<RowKey> {
        let ignored = self.ignored_columns(options);
        self.tracker
            .diff(&self.rows, options, &ignored)
            .map(|row| row.key().clone())
    }

    pub fn is_changed(&self) -> bool {
        !self.get_modified_row_keys(&ModifiedRowOptions::default()).is_empty()
    }

    // ==================== Reset ====================

    /// Replace all rows without touching the baseline.
    ///
    /// Emits `BeforeReset` immediately. Loads larger than
    /// `deferred_reset_threshold` are queued for `run_pending_tasks`; smaller
    /// ones complete before returning. `callback` runs after the reset either way.
    pub fn replace_row_list(&mut self, rows: Vec<RowInput>, callback: Option<ResetCallback>) -> GridResult<()> {
        let mut counter = -1;
        let rows = self.format_rows(rows, &mut counter, None)?;
        self.schedule_reset(rows, counter, callback);
        Ok(())
    }

    /// `replace_row_list` followed by committing the new rows as baseline.
    pub fn set_row_list(&mut self, rows: Vec<RowInput>, callback: Option<ResetCallback>) -> GridResult<()> {
        let commit: ResetCallback = Box::new(move |store: &mut RowStore| {
            store.tracker.capture(store.rows.clone());
            if let Some(callback) = callback {
                callback(store);
            }
        });
        self.replace_row_list(rows, Some(commit))
    }

    /// Replace the current rows with the baseline, discarding edits.
    pub fn restore(&mut self) {
        let rows = self.tracker.rows().to_vec();
        let last_row_key = rows.iter().filter_map(|r| r.key().as_int()).max().unwrap_or(-1);
        self.schedule_reset(rows, last_row_key, None);
    }

    fn schedule_reset(&mut self, rows: Vec<Row>, last_row_key: i64, callback: Option<ResetCallback>) {
        self.events.emit(StoreEvent::BeforeReset);

        if rows.len() > self.options.deferred_reset_threshold {
            log::debug!(
                "deferring reset of {} rows (threshold {})",
                rows.len(),
                self.options.deferred_reset_threshold
            );
            self.pending.push_back(PendingReset {
                rows,
                last_row_key,
                callback,
            });
        } else {
            self.apply_reset(rows, last_row_key, callback);
        }
    }

    fn apply_reset(&mut self, rows: Vec<Row>, last_row_key: i64, callback: Option<ResetCallback>) {
        self.rows = rows;
        self.last_row_key = last_row_key;
        if self.sort.options().use_client_sort && self.sort.is_sorted_by_field() {
            self.sort.sort(&mut self.rows);
        }
        self.rebuild_index();
        self.events.emit(StoreEvent::Reset {
            row_count: self.rows.len(),
        });
        if let Some(callback) = callback {
            callback(self);
        }
    }

    pub fn has_pending_tasks(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Run the resets deferred so far, in request order. Resets queued by
    /// their callbacks wait for the next call. Returns how many ran.
    pub fn run_pending_tasks(&mut self) -> usize {
        let tasks: Vec<PendingReset> = self.pending.drain(..).collect();
        let count = tasks.len();
        for task in tasks {
            self.apply_reset(task.rows, task.last_row_key, task.callback);
        }
        count
    }

    // ==================== Disabled state ====================

    pub fn is_disabled(&self) -> bool {
        self.is_disabled
    }

    /// Toggle the store-wide flag; notifies only on an actual change.
    pub fn set_disabled(&mut self, is_disabled: bool) {
        if self.is_disabled != is_disabled {
            self.is_disabled = is_disabled;
            self.events.emit(StoreEvent::DisabledChanged { is_disabled });
        }
    }

    fn set_row_state(&mut self, key: &RowKey, state: RowState) -> bool {
        let Some(pos) = self.index_of_row_key(key) else {
            log::debug!("set_row_state: unknown row key {}", key);
            return false;
        };
        if self.rows[pos].state() != state {
            self.rows[pos].set_state(state);
            self.events.emit(StoreEvent::RowStateChanged {
                row_key: key.clone(),
                row_state: state,
            });
        }
        true
    }

    pub fn enable_row(&mut self, key: &RowKey) -> bool {
        self.set_row_state(key, RowState::Normal)
    }

    pub fn disable_row(&mut self, key: &RowKey) -> bool {
        self.set_row_state(key, RowState::Disabled)
    }

    pub fn enable_check(&mut self, key: &RowKey) -> bool {
        self.set_row_state(key, RowState::Normal)
    }

    pub fn disable_check(&mut self, key: &RowKey) -> bool {
        self.set_row_state(key, RowState::DisabledCheck)
    }

    // ==================== Selection ====================

    fn can_check(&self, pos: usize) -> bool {
        self.schema.select_type() != SelectType::None
            && !self.is_disabled
            && !self.rows[pos].state().is_check_disabled()
    }

    fn set_checked_at(&mut self, pos: usize, checked: bool, silent: bool) {
        if self.rows[pos].is_checked() == checked {
            return;
        }
        self.rows[pos].set_checked(checked);
        if !silent {
            self.events.emit(StoreEvent::Change {
                row_key: self.rows[pos].key().clone(),
                column_name: CHECKED_COLUMN.to_string(),
            });
        }
    }

    /// Check a row's selection box. In radio mode every other row is
    /// unchecked first. Returns whether the row ended up checked.
    pub fn check(&mut self, key: &RowKey, silent: bool) -> bool {
        let Some(pos) = self.index_of_row_key(key) else {
            return false;
        };
        if !self.can_check(pos) {
            return false;
        }
        if self.schema.select_type() == SelectType::Radio {
            for other in 0..self.rows.len() {
                self.set_checked_at(other, false, silent);
            }
        }
        self.set_checked_at(pos, true, silent);
        true
    }

    pub fn uncheck(&mut self, key: &RowKey, silent: bool) -> bool {
        let Some(pos) = self.index_of_row_key(key) else {
            return false;
        };
        self.set_checked_at(pos, false, silent);
        true
    }

    /// Check every row whose checkbox is enabled.
    pub fn check_all(&mut self) {
        for pos in 0..self.rows.len() {
            if self.can_check(pos) {
                self.set_checked_at(pos, true, false);
            }
        }
    }

    pub fn uncheck_all(&mut self) {
        for pos in 0..self.rows.len() {
            self.set_checked_at(pos, false, false);
        }
    }
}

impl std::fmt::Debug for RowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowStore")
            .field("rows", &self.rows.len())
            .field("last_row_key", &self.last_row_key)
            .field("sort_options", self.sort.options())
            .field("is_disabled", &self.is_disabled)
            .field("pending_resets", &self.pending.len())
            .finish()
    }
}
