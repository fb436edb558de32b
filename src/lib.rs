/// GridStore - In-Memory Row Store for Data Grids
///
/// Ordered rows with stable keys, vertical cell merges (row spans), change
/// tracking against a committed baseline, client-side sorting, rectangular
/// paste and required-field validation. Rendering layers observe the store
/// through `StoreEvent` notifications.

pub mod error;
pub mod value;
pub mod schema;
pub mod row;
pub mod span;
pub mod changeset;
pub mod sort;
pub mod events;
pub mod store;
pub mod paste;
pub mod validate;

pub use error::{GridError, GridResult};
pub use value::{CellValue, RowKey};
pub use schema::{ColumnDef, ColumnSchema, EditType, SelectType, StoreOptions, CHECKED_COLUMN, ROW_KEY_COLUMN};
pub use row::{CellState, CellStateProvider, DefaultCellState, JsonRow, Row, RowInput, RowState, SpanDescriptor};
pub use span::SpanIndex;
pub use changeset::{ChangeTracker, ModifiedRowOptions, ModifiedRows};
pub use sort::{SortController, SortOptions, SortOrder};
pub use events::{EventEmitter, ListenerId, StoreEvent};
pub use store::{AppendOptions, RemoveOptions, ResetCallback, RowStore};
pub use paste::{GridPosition, PasteRange};
pub use validate::{CellError, ErrorCode, RowValidation};

// Python bindings - only when python feature is enabled
#[cfg(feature = "python")]
mod python_bindings;
#[cfg(feature = "python")]
pub use python_bindings::*;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    const SCHEMA: &str = r#"{
        "columnModelList": [
            {"columnName": "id"},
            {"columnName": "dept", "editType": "text"},
            {"columnName": "name", "editType": "text", "isRequired": true},
            {"columnName": "note", "editType": "text", "isIgnored": true}
        ],
        "keyColumnName": "id",
        "selectType": "checkbox"
    }"#;

    #[test]
    fn test_complete_workflow() {
        init_logger();
        let schema = ColumnSchema::from_json(SCHEMA).unwrap();
        let rows = RowInput::list_from_json(&json!([
            {"id": 10, "dept": "Sales", "name": "Kim", "_extraData": {"rowSpan": {"dept": 2}}},
            {"id": 11, "name": "Lee"},
            {"id": 12, "dept": "Ops", "name": "Park"}
        ]))
        .unwrap();
        let mut store = RowStore::from_rows(schema, StoreOptions::default(), rows).unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        store.subscribe(move |e| sink.borrow_mut().push(e.kind()));

        // the merged department shows on both rows
        assert_eq!(store.get_value(&RowKey::Int(11), "dept", false), Some(CellValue::from("Sales")));
        assert_eq!(store.get_main_row_key(&RowKey::Int(11), "dept"), RowKey::Int(10));

        // insert inside the merge and fill it by paste
        store
            .append(vec![RowInput::new().cell("id", 13)], AppendOptions::at(1))
            .unwrap();
        assert_eq!(store.get_row_span_data(&RowKey::Int(10), "dept").unwrap().count, 3);
        store.paste(&[vec![CellValue::from("Ignored"), CellValue::from("Choi")]], GridPosition::new(1, 1));
        assert_eq!(store.get_value(&RowKey::Int(13), "name", false), Some(CellValue::from("Choi")));
        assert_eq!(store.get_value(&RowKey::Int(13), "dept", false), Some(CellValue::from("Sales")));

        // ignored columns never count as changes
        store.set_value(&RowKey::Int(11), "note", "scratch", false);
        store.remove_row(&RowKey::Int(12), RemoveOptions::default());
        store.check(&RowKey::Int(13), false);

        let modified = store.get_modified_row_keys(&ModifiedRowOptions::default());
        assert_eq!(modified.create_list, vec![RowKey::Int(13)]);
        assert!(modified.update_list.is_empty());
        assert_eq!(modified.delete_list, vec![RowKey::Int(12)]);

        let checked = store.get_modified_row_list(&ModifiedRowOptions::default().only_checked());
        assert_eq!(checked.create_list[0]["name"], json!("Choi"));

        assert!(store.validate().is_empty());
        store.set_value(&RowKey::Int(11), "name", "  ", false);
        assert_eq!(store.validate_cell(&RowKey::Int(11), "name"), Some(ErrorCode::Required));

        store.restore();
        assert!(!store.is_changed());
        assert_eq!(store.len(), 3);

        assert_eq!(
            *events.borrow(),
            vec!["add", "change", "paste", "change", "remove", "change", "change", "beforeReset", "reset"]
        );
    }

    #[test]
    fn test_sorted_store_round_trip() {
        init_logger();
        let schema = ColumnSchema::new(vec![
            ColumnDef::new("grp").edit_type(EditType::Text),
            ColumnDef::new("score"),
        ]);
        let mut store = RowStore::new(schema);
        store
            .set_row_list(
                vec![
                    RowInput::new().cell("grp", "a").cell("score", 3).span("grp", 2),
                    RowInput::new().cell("score", 1),
                    RowInput::new().cell("grp", "b").cell("score", 2),
                ],
                None,
            )
            .unwrap();

        store.sort_by_field("score", Some(false));
        assert!(store.get_row_span_data(&RowKey::Int(1), "grp").is_none());
        store.remove_row(&RowKey::Int(0), RemoveOptions::default());
        store.sort_by_field(ROW_KEY_COLUMN, Some(true));

        // spans were maintained by key while sorted
        assert!(store.get_row_span_data(&RowKey::Int(1), "grp").is_none());
        assert_eq!(store.get_value(&RowKey::Int(1), "grp", false), Some(CellValue::from("a")));
        SpanIndex::verify(store.rows(), true).unwrap();

        let json = store.get_row_data_json(&RowKey::Int(2)).unwrap();
        assert_eq!(json, r#"{"grp":"b","score":2,"rowKey":2}"#);
    }
}
