/// Grid Basics Example
///
/// This example demonstrates:
/// - Loading rows from JSON with a key column
/// - Reading, writing and clearing cells
/// - Sorting, checking rows and validating required fields
///
/// Run with `RUST_LOG=debug` to see the store's log output.

use gridstore::{ColumnSchema, GridPosition, CellValue, RowInput, RowKey, RowStore, StoreOptions};

const SCHEMA: &str = r#"{
    "columnModelList": [
        {"columnName": "id"},
        {"columnName": "name", "editType": "text", "isRequired": true},
        {"columnName": "email", "editType": "text"},
        {"columnName": "age", "editType": "text"}
    ],
    "keyColumnName": "id",
    "selectType": "checkbox"
}"#;

const ROWS: &str = r#"[
    {"id": 1, "name": "Alice", "email": "alice@example.com", "age": 30},
    {"id": 2, "name": "Bob", "email": "bob@example.com", "age": 25},
    {"id": 3, "name": "Charlie", "email": "charlie@example.com", "age": 35,
     "_extraData": {"rowState": "DISABLED_CHECK"}}
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== GridStore Basics Example ===\n");

    // 1. Load
    println!("1. Loading rows...");
    let schema = ColumnSchema::from_json(SCHEMA)?;
    let mut store = RowStore::from_rows(schema, StoreOptions::default(), RowInput::list_from_json_str(ROWS)?)?;
    println!("   Loaded {} rows\n", store.len());

    // 2. Read and write
    println!("2. Editing cells...");
    store.set_value(&RowKey::Int(2), "email", "  bob@work.example  ", false);
    println!("   Bob's email: {:?}", store.get_value(&RowKey::Int(2), "email", false));
    println!("   ...was: {:?}", store.get_value(&RowKey::Int(2), "email", true));
    store.del(&RowKey::Int(1), "age");
    println!("   Alice's age after delete: {:?}\n", store.get_value(&RowKey::Int(1), "age", false));

    // 3. Sort
    println!("3. Sorting by name, descending...");
    store.sort_by_field("name", Some(false));
    for row in store.get_row_list(false, false) {
        println!("   {}", serde_json::to_string(&row)?);
    }
    println!();

    // 4. Check rows
    println!("4. Checking rows...");
    store.check_all();
    let checked: Vec<String> = store
        .get_row_list(true, false)
        .iter()
        .map(|row| row["name"].to_string())
        .collect();
    println!("   Checked (Charlie's checkbox is disabled): {}\n", checked.join(", "));

    // 5. Paste and validate
    println!("5. Pasting a blank name and validating...");
    store.paste(&[vec![CellValue::from("")]], GridPosition::new(0, 1));
    for result in store.validate() {
        println!("   {}", serde_json::to_string(&result)?);
    }
    println!();

    println!("=== Example Complete ===");
    Ok(())
}
