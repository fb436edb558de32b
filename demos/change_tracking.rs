/// Change Tracking Example
///
/// This example demonstrates:
/// - Committing a baseline with `set_row_list`
/// - Collecting created, updated and deleted rows
/// - Listening to store events
/// - Deferred resets and `restore`

use gridstore::{
    AppendOptions, ColumnDef, ColumnSchema, EditType, ModifiedRowOptions, RemoveOptions, RowInput, RowKey,
    RowStore, StoreOptions,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== GridStore Change Tracking Example ===\n");

    let schema = ColumnSchema::new(vec![
        ColumnDef::new("item").edit_type(EditType::Text),
        ColumnDef::new("qty").edit_type(EditType::Text),
        ColumnDef::new("memo").edit_type(EditType::Text).ignored(),
    ]);
    let options = StoreOptions {
        deferred_reset_threshold: 2,
        ..StoreOptions::default()
    };
    let mut store = RowStore::with_options(schema, options);
    store.subscribe(|event| println!("   event: {:?}", event));

    // 1. Load three rows: above the threshold, so the reset is deferred
    println!("1. Loading a baseline...");
    store.set_row_list(
        vec![
            RowInput::new().cell("item", "bolts").cell("qty", 100),
            RowInput::new().cell("item", "nuts").cell("qty", 250),
            RowInput::new().cell("item", "washers").cell("qty", 75),
        ],
        Some(Box::new(|store: &mut RowStore| println!("   baseline committed with {} rows", store.len()))),
    )?;
    println!("   rows before running pending tasks: {}", store.len());
    store.run_pending_tasks();
    println!();

    // 2. Edit
    println!("2. Editing...");
    store.set_value(&RowKey::Int(1), "qty", 300, false);
    store.set_value(&RowKey::Int(2), "memo", "recount", false);
    store.remove_row(&RowKey::Int(0), RemoveOptions::default());
    store.append(vec![RowInput::new().cell("item", "screws").cell("qty", 40)], AppendOptions::default())?;
    println!();

    // 3. Report
    println!("3. Modified rows (memo is ignored):");
    let modified = store.get_modified_row_list(&ModifiedRowOptions::default());
    println!("{}\n", serde_json::to_string_pretty(&modified)?);

    // 4. Restore
    println!("4. Restoring...");
    store.restore();
    store.run_pending_tasks();
    println!("   changed after restore: {}\n", store.is_changed());

    println!("=== Example Complete ===");
    Ok(())
}
