/// Row Span Example
///
/// This example demonstrates:
/// - Declaring vertical merges with `_extraData.rowSpan`
/// - How inserts and removals keep merge groups consistent
/// - Spans being suspended while the grid is sorted by a column

use gridstore::{AppendOptions, ColumnDef, ColumnSchema, EditType, RemoveOptions, RowInput, RowKey, RowStore};

fn print_groups(store: &RowStore) {
    for row in store.rows() {
        let span = store
            .get_row_span_data(row.key(), "dept")
            .map(|s| format!("main={} count={}", s.main_row_key, s.count))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   row {:>2}  dept={:<6} name={:<6} [{}]",
            row.key().to_string(),
            row.value_or_empty("dept").to_string(),
            row.value_or_empty("name").to_string(),
            span
        );
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== GridStore Row Span Example ===\n");

    let schema = ColumnSchema::new(vec![
        ColumnDef::new("dept").edit_type(EditType::Text),
        ColumnDef::new("name").edit_type(EditType::Text),
    ]);
    let mut store = RowStore::new(schema);
    store.set_row_list(
        vec![
            RowInput::new().cell("dept", "Sales").cell("name", "Kim").span("dept", 3),
            RowInput::new().cell("name", "Lee"),
            RowInput::new().cell("name", "Park"),
            RowInput::new().cell("dept", "Ops").cell("name", "Choi"),
        ],
        None,
    )?;

    println!("1. Loaded with a three-row merge:");
    print_groups(&store);

    println!("2. Insert inside the merge (joins it):");
    store.append(vec![RowInput::new().cell("name", "Jung")], AppendOptions::at(1))?;
    print_groups(&store);

    println!("3. Insert right after the merge with extend_prev_row_span:");
    store.append(
        vec![RowInput::new().cell("name", "Kang")],
        AppendOptions::at(4).extend_prev_row_span(),
    )?;
    print_groups(&store);

    println!("4. Remove the main row (next member takes over):");
    store.remove_row(&RowKey::Int(0), RemoveOptions::default());
    print_groups(&store);

    println!("5. Sorted by name (spans suspended):");
    store.sort_by_field("name", Some(true));
    print_groups(&store);

    println!("6. Back to key order:");
    store.sort_by_field("rowKey", Some(true));
    print_groups(&store);

    println!("=== Example Complete ===");
    Ok(())
}
