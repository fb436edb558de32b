use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridstore::*;

fn schema() -> ColumnSchema {
    ColumnSchema::new(vec![
        ColumnDef::new("group").edit_type(EditType::Text),
        ColumnDef::new("name").edit_type(EditType::Text).required(),
        ColumnDef::new("score").edit_type(EditType::Text),
    ])
}

/// Rows grouped in spans of four on `group`.
fn rows(size: usize) -> Vec<RowInput> {
    (0..size)
        .map(|i| {
            let input = RowInput::new()
                .cell("group", format!("g{}", i / 4))
                .cell("name", format!("name{}", i))
                .cell("score", ((i * 7919) % 1000) as i64);
            if i % 4 == 0 {
                input.span("group", 4)
            } else {
                input
            }
        })
        .collect()
}

fn loaded(size: usize) -> RowStore {
    RowStore::from_rows(schema(), StoreOptions::default(), rows(size)).unwrap()
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(loaded(size)));
        });
    }
    group.finish();
}

fn bench_append_inside_span(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_inside_span");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_batched(
                || loaded(size),
                |mut store| {
                    store
                        .append(vec![RowInput::new().cell("name", "x")], AppendOptions::at(size / 2 + 1))
                        .unwrap();
                    store
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_remove_main_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_main_row");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_batched(
                || loaded(size),
                |mut store| {
                    store.remove_row(&RowKey::Int((size / 2) as i64 & !3), RemoveOptions::default());
                    store
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_sort_by_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_by_field");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_batched(
                || loaded(size),
                |mut store| {
                    store.sort_by_field("score", Some(true));
                    store
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_modified_row_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("modified_row_list");

    for size in [100, 1000, 10000].iter() {
        let mut store = loaded(size);
        for i in (0..size).step_by(10) {
            store.set_value(&RowKey::Int(i as i64), "name", "edited", true);
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(store.get_modified_row_list(&ModifiedRowOptions::default())));
        });
    }
    group.finish();
}

fn bench_paste_block(c: &mut Criterion) {
    let data: Vec<Vec<CellValue>> = (0..100)
        .map(|i| vec![CellValue::from(format!("p{}", i)), CellValue::from(i as i64)])
        .collect();

    c.bench_function("paste_100x2", |b| {
        b.iter_batched(
            || loaded(1000),
            |mut store| {
                store.paste(black_box(&data), GridPosition::new(500, 1));
                store
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

fn bench_validate(c: &mut Criterion) {
    let store = loaded(10000);
    c.bench_function("validate_10000", |b| b.iter(|| black_box(store.validate())));
}

criterion_group!(
    benches,
    bench_load,
    bench_append_inside_span,
    bench_remove_main_row,
    bench_sort_by_field,
    bench_modified_row_list,
    bench_paste_block,
    bench_validate
);
criterion_main!(benches);
