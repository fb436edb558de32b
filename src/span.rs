/// Row-span bookkeeping.
///
/// A span group is a contiguous run of rows that share one displayed value
/// in a column. The topmost row is the main row and records the block length
/// in `count`; every other member records its negative distance to the main
/// row. `SpanIndex` keeps these descriptors consistent when rows are loaded,
/// inserted or removed.
///
/// All functions operate on the store's row slice together with its
/// key -> position index, so no row is ever referenced outside the store.

use crate::row::{Row, SpanDescriptor};
use crate::value::{CellValue, RowKey};
use std::collections::{BTreeMap, HashMap};

pub struct SpanIndex;

impl SpanIndex {
    /// Materialise `_extraData.rowSpan` declarations of a freshly formatted batch.
    ///
    /// `declared[i]` belongs to `rows[i]`. A declaration is skipped when the
    /// row already carries span data for that column, so re-parsing formatted
    /// rows is a no-op. Blocks are clipped to the end of the batch.
    pub fn apply_declared(rows: &mut [Row], declared: &[BTreeMap<String, usize>]) {
        for (i, spans) in declared.iter().enumerate().take(rows.len()) {
            for (column, &count) in spans {
                if count <= 1 || rows[i].span_data(column).is_some() {
                    continue;
                }
                let available = rows.len() - i;
                let clipped = count.min(available);
                if clipped < count {
                    log::warn!(
                        "rowSpan {} for '{}' on row {} runs past the loaded rows; clipped to {}",
                        count,
                        column,
                        rows[i].key(),
                        clipped
                    );
                }
                let length = clipped as i64;
                if length <= 1 {
                    continue;
                }
                let main_key = rows[i].key().clone();
                rows[i].set_span_data(column, Some(SpanDescriptor::main(main_key, length)));
                Self::renumber(rows, i, column, length);
            }
        }
    }

    /// Grow the span groups that an insertion of `length` rows at `at` falls into.
    ///
    /// Must be called after the rows were inserted and the index updated. The
    /// row above the insertion point decides: if its group continues below it
    /// the new rows join the group, and with `extend_prev` they join even when
    /// it was the last member. Members are renumbered in row order.
    pub fn extend_for_insert(
        rows: &mut [Row],
        index: &HashMap<RowKey, usize>,
        at: usize,
        length: usize,
        extend_prev: bool,
    ) {
        if at == 0 || at > rows.len() || length == 0 {
            return;
        }
        let end = (at + length).min(rows.len());
        let prev_spans = rows[at - 1].span_entries().clone();

        for (column, data) in prev_spans {
            let Some(&main_pos) = index.get(&data.main_row_key) else {
                continue;
            };
            let main_count = match rows[main_pos].span_data(&column) {
                Some(main) if main.is_main_row => main.count,
                _ => continue,
            };
            let start_offset = data.offset() + 1;

            if main_count > start_offset || extend_prev {
                let main_key = data.main_row_key.clone();
                let mut members = Self::member_positions(rows, &main_key, &column);
                members.extend(at..end);
                members.sort_unstable();
                members.dedup();

                log::trace!(
                    "extending span of row {} in '{}' to {}",
                    main_key,
                    column,
                    members.len() + 1
                );
                let value = rows[main_pos].value_or_empty(&column);
                rows[main_pos].set_span_data(&column, Some(SpanDescriptor::main(main_key.clone(), members.len() as i64 + 1)));
                Self::relink(rows, &members, &column, &main_key, &value);
            }
        }
    }

    /// Repair the groups a removed row belonged to.
    ///
    /// Must be called after the row left `rows` and the index was updated.
    /// A removed main row hands its role to the next member, which receives
    /// the removed value unless `keep_own_value` is set. Groups shrinking to a
    /// single row lose their span data.
    pub fn sync_for_remove(
        rows: &mut [Row],
        index: &HashMap<RowKey, usize>,
        removed: &Row,
        keep_own_value: bool,
    ) {
        for (column, data) in removed.span_entries() {
            if data.is_main_row {
                if data.count <= 1 {
                    continue;
                }
                let members = Self::member_positions(rows, removed.key(), column);
                let Some((&new_main, rest)) = members.split_first() else {
                    continue;
                };
                let value = if keep_own_value {
                    rows[new_main].value_or_empty(column)
                } else {
                    removed.value_or_empty(column)
                };
                rows[new_main].set(column, value.clone());

                if rest.is_empty() {
                    rows[new_main].set_span_data(column, None);
                    continue;
                }
                let new_key = rows[new_main].key().clone();
                log::trace!("row {} promoted to span main row in '{}'", new_key, column);
                rows[new_main].set_span_data(
                    column,
                    Some(SpanDescriptor::main(new_key.clone(), members.len() as i64)),
                );
                Self::relink(rows, rest, column, &new_key, &value);
            } else {
                let Some(&main_pos) = index.get(&data.main_row_key) else {
                    continue;
                };
                let members = Self::member_positions(rows, &data.main_row_key, column);
                if members.is_empty() {
                    rows[main_pos].set_span_data(column, None);
                    continue;
                }
                let main_key = data.main_row_key.clone();
                let value = rows[main_pos].value_or_empty(column);
                rows[main_pos].set_span_data(
                    column,
                    Some(SpanDescriptor::main(main_key.clone(), members.len() as i64 + 1)),
                );
                Self::relink(rows, &members, column, &main_key, &value);
            }
        }
    }

    /// Positions of the non-main members of a group, ordered by their offset.
    pub fn member_positions(rows: &[Row], main_key: &RowKey, column: &str) -> Vec<usize> {
        let mut members: Vec<(i64, usize)> = rows
            .iter()
            .enumerate()
            .filter_map(|(pos, row)| {
                row.span_data(column)
                    .filter(|d| !d.is_main_row && &d.main_row_key == main_key)
                    .map(|d| (d.offset(), pos))
            })
            .collect();
        members.sort_unstable();
        members.into_iter().map(|(_, pos)| pos).collect()
    }

    /// Check that every group's `count` matches its membership and, with
    /// `check_positions`, that members sit at `main + offset`.
    pub fn verify(rows: &[Row], check_positions: bool) -> Result<(), String> {
        let mut positions: HashMap<&RowKey, usize> = HashMap::new();
        for (pos, row) in rows.iter().enumerate() {
            positions.insert(row.key(), pos);
        }

        for (pos, row) in rows.iter().enumerate() {
            for (column, data) in row.span_entries() {
                if data.is_main_row {
                    if &data.main_row_key != row.key() {
                        return Err(format!("main row {} in '{}' points at {}", row.key(), column, data.main_row_key));
                    }
                    let members = Self::member_positions(rows, row.key(), column);
                    if data.count != members.len() as i64 + 1 {
                        return Err(format!(
                            "span of row {} in '{}' has count {} but {} members",
                            row.key(),
                            column,
                            data.count,
                            members.len() + 1
                        ));
                    }
                } else {
                    let main_pos = *positions.get(&data.main_row_key).ok_or_else(|| {
                        format!("row {} in '{}' points at missing main row {}", row.key(), column, data.main_row_key)
                    })?;
                    if check_positions && main_pos as i64 + data.offset() != pos as i64 {
                        return Err(format!(
                            "row {} in '{}' is at {} but offset {} from main row at {}",
                            row.key(),
                            column,
                            pos,
                            data.offset(),
                            main_pos
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Mark the `span_count - 1` rows below `main_pos` as its siblings.
    fn renumber(rows: &mut [Row], main_pos: usize, column: &str, span_count: i64) {
        let main_key = rows[main_pos].key().clone();
        let value = rows[main_pos].value_or_empty(column);

        for offset in 1..span_count {
            let pos = main_pos + offset as usize;
            if pos >= rows.len() {
                break;
            }
            rows[pos].set(column, value.clone());
            rows[pos].set_span_data(column, Some(SpanDescriptor::sibling(main_key.clone(), offset)));
        }
    }

    /// Point the given members at `main_key` with offsets 1, 2, ... in order.
    fn relink(rows: &mut [Row], members: &[usize], column: &str, main_key: &RowKey, value: &CellValue) {
        for (i, &pos) in members.iter().enumerate() {
            rows[pos].set(column, value.clone());
            rows[pos].set_span_data(column, Some(SpanDescriptor::sibling(main_key.clone(), i as i64 + 1)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::RowState;

    fn rows_with(values: &[&str]) -> Vec<Row> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Row::new(RowKey::Int(i as i64), vec![("c".to_string(), CellValue::from(*v))], RowState::Normal))
            .collect()
    }

    fn index_of(rows: &[Row]) -> HashMap<RowKey, usize> {
        rows.iter().enumerate().map(|(i, r)| (r.key().clone(), i)).collect()
    }

    fn declare(rows: &mut [Row], at: usize, count: usize) {
        let mut declared = vec![BTreeMap::new(); rows.len()];
        declared[at].insert("c".to_string(), count);
        SpanIndex::apply_declared(rows, &declared);
    }

    #[test]
    fn test_apply_declared_marks_siblings() {
        let mut rows = rows_with(&["A", "b", "c", "d"]);
        declare(&mut rows, 0, 3);

        assert_eq!(rows[0].span_data("c"), Some(&SpanDescriptor::main(RowKey::Int(0), 3)));
        assert_eq!(rows[1].span_data("c"), Some(&SpanDescriptor::sibling(RowKey::Int(0), 1)));
        assert_eq!(rows[2].span_data("c").unwrap().count, -2);
        assert!(rows[3].span_data("c").is_none());
        assert_eq!(rows[2].get("c"), Some(&CellValue::from("A")));
        SpanIndex::verify(&rows, true).unwrap();
    }

    #[test]
    fn test_apply_declared_is_idempotent_and_clips() {
        let mut rows = rows_with(&["A", "b"]);
        declare(&mut rows, 0, 5);
        assert_eq!(rows[0].span_data("c").unwrap().count, 2);

        rows[0].set("c", CellValue::from("Z"));
        declare(&mut rows, 0, 2);
        // existing span data wins, siblings untouched
        assert_eq!(rows[1].get("c"), Some(&CellValue::from("A")));
    }

    #[test]
    fn test_huge_declaration_below_first_row_is_clipped() {
        let mut rows = rows_with(&["w", "X", "y"]);
        declare(&mut rows, 1, usize::MAX);

        assert!(rows[0].span_data("c").is_none());
        assert_eq!(rows[1].span_data("c"), Some(&SpanDescriptor::main(RowKey::Int(1), 2)));
        assert_eq!(rows[2].span_data("c"), Some(&SpanDescriptor::sibling(RowKey::Int(1), 1)));
        assert_eq!(rows[2].get("c"), Some(&CellValue::from("X")));
        SpanIndex::verify(&rows, true).unwrap();
    }

    #[test]
    fn test_span_of_one_is_not_materialized() {
        let mut rows = rows_with(&["A", "b"]);
        declare(&mut rows, 0, 1);
        assert!(rows[0].span_data("c").is_none());
    }

    #[test]
    fn test_insert_inside_group_extends() {
        let mut rows = rows_with(&["A", "b", "c"]);
        declare(&mut rows, 0, 3);
        rows.insert(1, Row::new(RowKey::Int(9), vec![], RowState::Normal));
        let index = index_of(&rows);

        SpanIndex::extend_for_insert(&mut rows, &index, 1, 1, false);

        assert_eq!(rows[0].span_data("c").unwrap().count, 4);
        assert_eq!(rows[1].span_data("c"), Some(&SpanDescriptor::sibling(RowKey::Int(0), 1)));
        assert_eq!(rows[3].span_data("c").unwrap().count, -3);
        assert_eq!(rows[1].get("c"), Some(&CellValue::from("A")));
        SpanIndex::verify(&rows, true).unwrap();
    }

    #[test]
    fn test_insert_after_last_member_needs_extend_flag() {
        let mut rows = rows_with(&["x", "x"]);
        declare(&mut rows, 0, 2);
        rows.push(Row::new(RowKey::Int(2), vec![("c".to_string(), CellValue::from("y"))], RowState::Normal));
        let index = index_of(&rows);

        let mut plain = rows.clone();
        SpanIndex::extend_for_insert(&mut plain, &index, 2, 1, false);
        assert!(plain[2].span_data("c").is_none());
        assert_eq!(plain[0].span_data("c").unwrap().count, 2);

        SpanIndex::extend_for_insert(&mut rows, &index, 2, 1, true);
        assert_eq!(rows[0].span_data("c").unwrap().count, 3);
        assert_eq!(rows[2].span_data("c"), Some(&SpanDescriptor::sibling(RowKey::Int(0), 2)));
        assert_eq!(rows[2].get("c"), Some(&CellValue::from("x")));
    }

    #[test]
    fn test_remove_main_row_promotes_next() {
        let mut rows = rows_with(&["A", "A", "A"]);
        declare(&mut rows, 0, 3);
        let removed = rows.remove(0);
        let index = index_of(&rows);

        SpanIndex::sync_for_remove(&mut rows, &index, &removed, false);

        assert_eq!(rows[0].span_data("c"), Some(&SpanDescriptor::main(RowKey::Int(1), 2)));
        assert_eq!(rows[1].span_data("c"), Some(&SpanDescriptor::sibling(RowKey::Int(1), 1)));
        assert_eq!(rows[0].get("c"), Some(&CellValue::from("A")));
        SpanIndex::verify(&rows, true).unwrap();
    }

    #[test]
    fn test_remove_main_keep_own_value() {
        let mut rows = rows_with(&["A", "b", "c"]);
        declare(&mut rows, 0, 2);
        rows[1].set("c", CellValue::from("edited"));
        let removed = rows.remove(0);
        let index = index_of(&rows);

        SpanIndex::sync_for_remove(&mut rows, &index, &removed, true);
        assert_eq!(rows[0].get("c"), Some(&CellValue::from("edited")));
        assert!(rows[0].span_data("c").is_none());
    }

    #[test]
    fn test_remove_sibling_shrinks_group() {
        let mut rows = rows_with(&["A", "A", "A", "z"]);
        declare(&mut rows, 0, 3);
        let removed = rows.remove(1);
        let index = index_of(&rows);

        SpanIndex::sync_for_remove(&mut rows, &index, &removed, false);

        assert_eq!(rows[0].span_data("c").unwrap().count, 2);
        assert_eq!(rows[1].span_data("c"), Some(&SpanDescriptor::sibling(RowKey::Int(0), 1)));
        SpanIndex::verify(&rows, true).unwrap();

        let removed = rows.remove(1);
        let index = index_of(&rows);
        SpanIndex::sync_for_remove(&mut rows, &index, &removed, false);
        assert!(rows[0].span_data("c").is_none());
    }

    #[test]
    fn test_verify_reports_bad_count() {
        let mut rows = rows_with(&["A", "A"]);
        declare(&mut rows, 0, 2);
        rows[0].set_span_data("c", Some(SpanDescriptor::main(RowKey::Int(0), 3)));
        assert!(SpanIndex::verify(&rows, false).is_err());
    }
}
