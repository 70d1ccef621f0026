use rustc_hash::FxHashMap;

use crate::error::EngineError;
use crate::table::Table;
use crate::value::{normalize, NormValue};

/// Filter a table down to the rows whose `column` value is a member of a
/// computed result, keeping every source column.
///
/// Kept rows are ordered by their value's rank in the result sequence, so
/// every exported file lines up with the result preview; rows sharing a
/// value keep their original relative order. Cells are matched through the
/// same normalization the set algebra used (a null cell matches a kept
/// canonical null).
pub fn filter_by_result(
    table: &Table,
    column: &str,
    result: &[NormValue],
) -> Result<Table, EngineError> {
    let idx = table
        .column_index(column)
        .ok_or_else(|| EngineError::ColumnNotFound(column.to_string()))?;

    let rank: FxHashMap<&NormValue, usize> =
        result.iter().enumerate().map(|(i, v)| (v, i)).collect();

    let mut kept: Vec<(usize, usize)> = Vec::new();
    for (row_idx, row) in table.rows().iter().enumerate() {
        if let Some(value) = normalize(&row[idx], false) {
            if let Some(&r) = rank.get(&value) {
                kept.push((r, row_idx));
            }
        }
    }
    kept.sort_by_key(|(r, _)| *r);

    let rows = kept
        .into_iter()
        .map(|(_, row_idx)| table.rows()[row_idx].clone())
        .collect();
    Table::new(table.columns().to_vec(), rows)
}
