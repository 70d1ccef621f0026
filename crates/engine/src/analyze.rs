use std::collections::HashMap;

use regex::Regex;
use serde::Serialize;

use crate::table::Table;

/// Suggest a normalized name for each original column: trim, collapse
/// whitespace runs to `_`, drop non-word characters, lowercase. Duplicate
/// suggestions get `_2`, `_3`, ... suffixes. Suggestions are advisory;
/// nothing is applied until the caller submits a rename map.
pub fn suggest_column_names(columns: &[String]) -> Vec<String> {
    let whitespace = Regex::new(r"\s+").unwrap();
    let non_word = Regex::new(r"[^\w]").unwrap();

    let mut used: HashMap<String, usize> = HashMap::new();
    let mut suggestions = Vec::with_capacity(columns.len());

    for column in columns {
        let mut s = whitespace.replace_all(column.trim(), "_").into_owned();
        s = non_word.replace_all(&s, "").into_owned();
        s = s.to_lowercase();
        if s.is_empty() {
            s = "col".to_string();
        }
        match used.get_mut(&s) {
            Some(count) => {
                *count += 1;
                suggestions.push(format!("{s}_{count}"));
            }
            None => {
                used.insert(s.clone(), 1);
                suggestions.push(s);
            }
        }
    }

    suggestions
}

/// Position of one null cell. Rows are 1-based to match what a user sees
/// in a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NullCell {
    pub row: usize,
    pub col: String,
}

/// Scan for null cells, truncated at `max` positions.
pub fn find_null_cells(table: &Table, max: usize) -> Vec<NullCell> {
    let mut out = Vec::new();
    'scan: for (row_idx, row) in table.rows().iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            if cell.is_null() {
                out.push(NullCell {
                    row: row_idx + 1,
                    col: table.columns()[col_idx].clone(),
                });
                if out.len() >= max {
                    break 'scan;
                }
            }
        }
    }
    out
}
