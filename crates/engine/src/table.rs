use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::value::Cell;

/// Declared upload type. Detection is by extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Csv,
    Excel,
}

impl FileType {
    pub fn from_filename(name: &str) -> Result<Self, EngineError> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            Ok(Self::Csv)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Ok(Self::Excel)
        } else {
            Err(EngineError::UnsupportedFileType(name.to_string()))
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Excel => write!(f, "excel"),
        }
    }
}

/// A decoded tabular payload: ordered unique column names and rows of
/// cells aligned positionally with the columns. Construction enforces the
/// width invariant once, so every row always has exactly the table's
/// columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, EngineError> {
        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(EngineError::DuplicateColumn(name.clone()));
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(EngineError::RowWidthMismatch {
                    row: i,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Materialize one column as a cell sequence.
    pub fn column(&self, name: &str) -> Option<Vec<Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].clone()).collect())
    }

    /// First `n` rows, for previews.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Apply a column rename map (old name → new name) and return the
    /// renamed table. Old names absent from the table are ignored; new
    /// names are trimmed, must be non-empty, and must leave the column
    /// set unique.
    pub fn apply_rename(&self, map: &HashMap<String, String>) -> Result<Table, EngineError> {
        let mut columns = self.columns.clone();
        for name in columns.iter_mut() {
            if let Some(new) = map.get(name) {
                let trimmed = new.trim();
                if trimmed.is_empty() {
                    return Err(EngineError::EmptyColumnName(name.clone()));
                }
                *name = trimmed.to_string();
            }
        }
        Table::new(columns, self.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["id".into(), "name".into()],
            vec![
                vec![Cell::Int(1), Cell::Text("a".into())],
                vec![Cell::Int(2), Cell::Text("b".into())],
            ],
        )
        .unwrap()
    }

    #[test]
    fn file_type_detection() {
        assert_eq!(FileType::from_filename("a.csv").unwrap(), FileType::Csv);
        assert_eq!(FileType::from_filename("A.XLSX").unwrap(), FileType::Excel);
        assert_eq!(FileType::from_filename("b.xls").unwrap(), FileType::Excel);
        assert!(matches!(
            FileType::from_filename("notes.txt"),
            Err(EngineError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![Cell::Int(1)]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::RowWidthMismatch { row: 0, expected: 2, found: 1 }
        );
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = Table::new(vec!["a".into(), "a".into()], vec![]).unwrap_err();
        assert_eq!(err, EngineError::DuplicateColumn("a".into()));
    }

    #[test]
    fn column_extraction() {
        let t = sample();
        assert_eq!(t.column("id").unwrap(), vec![Cell::Int(1), Cell::Int(2)]);
        assert!(t.column("missing").is_none());
    }

    #[test]
    fn head_truncates() {
        let t = sample();
        assert_eq!(t.head(1).row_count(), 1);
        assert_eq!(t.head(10).row_count(), 2);
        assert_eq!(t.head(1).columns(), t.columns());
    }

    #[test]
    fn rename_applies_and_validates() {
        let t = sample();
        let renamed = t
            .apply_rename(&HashMap::from([
                ("id".to_string(), " patient_id ".to_string()),
                ("missing".to_string(), "x".to_string()),
            ]))
            .unwrap();
        assert_eq!(renamed.columns(), ["patient_id", "name"]);
        // original untouched
        assert_eq!(t.columns(), ["id", "name"]);

        let empty = t.apply_rename(&HashMap::from([("id".to_string(), "  ".to_string())]));
        assert_eq!(empty.unwrap_err(), EngineError::EmptyColumnName("id".into()));

        let dup = t.apply_rename(&HashMap::from([("id".to_string(), "name".to_string())]));
        assert_eq!(dup.unwrap_err(), EngineError::DuplicateColumn("name".into()));
    }
}
