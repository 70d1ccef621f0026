// Multi-file export: filtered tables packaged as a zip of workbooks

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use tabset_engine::Table;

use crate::error::ExportError;
use crate::xlsx;

/// Entry name for a filtered export derived from the original upload
/// name: `patients.csv` → `patients_filtered.xlsx`.
pub fn filtered_name(filename: &str) -> String {
    let base = filename
        .rsplit_once('.')
        .map(|(base, _)| base)
        .unwrap_or(filename);
    format!("{base}_filtered.xlsx")
}

/// Package several tables as a zip archive, one xlsx entry per table.
pub fn tables_to_zip(entries: &[(String, Table)]) -> Result<Vec<u8>, ExportError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, table) in entries {
        let workbook = xlsx::export_table(table)?;
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| ExportError::Zip(e.to_string()))?;
        writer
            .write_all(&workbook)
            .map_err(|e| ExportError::Zip(e.to_string()))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| ExportError::Zip(e.to_string()))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabset_engine::Cell;
    use zip::ZipArchive;

    #[test]
    fn filtered_names() {
        assert_eq!(filtered_name("patients.csv"), "patients_filtered.xlsx");
        assert_eq!(filtered_name("wb.backup.xlsx"), "wb.backup_filtered.xlsx");
        assert_eq!(filtered_name("noext"), "noext_filtered.xlsx");
    }

    #[test]
    fn zip_contains_one_workbook_per_table() {
        let table_a = Table::new(
            vec!["id".into()],
            vec![vec![Cell::Int(1)], vec![Cell::Int(2)]],
        )
        .unwrap();
        let table_b = Table::new(vec!["id".into()], vec![vec![Cell::Int(3)]]).unwrap();

        let bytes = tables_to_zip(&[
            ("a_filtered.xlsx".to_string(), table_a.clone()),
            ("b_filtered.xlsx".to_string(), table_b),
        ])
        .unwrap();

        let mut archive = ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["a_filtered.xlsx", "b_filtered.xlsx"]);

        // entries decode back into tables
        let mut entry = archive.by_name("a_filtered.xlsx").unwrap();
        let mut workbook = Vec::new();
        std::io::Read::read_to_end(&mut entry, &mut workbook).unwrap();
        let (decoded, _) = crate::xlsx::decode(&workbook, None).unwrap();
        assert_eq!(decoded.columns(), table_a.columns());
        assert_eq!(decoded.row_count(), 2);
    }
}
