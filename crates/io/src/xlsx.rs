// Excel decode (calamine) + export (rust_xlsxwriter)

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::{Workbook, Worksheet};

use tabset_engine::{Cell, NormValue, Table};

use crate::csv::unique_headers;
use crate::error::{DecodeError, ExportError};

/// Sheet names in workbook order, for the caller's sheet picker.
pub fn list_sheets(bytes: &[u8]) -> Result<Vec<String>, DecodeError> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| DecodeError::Excel(e.to_string()))?;
    Ok(workbook.sheet_names().to_vec())
}

/// Decode one sheet of an Excel payload into a table, defaulting to the
/// first sheet. Returns the table together with the sheet name actually
/// used. The first sheet row is the header.
pub fn decode(bytes: &[u8], sheet: Option<&str>) -> Result<(Table, String), DecodeError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| DecodeError::Excel(e.to_string()))?;
    let names = workbook.sheet_names().to_vec();

    let selected = match sheet {
        Some(name) => {
            if !names.iter().any(|n| n == name) {
                return Err(DecodeError::SheetNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => names.first().cloned().ok_or(DecodeError::EmptyWorkbook)?,
    };

    let range = workbook
        .worksheet_range(&selected)
        .map_err(|e| DecodeError::Excel(e.to_string()))?;

    let mut sheet_rows = range.rows();
    let header = sheet_rows
        .next()
        .ok_or_else(|| DecodeError::Excel(format!("sheet '{selected}' is empty")))?;
    let columns = unique_headers(header.iter().map(data_to_header).collect());
    let width = columns.len();

    let mut rows = Vec::new();
    for sheet_row in sheet_rows {
        let mut row: Vec<Cell> = sheet_row.iter().take(width).map(data_to_cell).collect();
        row.resize(width, Cell::Null);
        rows.push(row);
    }

    let table = Table::new(columns, rows).map_err(|e| DecodeError::BadTable(e.to_string()))?;
    Ok((table, selected))
}

fn data_to_header(data: &Data) -> String {
    data.to_string()
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Null,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Real(*n),
        Data::Int(n) => Cell::Int(*n),
        Data::Bool(b) => Cell::Bool(*b),
        // serial number; callers see a plain numeric value
        Data::DateTime(dt) => Cell::Real(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Null,
    }
}

/// Serialize a result as a one-column workbook. Values are written as
/// text so identifier-like numbers survive a round trip through Excel
/// unchanged.
pub fn export_result(values: &[NormValue]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name("result")
        .map_err(|e| ExportError::Xlsx(e.to_string()))?;
    sheet
        .write_string(0, 0, "value")
        .map_err(|e| ExportError::Xlsx(e.to_string()))?;
    for (i, value) in values.iter().enumerate() {
        sheet
            .write_string((i + 1) as u32, 0, value.canonical_text())
            .map_err(|e| ExportError::Xlsx(e.to_string()))?;
    }
    workbook
        .save_to_buffer()
        .map_err(|e| ExportError::Xlsx(e.to_string()))
}

/// Serialize a full table (all columns, typed cells) as a workbook with a
/// single `filtered` sheet.
pub fn export_table(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name("filtered")
        .map_err(|e| ExportError::Xlsx(e.to_string()))?;

    for (col, name) in table.columns().iter().enumerate() {
        sheet
            .write_string(0, col as u16, name.as_str())
            .map_err(|e| ExportError::Xlsx(e.to_string()))?;
    }
    for (row, cells) in table.rows().iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            write_cell(sheet, (row + 1) as u32, col as u16, cell)?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ExportError::Xlsx(e.to_string()))
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<(), ExportError> {
    let written = match cell {
        Cell::Null => return Ok(()),
        Cell::Bool(b) => sheet.write_boolean(row, col, *b),
        Cell::Int(i) => sheet.write_number(row, col, *i as f64),
        Cell::Real(r) => sheet.write_number(row, col, *r),
        Cell::Text(s) => sheet.write_string(row, col, s),
    };
    written.map_err(|e| ExportError::Xlsx(e.to_string()))?;
    Ok(())
}
