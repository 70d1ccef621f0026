// CSV decode + result export

use tabset_engine::{Cell, NormValue, Table};

use crate::error::{DecodeError, ExportError};

/// Field spellings treated as null markers, matching the common empty-cell
/// conventions of exported spreadsheets.
const NULL_MARKERS: &[&str] = &["", "NA", "N/A", "null", "None"];

/// Decode CSV bytes into a table. The first record is the header; ragged
/// data records are padded with nulls or truncated to the header width.
/// No delimiter sniffing: comma only.
pub fn decode(bytes: &[u8]) -> Result<Table, DecodeError> {
    let content = bytes_as_utf8(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|e| DecodeError::Csv(e.to_string()))?,
        None => return Err(DecodeError::Csv("file has no header row".into())),
    };
    let columns = unique_headers(header.iter().map(|h| h.to_string()).collect());
    let width = columns.len();

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| DecodeError::Csv(e.to_string()))?;
        let mut row: Vec<Cell> = record.iter().take(width).map(parse_cell).collect();
        row.resize(width, Cell::Null);
        rows.push(row);
    }

    Table::new(columns, rows).map_err(|e| DecodeError::BadTable(e.to_string()))
}

/// Serialize a result as a single-column CSV. Every field is quoted and
/// the output carries a UTF-8 BOM so Excel both decodes it correctly and
/// is less eager to re-type the values on open.
pub fn export_result(values: &[NormValue]) -> Result<Vec<u8>, ExportError> {
    let mut out = vec![0xef, 0xbb, 0xbf];
    {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(&mut out);
        writer
            .write_record(["value"])
            .map_err(|e| ExportError::Csv(e.to_string()))?;
        for value in values {
            writer
                .write_record([value.canonical_text()])
                .map_err(|e| ExportError::Csv(e.to_string()))?;
        }
        writer.flush().map_err(|e| ExportError::Csv(e.to_string()))?;
    }
    Ok(out)
}

/// Decode to UTF-8, stripping a BOM if present. Non-UTF-8 input falls back
/// to Windows-1252, common for Excel-exported CSVs.
fn bytes_as_utf8(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

fn parse_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if NULL_MARKERS.contains(&trimmed) {
        return Cell::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Cell::Int(i);
    }
    if let Ok(r) = trimmed.parse::<f64>() {
        return Cell::Real(r);
    }
    // text kept verbatim; trimming is the normalizer's concern
    Cell::Text(field.to_string())
}

/// Make header names non-empty and unique so they satisfy the table
/// invariants: blank headers become `col`, duplicates get `_2`, `_3`, ...
/// suffixes.
pub(crate) fn unique_headers(names: Vec<String>) -> Vec<String> {
    let mut seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let mut name = name.trim().to_string();
        if name.is_empty() {
            name = "col".to_string();
        }
        match seen.get_mut(&name) {
            Some(count) => {
                *count += 1;
                out.push(format!("{name}_{count}"));
            }
            None => {
                seen.insert(name.clone(), 1);
                out.push(name);
            }
        }
    }
    out
}
