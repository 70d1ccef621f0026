use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// CSV read error (malformed quoting, io).
    Csv(String),
    /// Excel workbook could not be opened or read.
    Excel(String),
    /// The requested sheet does not exist in the workbook.
    SheetNotFound(String),
    /// Workbook contains no sheets at all.
    EmptyWorkbook,
    /// Decoded data violates the table invariants.
    BadTable(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv(msg) => write!(f, "csv decode error: {msg}"),
            Self::Excel(msg) => write!(f, "excel decode error: {msg}"),
            Self::SheetNotFound(name) => write!(f, "sheet not found: {name}"),
            Self::EmptyWorkbook => write!(f, "workbook contains no sheets"),
            Self::BadTable(msg) => write!(f, "decoded table invalid: {msg}"),
        }
    }
}

impl std::error::Error for DecodeError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    Csv(String),
    Xlsx(String),
    Zip(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv(msg) => write!(f, "csv export error: {msg}"),
            Self::Xlsx(msg) => write!(f, "xlsx export error: {msg}"),
            Self::Zip(msg) => write!(f, "zip export error: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}
