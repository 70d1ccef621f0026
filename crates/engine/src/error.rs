use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The named column is missing from at least one input table.
    ColumnNotFound(String),
    /// `difference` invoked without a base input.
    BaseRequired,
    /// Base index outside the selected inputs.
    BaseInvalid { index: usize, inputs: usize },
    /// Operator token outside intersection/difference/symmetric_difference.
    UnsupportedOp(String),
    /// Upload extension is neither csv nor xls/xlsx.
    UnsupportedFileType(String),
    /// Rename target is empty after trimming.
    EmptyColumnName(String),
    /// Column names must stay unique (construction and rename).
    DuplicateColumn(String),
    /// A row does not match the table's column count.
    RowWidthMismatch { row: usize, expected: usize, found: usize },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound(name) => write!(f, "column not found: {name}"),
            Self::BaseRequired => write!(f, "difference requires a base input"),
            Self::BaseInvalid { index, inputs } => {
                write!(f, "base index {index} out of range for {inputs} input(s)")
            }
            Self::UnsupportedOp(op) => write!(f, "unsupported set operation: {op}"),
            Self::UnsupportedFileType(name) => write!(f, "unsupported file type: {name}"),
            Self::EmptyColumnName(old) => {
                write!(f, "empty replacement name for column '{old}'")
            }
            Self::DuplicateColumn(name) => write!(f, "duplicate column name: {name}"),
            Self::RowWidthMismatch { row, expected, found } => {
                write!(f, "row {row} has {found} cell(s), expected {expected}")
            }
        }
    }
}

impl std::error::Error for EngineError {}
