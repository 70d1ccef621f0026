use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Session id unknown (never issued, or already swept).
    SessionNotFound,
    /// File id not registered in this session.
    FileNotFound,
    /// No table has been stored for this file id yet.
    TableNotFound,
    /// Result id not registered in this session.
    ResultNotFound,
    /// Upload exceeds the per-file byte cap.
    FileTooLarge { bytes: usize, limit: usize },
    /// Session already holds the maximum number of files.
    TooManyFiles { limit: usize },
    /// Result cardinality exceeds the configured cap.
    ResultTooLarge { values: usize, limit: usize },
    /// TOML parse / deserialization error for the limits config.
    ConfigParse(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionNotFound => write!(f, "session not found"),
            Self::FileNotFound => write!(f, "file not found"),
            Self::TableNotFound => write!(f, "table not found"),
            Self::ResultNotFound => write!(f, "result not found"),
            Self::FileTooLarge { bytes, limit } => {
                write!(f, "file of {bytes} byte(s) exceeds limit of {limit}")
            }
            Self::TooManyFiles { limit } => {
                write!(f, "session already holds {limit} file(s)")
            }
            Self::ResultTooLarge { values, limit } => {
                write!(f, "result of {values} value(s) exceeds limit of {limit}")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
