use serde::Deserialize;

use crate::error::StoreError;

/// Resource caps for one store instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreLimits {
    /// Session eviction window in seconds.
    pub ttl_seconds: i64,
    /// Upload-count cap per session.
    pub max_files_per_session: usize,
    /// Per-file size cap in bytes.
    pub max_file_bytes: usize,
    /// Row cap for table previews.
    pub max_preview_rows: usize,
    /// Cap on reported null-cell positions per scan.
    pub max_null_cells: usize,
    /// Cap on result-set cardinality accepted by `put_result`.
    pub max_result_values: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            ttl_seconds: 30 * 60,
            max_files_per_session: 20,
            max_file_bytes: 20 * 1024 * 1024,
            max_preview_rows: 30,
            max_null_cells: 5000,
            max_result_values: 2_000_000,
        }
    }
}

impl StoreLimits {
    pub fn from_toml(toml_str: &str) -> Result<Self, StoreError> {
        toml::from_str(toml_str).map_err(|e| StoreError::ConfigParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let limits = StoreLimits::default();
        assert_eq!(limits.ttl_seconds, 1800);
        assert_eq!(limits.max_files_per_session, 20);
        assert_eq!(limits.max_file_bytes, 20 * 1024 * 1024);
        assert_eq!(limits.max_result_values, 2_000_000);
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let limits = StoreLimits::from_toml(
            r#"
ttl_seconds = 60
max_files_per_session = 3
"#,
        )
        .unwrap();
        assert_eq!(limits.ttl_seconds, 60);
        assert_eq!(limits.max_files_per_session, 3);
        assert_eq!(limits.max_file_bytes, StoreLimits::default().max_file_bytes);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = StoreLimits::from_toml("ttl_seconds = \"soon\"").unwrap_err();
        assert!(matches!(err, StoreError::ConfigParse(_)));
    }
}
