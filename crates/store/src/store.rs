use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use tabset_engine::{FileType, NormValue, Table};

use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::limits::StoreLimits;

/// An uploaded file as received. The payload is immutable once stored;
/// `selected_sheet` is set only after a table has been derived from it.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub filename: String,
    pub file_type: FileType,
    pub content: Arc<[u8]>,
    pub sheet_names: Option<Vec<String>>,
    pub selected_sheet: Option<String>,
}

/// A materialized set-algebra output. Values are independent copies, never
/// aliasing a stored table's cells, so table overwrite or eviction cannot
/// corrupt a result handed out earlier.
#[derive(Debug, Clone)]
pub struct StoredResult {
    pub values: Vec<NormValue>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct SessionData {
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    touched_at: DateTime<Utc>,
    files: HashMap<String, StoredFile>,
    tables: HashMap<String, Table>,
    results: HashMap<String, StoredResult>,
}

impl SessionData {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            touched_at: now,
            files: HashMap::new(),
            tables: HashMap::new(),
            results: HashMap::new(),
        }
    }
}

/// Session-scoped registry of uploads, parsed tables and computed results.
///
/// One mutex serializes every read and write, including `cleanup()`, so a
/// sweep can never remove a session mid-mutation. Every operation resolves
/// its session first and refreshes `touched_at`; expiry itself is checked
/// only by `cleanup()`, so an overdue session stays readable until the
/// next sweep (the sweep runs on request traffic — an idle process keeps
/// expired sessions in memory until traffic resumes).
pub struct SessionStore {
    limits: StoreLimits,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    sessions: Mutex<HashMap<String, SessionData>>,
}

impl SessionStore {
    pub fn new(limits: StoreLimits) -> Self {
        Self::with_clock(limits, Arc::new(SystemClock))
    }

    pub fn with_clock(limits: StoreLimits, clock: Arc<dyn Clock>) -> Self {
        let ttl = Duration::seconds(limits.ttl_seconds);
        Self {
            limits,
            ttl,
            clock,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn limits(&self) -> &StoreLimits {
        &self.limits
    }

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    // A panic while holding the lock leaves only whole-value writes behind,
    // so the map is still coherent; recover instead of propagating poison.
    fn locked(&self) -> MutexGuard<'_, HashMap<String, SessionData>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Resolve a session, refresh `touched_at`, and run `f` on it under
    /// the registry lock.
    fn with_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut SessionData) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let now = self.clock.now();
        let mut sessions = self.locked();
        let session = sessions
            .get_mut(session_id)
            .ok_or(StoreError::SessionNotFound)?;
        session.touched_at = now;
        f(session)
    }

    pub fn create_session(&self) -> String {
        let id = Self::new_id();
        let now = self.clock.now();
        self.locked().insert(id.clone(), SessionData::new(now));
        id
    }

    /// Refresh a session's idle timer. No-op for unknown ids; the caller
    /// decides whether that warrants a fresh session.
    pub fn touch(&self, session_id: &str) {
        let now = self.clock.now();
        if let Some(session) = self.locked().get_mut(session_id) {
            session.touched_at = now;
        }
    }

    pub fn session_exists(&self, session_id: &str) -> bool {
        self.locked().contains_key(session_id)
    }

    /// Sweep every session idle longer than the TTL. Cheap when nothing
    /// has expired; safe to call concurrently and repeatedly.
    pub fn cleanup(&self) {
        let now = self.clock.now();
        self.locked()
            .retain(|_, session| now - session.touched_at <= self.ttl);
    }

    pub fn add_file(
        &self,
        session_id: &str,
        filename: &str,
        file_type: FileType,
        content: Vec<u8>,
    ) -> Result<String, StoreError> {
        if content.len() > self.limits.max_file_bytes {
            return Err(StoreError::FileTooLarge {
                bytes: content.len(),
                limit: self.limits.max_file_bytes,
            });
        }
        let max_files = self.limits.max_files_per_session;
        self.with_session(session_id, move |session| {
            if session.files.len() >= max_files {
                return Err(StoreError::TooManyFiles { limit: max_files });
            }
            let file_id = Self::new_id();
            session.files.insert(
                file_id.clone(),
                StoredFile {
                    filename: filename.to_string(),
                    file_type,
                    content: content.into(),
                    sheet_names: None,
                    selected_sheet: None,
                },
            );
            Ok(file_id)
        })
    }

    pub fn set_sheet_names(
        &self,
        session_id: &str,
        file_id: &str,
        names: Vec<String>,
    ) -> Result<(), StoreError> {
        self.with_session(session_id, move |session| {
            let file = session
                .files
                .get_mut(file_id)
                .ok_or(StoreError::FileNotFound)?;
            file.sheet_names = Some(names);
            Ok(())
        })
    }

    pub fn get_file(&self, session_id: &str, file_id: &str) -> Result<StoredFile, StoreError> {
        self.with_session(session_id, |session| {
            session
                .files
                .get(file_id)
                .cloned()
                .ok_or(StoreError::FileNotFound)
        })
    }

    /// Store (or overwrite) the parsed table for a file and record which
    /// sheet it came from. The table is stored even when the file entry is
    /// no longer present.
    pub fn put_table(
        &self,
        session_id: &str,
        file_id: &str,
        table: Table,
        selected_sheet: Option<String>,
    ) -> Result<(), StoreError> {
        self.with_session(session_id, move |session| {
            session.tables.insert(file_id.to_string(), table);
            if let Some(file) = session.files.get_mut(file_id) {
                file.selected_sheet = selected_sheet;
            }
            Ok(())
        })
    }

    pub fn get_table(&self, session_id: &str, file_id: &str) -> Result<Table, StoreError> {
        self.with_session(session_id, |session| {
            session
                .tables
                .get(file_id)
                .cloned()
                .ok_or(StoreError::TableNotFound)
        })
    }

    /// Cache a computed result and return its id. The session is resolved
    /// first, then oversized results are rejected whole; nothing is
    /// registered on failure.
    pub fn put_result(
        &self,
        session_id: &str,
        values: Vec<NormValue>,
    ) -> Result<String, StoreError> {
        let max_values = self.limits.max_result_values;
        let now = self.clock.now();
        self.with_session(session_id, move |session| {
            if values.len() > max_values {
                return Err(StoreError::ResultTooLarge {
                    values: values.len(),
                    limit: max_values,
                });
            }
            let result_id = Self::new_id();
            session.results.insert(
                result_id.clone(),
                StoredResult { values, created_at: now },
            );
            Ok(result_id)
        })
    }

    pub fn get_result(
        &self,
        session_id: &str,
        result_id: &str,
    ) -> Result<StoredResult, StoreError> {
        self.with_session(session_id, |session| {
            session
                .results
                .get(result_id)
                .cloned()
                .ok_or(StoreError::ResultNotFound)
        })
    }

    /// Intersection of column-name sets across the given tables' current
    /// schemas, plus each table's ordered column list for diagnostics.
    pub fn common_columns(
        &self,
        session_id: &str,
        file_ids: &[String],
    ) -> Result<(BTreeSet<String>, HashMap<String, Vec<String>>), StoreError> {
        self.with_session(session_id, |session| {
            let mut common: Option<BTreeSet<String>> = None;
            let mut by_file = HashMap::new();
            for file_id in file_ids {
                let table = session
                    .tables
                    .get(file_id)
                    .ok_or(StoreError::TableNotFound)?;
                let columns: Vec<String> = table.columns().to_vec();
                let names: BTreeSet<String> = columns.iter().cloned().collect();
                by_file.insert(file_id.clone(), columns);
                common = Some(match common {
                    None => names,
                    Some(prev) => prev.intersection(&names).cloned().collect(),
                });
            }
            Ok((common.unwrap_or_default(), by_file))
        })
    }
}
