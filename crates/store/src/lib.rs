//! `tabset-store` — session-scoped cache binding one user's uploads,
//! parsed tables and computed results across independent requests.
//!
//! All state is volatile and lives behind a single mutex; nothing survives
//! a process restart. Expiry is lazy: idle sessions linger until the next
//! `cleanup()` call, there is no background timer. A store instance is
//! meant to be constructed by the process entry point and injected into
//! request handlers, never held as module-level state.

pub mod clock;
pub mod error;
pub mod limits;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use error::StoreError;
pub use limits::StoreLimits;
pub use store::{SessionStore, StoredFile, StoredResult};
