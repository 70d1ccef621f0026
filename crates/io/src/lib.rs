//! `tabset-io` — boundary io for the set-ops core: decode uploaded bytes
//! into tables, serialize results and filtered tables back out. Nothing
//! here touches the session cache; decode failures surface verbatim to
//! the caller.

pub mod archive;
pub mod csv;
pub mod error;
pub mod xlsx;

pub use error::{DecodeError, ExportError};
