//! `tabset-engine` — deterministic multi-set algebra over tabular columns.
//!
//! Pure engine crate: receives decoded tables, returns normalized,
//! deterministically ordered value sequences. No io dependencies.

pub mod analyze;
pub mod error;
pub mod filter;
pub mod setops;
pub mod table;
pub mod value;

pub use error::EngineError;
pub use setops::{compute, SetOp};
pub use table::{FileType, Table};
pub use value::{normalize, Cell, NormValue};
