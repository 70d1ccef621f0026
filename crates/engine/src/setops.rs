use std::str::FromStr;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::table::Table;
use crate::value::{normalize, order_values, Cell, NormValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetOp {
    Intersection,
    Difference,
    SymmetricDifference,
}

impl FromStr for SetOp {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intersection" => Ok(Self::Intersection),
            "difference" => Ok(Self::Difference),
            "symmetric_difference" => Ok(Self::SymmetricDifference),
            other => Err(EngineError::UnsupportedOp(other.to_string())),
        }
    }
}

impl std::fmt::Display for SetOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intersection => write!(f, "intersection"),
            Self::Difference => write!(f, "difference"),
            Self::SymmetricDifference => write!(f, "symmetric_difference"),
        }
    }
}

/// Reduce one column to its set of normalized values. Duplicates within
/// the column collapse here.
pub fn value_set(cells: &[Cell], drop_null: bool) -> FxHashSet<NormValue> {
    cells
        .iter()
        .filter_map(|cell| normalize(cell, drop_null))
        .collect()
}

/// Elements present in every input set. Empty for zero inputs.
pub fn intersection(sets: &[FxHashSet<NormValue>]) -> FxHashSet<NormValue> {
    let Some((first, rest)) = sets.split_first() else {
        return FxHashSet::default();
    };
    first
        .iter()
        .filter(|v| rest.iter().all(|s| s.contains(*v)))
        .cloned()
        .collect()
}

/// Base minus the union of all other sets. Fails when `base_index` does
/// not name one of the inputs.
pub fn difference(
    sets: &[FxHashSet<NormValue>],
    base_index: usize,
) -> Result<FxHashSet<NormValue>, EngineError> {
    let base = sets.get(base_index).ok_or(EngineError::BaseInvalid {
        index: base_index,
        inputs: sets.len(),
    })?;
    Ok(base
        .iter()
        .filter(|v| {
            sets.iter()
                .enumerate()
                .all(|(i, s)| i == base_index || !s.contains(*v))
        })
        .cloned()
        .collect())
}

/// Elements appearing in an odd number of input sets. The N=2 case is the
/// usual pairwise XOR; a single input passes through unchanged.
pub fn symmetric_difference(sets: &[FxHashSet<NormValue>]) -> FxHashSet<NormValue> {
    let mut counts: FxHashMap<&NormValue, usize> = FxHashMap::default();
    for s in sets {
        for v in s {
            *counts.entry(v).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, n)| n % 2 == 1)
        .map(|(v, _)| v.clone())
        .collect()
}

/// Run one set operation over the shared `column` of the given tables and
/// return the deterministically ordered result. Either fully succeeds or
/// fails on the first violated precondition; nothing is stored here.
pub fn compute(
    tables: &[&Table],
    column: &str,
    op: SetOp,
    drop_null: bool,
    base_index: Option<usize>,
) -> Result<Vec<NormValue>, EngineError> {
    let mut sets = Vec::with_capacity(tables.len());
    for table in tables {
        let cells = table
            .column(column)
            .ok_or_else(|| EngineError::ColumnNotFound(column.to_string()))?;
        sets.push(value_set(&cells, drop_null));
    }

    let result = match op {
        SetOp::Intersection => intersection(&sets),
        SetOp::Difference => {
            let base = base_index.ok_or(EngineError::BaseRequired)?;
            difference(&sets, base)?
        }
        SetOp::SymmetricDifference => symmetric_difference(&sets),
    };

    Ok(order_values(result))
}
