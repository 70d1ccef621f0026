use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// A raw cell value as decoded from a source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
}

impl Cell {
    /// Null marker check. NaN reals count as null: spreadsheet round-trips
    /// produce them for blank numeric cells.
    pub fn is_null(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Real(r) => r.is_nan(),
            _ => false,
        }
    }
}

/// A cell reduced to its canonical, comparison-ready form. Equality and
/// hashing are derived, so two values are the same set element iff
/// `normalize` maps them to the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum NormValue {
    Null,
    Bool(bool),
    Int(i64),
    Real(OrderedFloat<f64>),
    Text(String),
}

// Reals with |r| >= 2^63 cannot be represented as i64 and stay Real.
const I64_SPAN: f64 = 9_223_372_036_854_775_808.0;

/// Canonicalize one cell for set membership.
///
/// - null (or NaN) → `None` when `drop_null`, else the single canonical
///   `Null`; all nulls compare equal to each other and to nothing else
/// - text → trimmed; an empty-after-trim string is a legitimate value
/// - bool → kept distinct from integers, never coerced to 0/1
/// - numeric equivalence: a finite real with zero fraction collapses to
///   `Int`, so integer `5` and real `5.0` are one element
pub fn normalize(cell: &Cell, drop_null: bool) -> Option<NormValue> {
    match cell {
        Cell::Null => {
            if drop_null {
                None
            } else {
                Some(NormValue::Null)
            }
        }
        Cell::Bool(b) => Some(NormValue::Bool(*b)),
        Cell::Int(i) => Some(NormValue::Int(*i)),
        Cell::Real(r) => {
            if r.is_nan() {
                return if drop_null { None } else { Some(NormValue::Null) };
            }
            if r.is_finite() && r.fract() == 0.0 && *r >= -I64_SPAN && *r < I64_SPAN {
                Some(NormValue::Int(*r as i64))
            } else {
                Some(NormValue::Real(OrderedFloat(*r)))
            }
        }
        Cell::Text(s) => Some(NormValue::Text(s.trim().to_string())),
    }
}

/// Comparison kind for the two-tier ordering. Int and Real share one kind
/// so a numeric column stays numerically sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Kind {
    Null,
    Bool,
    Numeric,
    Text,
}

impl NormValue {
    fn kind(&self) -> Kind {
        match self {
            NormValue::Null => Kind::Null,
            NormValue::Bool(_) => Kind::Bool,
            NormValue::Int(_) | NormValue::Real(_) => Kind::Numeric,
            NormValue::Text(_) => Kind::Text,
        }
    }

    /// Canonical string form, shared by the ordering fallback and exports.
    /// Integral reals never reach here (normalize collapses them to Int),
    /// so float display never prints a trailing `.0`.
    pub fn canonical_text(&self) -> String {
        match self {
            NormValue::Null => String::new(),
            NormValue::Bool(b) => b.to_string(),
            NormValue::Int(i) => i.to_string(),
            NormValue::Real(r) => r.0.to_string(),
            NormValue::Text(s) => s.clone(),
        }
    }
}

fn cmp_same_kind(a: &NormValue, b: &NormValue) -> Ordering {
    match (a, b) {
        (NormValue::Null, NormValue::Null) => Ordering::Equal,
        (NormValue::Bool(a), NormValue::Bool(b)) => a.cmp(b),
        (NormValue::Text(a), NormValue::Text(b)) => a.cmp(b),
        (NormValue::Int(a), NormValue::Int(b)) => a.cmp(b),
        (NormValue::Real(a), NormValue::Real(b)) => a.cmp(b),
        (NormValue::Int(a), NormValue::Real(b)) => (*a as f64).total_cmp(&b.0),
        (NormValue::Real(a), NormValue::Int(b)) => a.0.total_cmp(&(*b as f64)),
        // kind() equality rules out mixed pairs
        _ => Ordering::Equal,
    }
}

/// Deterministic output ordering for a computed value set.
///
/// Two-tier policy: when every element shares one comparison kind, sort in
/// that kind's natural order (numeric values mathematically, text
/// lexicographically). Otherwise fall back to canonical text with the kind
/// as tie break, so equal spellings of different kinds still order the
/// same way on every run. Identical inputs always yield byte-identical
/// output sequences.
pub fn order_values(set: FxHashSet<NormValue>) -> Vec<NormValue> {
    let mut values: Vec<NormValue> = set.into_iter().collect();
    let mut kinds = values.iter().map(NormValue::kind);
    let uniform = match kinds.next() {
        Some(first) => kinds.all(|k| k == first),
        None => true,
    };
    if uniform {
        values.sort_by(cmp_same_kind);
    } else {
        values.sort_by(|a, b| {
            a.canonical_text()
                .cmp(&b.canonical_text())
                .then_with(|| a.kind().cmp(&b.kind()))
        });
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: Vec<NormValue>) -> FxHashSet<NormValue> {
        values.into_iter().collect()
    }

    #[test]
    fn numeric_equivalence_int_and_real() {
        let from_int = normalize(&Cell::Int(5), false).unwrap();
        let from_real = normalize(&Cell::Real(5.0), false).unwrap();
        assert_eq!(from_int, from_real);
        assert_eq!(from_real, NormValue::Int(5));
    }

    #[test]
    fn fractional_real_stays_real() {
        assert_eq!(
            normalize(&Cell::Real(2.5), false),
            Some(NormValue::Real(OrderedFloat(2.5)))
        );
    }

    #[test]
    fn huge_real_not_collapsed() {
        // 1e19 > i64::MAX; collapsing would wrap
        assert_eq!(
            normalize(&Cell::Real(1e19), false),
            Some(NormValue::Real(OrderedFloat(1e19)))
        );
    }

    #[test]
    fn text_trimmed_and_empty_kept() {
        assert_eq!(
            normalize(&Cell::Text("  x ".into()), false),
            Some(NormValue::Text("x".into()))
        );
        // empty-after-trim is a distinct value, not null
        assert_eq!(
            normalize(&Cell::Text("   ".into()), false),
            Some(NormValue::Text(String::new()))
        );
        assert_ne!(
            normalize(&Cell::Text("   ".into()), false),
            normalize(&Cell::Null, false)
        );
    }

    #[test]
    fn bool_distinct_from_int() {
        assert_ne!(
            normalize(&Cell::Bool(true), false),
            normalize(&Cell::Int(1), false)
        );
        assert_ne!(
            normalize(&Cell::Bool(false), false),
            normalize(&Cell::Int(0), false)
        );
    }

    #[test]
    fn null_handling() {
        assert_eq!(normalize(&Cell::Null, true), None);
        assert_eq!(normalize(&Cell::Null, false), Some(NormValue::Null));
        // NaN behaves as a null marker
        assert_eq!(normalize(&Cell::Real(f64::NAN), true), None);
        assert_eq!(
            normalize(&Cell::Real(f64::NAN), false),
            Some(NormValue::Null)
        );
    }

    #[test]
    fn canonical_text_forms() {
        assert_eq!(NormValue::Null.canonical_text(), "");
        assert_eq!(NormValue::Bool(true).canonical_text(), "true");
        assert_eq!(NormValue::Int(39882).canonical_text(), "39882");
        assert_eq!(NormValue::Real(OrderedFloat(2.5)).canonical_text(), "2.5");
        assert_eq!(NormValue::Text("a b".into()).canonical_text(), "a b");
    }

    #[test]
    fn uniform_numeric_ordering() {
        let ordered = order_values(set(vec![
            NormValue::Int(10),
            NormValue::Real(OrderedFloat(2.5)),
            NormValue::Int(-3),
        ]));
        assert_eq!(
            ordered,
            vec![
                NormValue::Int(-3),
                NormValue::Real(OrderedFloat(2.5)),
                NormValue::Int(10),
            ]
        );
    }

    #[test]
    fn uniform_text_ordering() {
        let ordered = order_values(set(vec![
            NormValue::Text("b".into()),
            NormValue::Text("a".into()),
            NormValue::Text("c".into()),
        ]));
        let names: Vec<String> = ordered.iter().map(NormValue::canonical_text).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn mixed_kind_falls_back_to_canonical_text() {
        // "10" < "9" lexicographically; a numeric sort would invert them
        let ordered = order_values(set(vec![
            NormValue::Int(9),
            NormValue::Int(10),
            NormValue::Text("apple".into()),
        ]));
        let names: Vec<String> = ordered.iter().map(NormValue::canonical_text).collect();
        assert_eq!(names, vec!["10", "9", "apple"]);
    }

    #[test]
    fn mixed_kind_equal_spellings_tie_break_on_kind() {
        let a = order_values(set(vec![
            NormValue::Int(5),
            NormValue::Text("5".into()),
            NormValue::Text("z".into()),
        ]));
        let b = order_values(set(vec![
            NormValue::Text("z".into()),
            NormValue::Text("5".into()),
            NormValue::Int(5),
        ]));
        assert_eq!(a, b);
        // numeric kind sorts before text on equal spelling
        assert_eq!(a[0], NormValue::Int(5));
        assert_eq!(a[1], NormValue::Text("5".into()));
    }

    #[test]
    fn values_serialize_as_plain_scalars() {
        let row = vec![
            Cell::Null,
            Cell::Bool(true),
            Cell::Int(3),
            Cell::Real(2.5),
            Cell::Text("x".into()),
        ];
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"[null,true,3,2.5,"x"]"#
        );
        let norm = vec![NormValue::Int(5), NormValue::Text("5".into())];
        assert_eq!(serde_json::to_string(&norm).unwrap(), r#"[5,"5"]"#);
    }

    #[test]
    fn ordering_is_reproducible() {
        let values = vec![
            NormValue::Null,
            NormValue::Bool(false),
            NormValue::Int(7),
            NormValue::Text("7".into()),
            NormValue::Real(OrderedFloat(0.5)),
        ];
        let first = order_values(set(values.clone()));
        for _ in 0..10 {
            assert_eq!(order_values(set(values.clone())), first);
        }
    }
}
