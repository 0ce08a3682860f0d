//! Guard evaluation.
//!
//! Pure predicates over operand values. Nothing here holds state; every
//! function returns the same answer for the same inputs.

use smallvec::SmallVec;

use crate::values::{Kind, KindSet, Value};

/// Every value's kind is accepted by the kind set at its position.
#[inline]
pub fn kinds_match(kinds: &[KindSet], values: &[Value]) -> bool {
    kinds.len() == values.len() && first_mismatch(kinds, values).is_none()
}

/// Position of the first value whose kind is not accepted at its position.
#[inline]
pub fn first_mismatch(kinds: &[KindSet], values: &[Value]) -> Option<usize> {
    kinds
        .iter()
        .zip(values)
        .position(|(kinds, value)| !value.is_in(*kinds))
}

/// Observed operand kinds, for diagnostics and error reports.
pub fn observed_kinds(values: &[Value]) -> SmallVec<[Kind; 2]> {
    values.iter().map(Value::kind).collect()
}

/// The kind shared at `position` by every predicate in `predicates`, if each
/// of them admits exactly that one kind.
pub fn shared_kind<'a>(
    mut predicates: impl Iterator<Item = &'a [KindSet]>,
    position: usize,
) -> Option<Kind> {
    let first = predicates.next()?.get(position)?.single()?;
    predicates
        .all(|kinds| kinds.get(position).and_then(|k| k.single()) == Some(first))
        .then_some(first)
}
