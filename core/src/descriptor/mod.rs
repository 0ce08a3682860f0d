//! Specialization descriptors.
//!
//! A descriptor is the static, generator-supplied description of one
//! operation: its arity and an ordered list of candidate implementations.
//! Each candidate carries an operand predicate (one [`KindSet`] per operand
//! position), an optional extra guard, the assumptions its fast path depends
//! on, and the body it runs.
//!
//! ## Ordering contract
//!
//! Candidates are tried strictly in declaration order and the first
//! applicable one wins. More specific or cheaper candidates are declared
//! first; a broader candidate declared later is effectively unreachable for
//! the values an earlier one accepts. Where two candidates accept the same
//! values they must compute the same result, which is what keeps every
//! specialized path observably equal to the generic one.
//!
//! Candidates marked generic (see [`DescriptorBuilder::generic`]) are the
//! fully type-erased implementation. Selecting one promotes a node straight to
//! the Generic state instead of caching a specialization.

mod builder;

pub use builder::DescriptorBuilder;

use core::fmt;

use ecow::EcoString;
use smallvec::SmallVec;

use crate::{
    Box, Vec,
    assumption::{Assumption, AssumptionId},
    environment::Environment,
    errors::{ExecutionError, RuntimeError},
    guards,
    values::{KindSet, Value},
};

/// Maximum number of candidates per descriptor.
pub const MAX_CANDIDATES: usize = 64;

/// Operation body: computes the result from the operand values and the
/// node's shared context.
pub type Body =
    Box<dyn Fn(&[Value], Option<&Environment>) -> Result<Value, RuntimeError> + Send + Sync>;

/// Extra guard predicate. Must be pure and deterministic.
pub type Guard = Box<dyn Fn(&[Value]) -> bool + Send + Sync>;

/// Position of a candidate within its descriptor. Also its tier: lower
/// indices are tried first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateIndex(u8);

impl CandidateIndex {
    pub const fn new(index: usize) -> Self {
        assert!(index < MAX_CANDIDATES);
        CandidateIndex(index as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A set of candidates, used to remember which ones are known inapplicable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateMask(u64);

impl CandidateMask {
    pub const fn empty() -> Self {
        CandidateMask(0)
    }

    #[inline]
    pub fn contains(self, index: CandidateIndex) -> bool {
        self.0 & (1 << index.0) != 0
    }

    #[inline]
    pub fn insert(&mut self, index: CandidateIndex) {
        self.0 |= 1 << index.0;
    }

    pub fn union(self, other: CandidateMask) -> Self {
        CandidateMask(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// A role under which an assumption was declared on a candidate.
#[derive(Clone, Debug)]
pub struct AssumptionRole {
    pub role: EcoString,
    pub id: AssumptionId,
}

/// One candidate specialization.
pub struct Candidate {
    name: EcoString,
    kinds: SmallVec<[KindSet; 2]>,
    guard: Option<Guard>,
    /// Distinct identities, in first-declared order.
    assumptions: SmallVec<[Assumption; 1]>,
    /// Every declared role, including aliases.
    roles: Vec<AssumptionRole>,
    /// Roles that redeclared an identity already bound under another role.
    aliased: Vec<EcoString>,
    body: Body,
    generic: bool,
}

impl Candidate {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operand predicate, one kind set per position.
    pub fn kinds(&self) -> &[KindSet] {
        &self.kinds
    }

    pub fn has_guard(&self) -> bool {
        self.guard.is_some()
    }

    pub fn is_generic(&self) -> bool {
        self.generic
    }

    /// Assumptions checked before the fast path runs, one per distinct
    /// identity, in declared order.
    pub fn assumptions(&self) -> &[Assumption] {
        &self.assumptions
    }

    pub fn roles(&self) -> &[AssumptionRole] {
        &self.roles
    }

    /// Roles that bound an assumption identity already declared under a
    /// different role. Such redeclarations are checked once, and listed here
    /// so they can be reviewed rather than merged silently.
    pub fn aliased_roles(&self) -> &[EcoString] {
        &self.aliased
    }

    /// Type predicate and extra guard both hold for `values`.
    #[inline]
    pub fn accepts(&self, values: &[Value]) -> bool {
        guards::kinds_match(&self.kinds, values) && self.guard_holds(values)
    }

    #[inline]
    pub(crate) fn guard_holds(&self, values: &[Value]) -> bool {
        match &self.guard {
            Some(guard) => guard(values),
            None => true,
        }
    }

    /// The first assumption (in declared order) that is no longer valid.
    #[inline]
    pub fn first_invalid_assumption(&self) -> Option<&Assumption> {
        self.assumptions.iter().find(|a| !a.is_valid())
    }

    #[inline]
    pub(crate) fn invoke(
        &self,
        values: &[Value],
        environment: Option<&Environment>,
    ) -> Result<Value, RuntimeError> {
        (self.body)(values, environment)
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("name", &self.name)
            .field("kinds", &self.kinds)
            .field("guard", &self.guard.is_some())
            .field("assumptions", &self.assumptions)
            .field("generic", &self.generic)
            .finish()
    }
}

/// Ordered candidate list for one operation.
pub struct Descriptor {
    name: EcoString,
    arity: usize,
    candidates: Vec<Candidate>,
    /// Union of all candidates' predicates, per position.
    accepted: SmallVec<[KindSet; 2]>,
}

impl Descriptor {
    /// Start building a descriptor for an operation taking `arity` operands.
    pub fn builder(name: &str, arity: usize) -> DescriptorBuilder {
        DescriptorBuilder::new(name, arity)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_eco(&self) -> EcoString {
        self.name.clone()
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn candidate(&self, index: CandidateIndex) -> &Candidate {
        &self.candidates[index.index()]
    }

    /// Look up a candidate by name.
    pub fn index_of(&self, name: &str) -> Option<CandidateIndex> {
        self.candidates
            .iter()
            .position(|c| c.name == name)
            .map(CandidateIndex::new)
    }

    /// Kinds any candidate accepts at `position`.
    pub fn accepted_kinds(&self, position: usize) -> KindSet {
        self.accepted
            .get(position)
            .copied()
            .unwrap_or(KindSet::empty())
    }

    /// Evaluate the operation on `values` without any caching, the way a
    /// node in the Generic state does.
    pub fn execute_generic(
        &self,
        values: &[Value],
        environment: Option<&Environment>,
    ) -> Result<Value, ExecutionError> {
        crate::tree::generalize(self, values, environment)
    }

    pub(crate) fn indexed(&self) -> impl Iterator<Item = (CandidateIndex, &Candidate)> {
        self.candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (CandidateIndex::new(i), c))
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("candidates", &self.candidates)
            .finish()
    }
}
