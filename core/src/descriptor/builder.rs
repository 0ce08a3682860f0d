//! Builder for [`Descriptor`]s.

use ecow::EcoString;
use hashbrown::HashSet;
use smallvec::SmallVec;

use super::{AssumptionRole, Candidate, Descriptor, MAX_CANDIDATES};
use crate::{
    Box, Vec,
    assumption::Assumption,
    environment::Environment,
    errors::{BuildError, RuntimeError},
    values::{KindSet, Value},
};

/// Builder for a [`Descriptor`].
///
/// Modifiers (`guard`, `assumption`, `generic`) apply to the most recently
/// added candidate.
///
/// # Example
///
/// ```
/// use graft_core::{Descriptor, KindSet, Value};
///
/// let descriptor = Descriptor::builder("add", 2)
///     .candidate("add_int", [KindSet::INT, KindSet::INT], |v, _| {
///         Ok(Value::Int(v[0].as_int().unwrap().wrapping_add(v[1].as_int().unwrap())))
///     })
///     .candidate("add_float", [KindSet::FLOAT, KindSet::FLOAT], |v, _| {
///         Ok(Value::Float(v[0].as_float().unwrap() + v[1].as_float().unwrap()))
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(descriptor.candidates().len(), 2);
/// ```
pub struct DescriptorBuilder {
    name: EcoString,
    arity: usize,
    candidates: Vec<Candidate>,
    error: Option<BuildError>,
}

impl DescriptorBuilder {
    pub fn new(name: &str, arity: usize) -> Self {
        Self {
            name: EcoString::from(name),
            arity,
            candidates: Vec::new(),
            error: None,
        }
    }

    /// Append a candidate. Its position is its tier.
    pub fn candidate<F>(
        mut self,
        name: &str,
        kinds: impl IntoIterator<Item = KindSet>,
        body: F,
    ) -> Self
    where
        F: Fn(&[Value], Option<&Environment>) -> Result<Value, RuntimeError>
            + Send
            + Sync
            + 'static,
    {
        let kinds: SmallVec<[KindSet; 2]> = kinds.into_iter().collect();
        if kinds.len() != self.arity {
            self.fail(BuildError::PredicateArity {
                operation: self.name.clone(),
                candidate: EcoString::from(name),
                expected: self.arity,
                found: kinds.len(),
            });
        }
        if self.candidates.iter().any(|c| c.name == name) {
            self.fail(BuildError::DuplicateCandidate {
                operation: self.name.clone(),
                candidate: EcoString::from(name),
            });
        }
        self.candidates.push(Candidate {
            name: EcoString::from(name),
            kinds,
            guard: None,
            assumptions: SmallVec::new(),
            roles: Vec::new(),
            aliased: Vec::new(),
            body: Box::new(body),
            generic: false,
        });
        self
    }

    /// Attach an extra guard to the last candidate.
    ///
    /// Guards must be pure: they are re-evaluated on every execution and
    /// during re-specialization.
    pub fn guard<G>(mut self, guard: G) -> Self
    where
        G: Fn(&[Value]) -> bool + Send + Sync + 'static,
    {
        match self.candidates.last_mut() {
            Some(candidate) => candidate.guard = Some(Box::new(guard)),
            None => self.misplaced("guard"),
        }
        self
    }

    /// Make the last candidate's fast path depend on `assumption`, declared
    /// under the formal `role`.
    ///
    /// Assumptions are keyed by identity. Declaring the same token under a
    /// second role binds to the same identity: it is checked once, and the
    /// role is recorded as aliased.
    pub fn assumption(mut self, role: &str, assumption: &Assumption) -> Self {
        let Some(candidate) = self.candidates.last_mut() else {
            self.misplaced("assumption");
            return self;
        };
        let role = EcoString::from(role);
        let duplicate = candidate
            .assumptions
            .iter()
            .any(|a| a.same_identity(assumption));
        if duplicate {
            tracing::warn!(
                operation = %self.name,
                candidate = %candidate.name,
                role = %role,
                assumption = %assumption.name(),
                "assumption redeclared under a different role; checking it once by identity"
            );
            candidate.aliased.push(role.clone());
        } else {
            candidate.assumptions.push(assumption.clone());
        }
        candidate.roles.push(AssumptionRole {
            role,
            id: assumption.id(),
        });
        self
    }

    /// Mark the last candidate as a fully generic implementation.
    pub fn generic(mut self) -> Self {
        match self.candidates.last_mut() {
            Some(candidate) => candidate.generic = true,
            None => self.misplaced("generic"),
        }
        self
    }

    pub fn build(self) -> Result<Descriptor, BuildError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.candidates.is_empty() {
            return Err(BuildError::EmptyDescriptor {
                operation: self.name,
            });
        }
        if self.candidates.len() > MAX_CANDIDATES {
            return Err(BuildError::TooManyCandidates {
                operation: self.name,
                count: self.candidates.len(),
                max: MAX_CANDIDATES,
            });
        }

        let mut accepted: SmallVec<[KindSet; 2]> = SmallVec::from_elem(KindSet::empty(), self.arity);
        for candidate in &self.candidates {
            for (slot, kinds) in accepted.iter_mut().zip(candidate.kinds.iter()) {
                *slot |= *kinds;
            }
        }

        let distinct: HashSet<_> = self
            .candidates
            .iter()
            .flat_map(|c| c.assumptions.iter().map(|a| a.id()))
            .collect();
        tracing::debug!(
            operation = %self.name,
            candidates = self.candidates.len(),
            assumptions = distinct.len(),
            "descriptor built"
        );

        Ok(Descriptor {
            name: self.name,
            arity: self.arity,
            candidates: self.candidates,
            accepted,
        })
    }

    fn misplaced(&mut self, modifier: &'static str) {
        self.fail(BuildError::ModifierWithoutCandidate {
            operation: self.name.clone(),
            modifier,
        });
    }

    fn fail(&mut self, error: BuildError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}
