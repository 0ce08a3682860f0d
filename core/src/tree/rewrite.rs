//! Re-specialization: picking a candidate for observed operand values and
//! replacing the node with the matching state.

use alloc::sync::Arc;
use core::{fmt::Write, mem};

use ecow::EcoString;
use smallvec::SmallVec;

use super::{
    NodeId, Tag, Tree,
    generic::{generalize, unsupported},
    node::{Node, Operation, State},
};
use crate::{
    descriptor::{CandidateIndex, CandidateMask, Descriptor},
    errors::ExecutionError,
    host::{Host, Rewrite, RewriteCause},
    values::Value,
};

/// Outcome of scanning a descriptor for observed values.
pub(super) struct Probe {
    pub selected: Option<CandidateIndex>,
    /// The incoming mask, plus every candidate found to match with an
    /// invalidated assumption.
    pub excluded: CandidateMask,
}

/// Scan candidates in declaration order for the first one that accepts
/// `values`, skipping excluded ones. Assumptions only ever go from valid to
/// invalid, so a candidate that fails on them is excluded for good.
pub(super) fn probe(descriptor: &Descriptor, excluded: CandidateMask, values: &[Value]) -> Probe {
    let mut excluded = excluded;
    for (index, candidate) in descriptor.indexed() {
        if excluded.contains(index) || !candidate.accepts(values) {
            continue;
        }
        if candidate.first_invalid_assumption().is_some() {
            excluded.insert(index);
            continue;
        }
        return Probe {
            selected: Some(index),
            excluded,
        };
    }
    Probe {
        selected: None,
        excluded,
    }
}

impl<H: Host> Tree<H> {
    /// Rewrite `id` for `values` (already evaluated, never re-evaluated) and
    /// return the operation's result for them.
    ///
    /// The new state is never less general than the current one. If no
    /// candidate covers `values`, the node is left untouched.
    pub(super) fn specialize_and_execute(
        &mut self,
        id: NodeId,
        values: SmallVec<[Value; 2]>,
        cause: RewriteCause,
    ) -> Result<Value, ExecutionError> {
        self.host.mark_slow_path_boundary();

        let op = self.arena.operation(id);
        let from = op.state;
        match from {
            State::Generic => {
                return generalize(&op.descriptor, &values, op.environment.as_ref());
            }
            State::Polymorphic { first, .. } => {
                let terminator = self.terminator(first);
                return self.extend_chain(terminator, values, cause);
            }
            State::Uninitialized | State::Specialized(_) => {}
        }

        let descriptor = Arc::clone(&op.descriptor);
        let mut excluded = op.excluded;
        if let State::Specialized(current) = from {
            let candidate = descriptor.candidate(current);
            if candidate.first_invalid_assumption().is_some() {
                excluded.insert(current);
            } else if candidate.accepts(&values) {
                // Already handled by the current specialization.
                return self.invoke(id, current, &values);
            }
        }

        let probe = probe(&descriptor, excluded, &values);
        let Some(index) = probe.selected else {
            return Err(unsupported(&descriptor, &values));
        };
        self.arena.operation_mut(id).excluded = probe.excluded;

        let cause = match from {
            State::Uninitialized => RewriteCause::Initialize,
            _ => cause,
        };
        if descriptor.candidate(index).is_generic() {
            self.replace(id, State::Generic, cause, &values);
            return self.invoke(id, index, &values);
        }
        match from {
            State::Specialized(current) if !probe.excluded.contains(current) => {
                if self.options.polymorphic_limit < 2 {
                    self.replace(
                        id,
                        State::Generic,
                        RewriteCause::PolymorphicLimitExceeded,
                        &values,
                    );
                } else {
                    let members = [current.min(index), current.max(index)];
                    self.become_polymorphic(id, &members, cause, &values);
                }
            }
            _ => self.replace(id, State::Specialized(index), cause, &values),
        }
        self.invoke(id, index, &values)
    }

    /// Run candidate `index` of operation `id` with the node's environment.
    pub(super) fn invoke(
        &self,
        id: NodeId,
        index: CandidateIndex,
        values: &[Value],
    ) -> Result<Value, ExecutionError> {
        let op = self.arena.operation(id);
        Ok(op
            .descriptor
            .candidate(index)
            .invoke(values, op.environment.as_ref())?)
    }

    /// Swap the node in slot `id` for a fresh operation node in `state`.
    ///
    /// Operands and environment are moved over; the node identity the parent
    /// holds is unchanged.
    pub(super) fn replace(&mut self, id: NodeId, state: State, cause: RewriteCause, values: &[Value]) {
        let old = self.arena.operation_mut(id);
        let from = old.state.tag();
        debug_assert!(
            state.tag().generality() >= from.generality(),
            "rewrite of {} from {} to {} loses generality",
            id,
            from,
            state.tag()
        );

        let replacement = Operation {
            descriptor: Arc::clone(&old.descriptor),
            operands: mem::take(&mut old.operands),
            environment: old.environment.take(),
            state,
            excluded: old.excluded,
        };
        self.arena.replace(id, Node::Operation(replacement));
        self.report(id, from, state.tag(), cause, values);
    }

    /// Count a committed rewrite and tell the host about it.
    pub(super) fn report(
        &mut self,
        id: NodeId,
        from: Tag,
        to: Tag,
        cause: RewriteCause,
        values: &[Value],
    ) {
        self.rewrites += 1;
        let descriptor = &self.arena.operation(id).descriptor;

        tracing::debug!(
            node = %id,
            operation = %descriptor.name(),
            from = %from,
            to = %to,
            cause = %cause,
            "Node rewritten"
        );

        let reason = self.options.detailed_rewrite_reasons.then(|| {
            let mut reason = EcoString::new();
            // Writing into an EcoString cannot fail.
            let _ = write!(
                reason,
                "{}: {} -> {} ({}; operands: ",
                descriptor.name(),
                from,
                to,
                cause
            );
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    reason.push_str(", ");
                }
                reason.push_str(value.kind().name());
            }
            reason.push(')');
            reason
        });

        let rewrite = Rewrite {
            node: id,
            from,
            to,
            cause,
            reason,
        };
        self.host.on_rewrite(&rewrite);
    }
}
