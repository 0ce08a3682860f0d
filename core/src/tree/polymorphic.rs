//! Polymorphic chains.
//!
//! A polymorphic node caches up to `polymorphic_limit` specializations as a
//! linked chain of arena links, kept in candidate declaration order and
//! terminated by an uninitialized link. Reaching the terminator means no
//! member matched: the chain is extended, or collapsed into the generic
//! implementation once it is full.

use alloc::sync::Arc;

use ecow::EcoString;
use smallvec::SmallVec;

use super::{
    Dispatch, Frame, NodeId, Tag, Tree, Unexpected,
    generic::unsupported,
    node::{Link, LinkState, Node, State},
    rewrite::probe,
};
use crate::{
    descriptor::{CandidateIndex, Descriptor},
    errors::ExecutionError,
    guards,
    host::{Host, RewriteCause},
    values::Value,
};

type Members = SmallVec<[CandidateIndex; 4]>;

impl<H: Host> Tree<H> {
    /// Replace `id` with a polymorphic node caching `members`, which must be
    /// sorted.
    pub(super) fn become_polymorphic(
        &mut self,
        id: NodeId,
        members: &[CandidateIndex],
        cause: RewriteCause,
        values: &[Value],
    ) {
        let mut first = self.arena.alloc(
            Node::Link(Link {
                head: id,
                state: LinkState::Uninitialized,
                next: None,
            }),
            Some(id),
        );
        for &member in members.iter().rev() {
            first = self.arena.alloc(
                Node::Link(Link {
                    head: id,
                    state: LinkState::Specialized(member),
                    next: Some(first),
                }),
                Some(id),
            );
        }
        let dispatch = optimize(&self.arena.operation(id).descriptor, members);
        self.replace(id, State::Polymorphic { first, dispatch }, cause, values);
    }

    pub(super) fn execute_polymorphic(
        &mut self,
        id: NodeId,
        frame: &Frame<'_>,
    ) -> Result<Value, ExecutionError> {
        let op = self.arena.operation(id);
        let State::Polymorphic { first, dispatch } = op.state else {
            unreachable!("node {} is not polymorphic", id);
        };
        let operands = op.operands.clone();

        let mut values: SmallVec<[Value; 2]> = SmallVec::with_capacity(operands.len());
        let mut dispatch_miss = false;
        for (position, &operand) in operands.iter().enumerate() {
            let value = match dispatch {
                Dispatch::Fixed { position: fixed, kind } if fixed == position => {
                    match self.execute_as(operand, kind, frame) {
                        Ok(value) => value,
                        Err(Unexpected::Result(value)) => {
                            dispatch_miss = true;
                            value
                        }
                        Err(Unexpected::Error(err)) => return Err(err),
                    }
                }
                _ => self.execute_node(operand, frame)?,
            };
            values.push(value);
        }

        if dispatch_miss {
            // No member admits this kind at the fixed position.
            self.host.force_interpreter_reentry();
            let terminator = self.terminator(first);
            return self.extend_chain(terminator, values, RewriteCause::GuardMismatch);
        }

        let mut cause = RewriteCause::GuardMismatch;
        let mut cursor = first;
        loop {
            let link = *self.arena.link(cursor);
            let LinkState::Specialized(index) = link.state else {
                self.host.force_interpreter_reentry();
                return self.extend_chain(cursor, values, cause);
            };
            let next = match link.next {
                Some(next) => next,
                None => unreachable!("chain of {} has no terminator", id),
            };

            let op = self.arena.operation(id);
            let candidate = op.descriptor.candidate(index);
            if candidate.accepts(&values) {
                match candidate.first_invalid_assumption() {
                    None => return Ok(candidate.invoke(&values, op.environment.as_ref())?),
                    Some(assumption) => {
                        let assumption = EcoString::from(assumption.name());
                        self.host.force_interpreter_reentry();
                        self.host.mark_slow_path_boundary();
                        self.unlink(id, cursor, index);
                        cause = RewriteCause::AssumptionInvalidated { assumption };
                        self.report(id, Tag::Polymorphic, Tag::Polymorphic, cause.clone(), &values);
                    }
                }
            }
            cursor = next;
        }
    }

    /// Add a specialization for `values` at the chain ending in `terminator`,
    /// or collapse the chain into the generic state when it is full. Returns
    /// the operation's result for `values`.
    pub(super) fn extend_chain(
        &mut self,
        terminator: NodeId,
        values: SmallVec<[Value; 2]>,
        cause: RewriteCause,
    ) -> Result<Value, ExecutionError> {
        self.host.mark_slow_path_boundary();

        let head = self.arena.link(terminator).head;
        let members = self.members(head);
        let op = self.arena.operation(head);
        let descriptor = Arc::clone(&op.descriptor);

        if let Some(&member) = members.iter().find(|&&m| {
            let candidate = descriptor.candidate(m);
            candidate.accepts(&values) && candidate.first_invalid_assumption().is_none()
        }) {
            // Already handled by the chain.
            return self.invoke(head, member, &values);
        }

        let probe = probe(&descriptor, op.excluded, &values);
        let Some(index) = probe.selected else {
            return Err(unsupported(&descriptor, &values));
        };
        self.arena.operation_mut(head).excluded = probe.excluded;
        // Members behind an invalidated assumption no longer count toward the
        // limit, whether or not they accept these values.
        for &member in &members {
            if probe.excluded.contains(member)
                || descriptor.candidate(member).first_invalid_assumption().is_some()
            {
                let link = self.find_link(head, member);
                self.unlink(head, link, member);
            }
        }
        let members = self.members(head);

        if descriptor.candidate(index).is_generic() {
            self.generalize_chain(head, cause, &values);
        } else if members.len() >= self.options.polymorphic_limit {
            self.generalize_chain(head, RewriteCause::PolymorphicLimitExceeded, &values);
        } else {
            self.insert_link(head, index);
            let cause = match cause {
                RewriteCause::GuardMismatch => RewriteCause::ChainExtended,
                other => other,
            };
            self.report(head, Tag::Polymorphic, Tag::Polymorphic, cause, &values);
        }
        self.invoke(head, index, &values)
    }

    /// Free every link behind `head` and make it generic.
    fn generalize_chain(&mut self, head: NodeId, cause: RewriteCause, values: &[Value]) {
        let State::Polymorphic { first, .. } = self.arena.operation(head).state else {
            unreachable!("node {} is not polymorphic", head);
        };
        let mut cursor = Some(first);
        while let Some(id) = cursor {
            cursor = self.arena.link(id).next;
            self.arena.free(id);
        }
        self.replace(head, State::Generic, cause, values);
    }

    /// Insert a link for `index` keeping the chain in declaration order.
    fn insert_link(&mut self, head: NodeId, index: CandidateIndex) {
        let State::Polymorphic { first, .. } = self.arena.operation(head).state else {
            unreachable!("node {} is not polymorphic", head);
        };

        let mut previous = None;
        let mut cursor = first;
        loop {
            let link = self.arena.link(cursor);
            match link.state {
                LinkState::Specialized(member) if member < index => {
                    previous = Some(cursor);
                    cursor = match link.next {
                        Some(next) => next,
                        None => unreachable!("chain of {} has no terminator", head),
                    };
                }
                _ => break,
            }
        }

        let id = self.arena.alloc(
            Node::Link(Link {
                head,
                state: LinkState::Specialized(index),
                next: Some(cursor),
            }),
            Some(head),
        );
        self.relink(head, previous, id);
    }

    /// Remove the link `link` (caching `index`) from the chain of `head` and
    /// exclude its candidate from future selection.
    fn unlink(&mut self, head: NodeId, link: NodeId, index: CandidateIndex) {
        let State::Polymorphic { first, .. } = self.arena.operation(head).state else {
            unreachable!("node {} is not polymorphic", head);
        };
        let next = self.arena.link(link).next;

        let mut previous = None;
        let mut cursor = first;
        while cursor != link {
            previous = Some(cursor);
            cursor = match self.arena.link(cursor).next {
                Some(next) => next,
                None => unreachable!("link {} is not in the chain of {}", link, head),
            };
        }

        if let Some(next) = next {
            self.relink(head, previous, next);
        }
        self.arena.free(link);
        self.arena.operation_mut(head).excluded.insert(index);
    }

    /// Point `previous` (or the head, when `None`) at `target`, then refresh
    /// the dispatch shape.
    fn relink(&mut self, head: NodeId, previous: Option<NodeId>, target: NodeId) {
        match previous {
            Some(previous) => self.arena.link_mut(previous).next = Some(target),
            None => {
                if let State::Polymorphic { first, .. } = &mut self.arena.operation_mut(head).state {
                    *first = target;
                }
            }
        }
        let members = self.members(head);
        let op = self.arena.operation_mut(head);
        let dispatch = optimize(&op.descriptor, &members);
        if let State::Polymorphic { dispatch: current, .. } = &mut op.state {
            *current = dispatch;
        }
    }

    /// Specialized members of the chain behind `head`, in dispatch order.
    fn members(&self, head: NodeId) -> Members {
        let mut members = Members::new();
        let State::Polymorphic { first, .. } = self.arena.operation(head).state else {
            return members;
        };
        let mut cursor = Some(first);
        while let Some(id) = cursor {
            let link = self.arena.link(id);
            if let LinkState::Specialized(index) = link.state {
                members.push(index);
            }
            cursor = link.next;
        }
        members
    }

    fn find_link(&self, head: NodeId, index: CandidateIndex) -> NodeId {
        let State::Polymorphic { first, .. } = self.arena.operation(head).state else {
            unreachable!("node {} is not polymorphic", head);
        };
        let mut cursor = first;
        loop {
            let link = self.arena.link(cursor);
            match (link.state, link.next) {
                (LinkState::Specialized(member), _) if member == index => return cursor,
                (_, Some(next)) => cursor = next,
                (_, None) => unreachable!("candidate {} is not cached by {}", index, head),
            }
        }
    }

    /// Last link of a chain.
    pub(super) fn terminator(&self, first: NodeId) -> NodeId {
        let mut cursor = first;
        while let Some(next) = self.arena.link(cursor).next {
            cursor = next;
        }
        cursor
    }
}

/// Pick the dispatch shape for a chain: the first operand position where
/// every member requires one and the same kind is checked through the typed
/// accessor.
fn optimize(descriptor: &Descriptor, members: &[CandidateIndex]) -> Dispatch {
    (0..descriptor.arity())
        .find_map(|position| {
            let predicates = members.iter().map(|&m| descriptor.candidate(m).kinds());
            guards::shared_kind(predicates, position).map(|kind| Dispatch::Fixed { position, kind })
        })
        .unwrap_or(Dispatch::Generic)
}
