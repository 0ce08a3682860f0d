//! Node execution: the fast paths of every state.

use alloc::sync::Arc;

use ecow::EcoString;
use smallvec::SmallVec;

use super::{
    Frame, NodeId, Tree, Unexpected,
    generic::generalize,
    node::{Node, State},
};
use crate::{
    descriptor::CandidateIndex,
    errors::ExecutionError,
    host::{Host, RewriteCause},
    values::{Kind, Value},
};

impl<H: Host> Tree<H> {
    /// Generic accessor: evaluate `id` to a value of any kind.
    pub(super) fn execute_node(
        &mut self,
        id: NodeId,
        frame: &Frame<'_>,
    ) -> Result<Value, ExecutionError> {
        if self.depth >= self.options.max_depth {
            return Err(ExecutionError::StackOverflow {
                depth: self.depth + 1,
                max_depth: self.options.max_depth,
            });
        }
        self.depth += 1;
        let result = self.execute_inner(id, frame);
        self.depth -= 1;
        result
    }

    /// Typed accessor: evaluate `id`, expecting a value of `kind`.
    ///
    /// A value of any other kind is handed back in [`Unexpected::Result`] so
    /// the caller can continue on its generic path without re-evaluating.
    pub(super) fn execute_as(
        &mut self,
        id: NodeId,
        kind: Kind,
        frame: &Frame<'_>,
    ) -> Result<Value, Unexpected> {
        let value = self.execute_node(id, frame)?;
        if value.kind() == kind {
            Ok(value)
        } else {
            Err(Unexpected::Result(value))
        }
    }

    fn execute_inner(&mut self, id: NodeId, frame: &Frame<'_>) -> Result<Value, ExecutionError> {
        let state = match &self.arena[id].node {
            Node::Literal(value) => return Ok(value.clone()),
            Node::Argument(index) => {
                return frame
                    .argument(*index)
                    .cloned()
                    .ok_or(ExecutionError::MissingArgument {
                        index: *index,
                        len: frame.len(),
                    });
            }
            Node::Operation(op) => op.state,
            Node::Link(_) => unreachable!("chain link {} executed outside its chain", id),
        };

        match state {
            State::Uninitialized => {
                let values = self.evaluate_operands(id, frame)?;
                self.specialize_and_execute(id, values, RewriteCause::Initialize)
            }
            State::Specialized(index) => self.execute_specialized(id, index, frame),
            State::Polymorphic { .. } => self.execute_polymorphic(id, frame),
            State::Generic => {
                let values = self.evaluate_operands(id, frame)?;
                let op = self.arena.operation(id);
                generalize(&op.descriptor, &values, op.environment.as_ref())
            }
        }
    }

    fn evaluate_operands(
        &mut self,
        id: NodeId,
        frame: &Frame<'_>,
    ) -> Result<SmallVec<[Value; 2]>, ExecutionError> {
        let operands = self.arena.operation(id).operands.clone();
        operands
            .iter()
            .map(|&operand| self.execute_node(operand, frame))
            .collect()
    }

    /// Fast path of a node specialized to candidate `index`.
    ///
    /// Operands whose predicate names a single kind are read through the
    /// typed accessor. On the first miss the values already produced are kept,
    /// the remaining operands are evaluated generically, and the node
    /// re-specializes with all of them.
    fn execute_specialized(
        &mut self,
        id: NodeId,
        index: CandidateIndex,
        frame: &Frame<'_>,
    ) -> Result<Value, ExecutionError> {
        let op = self.arena.operation(id);
        let descriptor = Arc::clone(&op.descriptor);
        let operands = op.operands.clone();
        let candidate = descriptor.candidate(index);

        let mut values: SmallVec<[Value; 2]> = SmallVec::with_capacity(operands.len());
        let mut matched = true;
        for (&operand, &kinds) in operands.iter().zip(candidate.kinds()) {
            let value = match kinds.single() {
                Some(kind) if matched => match self.execute_as(operand, kind, frame) {
                    Ok(value) => value,
                    Err(Unexpected::Result(value)) => {
                        matched = false;
                        value
                    }
                    Err(Unexpected::Error(err)) => return Err(err),
                },
                _ => {
                    let value = self.execute_node(operand, frame)?;
                    matched &= value.is_in(kinds);
                    value
                }
            };
            values.push(value);
        }

        if !matched || !candidate.guard_holds(&values) {
            self.host.force_interpreter_reentry();
            return self.specialize_and_execute(id, values, RewriteCause::GuardMismatch);
        }
        if let Some(assumption) = candidate.first_invalid_assumption() {
            let assumption = EcoString::from(assumption.name());
            self.host.force_interpreter_reentry();
            return self.specialize_and_execute(
                id,
                values,
                RewriteCause::AssumptionInvalidated { assumption },
            );
        }

        let environment = self.arena.operation(id).environment.as_ref();
        Ok(candidate.invoke(&values, environment)?)
    }
}
