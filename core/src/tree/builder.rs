//! Tree construction.

use alloc::sync::Arc;

use smallvec::SmallVec;

use super::{
    NodeId, Tree,
    arena::Arena,
    node::{Node, Operation, State},
};
use crate::{
    ToString,
    descriptor::{CandidateMask, Descriptor},
    environment::Environment,
    errors::BuildError,
    host::{Host, NoopHost},
    options::TreeOptions,
};

/// Builds a [`Tree`] bottom-up.
///
/// Every operation node takes exclusive ownership of its operands. A node can
/// be an operand of at most one operation, and every node except the root
/// must end up owned by some operation.
#[derive(Default)]
pub struct TreeBuilder {
    arena: Arena,
    options: TreeOptions,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeOptions) -> Self {
        Self {
            arena: Arena::default(),
            options,
        }
    }

    /// A constant leaf.
    pub fn literal(&mut self, value: impl Into<crate::values::Value>) -> NodeId {
        self.arena.alloc(Node::Literal(value.into()), None)
    }

    /// A leaf reading argument `index` from the frame.
    pub fn argument(&mut self, index: usize) -> NodeId {
        self.arena.alloc(Node::Argument(index), None)
    }

    /// An uninitialized operation node owning `operands`.
    pub fn operation(
        &mut self,
        descriptor: &Arc<Descriptor>,
        operands: &[NodeId],
    ) -> Result<NodeId, BuildError> {
        self.add_operation(descriptor, operands, None)
    }

    /// An uninitialized operation node that also carries `environment`.
    pub fn operation_with_environment(
        &mut self,
        descriptor: &Arc<Descriptor>,
        operands: &[NodeId],
        environment: &Environment,
    ) -> Result<NodeId, BuildError> {
        self.add_operation(descriptor, operands, Some(environment.clone()))
    }

    fn add_operation(
        &mut self,
        descriptor: &Arc<Descriptor>,
        operands: &[NodeId],
        environment: Option<Environment>,
    ) -> Result<NodeId, BuildError> {
        if operands.len() != descriptor.arity() {
            return Err(BuildError::Arity {
                operation: descriptor.name_eco(),
                expected: descriptor.arity(),
                found: operands.len(),
            });
        }

        for (position, &operand) in operands.iter().enumerate() {
            let Some(entry) = self.arena.get(operand) else {
                return Err(BuildError::UnknownNode { node: operand });
            };
            if let Some(owner) = entry.parent {
                return Err(BuildError::OperandAlreadyOwned {
                    node: operand,
                    owner,
                });
            }
            if operands[..position].contains(&operand) {
                return Err(BuildError::DuplicateOperand { node: operand });
            }
            // Constants have a static kind; reject ones no candidate accepts.
            if let Node::Literal(value) = &entry.node {
                let accepted = descriptor.accepted_kinds(position);
                if !value.is_in(accepted) {
                    return Err(BuildError::OperandKind {
                        operation: descriptor.name_eco(),
                        position,
                        expected: accepted.to_string(),
                        found: value.kind(),
                    });
                }
            }
        }

        let operation = Operation {
            descriptor: Arc::clone(descriptor),
            operands: SmallVec::from_slice(operands),
            environment,
            state: State::Uninitialized,
            excluded: CandidateMask::empty(),
        };
        let id = self.arena.alloc(Node::Operation(operation), None);
        for &operand in operands {
            self.arena[operand].parent = Some(id);
        }
        Ok(id)
    }

    /// Finish the tree with `root` at the top.
    pub fn finish(self, root: NodeId) -> Result<Tree<NoopHost>, BuildError> {
        self.finish_with_host(root, NoopHost)
    }

    /// Finish the tree, wiring it to `host`.
    pub fn finish_with_host<H: Host>(self, root: NodeId, host: H) -> Result<Tree<H>, BuildError> {
        let Some(entry) = self.arena.get(root) else {
            return Err(BuildError::UnknownNode { node: root });
        };
        if let Some(owner) = entry.parent {
            return Err(BuildError::OperandAlreadyOwned { node: root, owner });
        }
        // Operands must exist before their owner, so ownership is acyclic and
        // every owned node leads up to some unowned one. The root must be the
        // only unowned node.
        if let Some(node) = self
            .arena
            .ids()
            .find(|&id| id != root && self.arena[id].parent.is_none())
        {
            return Err(BuildError::DetachedNode { node });
        }
        Ok(Tree::from_parts(self.arena, root, self.options, host))
    }
}
