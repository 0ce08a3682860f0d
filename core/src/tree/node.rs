//! Node representation.

use alloc::sync::Arc;

use smallvec::SmallVec;

use super::{Dispatch, NodeId, Tag};
use crate::{
    descriptor::{CandidateIndex, CandidateMask, Descriptor},
    environment::Environment,
    values::Value,
};

pub(crate) enum Node {
    /// Constant leaf.
    Literal(Value),
    /// Leaf reading an argument from the frame.
    Argument(usize),
    /// Specializable operation.
    Operation(Operation),
    /// Member of a polymorphic chain. Never an operand; executed by its head.
    Link(Link),
}

/// State of an operation node. One variant per specialization tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum State {
    Uninitialized,
    Specialized(CandidateIndex),
    Polymorphic { first: NodeId, dispatch: Dispatch },
    Generic,
}

impl State {
    pub fn tag(self) -> Tag {
        match self {
            State::Uninitialized => Tag::Uninitialized,
            State::Specialized(index) => Tag::Specialized(index),
            State::Polymorphic { .. } => Tag::Polymorphic,
            State::Generic => Tag::Generic,
        }
    }
}

pub(crate) struct Operation {
    pub descriptor: Arc<Descriptor>,
    /// Owned operands. Moved, never copied, when the node is replaced.
    pub operands: SmallVec<[NodeId; 2]>,
    /// Shared context threaded through every rewrite by reference.
    pub environment: Option<Environment>,
    pub state: State,
    /// Candidates known to be inapplicable (their assumptions failed).
    pub excluded: CandidateMask,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LinkState {
    Specialized(CandidateIndex),
    /// Chain terminator. Reaching it means no member matched.
    Uninitialized,
}

impl LinkState {
    pub fn tag(self) -> Tag {
        match self {
            LinkState::Specialized(index) => Tag::Specialized(index),
            LinkState::Uninitialized => Tag::Uninitialized,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Link {
    /// The polymorphic node this link belongs to, recorded when the chain is
    /// built. The limit check and every chain mutation are anchored there.
    pub head: NodeId,
    pub state: LinkState,
    pub next: Option<NodeId>,
}
