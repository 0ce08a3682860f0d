//! Self-specializing expression trees.
//!
//! A [`Tree`] owns its nodes in an arena. Operation nodes start out
//! uninitialized and rewrite themselves, lazily and in place, into more
//! specific shapes based on the operand kinds they observe:
//!
//! ```text
//! Uninitialized ──► Specialized[i] ──► Polymorphic ──► Generic
//!        │                 │                              ▲
//!        └─────────────────┴──────────────────────────────┘
//! ```
//!
//! - **Uninitialized**: evaluates its operands and immediately specializes.
//! - **Specialized[i]**: runs candidate `i` behind its type predicate, guard
//!   and assumptions. Any miss re-specializes before returning.
//! - **Polymorphic**: tries a bounded chain of specializations in order.
//! - **Generic**: runs the first applicable candidate; never rewrites again.
//!
//! Every path returns the value the generic implementation would return for
//! the same operands. Rewrites only change which path computes it.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use graft_core::{Frame, Tag, TreeBuilder, Value, stdlib};
//!
//! let add = Arc::new(stdlib::arith::add());
//! let mut builder = TreeBuilder::new();
//! let x = builder.argument(0);
//! let y = builder.argument(1);
//! let sum = builder.operation(&add, &[x, y]).unwrap();
//! let mut tree = builder.finish(sum).unwrap();
//!
//! let result = tree.execute(&Frame::new(&[Value::Int(3), Value::Int(4)])).unwrap();
//! assert_eq!(result, Value::Int(7));
//! assert!(matches!(tree.tag(sum), Some(Tag::Specialized(_))));
//! ```

mod arena;
mod builder;
mod dispatch;
mod generic;
mod node;
mod polymorphic;
mod rewrite;


pub use builder::TreeBuilder;
pub(crate) use generic::generalize;

use alloc::sync::Arc;
use core::fmt;

use arena::Arena;
use node::{Node, State};

use crate::{
    Vec,
    descriptor::{CandidateIndex, Descriptor},
    environment::Environment,
    errors::ExecutionError,
    host::{Host, NoopHost},
    options::TreeOptions,
    values::{Kind, Typed, Value},
};

/// Stable handle to a node. Survives every rewrite of the node it names.
///
/// Handles are 32 bits wide, so a tree holds at most `u32::MAX + 1` slots
/// (live nodes plus chain links). Allocating past that panics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

static_assertions::assert_eq_size!(NodeId, u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(index) => NodeId(index),
            Err(_) => panic!("node arena exceeds {} slots", u64::from(u32::MAX) + 1),
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Specialization tag of an operation node (or of a chain member).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Uninitialized,
    Specialized(CandidateIndex),
    Polymorphic,
    Generic,
}

impl Tag {
    pub fn generality(self) -> Generality {
        match self {
            Tag::Uninitialized => Generality::Uninitialized,
            Tag::Specialized(_) => Generality::Specialized,
            Tag::Polymorphic => Generality::Polymorphic,
            Tag::Generic => Generality::Generic,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Uninitialized => f.write_str("uninitialized"),
            Tag::Specialized(index) => write!(f, "specialized[{}]", index),
            Tag::Polymorphic => f.write_str("polymorphic"),
            Tag::Generic => f.write_str("generic"),
        }
    }
}

/// Tags ordered by generality. A node's generality never decreases.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Generality {
    Uninitialized,
    Specialized,
    Polymorphic,
    Generic,
}

/// How a polymorphic node evaluates its operands before walking its chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dispatch {
    /// Every operand through the generic accessor.
    Generic,
    /// Every chain member requires `kind` at `position`, so that operand goes
    /// through the typed accessor. A mismatch there skips the chain.
    Fixed { position: usize, kind: Kind },
}

/// Signal from a typed accessor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Unexpected {
    /// The node produced a value of a different kind. Not an error: the
    /// caller continues with this value on the generic path.
    #[error("unexpected result: {0}")]
    Result(Value),

    #[error(transparent)]
    Error(#[from] ExecutionError),
}

/// Execution context handed to every node. Only argument leaves look inside.
#[derive(Copy, Clone, Debug)]
pub struct Frame<'a> {
    arguments: &'a [Value],
}

impl<'a> Frame<'a> {
    pub fn new(arguments: &'a [Value]) -> Self {
        Self { arguments }
    }

    pub fn empty() -> Frame<'static> {
        Frame { arguments: &[] }
    }

    pub fn argument(&self, index: usize) -> Option<&'a Value> {
        self.arguments.get(index)
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}

/// A self-specializing expression tree.
///
/// Trees are built with [`TreeBuilder`]. Execution takes `&mut self`: the
/// tree rewrites itself as it runs, so one tree has one executing owner at a
/// time. Descriptors, environments and assumptions are shared between trees
/// freely.
pub struct Tree<H = NoopHost> {
    arena: Arena,
    root: NodeId,
    options: TreeOptions,
    host: H,
    depth: usize,
    rewrites: u64,
}

static_assertions::assert_impl_all!(Tree: Send);

impl<H: Host> Tree<H> {
    pub(crate) fn from_parts(arena: Arena, root: NodeId, options: TreeOptions, host: H) -> Self {
        Self {
            arena,
            root,
            options,
            host,
            depth: 0,
            rewrites: 0,
        }
    }

    /// Evaluate the tree.
    pub fn execute(&mut self, frame: &Frame<'_>) -> Result<Value, ExecutionError> {
        self.execute_node(self.root, frame)
    }

    /// Evaluate the tree, expecting a result of type `T`.
    ///
    /// A result of another kind comes back as [`Unexpected::Result`] carrying
    /// the value that was produced.
    pub fn execute_typed<T: Typed>(&mut self, frame: &Frame<'_>) -> Result<T, Unexpected> {
        let value = self.execute_as(self.root, T::KIND, frame)?;
        T::from_value(value).map_err(Unexpected::Result)
    }

    /// Feed observed operand values into re-specialization of `node`, as its
    /// own fast path would on a miss. Returns the operation's result for those
    /// values.
    ///
    /// Specializing again with operand kinds the node already handles is a
    /// no-op.
    pub fn specialize(&mut self, node: NodeId, operands: &[Value]) -> Result<Value, ExecutionError> {
        let Some(Node::Operation(op)) = self.arena.get(node).map(|e| &e.node) else {
            return Err(ExecutionError::NotSpecializable { node });
        };
        if op.descriptor.arity() != operands.len() {
            return Err(ExecutionError::NotSpecializable { node });
        }
        let values = operands.iter().cloned().collect();
        self.specialize_and_execute(node, values, crate::host::RewriteCause::GuardMismatch)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Specialization tag of an operation node. `None` for leaves.
    pub fn tag(&self, node: NodeId) -> Option<Tag> {
        match &self.arena.get(node)?.node {
            Node::Operation(op) => Some(op.state.tag()),
            _ => None,
        }
    }

    /// Tags of the chain members behind a polymorphic node, terminator
    /// included, in dispatch order.
    pub fn chain(&self, node: NodeId) -> Option<Vec<Tag>> {
        let State::Polymorphic { first, .. } = self.operation_state(node)? else {
            return None;
        };
        let mut tags = Vec::new();
        let mut cursor = Some(first);
        while let Some(id) = cursor {
            let link = self.arena.link(id);
            tags.push(link.state.tag());
            cursor = link.next;
        }
        Some(tags)
    }

    /// Dispatch shape of a polymorphic node.
    pub fn dispatch(&self, node: NodeId) -> Option<Dispatch> {
        match self.operation_state(node)? {
            State::Polymorphic { dispatch, .. } => Some(dispatch),
            _ => None,
        }
    }

    pub fn descriptor(&self, node: NodeId) -> Option<&Arc<Descriptor>> {
        match &self.arena.get(node)?.node {
            Node::Operation(op) => Some(&op.descriptor),
            _ => None,
        }
    }

    /// Shared context carried by an operation node.
    pub fn environment(&self, node: NodeId) -> Option<&Environment> {
        match &self.arena.get(node)?.node {
            Node::Operation(op) => op.environment.as_ref(),
            _ => None,
        }
    }

    pub fn operands(&self, node: NodeId) -> &[NodeId] {
        match self.arena.get(node).map(|e| &e.node) {
            Some(Node::Operation(op)) => &op.operands,
            _ => &[],
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.parent
    }

    /// Number of rewrites committed since the tree was built.
    pub fn rewrite_count(&self) -> u64 {
        self.rewrites
    }

    /// Number of live arena slots, chain links included.
    pub fn live_nodes(&self) -> usize {
        self.arena.live()
    }

    fn operation_state(&self, node: NodeId) -> Option<State> {
        match &self.arena.get(node)?.node {
            Node::Operation(op) => Some(op.state),
            _ => None,
        }
    }
}

impl<H> fmt::Debug for Tree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("live_nodes", &self.arena.live())
            .field("rewrites", &self.rewrites)
            .finish()
    }
}
