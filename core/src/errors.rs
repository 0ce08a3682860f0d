//! Errors that escape the engine.
//!
//! Guard mismatches, invalidated assumptions and an exceeded polymorphic limit
//! are recoverable and are resolved inside the same `execute` call through a
//! rewrite (see [`crate::host::RewriteCause`]). Only the conditions below
//! reach the caller:
//!
//! - **Construction errors** ([`BuildError`]): a descriptor or tree was built
//!   with arguments that don't match the declared shape. Raised before
//!   anything executes.
//! - **Execution errors** ([`ExecutionError`]): unsupported operand
//!   combinations, failures raised by operation bodies, and resource limits of
//!   the surrounding evaluator.

use ecow::EcoString;

use crate::{String, Vec, tree::NodeId, values::Kind};

/// Failures raised by an operation body.
///
/// These are part of the operation's semantics (e.g. integer division by
/// zero) and are propagated unchanged, never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Unknown global `{name}`")]
    UnknownGlobal { name: EcoString },

    #[error("Missing environment for `{operation}`")]
    MissingEnvironment { operation: EcoString },

    #[error("{0}")]
    Custom(EcoString),
}

/// Errors surfaced by `execute`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecutionError {
    /// No candidate, including the fully generic one, covers the observed
    /// operand kinds. The node is left untouched.
    #[error("Unsupported operands for `{operation}`: ({})", join_kinds(.kinds))]
    UnsupportedOperands {
        operation: EcoString,
        kinds: Vec<Kind>,
    },

    /// An operation body failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// The frame holds fewer arguments than an argument leaf reads.
    #[error("Argument {index} is missing (frame has {len} argument(s))")]
    MissingArgument { index: usize, len: usize },

    /// `Tree::specialize` was pointed at a leaf, a foreign node, or given the
    /// wrong number of operands.
    #[error("Node {node} cannot be specialized with these operands")]
    NotSpecializable { node: NodeId },

    /// Evaluation recursion depth exceeded.
    #[error("Evaluation stack overflow: depth {depth} exceeds maximum of {max_depth}")]
    StackOverflow { depth: usize, max_depth: usize },
}

/// Errors raised while building descriptors or trees.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("Descriptor `{operation}` declares no candidates")]
    EmptyDescriptor { operation: EcoString },

    #[error("Descriptor `{operation}` declares {count} candidates (at most {max} are supported)")]
    TooManyCandidates {
        operation: EcoString,
        count: usize,
        max: usize,
    },

    #[error(
        "Candidate `{candidate}` of `{operation}` has {found} operand predicate(s), expected {expected}"
    )]
    PredicateArity {
        operation: EcoString,
        candidate: EcoString,
        expected: usize,
        found: usize,
    },

    #[error("Descriptor `{operation}` declares candidate `{candidate}` twice")]
    DuplicateCandidate {
        operation: EcoString,
        candidate: EcoString,
    },

    #[error("`{modifier}` on descriptor `{operation}` must follow a candidate")]
    ModifierWithoutCandidate {
        operation: EcoString,
        modifier: &'static str,
    },

    #[error("`{operation}` takes {expected} operand(s), got {found}")]
    Arity {
        operation: EcoString,
        expected: usize,
        found: usize,
    },

    #[error("Operand {position} of `{operation}` is a constant {found}, expected {expected}")]
    OperandKind {
        operation: EcoString,
        position: usize,
        expected: String,
        found: Kind,
    },

    #[error("Node {node} is not part of this tree")]
    UnknownNode { node: NodeId },

    #[error("Node {node} is already owned by {owner}")]
    OperandAlreadyOwned { node: NodeId, owner: NodeId },

    #[error("Node {node} appears more than once in one operand list")]
    DuplicateOperand { node: NodeId },

    #[error("Node {node} is not reachable from the root")]
    DetachedNode { node: NodeId },
}

fn join_kinds(kinds: &[Kind]) -> String {
    let mut out = String::new();
    for (i, kind) in kinds.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(kind.name());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ToString, vec};

    #[test]
    fn test_unsupported_operands_message() {
        let err = ExecutionError::UnsupportedOperands {
            operation: EcoString::from("add"),
            kinds: vec![Kind::Int, Kind::Str],
        };
        assert_eq!(err.to_string(), "Unsupported operands for `add`: (Int, Str)");
    }

    #[test]
    fn test_runtime_error_is_transparent() {
        let err = ExecutionError::from(RuntimeError::DivisionByZero);
        assert_eq!(err.to_string(), "Division by zero");
    }

    #[test]
    fn test_arity_message() {
        let err = BuildError::Arity {
            operation: EcoString::from("neg"),
            expected: 1,
            found: 2,
        };
        assert_eq!(err.to_string(), "`neg` takes 1 operand(s), got 2");
    }
}
