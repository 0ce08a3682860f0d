//! Graft - self-specializing expression trees
//!
//! # Overview
//!
//! Graft is an engine for AST interpreters that optimize themselves while they
//! run. Each operation node observes the kinds of its operands and rewrites
//! itself, in place, into a faster specialized shape. When an observation
//! stops holding, the node widens: to a small chain of cached specializations
//! first, and eventually to a fully generic implementation. Results never
//! change; only the path that computes them does.
//!
//! Operations are described by [`Descriptor`]s: an ordered list of candidate
//! implementations, each with an operand predicate, an optional guard and the
//! [`Assumption`]s its fast path relies on.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use graft::{Frame, Tag, TreeBuilder, Value, stdlib};
//!
//! let add = Arc::new(stdlib::arith::add());
//!
//! let mut builder = TreeBuilder::new();
//! let x = builder.argument(0);
//! let y = builder.argument(1);
//! let sum = builder.operation(&add, &[x, y])?;
//! let mut tree = builder.finish(sum)?;
//!
//! let result = tree.execute(&Frame::new(&[Value::Int(3), Value::Int(4)]))?;
//! assert_eq!(result, Value::Int(7));
//! assert!(matches!(tree.tag(sum), Some(Tag::Specialized(_))));
//!
//! // A boolean pair misses the integer fast path; the node widens.
//! let result = tree.execute(&Frame::new(&[Value::Bool(true), Value::Bool(false)]))?;
//! assert_eq!(result, Value::Bool(true));
//! assert_eq!(tree.tag(sum), Some(Tag::Polymorphic));
//! # Ok::<(), graft::Error>(())
//! ```
//!
//! # Hosts
//!
//! A compiling host plugs in through the [`Host`] trait to learn where the
//! slow path begins, when compiled code must fall back to the interpreter,
//! and about every rewrite. [`NoopHost`] is the plain-interpreter default.

mod error;

pub use error::{Error, render_error, render_error_to_string};

// Re-export public API from graft_core
pub use graft_core::{
    Assumption, AssumptionId, AssumptionSource, BuildError, Candidate, CandidateIndex,
    Descriptor, DescriptorBuilder, Dispatch, EcoString, Environment, EnvironmentBuilder,
    ExecutionError, Frame, Generality, Host, Kind, KindSet, NodeId, NoopHost, Rewrite,
    RewriteCause, RuntimeError, Tag, Tree, TreeBuilder, TreeOptions, Typed, Unexpected, Value,
};

pub use graft_core::{guards, stdlib};
