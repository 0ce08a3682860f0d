//! Contract with the host execution engine.
//!
//! The host may compile hot trees into optimized code. The engine tells it
//! where that must not happen, and when running code has to drop back into
//! the unoptimized interpreter:
//!
//! - [`Host::mark_slow_path_boundary`] is called before any rewrite logic
//!   runs, so the rewrite path is never included in compiled code.
//! - [`Host::force_interpreter_reentry`] is called when a fast path discovers
//!   a typed mismatch, a failed guard or an invalidated assumption
//!   mid-execution.
//!
//! Both default to no-ops, which is the right behavior for a pure
//! interpreter.

use core::fmt;

use ecow::EcoString;

use crate::tree::{NodeId, Tag};

/// Why a node was rewritten. None of these are errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RewriteCause {
    /// First execution of an uninitialized node.
    Initialize,
    /// A type predicate or guard did not hold.
    GuardMismatch,
    /// An assumption the fast path depended on was invalidated.
    AssumptionInvalidated { assumption: EcoString },
    /// A new specialization was appended to a polymorphic chain.
    ChainExtended,
    /// The chain would have exceeded the polymorphic limit and was collapsed
    /// into the generic implementation.
    PolymorphicLimitExceeded,
}

impl fmt::Display for RewriteCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteCause::Initialize => f.write_str("initialize"),
            RewriteCause::GuardMismatch => f.write_str("guard mismatch"),
            RewriteCause::AssumptionInvalidated { assumption } => {
                write!(f, "assumption `{}` invalidated", assumption)
            }
            RewriteCause::ChainExtended => f.write_str("polymorphic chain extended"),
            RewriteCause::PolymorphicLimitExceeded => f.write_str("polymorphic limit exceeded"),
        }
    }
}

/// Record of one node rewrite.
#[derive(Clone, Debug, PartialEq)]
pub struct Rewrite {
    pub node: NodeId,
    pub from: Tag,
    pub to: Tag,
    pub cause: RewriteCause,
    /// Human-readable reason. Only built when
    /// [`crate::TreeOptions::detailed_rewrite_reasons`] is set.
    pub reason: Option<EcoString>,
}

/// Hooks the host execution engine provides.
pub trait Host {
    /// Everything after this call runs on the slow path.
    fn mark_slow_path_boundary(&self) {}

    /// Transfer control back to the unoptimized interpreter.
    fn force_interpreter_reentry(&self) {}

    /// Called after every committed rewrite.
    fn on_rewrite(&self, _rewrite: &Rewrite) {}
}

/// Host for a plain interpreter: every hook is a no-op.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopHost;

impl Host for NoopHost {}

impl<H: Host + ?Sized> Host for &H {
    fn mark_slow_path_boundary(&self) {
        (**self).mark_slow_path_boundary()
    }

    fn force_interpreter_reentry(&self) {
        (**self).force_interpreter_reentry()
    }

    fn on_rewrite(&self, rewrite: &Rewrite) {
        (**self).on_rewrite(rewrite)
    }
}
