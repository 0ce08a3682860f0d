//! Assumption tokens.
//!
//! An assumption is an externally owned validity flag. It starts valid and can
//! be invalidated exactly once, permanently. Specialized nodes whose fast path
//! depends on an assumption check it before running their body; a failed check
//! is handled like a guard miss.
//!
//! Ownership is split in two handles:
//!
//! - [`AssumptionSource`] is held by whoever is entitled to revoke the
//!   assumption. It is not `Clone`.
//! - [`Assumption`] is the shared read handle embedded in descriptors. Cloning
//!   it is a reference count increment.
//!
//! Checks never lock. The flag is flipped with a release store and read with
//! an acquire load, so once a reader observes the flip it can never observe
//! the token as valid again.

use alloc::sync::Arc;
use core::{
    fmt,
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
};

use ecow::EcoString;

static NEXT_ASSUMPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an assumption token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssumptionId(u64);

impl AssumptionId {
    fn fresh() -> Self {
        AssumptionId(NEXT_ASSUMPTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssumptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Token {
    id: AssumptionId,
    name: EcoString,
    valid: AtomicBool,
    base: Option<Assumption>,
}

/// Shared, read-only handle to an assumption token.
#[derive(Clone)]
pub struct Assumption(Arc<Token>);

impl Assumption {
    pub fn id(&self) -> AssumptionId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The base this token was derived from, if any.
    pub fn base(&self) -> Option<&Assumption> {
        self.0.base.as_ref()
    }

    /// Returns true while neither this token nor any base it derives from has
    /// been invalidated.
    #[inline]
    pub fn is_valid(&self) -> bool {
        if !self.0.valid.load(Ordering::Acquire) {
            return false;
        }
        match &self.0.base {
            Some(base) => base.is_valid(),
            None => true,
        }
    }

    /// Returns true if both handles refer to the same token.
    pub fn same_identity(&self, other: &Assumption) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Assumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assumption")
            .field("id", &self.0.id)
            .field("name", &self.0.name)
            .field("valid", &self.is_valid())
            .finish()
    }
}

/// Owning handle of an assumption token. Only the owner can invalidate it.
pub struct AssumptionSource {
    token: Assumption,
}

impl AssumptionSource {
    /// Create a new, valid assumption.
    pub fn new(name: &str) -> Self {
        Self::with_base(name, None)
    }

    /// Create a token that is logically implied by `base` but independently
    /// revocable. It reads as invalid once either it or `base` is invalidated.
    pub fn derived(name: &str, base: &Assumption) -> Self {
        Self::with_base(name, Some(base.clone()))
    }

    fn with_base(name: &str, base: Option<Assumption>) -> Self {
        let token = Token {
            id: AssumptionId::fresh(),
            name: EcoString::from(name),
            valid: AtomicBool::new(true),
            base,
        };
        Self {
            token: Assumption(Arc::new(token)),
        }
    }

    /// A shared read handle for this assumption.
    pub fn token(&self) -> Assumption {
        self.token.clone()
    }

    pub fn id(&self) -> AssumptionId {
        self.token.id()
    }

    pub fn is_valid(&self) -> bool {
        self.token.is_valid()
    }

    /// Invalidate the assumption.
    ///
    /// Returns true if this call performed the transition; invalidating an
    /// already invalid token is a no-op.
    pub fn invalidate(&self) -> bool {
        let flipped = self.token.0.valid.swap(false, Ordering::AcqRel);
        if flipped {
            tracing::debug!(assumption = %self.token.name(), id = %self.id(), "assumption invalidated");
        }
        flipped
    }
}

impl fmt::Debug for AssumptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AssumptionSource").field(&self.token).finish()
    }
}
