//! Configuration options for expression trees.

/// Configuration options for tree execution and specialization.
///
/// Options are fixed when a tree is built. There is no ambient global
/// configuration: every tree carries its own copy.
///
/// # Example
///
/// ```
/// use graft_core::TreeOptions;
///
/// let options = TreeOptions {
///     polymorphic_limit: 2,
///     detailed_rewrite_reasons: true,
///     ..TreeOptions::default()
/// };
/// assert_eq!(options.max_depth, 1000);
/// ```
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Maximum number of specializations cached behind one polymorphic node
    /// before it collapses into the generic implementation.
    ///
    /// Default: 3
    pub polymorphic_limit: usize,

    /// Build a human-readable reason string for every rewrite.
    ///
    /// Default: false
    pub detailed_rewrite_reasons: bool,

    /// Maximum evaluation stack depth (for recursion protection).
    ///
    /// Default: 1000
    pub max_depth: usize,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            polymorphic_limit: 3,
            detailed_rewrite_reasons: false,
            max_depth: 1000,
        }
    }
}
