//! Shared execution environment.
//!
//! Some nodes carry a piece of context that is not an operand, for example
//! the table of globals a builtin reads from. The environment takes no part in
//! specialization decisions. Rewrites hand it from the old node shape to the
//! new one by reference; it is never copied or mutated.

use alloc::sync::Arc;
use core::fmt;

use ecow::EcoString;

use crate::{Vec, values::Value};

/// Immutable, shared table of named globals.
///
/// Cloning an environment clones the handle, not the table.
#[derive(Clone)]
pub struct Environment {
    entries: Arc<[(EcoString, Value)]>,
}

impl Environment {
    /// An environment with no entries.
    pub fn empty() -> Self {
        EnvironmentBuilder::new().build()
    }

    /// Look up a global by name.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.entries
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
            .map(|idx| &self.entries[idx].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if both handles share the same table.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

/// Builder for constructing an [`Environment`].
///
/// # Example
///
/// ```
/// use graft_core::{EnvironmentBuilder, Value};
///
/// let mut env = EnvironmentBuilder::new();
/// env.register("answer", Value::Int(42));
/// let env = env.build();
///
/// assert_eq!(env.lookup("answer"), Some(&Value::Int(42)));
/// ```
#[derive(Default)]
pub struct EnvironmentBuilder {
    entries: Vec<(EcoString, Value)>,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a global value.
    ///
    /// Registering the same name twice keeps the last value.
    pub fn register(&mut self, name: &str, value: Value) -> &mut Self {
        self.entries.push((EcoString::from(name), value));
        self
    }

    /// Build the final sorted environment.
    ///
    /// Entries are sorted by name for binary search during lookup.
    pub fn build(mut self) -> Environment {
        // Stable sort keeps registration order among equal names, so the
        // dedup below retains the last registration.
        self.entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        self.entries.reverse();
        self.entries.dedup_by(|(a, _), (b, _)| a == b);
        self.entries.reverse();
        Environment {
            entries: Arc::from(self.entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut builder = EnvironmentBuilder::new();
        builder
            .register("pi", Value::Float(3.14))
            .register("answer", Value::Int(42));
        let env = builder.build();

        assert_eq!(env.len(), 2);
        assert_eq!(env.lookup("answer"), Some(&Value::Int(42)));
        assert_eq!(env.lookup("pi"), Some(&Value::Float(3.14)));
        assert_eq!(env.lookup("missing"), None);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut builder = EnvironmentBuilder::new();
        builder
            .register("x", Value::Int(1))
            .register("y", Value::Int(0))
            .register("x", Value::Int(2));
        let env = builder.build();

        assert_eq!(env.len(), 2);
        assert_eq!(env.lookup("x"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_clone_shares_table() {
        let env = EnvironmentBuilder::new().build();
        let other = env.clone();
        assert!(env.ptr_eq(&other));
        assert!(!env.ptr_eq(&Environment::empty()));
    }
}
