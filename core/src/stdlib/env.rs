//! Builtins that read the node's environment.

use super::{finish, string};
use crate::{
    descriptor::Descriptor,
    errors::RuntimeError,
    values::{EcoString, KindSet},
};

/// `global(name)`: the value registered under `name` in the environment the
/// node was built with.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use graft_core::{EnvironmentBuilder, Frame, TreeBuilder, Value, stdlib};
///
/// let mut env = EnvironmentBuilder::new();
/// env.register("answer", Value::Int(42));
/// let env = env.build();
///
/// let global = Arc::new(stdlib::env::global());
/// let mut builder = TreeBuilder::new();
/// let name = builder.literal("answer");
/// let node = builder.operation_with_environment(&global, &[name], &env).unwrap();
/// let mut tree = builder.finish(node).unwrap();
///
/// assert_eq!(tree.execute(&Frame::empty()).unwrap(), Value::Int(42));
/// ```
pub fn global() -> Descriptor {
    finish(
        Descriptor::builder("global", 1).candidate("global", [KindSet::STR], |v, env| {
            let name = string(&v[0]);
            let env = env.ok_or_else(|| RuntimeError::MissingEnvironment {
                operation: EcoString::from("global"),
            })?;
            env.lookup(name)
                .cloned()
                .ok_or_else(|| RuntimeError::UnknownGlobal { name: name.clone() })
        }),
    )
}
