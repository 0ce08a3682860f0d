//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use graft::{Descriptor, NodeId, Tree, TreeBuilder, TreeOptions, Value, stdlib};
use once_cell::sync::Lazy;

pub static ADD: Lazy<Arc<Descriptor>> = Lazy::new(|| Arc::new(stdlib::arith::add()));
pub static SUB: Lazy<Arc<Descriptor>> = Lazy::new(|| Arc::new(stdlib::arith::sub()));
pub static MUL: Lazy<Arc<Descriptor>> = Lazy::new(|| Arc::new(stdlib::arith::mul()));
pub static DIV: Lazy<Arc<Descriptor>> = Lazy::new(|| Arc::new(stdlib::arith::div()));
pub static EQ: Lazy<Arc<Descriptor>> = Lazy::new(|| Arc::new(stdlib::compare::eq()));
pub static LT: Lazy<Arc<Descriptor>> = Lazy::new(|| Arc::new(stdlib::compare::lt()));

/// Operand values covering every kind plus the overflow edge.
pub static OPERANDS: Lazy<Vec<Value>> = Lazy::new(|| {
    vec![
        Value::Int(0),
        Value::Int(-3),
        Value::Int(i64::MAX),
        Value::Int(i64::MIN),
        Value::Float(2.5),
        Value::Float(-1.25),
        Value::Bool(true),
        Value::Bool(false),
        Value::str("graft"),
        Value::str(""),
    ]
});

/// `descriptor(arg0, arg1)`.
pub fn binary(descriptor: &Arc<Descriptor>) -> (Tree, NodeId) {
    binary_with(descriptor, TreeOptions::default())
}

pub fn binary_with(descriptor: &Arc<Descriptor>, options: TreeOptions) -> (Tree, NodeId) {
    let mut builder = TreeBuilder::with_options(options);
    let x = builder.argument(0);
    let y = builder.argument(1);
    let node = builder.operation(descriptor, &[x, y]).unwrap();
    (builder.finish(node).unwrap(), node)
}
