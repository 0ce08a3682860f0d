//! Standard library descriptors.
//!
//! Ready-made operations in the shape a code generator would emit:
//!
//! - [`arith`]: `add`, `sub`, `mul`, `div`, `neg`
//! - [`compare`]: `eq`, `lt`
//! - [`env`]: `global`, a builtin reading the node's environment
//!
//! Integer arithmetic wraps on overflow, matching the evaluator's semantics.
//! Where a checked fast path exists it is guarded, and the wrapping candidate
//! behind it produces the identical value.

pub mod arith;
pub mod compare;
pub mod env;

use crate::{
    descriptor::{Descriptor, DescriptorBuilder},
    values::{EcoString, Value},
};

fn finish(builder: DescriptorBuilder) -> Descriptor {
    match builder.build() {
        Ok(descriptor) => descriptor,
        Err(err) => unreachable!("malformed standard descriptor: {}", err),
    }
}

// Operand extractors. Bodies only run once their candidate's predicate has
// accepted the operands.

fn int(value: &Value) -> i64 {
    match value {
        Value::Int(i) => *i,
        other => unreachable!("expected Int, got {}", other.kind()),
    }
}

fn float(value: &Value) -> f64 {
    match value {
        Value::Float(x) => *x,
        other => unreachable!("expected Float, got {}", other.kind()),
    }
}

fn number(value: &Value) -> f64 {
    match value {
        Value::Int(i) => *i as f64,
        Value::Float(x) => *x,
        other => unreachable!("expected a number, got {}", other.kind()),
    }
}

fn boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        other => unreachable!("expected Bool, got {}", other.kind()),
    }
}

fn string(value: &Value) -> &EcoString {
    match value {
        Value::Str(s) => s,
        other => unreachable!("expected Str, got {}", other.kind()),
    }
}
