//! The fully general implementation of an operation.

use crate::{
    descriptor::Descriptor, environment::Environment, errors::ExecutionError, guards,
    values::Value,
};

/// Run the first candidate that accepts `values` and whose assumptions all
/// still hold. This is the reference semantics every specialized path must
/// agree with.
pub(crate) fn generalize(
    descriptor: &Descriptor,
    values: &[Value],
    environment: Option<&Environment>,
) -> Result<Value, ExecutionError> {
    let candidate = descriptor
        .candidates()
        .iter()
        .find(|c| c.accepts(values) && c.first_invalid_assumption().is_none());

    match candidate {
        Some(candidate) => Ok(candidate.invoke(values, environment)?),
        None => Err(unsupported(descriptor, values)),
    }
}

pub(super) fn unsupported(descriptor: &Descriptor, values: &[Value]) -> ExecutionError {
    ExecutionError::UnsupportedOperands {
        operation: descriptor.name_eco(),
        kinds: guards::observed_kinds(values).into_vec(),
    }
}
