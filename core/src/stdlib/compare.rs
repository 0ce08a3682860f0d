//! Comparison operators.

use super::{finish, float, int, string};
use crate::{
    descriptor::Descriptor,
    values::{KindSet, Value},
};

/// Equality. Values of different kinds are never equal.
///
/// The last candidate is the type-erased implementation: selecting it turns
/// the node generic straight away.
pub fn eq() -> Descriptor {
    finish(
        Descriptor::builder("eq", 2)
            .candidate("eq_int", [KindSet::INT, KindSet::INT], |v, _| {
                Ok(Value::Bool(int(&v[0]) == int(&v[1])))
            })
            .candidate("eq_float", [KindSet::FLOAT, KindSet::FLOAT], |v, _| {
                Ok(Value::Bool(float(&v[0]) == float(&v[1])))
            })
            .candidate("eq_str", [KindSet::STR, KindSet::STR], |v, _| {
                Ok(Value::Bool(string(&v[0]) == string(&v[1])))
            })
            .candidate("eq_any", [KindSet::ANY, KindSet::ANY], |v, _| {
                Ok(Value::Bool(v[0] == v[1]))
            })
            .generic(),
    )
}

/// Less-than over ints, floats and strings (lexicographic).
pub fn lt() -> Descriptor {
    finish(
        Descriptor::builder("lt", 2)
            .candidate("lt_int", [KindSet::INT, KindSet::INT], |v, _| {
                Ok(Value::Bool(int(&v[0]) < int(&v[1])))
            })
            .candidate("lt_float", [KindSet::FLOAT, KindSet::FLOAT], |v, _| {
                Ok(Value::Bool(float(&v[0]) < float(&v[1])))
            })
            .candidate("lt_str", [KindSet::STR, KindSet::STR], |v, _| {
                Ok(Value::Bool(string(&v[0]) < string(&v[1])))
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq() {
        let eq = eq();
        let check = |a: Value, b: Value| eq.execute_generic(&[a, b], None).unwrap();
        assert_eq!(check(Value::Int(1), Value::Int(1)), Value::Bool(true));
        assert_eq!(check(Value::str("a"), Value::str("b")), Value::Bool(false));
        assert_eq!(check(Value::Int(1), Value::Float(1.0)), Value::Bool(false));
        assert_eq!(check(Value::Bool(true), Value::Bool(true)), Value::Bool(true));
        assert_eq!(
            check(Value::Float(f64::NAN), Value::Float(f64::NAN)),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_eq_any_is_generic() {
        let eq = eq();
        let last = eq.candidates().last().unwrap();
        assert!(last.is_generic());
        assert_eq!(last.name(), "eq_any");
    }

    #[test]
    fn test_lt() {
        let lt = lt();
        let check = |a: Value, b: Value| lt.execute_generic(&[a, b], None).unwrap();
        assert_eq!(check(Value::Int(1), Value::Int(2)), Value::Bool(true));
        assert_eq!(check(Value::Float(2.0), Value::Float(1.0)), Value::Bool(false));
        assert_eq!(check(Value::str("abc"), Value::str("abd")), Value::Bool(true));
    }
}
