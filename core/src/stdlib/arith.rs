//! Arithmetic operators.

use super::{boolean, finish, float, int, number, string};
use crate::{
    descriptor::Descriptor,
    errors::RuntimeError,
    values::{EcoString, KindSet, Value},
};

/// Addition over numbers, booleans (logical or) and strings (concatenation).
///
/// Candidates, in order:
///
/// | # | name              | operands       |                                   |
/// |---|-------------------|----------------|-----------------------------------|
/// | 0 | `add_int`         | `Int, Int`     | guarded: no overflow              |
/// | 1 | `add_int_wrapping`| `Int, Int`     |                                   |
/// | 2 | `add_float`       | `Float, Float` |                                   |
/// | 3 | `add_int_float`   | `Int, Float`   |                                   |
/// | 4 | `add_float_int`   | `Float, Int`   |                                   |
/// | 5 | `add_bool`        | `Bool, Bool`   |                                   |
/// | 6 | `add_str`         | `Str, Str`     |                                   |
pub fn add() -> Descriptor {
    finish(
        Descriptor::builder("add", 2)
            .candidate("add_int", [KindSet::INT, KindSet::INT], |v, _| {
                Ok(Value::Int(int(&v[0]).wrapping_add(int(&v[1]))))
            })
            .guard(|v| int(&v[0]).checked_add(int(&v[1])).is_some())
            .candidate("add_int_wrapping", [KindSet::INT, KindSet::INT], |v, _| {
                Ok(Value::Int(int(&v[0]).wrapping_add(int(&v[1]))))
            })
            .candidate("add_float", [KindSet::FLOAT, KindSet::FLOAT], |v, _| {
                Ok(Value::Float(float(&v[0]) + float(&v[1])))
            })
            .candidate("add_int_float", [KindSet::INT, KindSet::FLOAT], |v, _| {
                Ok(Value::Float(number(&v[0]) + float(&v[1])))
            })
            .candidate("add_float_int", [KindSet::FLOAT, KindSet::INT], |v, _| {
                Ok(Value::Float(float(&v[0]) + number(&v[1])))
            })
            .candidate("add_bool", [KindSet::BOOL, KindSet::BOOL], |v, _| {
                Ok(Value::Bool(boolean(&v[0]) || boolean(&v[1])))
            })
            .candidate("add_str", [KindSet::STR, KindSet::STR], |v, _| {
                let mut out = EcoString::from(string(&v[0]).as_str());
                out.push_str(string(&v[1]));
                Ok(Value::Str(out))
            }),
    )
}

pub fn sub() -> Descriptor {
    finish(
        Descriptor::builder("sub", 2)
            .candidate("sub_int", [KindSet::INT, KindSet::INT], |v, _| {
                Ok(Value::Int(int(&v[0]).wrapping_sub(int(&v[1]))))
            })
            .candidate("sub_float", [KindSet::FLOAT, KindSet::FLOAT], |v, _| {
                Ok(Value::Float(float(&v[0]) - float(&v[1])))
            }),
    )
}

pub fn mul() -> Descriptor {
    finish(
        Descriptor::builder("mul", 2)
            .candidate("mul_int", [KindSet::INT, KindSet::INT], |v, _| {
                Ok(Value::Int(int(&v[0]).wrapping_mul(int(&v[1]))))
            })
            .candidate("mul_float", [KindSet::FLOAT, KindSet::FLOAT], |v, _| {
                Ok(Value::Float(float(&v[0]) * float(&v[1])))
            }),
    )
}

/// Division. Integer division by zero is a [`RuntimeError::DivisionByZero`];
/// float division follows IEEE 754.
pub fn div() -> Descriptor {
    finish(
        Descriptor::builder("div", 2)
            .candidate("div_int", [KindSet::INT, KindSet::INT], |v, _| {
                let (left, right) = (int(&v[0]), int(&v[1]));
                if right == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                // i64::MIN / -1 wraps
                Ok(Value::Int(left.wrapping_div(right)))
            })
            .candidate("div_float", [KindSet::FLOAT, KindSet::FLOAT], |v, _| {
                Ok(Value::Float(float(&v[0]) / float(&v[1])))
            }),
    )
}

/// Unary negation.
pub fn neg() -> Descriptor {
    finish(
        Descriptor::builder("neg", 1)
            .candidate("neg_int", [KindSet::INT], |v, _| {
                Ok(Value::Int(int(&v[0]).wrapping_neg()))
            })
            .guard(|v| int(&v[0]).checked_neg().is_some())
            .candidate("neg_int_wrapping", [KindSet::INT], |v, _| {
                Ok(Value::Int(int(&v[0]).wrapping_neg()))
            })
            .candidate("neg_float", [KindSet::FLOAT], |v, _| {
                Ok(Value::Float(-float(&v[0])))
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExecutionError;

    fn run(descriptor: &Descriptor, values: &[Value]) -> Result<Value, ExecutionError> {
        descriptor.execute_generic(values, None)
    }

    #[test]
    fn test_int_add() {
        let add = add();
        assert_eq!(run(&add, &[Value::Int(2), Value::Int(3)]), Ok(Value::Int(5)));
        assert_eq!(run(&add, &[Value::Int(-5), Value::Int(3)]), Ok(Value::Int(-2)));
    }

    #[test]
    fn test_int_add_wraps_on_overflow() {
        let add = add();
        let values = [Value::Int(i64::MAX), Value::Int(1)];
        assert!(!add.candidates()[0].accepts(&values));
        assert_eq!(run(&add, &values), Ok(Value::Int(i64::MIN)));
    }

    #[test]
    fn test_mixed_add_is_float() {
        let add = add();
        assert_eq!(
            run(&add, &[Value::Int(1), Value::Float(0.5)]),
            Ok(Value::Float(1.5))
        );
        assert_eq!(
            run(&add, &[Value::Float(0.5), Value::Int(1)]),
            Ok(Value::Float(1.5))
        );
    }

    #[test]
    fn test_bool_and_str_add() {
        let add = add();
        assert_eq!(
            run(&add, &[Value::Bool(true), Value::Bool(false)]),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            run(&add, &[Value::Bool(false), Value::Bool(false)]),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            run(&add, &[Value::str("foo"), Value::str("bar")]),
            Ok(Value::str("foobar"))
        );
    }

    #[test]
    fn test_add_rejects_mixed_str() {
        let err = run(&add(), &[Value::str("a"), Value::Int(1)]).unwrap_err();
        assert!(matches!(err, ExecutionError::UnsupportedOperands { .. }));
    }

    #[test]
    fn test_int_sub_and_mul() {
        assert_eq!(run(&sub(), &[Value::Int(3), Value::Int(10)]), Ok(Value::Int(-7)));
        assert_eq!(run(&mul(), &[Value::Int(-2), Value::Int(5)]), Ok(Value::Int(-10)));
        assert_eq!(
            run(&mul(), &[Value::Int(i64::MAX), Value::Int(2)]),
            Ok(Value::Int(-2))
        );
    }

    #[test]
    fn test_int_div() {
        let div = div();
        assert_eq!(run(&div, &[Value::Int(7), Value::Int(3)]), Ok(Value::Int(2)));
        assert_eq!(
            run(&div, &[Value::Int(i64::MIN), Value::Int(-1)]),
            Ok(Value::Int(i64::MIN))
        );
    }

    #[test]
    fn test_int_div_by_zero() {
        let result = run(&div(), &[Value::Int(10), Value::Int(0)]);
        assert_eq!(
            result,
            Err(ExecutionError::Runtime(RuntimeError::DivisionByZero))
        );
    }

    #[test]
    fn test_float_div_by_zero() {
        let result = run(&div(), &[Value::Float(10.0), Value::Float(0.0)]).unwrap();
        let x = result.as_float().unwrap();
        assert!(x.is_infinite() && x.is_sign_positive());
    }

    #[test]
    fn test_neg() {
        let neg = neg();
        assert_eq!(run(&neg, &[Value::Int(5)]), Ok(Value::Int(-5)));
        assert_eq!(run(&neg, &[Value::Float(1.5)]), Ok(Value::Float(-1.5)));
        assert_eq!(run(&neg, &[Value::Int(i64::MIN)]), Ok(Value::Int(i64::MIN)));
        assert_eq!(neg.index_of("neg_int_wrapping").map(|i| i.index()), Some(1));
    }
}
