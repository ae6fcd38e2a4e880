//! The numeric tower: promotion rules for `+`, `-`, `*`, and comparison
//! across `Int`, `BigInt`, and `Float` (§4.1).

use crate::bigint::BigInt;
use crate::error::{Traced, WispError, WispResult};
use crate::value::Value;
use std::cmp::Ordering;

fn not_a_number(v: &Value) -> Traced {
    Traced::untraced(WispError::type_mismatch("number", v.clone()))
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Int(n) => Some(*n as f64),
        Value::BigInt(b) => Some(b.to_string().parse().ok()?),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn as_bigint(v: &Value) -> Option<BigInt> {
    match v {
        Value::Int(n) => Some(BigInt::from_i64(*n as i64)),
        Value::BigInt(b) => Some(b.clone()),
        _ => None,
    }
}

/// Demote a `BigInt` result to `Int` when it fits (step 3 of §4.1).
fn normalize_big(big: BigInt) -> Value {
    match big.to_i32() {
        Some(n) => Value::Int(n),
        None => Value::BigInt(big),
    }
}

enum Op {
    Add,
    Sub,
    Mul,
}

fn apply(op: Op, a: &Value, b: &Value) -> WispResult<Value> {
    if let (Value::Int(x), Value::Int(y)) = (a, b) {
        let (x, y) = (*x as i64, *y as i64);
        let wide = match op {
            Op::Add => x + y,
            Op::Sub => x - y,
            Op::Mul => x * y,
        };
        return Ok(match i32::try_from(wide) {
            Ok(n) => Value::Int(n),
            Err(_) => Value::BigInt(BigInt::from_i64(wide)),
        });
    }
    if matches!(a, Value::Float(_)) || matches!(b, Value::Float(_)) {
        let (x, y) = (
            as_f64(a).ok_or_else(|| not_a_number(a))?,
            as_f64(b).ok_or_else(|| not_a_number(b))?,
        );
        return Ok(Value::Float(match op {
            Op::Add => x + y,
            Op::Sub => x - y,
            Op::Mul => x * y,
        }));
    }
    let (x, y) = (
        as_bigint(a).ok_or_else(|| not_a_number(a))?,
        as_bigint(b).ok_or_else(|| not_a_number(b))?,
    );
    let result = match op {
        Op::Add => x.add(&y),
        Op::Sub => x.sub(&y),
        Op::Mul => x.mul(&y),
    };
    Ok(normalize_big(result))
}

pub fn add(a: &Value, b: &Value) -> WispResult<Value> {
    apply(Op::Add, a, b)
}

pub fn subtract(a: &Value, b: &Value) -> WispResult<Value> {
    apply(Op::Sub, a, b)
}

pub fn multiply(a: &Value, b: &Value) -> WispResult<Value> {
    apply(Op::Mul, a, b)
}

/// Returns -1/0/+1. Float comparisons involving NaN fall back to an
/// arbitrary but consistent ordering (`partial_cmp` then `Equal`) rather
/// than panicking — NaN behavior is unspecified (§4.1).
pub fn compare(a: &Value, b: &Value) -> WispResult<i32> {
    let ordering = if let (Value::Int(x), Value::Int(y)) = (a, b) {
        x.cmp(y)
    } else if matches!(a, Value::Float(_)) || matches!(b, Value::Float(_)) {
        let (x, y) = (
            as_f64(a).ok_or_else(|| not_a_number(a))?,
            as_f64(b).ok_or_else(|| not_a_number(b))?,
        );
        x.partial_cmp(&y).unwrap_or(Ordering::Equal)
    } else {
        let (x, y) = (
            as_bigint(a).ok_or_else(|| not_a_number(a))?,
            as_bigint(b).ok_or_else(|| not_a_number(b))?,
        );
        x.compare(&y)
    };
    Ok(match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    })
}

pub fn is_number(v: &Value) -> bool {
    matches!(v, Value::Int(_) | Value::BigInt(_) | Value::Float(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_overflow_promotes_to_bigint() {
        let a = Value::Int(i32::MAX);
        let b = Value::Int(1);
        let sum = add(&a, &b).unwrap();
        assert!(matches!(sum, Value::BigInt(_)));
    }

    #[test]
    fn int_arithmetic_that_fits_stays_int() {
        let sum = add(&Value::Int(2), &Value::Int(3)).unwrap();
        assert_eq!(sum, Value::Int(5));
    }

    #[test]
    fn any_float_operand_promotes_the_result_to_float() {
        let sum = add(&Value::Int(2), &Value::Float(0.5)).unwrap();
        assert_eq!(sum, Value::Float(2.5));
    }

    #[test]
    fn bigint_result_that_fits_demotes_back_to_int() {
        let big = Value::BigInt(BigInt::from_i64(10));
        let sum = subtract(&big, &Value::Int(9)).unwrap();
        assert_eq!(sum, Value::Int(1));
    }

    #[test]
    fn compare_orders_mixed_int_and_bigint() {
        let big = Value::BigInt(BigInt::from_i64(1_000_000_000_000));
        assert_eq!(compare(&Value::Int(1), &big).unwrap(), -1);
    }

    #[test]
    fn multiply_widens_two_large_ints() {
        let a = Value::Int(i32::MAX);
        let product = multiply(&a, &Value::Int(2)).unwrap();
        assert!(matches!(product, Value::BigInt(_)));
    }
}
