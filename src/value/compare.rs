//! Numeric coercion and three-way comparison
//!
//! Ordering rules:
//! - Null sorts before every non-Null value, Null == Null
//! - Two values that both coerce to a number compare numerically
//! - Anything else compares by canonical string form, byte-wise

use std::cmp::Ordering;

use super::value::Value;

/// Coerces a value to `f64`.
///
/// Integers and floats always succeed. Text succeeds only when the whole
/// string parses as a float; there is no prefix parsing.
pub fn to_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(x) => Some(*x),
        Value::Text(s) => s.parse::<f64>().ok(),
        Value::Null | Value::Boolean(_) => None,
    }
}

/// Three-way comparison shared by WHERE, ORDER BY and MIN/MAX.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        // Exact path for integers, f64 loses precision past 2^53
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        _ => {
            if let (Some(x), Some(y)) = (to_numeric(a), to_numeric(b)) {
                if let Some(ordering) = x.partial_cmp(&y) {
                    return ordering;
                }
            }
            compare_text(a, b)
        }
    }
}

fn compare_text(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Text(x), Value::Text(y)) => x.as_bytes().cmp(y.as_bytes()),
        _ => a.to_string().as_bytes().cmp(b.to_string().as_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_numeric_direct() {
        assert_eq!(to_numeric(&Value::Integer(4)), Some(4.0));
        assert_eq!(to_numeric(&Value::Float(1.25)), Some(1.25));
    }

    #[test]
    fn test_to_numeric_text_must_parse_fully() {
        assert_eq!(to_numeric(&Value::from("3.5")), Some(3.5));
        assert_eq!(to_numeric(&Value::from("-7")), Some(-7.0));
        assert_eq!(to_numeric(&Value::from("12abc")), None);
        assert_eq!(to_numeric(&Value::from("")), None);
        assert_eq!(to_numeric(&Value::from(" 1")), None);
    }

    #[test]
    fn test_to_numeric_rejects_null_and_bool() {
        assert_eq!(to_numeric(&Value::Null), None);
        assert_eq!(to_numeric(&Value::Boolean(true)), None);
    }

    #[test]
    fn test_null_sorts_first() {
        assert_eq!(compare(&Value::Null, &Value::Null), Ordering::Equal);
        assert_eq!(compare(&Value::Null, &Value::Integer(-100)), Ordering::Less);
        assert_eq!(compare(&Value::from(""), &Value::Null), Ordering::Greater);
    }

    #[test]
    fn test_numeric_across_types() {
        assert_eq!(compare(&Value::Integer(10), &Value::Float(9.5)), Ordering::Greater);
        assert_eq!(compare(&Value::from("10"), &Value::Integer(9)), Ordering::Greater);
        assert_eq!(compare(&Value::Float(3.0), &Value::Integer(3)), Ordering::Equal);
    }

    #[test]
    fn test_numeric_text_is_not_lexical() {
        // "9" < "10" numerically even though "9" > "10" byte-wise
        assert_eq!(compare(&Value::from("9"), &Value::from("10")), Ordering::Less);
    }

    #[test]
    fn test_large_integers_exact() {
        let a = Value::Integer(i64::MAX);
        let b = Value::Integer(i64::MAX - 1);
        assert_eq!(compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_string_fallback_is_bytewise() {
        assert_eq!(compare(&Value::from("apple"), &Value::from("banana")), Ordering::Less);
        assert_eq!(compare(&Value::from("B"), &Value::from("a")), Ordering::Less);
        assert_eq!(compare(&Value::from("abc"), &Value::Integer(5)), Ordering::Greater);
        assert_eq!(compare(&Value::Boolean(true), &Value::from("true")), Ordering::Equal);
    }
}
