//! Reusable validators for configuration parameters.
//!
//! Each constructor returns a [`ValidatorFn`] suitable for
//! [`ConfigParam::validator`](super::spec::ConfigParam::validator).
//! Validators see the value after type coercion.

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use super::spec::ValidatorFn;

/// Number strictly greater than zero.
pub fn positive() -> ValidatorFn {
    Arc::new(|v| v.as_f64().is_some_and(|n| n > 0.0))
}

/// Number greater than or equal to zero.
pub fn non_negative() -> ValidatorFn {
    Arc::new(|v| v.as_f64().is_some_and(|n| n >= 0.0))
}

/// Integer in the valid TCP/UDP port range (1-65535).
pub fn port_number() -> ValidatorFn {
    Arc::new(|v| v.as_i64().is_some_and(|n| (1..=65535).contains(&n)))
}

/// Number within `[min, max]`, inclusive.
pub fn in_range(min: f64, max: f64) -> ValidatorFn {
    Arc::new(move |v| v.as_f64().is_some_and(|n| n >= min && n <= max))
}

/// Value equal to one of the given candidates.
pub fn one_of(candidates: Vec<Value>) -> ValidatorFn {
    Arc::new(move |v| candidates.contains(v))
}

/// String or list length within `[min, max]`; `max` of `None` means
/// unbounded above.
pub fn length(min: usize, max: Option<usize>) -> ValidatorFn {
    Arc::new(move |v| {
        let len = match v {
            Value::String(s) => s.chars().count(),
            Value::Array(items) => items.len(),
            _ => return false,
        };
        len >= min && max.is_none_or(|m| len <= m)
    })
}

/// String matching the given pattern.
pub fn matches(pattern: Regex) -> ValidatorFn {
    Arc::new(move |v| v.as_str().is_some_and(|s| pattern.is_match(s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_positive() {
        let v = positive();
        assert!(v(&json!(1)));
        assert!(v(&json!(0.5)));
        assert!(!v(&json!(0)));
        assert!(!v(&json!(-2)));
        assert!(!v(&json!("3")));
    }

    #[test]
    fn test_non_negative() {
        let v = non_negative();
        assert!(v(&json!(0)));
        assert!(v(&json!(7)));
        assert!(!v(&json!(-0.1)));
    }

    #[test]
    fn test_port_number() {
        let v = port_number();
        assert!(v(&json!(1)));
        assert!(v(&json!(65535)));
        assert!(!v(&json!(0)));
        assert!(!v(&json!(65536)));
        assert!(!v(&json!(8080.5)));
    }

    #[test]
    fn test_in_range() {
        let v = in_range(1.0, 10.0);
        assert!(v(&json!(1)));
        assert!(v(&json!(10)));
        assert!(!v(&json!(10.01)));
    }

    #[test]
    fn test_one_of() {
        let v = one_of(vec![json!("a"), json!("b")]);
        assert!(v(&json!("a")));
        assert!(!v(&json!("c")));
        assert!(!v(&json!(1)));
    }

    #[test]
    fn test_length() {
        let v = length(1, Some(3));
        assert!(v(&json!("ab")));
        assert!(v(&json!(["x"])));
        assert!(!v(&json!("")));
        assert!(!v(&json!("abcd")));
        assert!(!v(&json!(5)));

        let unbounded = length(2, None);
        assert!(unbounded(&json!("a long string")));
        assert!(!unbounded(&json!("a")));
    }

    #[test]
    fn test_matches() {
        let v = matches(Regex::new(r"^\d{4}$").unwrap());
        assert!(v(&json!("2024")));
        assert!(!v(&json!("24")));
        assert!(!v(&json!(2024)));
    }
}
