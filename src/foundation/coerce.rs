//! Loose-to-strict coercion for wire parameter bags.
//!
//! Stroke and script-command parameters arrive as untrusted JSON. Every read
//! goes through these helpers, which never fail: a missing or malformed field
//! yields the caller's fallback, and [`Coerced::defaulted`] records that the
//! fallback fired so tests can assert on it.

use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A coerced value plus whether the fallback was used.
pub struct Coerced<T> {
    /// The parsed or fallback value.
    pub value: T,
    /// `true` when the input was missing or malformed and the fallback won.
    pub defaulted: bool,
}

impl<T> Coerced<T> {
    fn parsed(value: T) -> Self {
        Self {
            value,
            defaulted: false,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            defaulted: true,
        }
    }
}

/// First present, non-null value among `keys` in a params object.
pub(crate) fn field<'a>(params: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| params.get(k))
        .find(|v| !v.is_null())
}

/// Coerce to `f64`: numbers pass through, numeric strings parse, booleans map
/// to 0/1. Non-finite results count as malformed.
pub fn f64_or(raw: Option<&Value>, fallback: f64) -> Coerced<f64> {
    let Some(v) = raw else {
        return Coerced::fallback(fallback);
    };
    let parsed = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    match parsed {
        Some(x) if x.is_finite() => Coerced::parsed(x),
        _ => Coerced::fallback(fallback),
    }
}

/// Coerce to `i64`: integers pass through, floats truncate, integer strings
/// parse, booleans map to 0/1.
pub fn i64_or(raw: Option<&Value>, fallback: i64) -> Coerced<i64> {
    let Some(v) = raw else {
        return Coerced::fallback(fallback);
    };
    let parsed = match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|x| x.is_finite()).map(|x| x as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };
    match parsed {
        Some(x) => Coerced::parsed(x),
        None => Coerced::fallback(fallback),
    }
}

/// Coerce to an owned string: strings clone, numbers and booleans stringify.
pub fn string_or(raw: Option<&Value>, fallback: &str) -> Coerced<String> {
    let Some(v) = raw else {
        return Coerced::fallback(fallback.to_string());
    };
    match v {
        Value::String(s) => Coerced::parsed(s.clone()),
        Value::Number(n) => Coerced::parsed(n.to_string()),
        Value::Bool(b) => Coerced::parsed(b.to_string()),
        _ => Coerced::fallback(fallback.to_string()),
    }
}

/// Coerce to `bool` with JSON truthiness: `false`, `0`, `""`, `[]`, `{}` and
/// `null` are false, everything else present is true.
pub fn bool_or(raw: Option<&Value>, fallback: bool) -> Coerced<bool> {
    let Some(v) = raw else {
        return Coerced::fallback(fallback);
    };
    let truthy = match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null => false,
    };
    Coerced::parsed(truthy)
}
