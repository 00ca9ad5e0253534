//! Setting values and the equality/merge primitives shared by the resolver,
//! the writer and the loader.
//!
//! Setting values are opaque JSON values. Two values are considered equal when
//! they are structurally equal: object key order is ignored and numbers compare
//! by numeric value (`1` equals `1.0`).

use serde_json::{Number, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Flat mapping from dotted setting key to opaque value.
pub type Settings = BTreeMap<String, Value>;

/// Duplicate-free, order-irrelevant set of component identifiers.
pub type Components = BTreeSet<String>;

/// Structural equality over setting values.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| values_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, l)| y.get(key).is_some_and(|r| values_equal(l, r)))
        }
        _ => a == b,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    match (integer_value(x), integer_value(y)) {
        (Some(a), Some(b)) => a == b,
        (Some(i), None) => y.as_f64().is_some_and(|f| float_is_integer(f, i)),
        (None, Some(i)) => x.as_f64().is_some_and(|f| float_is_integer(f, i)),
        (None, None) => x.as_f64() == y.as_f64(),
    }
}

fn integer_value(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Exact comparison; no rounding of `i` through `f64`.
fn float_is_integer(f: f64, i: i128) -> bool {
    f.fract() == 0.0 && f as i128 == i
}

/// Shallow key-for-key override: every key in `overlay` replaces the same key
/// in `base`. Object values are replaced whole, never merged recursively.
pub fn override_merge(base: &mut Settings, overlay: &Settings) {
    for (key, value) in overlay {
        base.insert(key.clone(), value.clone());
    }
}

/// Every dotted prefix of a setting key, shortest first.
///
/// `"editor.font.size"` yields `"editor"`, `"editor.font"`, `"editor.font.size"`.
pub fn key_paths(key: &str) -> impl Iterator<Item = &str> {
    key.match_indices('.')
        .map(move |(idx, _)| &key[..idx])
        .chain(std::iter::once(key))
}

/// True when `key` or any of its dotted prefixes is in `ignored`.
pub fn key_is_ignored(key: &str, ignored: &BTreeSet<String>) -> bool {
    !ignored.is_empty() && key_paths(key).any(|path| ignored.contains(path))
}
