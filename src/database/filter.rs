//! In-memory document filter evaluation.
//!
//! Filters are JSON objects mapping field names to either a literal value
//! (equality) or an operator object: `$ne`, `$in`, `$lt`, `$lte`, `$gt`,
//! `$gte`. Comparisons work on numbers, strings, and booleans; dates are
//! stored as ISO-8601 strings, so lexicographic string order is date order.
//!
//! A missing document field is treated as JSON null, which makes
//! `{"profile_id": null}` match both unset and explicitly-null fields.

use serde_json::Value;
use std::cmp::Ordering;

/// Whether `doc` satisfies every condition in `filter`.
/// An empty (or non-object) filter matches everything.
pub fn matches(doc: &Value, filter: &Value) -> bool {
    let Some(conditions) = filter.as_object() else {
        return true;
    };

    conditions.iter().all(|(field, condition)| {
        let actual = doc.get(field).unwrap_or(&Value::Null);
        matches_condition(actual, condition)
    })
}

fn matches_condition(actual: &Value, condition: &Value) -> bool {
    match condition.as_object() {
        Some(ops) if ops.keys().any(|k| k.starts_with('$')) => {
            ops.iter().all(|(op, operand)| matches_operator(actual, op, operand))
        }
        _ => actual == condition,
    }
}

fn matches_operator(actual: &Value, op: &str, operand: &Value) -> bool {
    match op {
        "$ne" => actual != operand,
        "$in" => operand
            .as_array()
            .map(|candidates| candidates.contains(actual))
            .unwrap_or(false),
        "$lt" => compare(actual, operand) == Some(Ordering::Less),
        "$lte" => matches!(compare(actual, operand), Some(Ordering::Less | Ordering::Equal)),
        "$gt" => compare(actual, operand) == Some(Ordering::Greater),
        "$gte" => matches!(compare(actual, operand), Some(Ordering::Greater | Ordering::Equal)),
        // Unknown operators never match; a typo must not silently widen a query
        _ => false,
    }
}

/// Ordering between two JSON scalars of the same kind, None otherwise.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.as_str().cmp(y.as_str())),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
