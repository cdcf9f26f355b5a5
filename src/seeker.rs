//! Depth-first extraction of values by key from nested JSON
//!
//! Objects and arrays are both treated as composites whose members are
//! visited; array members are addressed by their decimal index. The walk
//! uses an explicit stack, so the visitation order is last-pushed-first:
//! the last member of a composite is explored before its earlier siblings.
//!
//! Object members are pushed in insertion order. JavaScript enumerates
//! integer-like property names first, in ascending order, so a JS walk over
//! `{"b": {..}, "1": {..}}` visits the children in the opposite order.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// Values found per requested key, in request order
pub type Extraction<'a> = IndexMap<String, Vec<&'a Value>>;

/// Collect every value stored under any of `keys`, at any depth of `root`.
///
/// The result holds exactly one entry per distinct key, in order of first
/// occurrence, even when nothing matched. If `root` is not an object or an
/// array the result is empty.
///
/// A key listed more than once is looked up once, so each match appears a
/// single time. The JavaScript `XSeeker` records it once per duplicate.
///
/// # Example
///
/// ```
/// use serde_json::json;
///
/// let data = json!({ "a": 1, "b": { "a": 2 } });
/// let found = xknife::seeker::extract(&data, &["a", "z"]);
///
/// assert_eq!(found["a"], vec![&json!(1), &json!(2)]);
/// assert!(found["z"].is_empty());
/// ```
pub fn extract<'a, K: AsRef<str>>(root: &'a Value, keys: &[K]) -> Extraction<'a> {
    if !is_composite(root) {
        debug!("Extraction root is not an object or array");
        return Extraction::new();
    }

    let mut result = Extraction::new();
    for key in keys {
        result.entry(key.as_ref().to_owned()).or_default();
    }

    let mut stack = vec![root];
    let mut visited = 0usize;

    while let Some(current) = stack.pop() {
        visited += 1;

        for (key, values) in result.iter_mut() {
            if let Some(value) = member(current, key) {
                values.push(value);
            }
        }

        match current {
            Value::Object(map) => stack.extend(map.values().filter(|v| is_composite(v))),
            Value::Array(items) => stack.extend(items.iter().filter(|v| is_composite(v))),
            _ => {}
        }
    }

    debug!(
        visited,
        matched = result.values().map(Vec::len).sum::<usize>(),
        "Extracted values by key"
    );
    result
}

/// Like [`extract`], taking the key list as a JSON value.
///
/// Returns an empty result if `keys` is not an array. Strings are used as
/// is; numbers, booleans and `null` are matched by their JSON text, so `0`
/// addresses the first element of an array. Nested objects and arrays in
/// the key list are skipped.
pub fn extract_json<'a>(root: &'a Value, keys: &Value) -> Extraction<'a> {
    let Value::Array(items) = keys else {
        debug!("Extraction keys are not an array");
        return Extraction::new();
    };

    let keys: Vec<String> = items.iter().filter_map(property_key).collect();
    extract(root, &keys)
}

fn property_key(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn is_composite(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Direct member of a composite under `key`
fn member<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => array_index(key).and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Parse a canonical decimal array index ("0", "17"; not "01" or "+1")
fn array_index(key: &str) -> Option<usize> {
    let canonical = key == "0" || (!key.starts_with('0') && key.bytes().all(|b| b.is_ascii_digit()));
    if !canonical {
        return None;
    }
    key.parse().ok()
}
