//! Recursive merging of JSON cell blocks.

use serde_json::Value;

/// Merge `overlay` on top of `base`.
///
/// Objects merge key by key, recursively. Any other overlay value,
/// including arrays and `null`, replaces the base value.
///
/// ```
/// use epicell_config::deep_merge;
/// use serde_json::json;
///
/// let merged = deep_merge(
///     &json!({ "model": "seir", "config": { "beta": 0.5, "sigma": 0.2 } }),
///     &json!({ "config": { "beta": 0.9 } }),
/// );
/// assert_eq!(merged, json!({ "model": "seir", "config": { "beta": 0.9, "sigma": 0.2 } }));
/// ```
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(b), Value::Object(o)) => {
            let mut out = b.clone();
            for (key, value) in o {
                let merged = match out.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                out.insert(key.clone(), merged);
            }
            Value::Object(out)
        }
        _ => overlay.clone(),
    }
}
