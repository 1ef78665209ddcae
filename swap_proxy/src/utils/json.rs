use serde_json::{Map, Number, Value};

/// Largest integer a JSON consumer using doubles can hold exactly.
const MAX_SAFE_INTEGER: &str = "9007199254740991";

/// Recursively rewrite integers above `2^53 - 1` in magnitude as decimal strings.
///
/// Smaller integers and non-integers stay numbers. Relies on
/// `arbitrary_precision`, so the literal text is the exact upstream value.
pub fn stringify_unsafe_integers(value: Value) -> Value {
    match value {
        Value::Number(n) => {
            if exceeds_safe_integer(&n) {
                Value::String(n.to_string())
            } else {
                Value::Number(n)
            }
        }
        Value::Array(arr) => {
            let new_arr = arr.into_iter().map(stringify_unsafe_integers).collect();
            Value::Array(new_arr)
        }
        Value::Object(obj) => {
            let new_obj: Map<String, Value> = obj
                .into_iter()
                .map(|(k, v)| (k, stringify_unsafe_integers(v)))
                .collect();
            Value::Object(new_obj)
        }
        other => other,
    }
}

fn exceeds_safe_integer(n: &Number) -> bool {
    let literal = n.to_string();
    let digits = literal.strip_prefix('-').unwrap_or(&literal);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits = digits.trim_start_matches('0');
    // Equal-length digit strings compare like the numbers they spell.
    digits.len() > MAX_SAFE_INTEGER.len()
        || (digits.len() == MAX_SAFE_INTEGER.len() && digits > MAX_SAFE_INTEGER)
}
