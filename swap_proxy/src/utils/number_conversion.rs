use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

/// Reads a JSON number or numeric string as a decimal.
pub fn value_to_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Multiplies `value` by `10^-exponent` and converts to `f64`.
pub fn scale_down_to_f64(value: Decimal, exponent: u32) -> Option<f64> {
    let divisor = Decimal::from_i128_with_scale(10i128.checked_pow(exponent)?, 0);
    value.checked_div(divisor)?.to_f64()
}
