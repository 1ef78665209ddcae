use crate::error::{Error, ModelResult};
use error_stack::{ResultExt, report};
use reqwest::{Response, Url};
use serde_json::value::Value;
use tracing::warn;

/// Flattens a JSON object into `(key, value)` pairs sorted by key.
///
/// `null` members are dropped, strings are taken verbatim and every other
/// value uses its JSON text, so numbers keep their exact literal.
///
/// # Errors
///
/// Returns `Error::ParseError` if `value` is not a JSON object.
pub fn value_to_sorted_pairs(value: &Value) -> ModelResult<Vec<(String, String)>> {
    let mut pairs: Vec<(String, String)> = match value {
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !matches!(v, Value::Null))
            .map(|(k, v)| {
                let value_str = match v {
                    Value::String(s) => s.to_string(),
                    _ => v.to_string(),
                };
                (k.clone(), value_str)
            })
            .collect(),
        _ => {
            return Err(report!(Error::ParseError)
                .attach_printable(format!("Invalid JSON Object: {value:?}")));
        }
    };

    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(pairs)
}

/// Builds `base` + sorted, form-encoded query taken from a JSON object.
pub fn url_with_sorted_query(base: &str, query: &Value) -> ModelResult<Url> {
    let mut url = Url::parse(base)
        .change_context(Error::ParseError)
        .attach_printable_lazy(|| format!("Invalid upstream URL: {base}"))?;

    let pairs = value_to_sorted_pairs(query)?;
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    Ok(url)
}

/// Reads an upstream body as untyped JSON.
///
/// A non-2xx status becomes `Error::UpstreamStatus` carrying the status code
/// and the body, parsed as JSON when possible and as a JSON string otherwise.
pub async fn read_json_response(response: Response) -> ModelResult<Value> {
    let status = response.status();

    let body = response
        .text()
        .await
        .change_context(Error::ReqwestError(
            "Failed to get text from response".to_string(),
        ))?;

    if !status.is_success() {
        warn!(status = status.as_u16(), body = %body, "Upstream returned an error status");
        let details = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).unwrap_or(Value::String(body))
        };
        return Err(report!(Error::UpstreamStatus {
            status: status.as_u16(),
            details,
        }));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body)
        .change_context(Error::SerdeDeserialize(
            "Failed to deserialize JSON".to_string(),
        ))
        .attach_printable_lazy(|| format!("status: {status}"))
}
