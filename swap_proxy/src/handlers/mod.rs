pub mod bridge;
pub mod chart;
pub mod history;
pub mod public;
pub mod swap;

use std::collections::HashMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use error_stack::{Report, report};
use serde::Serialize;
use serde_json::Value;
use swap_models::error::Error as ModelError;
use swap_models::models::params::ParamBag;
use tracing::debug;

use crate::error::{ApiError, Error, ProxyResult};
use crate::utils::json::stringify_unsafe_integers;

pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn query_params(query: HashMap<String, String>) -> ParamBag {
    ParamBag::from_query(query)
}

/// A request without a JSON content type counts as an empty body, so the
/// missing-field check reports it. Bodies over the size cap answer 413.
pub fn body_params(body: Result<Json<Value>, JsonRejection>) -> ProxyResult<ParamBag> {
    match body {
        Ok(Json(value)) => ParamBag::from_json(&value).map_err(|report| {
            let message = match report.current_context() {
                ModelError::InvalidParameter(message) => message.clone(),
                other => other.to_string(),
            };
            report.change_context(Error::InvalidParameter(message))
        }),
        Err(JsonRejection::MissingJsonContentType(_)) => {
            debug!("Request body has no JSON content type");
            Ok(ParamBag::default())
        }
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(report!(Error::PayloadTooLarge).attach_printable(rejection.body_text()))
        }
        Err(rejection) => Err(report!(Error::InvalidParameter(
            "request body is not valid JSON".to_string()
        ))
        .attach_printable(rejection.body_text())),
    }
}

/// Serializes `value` and rewrites integers JavaScript clients cannot hold.
pub fn normalized_json<T: Serialize>(value: T) -> ApiResult<Value> {
    let value = serde_json::to_value(value).map_err(|e| {
        Report::new(e).change_context(Error::ServerError(
            "failed to encode response".to_string(),
        ))
    })?;

    Ok(Json(stringify_unsafe_integers(value)))
}
