use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use error_stack::{AttachmentKind, FrameKind, Report};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use swap_models::error::{Error as ModelError, join_chain_ids};
use swap_models::models::responses::ErrorBody;
use thiserror::Error;
use tracing::{error, warn};

use crate::routers::UpstreamOperation;

pub type ProxyResult<T> = Result<T, Report<Error>>;

/// Where a missing field was expected; only changes the wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamLocation {
    Query,
    Body,
    Any,
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query parameters"),
            Self::Body => write!(f, "body parameters"),
            Self::Any => write!(f, "parameters"),
        }
    }
}

#[derive(Error, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Error {
    #[error("Missing required {location}")]
    MissingParameter {
        location: ParamLocation,
        fields: Vec<String>,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error(
        "Unsupported network: {chain_id}. Supported networks: {}",
        join_chain_ids(.supported)
    )]
    UnsupportedChain { chain_id: u32, supported: Vec<u32> },

    #[error("{} API Error", .operation.label())]
    UpstreamError {
        operation: UpstreamOperation,
        status: u16,
        details: Value,
    },

    #[error("{}", .operation.failure_message())]
    InternalError {
        operation: UpstreamOperation,
        message: String,
    },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),
}

impl Error {
    /// Lifts a model-layer failure into the proxy taxonomy.
    pub fn from_model(error: &ModelError, operation: UpstreamOperation) -> Self {
        match error {
            ModelError::UnsupportedChain {
                chain_id,
                supported,
            } => Self::UnsupportedChain {
                chain_id: *chain_id,
                supported: supported.clone(),
            },
            ModelError::InvalidParameter(message) => Self::InvalidParameter(message.clone()),
            ModelError::UpstreamStatus { status, details } => Self::UpstreamError {
                operation,
                status: *status,
                details: details.clone(),
            },
            ModelError::ParseError
            | ModelError::RegistryError(_)
            | ModelError::ReqwestError(_)
            | ModelError::SerdeDeserialize(_) => Self::InternalError {
                operation,
                message: error.to_string(),
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter { .. }
            | Self::InvalidParameter(_)
            | Self::UnsupportedChain { .. } => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UpstreamError { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::InternalError { .. } | Self::ConfigError(_) | Self::ServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        match self {
            Self::MissingParameter { fields, .. } => {
                ErrorBody::with_details(self.to_string(), json!(fields))
            }
            Self::InvalidParameter(_) | Self::PayloadTooLarge => ErrorBody::new(self.to_string()),
            Self::UnsupportedChain {
                chain_id,
                supported,
            } => ErrorBody::with_details(
                self.to_string(),
                json!({ "chainId": chain_id, "supportedChainIds": supported }),
            ),
            Self::UpstreamError { details, .. } => {
                ErrorBody::with_details(self.to_string(), details.clone())
            }
            Self::InternalError { message, .. } => {
                ErrorBody::with_details(self.to_string(), Value::String(message.clone()))
            }
            Self::ConfigError(_) | Self::ServerError(_) => {
                ErrorBody::new("Internal Server Error")
            }
        }
    }
}

/// Maps `Report<swap_models::Error>` into `Report<Error>` for one operation.
pub trait ModelResultExt<T> {
    fn for_operation(self, operation: UpstreamOperation) -> ProxyResult<T>;
}

impl<T> ModelResultExt<T> for Result<T, Report<ModelError>> {
    fn for_operation(self, operation: UpstreamOperation) -> ProxyResult<T> {
        self.map_err(|report| {
            let context = Error::from_model(report.current_context(), operation);
            report.change_context(context)
        })
    }
}

pub trait ReportDisplayExt {
    fn format(&self) -> String;
}

impl ReportDisplayExt for Report<Error> {
    fn format(&self) -> String {
        let mut output = String::new();

        for frame in self.current_frames() {
            if let FrameKind::Attachment(AttachmentKind::Printable(attachment)) = frame.kind() {
                output.push_str(&format!(" {attachment} "));
            }
        }

        output.trim().to_string()
    }
}

/// Handler error: the caller sees the classified body, operators see the report.
#[derive(Debug)]
pub struct ApiError(pub Report<Error>);

impl From<Report<Error>> for ApiError {
    fn from(report: Report<Error>) -> Self {
        Self(report)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let context = self.0.current_context();
        let status = context.status_code();

        if status.is_server_error() {
            error!(status = status.as_u16(), report = ?self.0, "Request failed");
        } else {
            warn!(
                status = status.as_u16(),
                error = %context,
                detail = %self.0.format(),
                "Request rejected"
            );
        }

        (status, Json(context.to_body())).into_response()
    }
}
