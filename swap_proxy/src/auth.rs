use axum::Json;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use subtle::ConstantTimeEq;
use swap_models::models::responses::ErrorBody;
use tracing::warn;

use crate::config::ApiKey;
use crate::state::AppState;

const UNAUTHORIZED: &str = "Unauthorized";
const FORBIDDEN: &str = "Something went wrong, try again or contact POC";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Credential {
    /// No header, wrong scheme or undecodable
    Missing,
    Basic { username: String, password: String },
}

/// Basic auth with an empty username and a shared key as password.
///
/// Passes everything through when no keys are configured.
pub async fn require_shared_key(State(st): State<AppState>, req: Request, next: Next) -> Response {
    if !st.cfg.auth_enabled() {
        return next.run(req).await;
    }

    match basic_credential(req.headers()) {
        Credential::Missing => {
            warn!(path = req.uri().path(), "Missing or malformed authorization header");
            reject(StatusCode::UNAUTHORIZED, UNAUTHORIZED)
        }
        Credential::Basic { username, password } => {
            if username.is_empty() && key_matches(&st.cfg.shared_api_keys, password.trim()) {
                next.run(req).await
            } else {
                warn!(path = req.uri().path(), "Rejected shared key");
                reject(StatusCode::FORBIDDEN, FORBIDDEN)
            }
        }
    }
}

fn basic_credential(headers: &HeaderMap) -> Credential {
    let encoded = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Basic "));
    let Some(encoded) = encoded else {
        return Credential::Missing;
    };

    let decoded = STANDARD
        .decode(encoded.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok());

    let Some(pair) = decoded else {
        return Credential::Missing;
    };

    // Fields after a second colon are ignored.
    let mut fields = pair.split(':');
    match (fields.next(), fields.next()) {
        (Some(username), Some(password)) => Credential::Basic {
            username: username.to_string(),
            password: password.to_string(),
        },
        _ => Credential::Missing,
    }
}

/// Checks every key so timing does not reveal which one matched.
fn key_matches(keys: &[ApiKey], candidate: &str) -> bool {
    keys.iter().fold(false, |found, key| {
        let equal = key.expose().as_bytes().ct_eq(candidate.as_bytes()).unwrap_u8() == 1;
        found | equal
    })
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(authorization).expect("valid header"),
        );
        headers
    }

    #[test]
    fn test_basic_credential() {
        let encoded = STANDARD.encode(":alpha");
        assert_eq!(
            basic_credential(&headers(&format!("Basic {encoded}"))),
            Credential::Basic {
                username: String::new(),
                password: "alpha".to_string(),
            }
        );

        assert_eq!(basic_credential(&HeaderMap::new()), Credential::Missing);
        assert_eq!(basic_credential(&headers("Bearer alpha")), Credential::Missing);
        assert_eq!(basic_credential(&headers("Basic !!!")), Credential::Missing);
        let no_colon = STANDARD.encode("alpha");
        assert_eq!(
            basic_credential(&headers(&format!("Basic {no_colon}"))),
            Credential::Missing
        );
    }

    #[test]
    fn test_basic_credential_ignores_fields_after_second_colon() {
        let encoded = STANDARD.encode(":alpha:extra");
        assert_eq!(
            basic_credential(&headers(&format!("Basic {encoded}"))),
            Credential::Basic {
                username: String::new(),
                password: "alpha".to_string(),
            }
        );

        let encoded = STANDARD.encode("::alpha");
        assert_eq!(
            basic_credential(&headers(&format!("Basic {encoded}"))),
            Credential::Basic {
                username: String::new(),
                password: String::new(),
            }
        );
    }

    #[test]
    fn test_key_matches() {
        let keys = vec![ApiKey::new("alpha"), ApiKey::new("beta")];
        assert!(key_matches(&keys, "beta"));
        assert!(!key_matches(&keys, "gamma"));
        assert!(!key_matches(&keys, ""));
        assert!(!key_matches(&[], "alpha"));
    }
}
