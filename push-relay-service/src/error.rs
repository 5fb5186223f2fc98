use actix_web::http::StatusCode;
use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use fcm_shared::FcmError;

/// Relay-level errors, the single source of truth for HTTP status codes
/// and error bodies. Nothing propagates past a handler unconverted.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Firebase is not initialized. Check server configuration.")]
    NotReady,

    #[error("{}", provider_message(.0))]
    Provider(#[from] FcmError),

    #[error("Failed to send bulk notifications")]
    BulkSend(#[source] FcmError),
}

fn provider_message(err: &FcmError) -> String {
    match err {
        FcmError::Unregistered => {
            "Device token is not registered (app may be uninstalled)".to_string()
        }
        FcmError::InvalidToken => "Invalid device token format".to_string(),
        FcmError::InvalidArgument(_) => "Invalid message format".to_string(),
        FcmError::Unauthenticated(_) | FcmError::Credentials(_) => {
            "Authentication error with push service".to_string()
        }
        other => format!("Failed to send notification: {other}"),
    }
}

impl RelayError {
    fn error_code(&self) -> Option<String> {
        match self {
            RelayError::Provider(e) | RelayError::BulkSend(e) => Some(e.code().to_string()),
            _ => None,
        }
    }

    fn missing_fields(&self) -> Option<Vec<String>> {
        match self {
            RelayError::MissingFields(fields) => {
                Some(fields.iter().map(|f| f.to_string()).collect())
            }
            _ => None,
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingFields(_) => StatusCode::BAD_REQUEST,
            RelayError::NotReady => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Provider(e) => match e {
                FcmError::Unregistered => StatusCode::NOT_FOUND,
                FcmError::InvalidToken | FcmError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
                FcmError::Unauthenticated(_) | FcmError::Credentials(_) => {
                    StatusCode::UNAUTHORIZED
                }
                FcmError::Transport(_) | FcmError::Unexpected { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            RelayError::BulkSend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
            error_code: self.error_code(),
            missing_fields: self.missing_fields(),
            timestamp: Utc::now(),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// JSON error body shared by every failure response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            error_code: None,
            missing_fields: None,
            timestamp: Utc::now(),
        }
    }
}

/// Malformed JSON bodies also get the standard error shape.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorBody::new(format!("Invalid JSON payload: {err}"));
    actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_map_to_400_and_list_the_fields() {
        let err = RelayError::MissingFields(vec!["targetToken", "title"]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Missing required fields: targetToken, title"
        );
        assert_eq!(
            err.missing_fields(),
            Some(vec!["targetToken".to_string(), "title".to_string()])
        );
    }

    #[test]
    fn not_ready_maps_to_500() {
        let err = RelayError::NotReady;
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("not initialized"));
    }

    #[test]
    fn provider_taxonomy_maps_to_documented_statuses() {
        let cases: Vec<(FcmError, StatusCode, &str)> = vec![
            (
                FcmError::Unregistered,
                StatusCode::NOT_FOUND,
                "Device token is not registered (app may be uninstalled)",
            ),
            (
                FcmError::InvalidToken,
                StatusCode::BAD_REQUEST,
                "Invalid device token format",
            ),
            (
                FcmError::InvalidArgument("bad payload".into()),
                StatusCode::BAD_REQUEST,
                "Invalid message format",
            ),
            (
                FcmError::Unauthenticated("expired".into()),
                StatusCode::UNAUTHORIZED,
                "Authentication error with push service",
            ),
        ];

        for (fcm_err, status, message) in cases {
            let err = RelayError::Provider(fcm_err);
            assert_eq!(err.status_code(), status);
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn unknown_provider_errors_map_to_500_with_detail() {
        let err = RelayError::Provider(FcmError::Unexpected {
            code: "QUOTA_EXCEEDED".into(),
            message: "limit reached".into(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Failed to send notification"));
        assert_eq!(err.error_code(), Some("QUOTA_EXCEEDED".to_string()));
    }

    #[test]
    fn provider_errors_carry_the_raw_code() {
        let err = RelayError::Provider(FcmError::Unregistered);
        assert_eq!(
            err.error_code(),
            Some("messaging/registration-token-not-registered".to_string())
        );
    }

    #[test]
    fn bulk_failure_is_always_500_and_generic() {
        let err = RelayError::BulkSend(FcmError::Unauthenticated("boom".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to send bulk notifications");
    }
}
