use thiserror::Error;

use crate::models::FcmApiError;

/// FCM Client Error Taxonomy
///
/// Closed set of failure kinds the relay distinguishes. Everything the
/// FCM API can report is classified into one of these via [`FcmError::classify`].
#[derive(Error, Debug, Clone)]
pub enum FcmError {
    /// The registration token is no longer valid (app likely uninstalled).
    #[error("device token is not registered")]
    Unregistered,

    /// The registration token itself is malformed.
    #[error("invalid registration token")]
    InvalidToken,

    /// The message payload or arguments were rejected.
    #[error("invalid message: {0}")]
    InvalidArgument(String),

    /// Authentication with FCM failed.
    #[error("authentication error: {0}")]
    Unauthenticated(String),

    /// The service account credential could not be parsed or used for signing.
    #[error("credential error: {0}")]
    Credentials(String),

    /// Request never produced an FCM response.
    #[error("transport error: {0}")]
    Transport(String),

    /// Anything the taxonomy does not recognize.
    #[error("FCM error ({code}): {message}")]
    Unexpected { code: String, message: String },
}

impl FcmError {
    /// Provider error code string, in the `messaging/*` form callers
    /// already key on for diagnostics.
    pub fn code(&self) -> &str {
        match self {
            FcmError::Unregistered => "messaging/registration-token-not-registered",
            FcmError::InvalidToken => "messaging/invalid-registration-token",
            FcmError::InvalidArgument(_) => "messaging/invalid-argument",
            FcmError::Unauthenticated(_) => "messaging/authentication-error",
            FcmError::Credentials(_) => "messaging/invalid-credential",
            FcmError::Transport(_) => "messaging/internal-error",
            FcmError::Unexpected { code, .. } => code,
        }
    }

    /// Classify a non-200 FCM HTTP v1 response.
    ///
    /// The v1 API reports errors as a google.rpc envelope with a `status`
    /// string plus an optional FCM-specific `errorCode` detail; the detail
    /// takes precedence when present.
    pub fn classify(http_status: u16, body: &str) -> FcmError {
        let parsed: Option<FcmApiError> = serde_json::from_str(body).ok();

        let (status, message, detail_code) = match parsed {
            Some(api) => {
                let detail = api
                    .error
                    .details
                    .iter()
                    .find_map(|d| d.error_code.clone());
                (
                    api.error.status.unwrap_or_default(),
                    api.error.message.unwrap_or_default(),
                    detail,
                )
            }
            None => (String::new(), body.to_string(), None),
        };

        let code = detail_code.unwrap_or(status);
        match code.as_str() {
            "UNREGISTERED" => FcmError::Unregistered,
            "INVALID_ARGUMENT" => {
                let lower = message.to_lowercase();
                if lower.contains("token") || lower.contains("registration") {
                    FcmError::InvalidToken
                } else {
                    FcmError::InvalidArgument(message)
                }
            }
            "UNAUTHENTICATED" | "PERMISSION_DENIED" | "THIRD_PARTY_AUTH_ERROR" => {
                FcmError::Unauthenticated(message)
            }
            "" => FcmError::Unexpected {
                code: format!("http-{http_status}"),
                message,
            },
            other => FcmError::Unexpected {
                code: other.to_string(),
                message,
            },
        }
    }
}

impl From<reqwest::Error> for FcmError {
    fn from(err: reqwest::Error) -> Self {
        FcmError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: &str, message: &str, error_code: Option<&str>) -> String {
        let details = match error_code {
            Some(code) => serde_json::json!([{
                "@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
                "errorCode": code,
            }]),
            None => serde_json::json!([]),
        };
        serde_json::json!({
            "error": {
                "code": 400,
                "message": message,
                "status": status,
                "details": details,
            }
        })
        .to_string()
    }

    #[test]
    fn classifies_unregistered_token() {
        let body = api_error("NOT_FOUND", "Requested entity was not found.", Some("UNREGISTERED"));
        let err = FcmError::classify(404, &body);
        assert!(matches!(err, FcmError::Unregistered));
        assert_eq!(err.code(), "messaging/registration-token-not-registered");
    }

    #[test]
    fn classifies_malformed_token_as_invalid_token() {
        let body = api_error(
            "INVALID_ARGUMENT",
            "The registration token is not a valid FCM registration token",
            None,
        );
        let err = FcmError::classify(400, &body);
        assert!(matches!(err, FcmError::InvalidToken));
        assert_eq!(err.code(), "messaging/invalid-registration-token");
    }

    #[test]
    fn classifies_bad_payload_as_invalid_argument() {
        let body = api_error("INVALID_ARGUMENT", "Invalid JSON payload received.", None);
        let err = FcmError::classify(400, &body);
        assert!(matches!(err, FcmError::InvalidArgument(_)));
        assert_eq!(err.code(), "messaging/invalid-argument");
    }

    #[test]
    fn classifies_authentication_failures() {
        let body = api_error("UNAUTHENTICATED", "Request had invalid credentials.", None);
        let err = FcmError::classify(401, &body);
        assert!(matches!(err, FcmError::Unauthenticated(_)));
        assert_eq!(err.code(), "messaging/authentication-error");
    }

    #[test]
    fn unknown_status_becomes_unexpected_with_raw_code() {
        let body = api_error("QUOTA_EXCEEDED", "Sending limit exceeded.", None);
        let err = FcmError::classify(429, &body);
        match &err {
            FcmError::Unexpected { code, message } => {
                assert_eq!(code, "QUOTA_EXCEEDED");
                assert_eq!(message, "Sending limit exceeded.");
            }
            other => panic!("expected Unexpected, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_becomes_unexpected_with_http_code() {
        let err = FcmError::classify(502, "Bad Gateway");
        match &err {
            FcmError::Unexpected { code, message } => {
                assert_eq!(code, "http-502");
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("expected Unexpected, got {other:?}"),
        }
    }

    #[test]
    fn detail_error_code_takes_precedence_over_status() {
        // UNREGISTERED rides on a NOT_FOUND status in real responses
        let body = api_error("NOT_FOUND", "Requested entity was not found.", Some("UNREGISTERED"));
        assert!(matches!(FcmError::classify(404, &body), FcmError::Unregistered));
    }
}
