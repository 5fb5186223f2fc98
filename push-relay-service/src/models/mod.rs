use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to send a notification to a single device
///
/// Fields are optional at the serde level so validation can report
/// exactly which ones are missing instead of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    pub target_token: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub data: Option<HashMap<String, String>>,
}

/// Request to send a notification to a set of devices
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBulkNotificationsRequest {
    pub target_tokens: Option<Vec<String>>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub data: Option<HashMap<String, String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationResponse {
    pub success: bool,
    pub message_id: String,
    pub target_preview: String,
    pub title: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBulkNotificationsResponse {
    pub success: bool,
    pub total_count: usize,
    pub success_count: usize,
    pub failure_count: usize,
    /// results[i] corresponds to targetTokens[i]
    pub results: Vec<BulkTokenResult>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkTokenResult {
    pub target_preview: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub service: &'static str,
    pub version: &'static str,
    pub runtime: &'static str,
    pub port: u16,
    pub firebase_ready: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResponse {
    pub success: bool,
    pub message: String,
    pub firebase_ready: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundResponse {
    pub success: bool,
    pub error: String,
    pub path: String,
    pub method: String,
    pub available_endpoints: Vec<&'static str>,
    pub timestamp: DateTime<Utc>,
}

/// First 20 characters of a token followed by "...", so responses never
/// echo a full device token.
pub fn token_preview(token: &str) -> String {
    let head: String = token.chars().take(20).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_preview_truncates_to_20_chars() {
        let token = "abcdefghijklmnopqrstuvwxyz0123456789";
        assert_eq!(token_preview(token), "abcdefghijklmnopqrst...");
    }

    #[test]
    fn token_preview_keeps_short_tokens_whole() {
        assert_eq!(token_preview("short"), "short...");
    }

    #[test]
    fn send_request_accepts_missing_fields() {
        let req: SendNotificationRequest = serde_json::from_str("{}").unwrap();
        assert!(req.target_token.is_none());
        assert!(req.title.is_none());
        assert!(req.body.is_none());
        assert!(req.data.is_none());
    }

    #[test]
    fn send_request_uses_camel_case_names() {
        let req: SendNotificationRequest = serde_json::from_value(serde_json::json!({
            "targetToken": "tok",
            "title": "t",
            "body": "b",
            "data": {"k": "v"}
        }))
        .unwrap();
        assert_eq!(req.target_token.as_deref(), Some("tok"));
        assert_eq!(req.data.unwrap().get("k").map(String::as_str), Some("v"));
    }

    #[test]
    fn bulk_result_omits_absent_fields() {
        let result = BulkTokenResult {
            target_preview: "abc...".into(),
            success: true,
            message_id: Some("id-1".into()),
            error: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["messageId"], "id-1");
        assert!(json.get("error").is_none());
    }
}
