use actix_web::{web, HttpResponse};
use chrono::Utc;
use tracing::{info, warn};

use fcm_shared::FcmError;

use crate::error::RelayError;
use crate::models::{
    token_preview, BulkTokenResult, SendBulkNotificationsRequest, SendBulkNotificationsResponse,
    SendNotificationRequest, SendNotificationResponse,
};
use crate::state::AppState;

/// Send a push notification to a single device
///
/// POST /send-notification
pub async fn send_notification(
    state: web::Data<AppState>,
    payload: web::Json<SendNotificationRequest>,
) -> Result<HttpResponse, RelayError> {
    let req = payload.into_inner();

    let mut missing = Vec::new();
    let token = require(req.target_token, "targetToken", &mut missing);
    let title = require(req.title, "title", &mut missing);
    let body = require(req.body, "body", &mut missing);
    if !missing.is_empty() {
        return Err(RelayError::MissingFields(missing));
    }

    let sender = state.sender()?;
    let message_id = sender.send_single(&token, &title, &body, req.data).await?;

    info!(%message_id, target = %token_preview(&token), "notification sent");

    Ok(HttpResponse::Ok().json(SendNotificationResponse {
        success: true,
        message_id,
        target_preview: token_preview(&token),
        title,
        body,
        timestamp: Utc::now(),
    }))
}

/// Send a push notification to a set of devices
///
/// POST /send-bulk-notifications
///
/// The per-token results preserve the input token ordering; callers
/// correlate results back to tokens positionally.
pub async fn send_bulk_notifications(
    state: web::Data<AppState>,
    payload: web::Json<SendBulkNotificationsRequest>,
) -> Result<HttpResponse, RelayError> {
    let req = payload.into_inner();

    let mut missing = Vec::new();
    let tokens = match req.target_tokens {
        Some(tokens) if !tokens.is_empty() => tokens,
        _ => {
            missing.push("targetTokens");
            Vec::new()
        }
    };
    let title = require(req.title, "title", &mut missing);
    let body = require(req.body, "body", &mut missing);
    if !missing.is_empty() {
        return Err(RelayError::MissingFields(missing));
    }

    let sender = state.sender()?;
    let outcomes = sender
        .send_bulk(&tokens, &title, &body, req.data)
        .await
        .map_err(RelayError::BulkSend)?;

    // Callers correlate results to tokens positionally, so a misaligned
    // outcome list from the sender is a whole-request failure, not
    // something to paper over by truncation.
    if outcomes.len() != tokens.len() {
        warn!(
            expected = tokens.len(),
            got = outcomes.len(),
            "sender returned misaligned outcome list"
        );
        return Err(RelayError::BulkSend(FcmError::Unexpected {
            code: "messaging/internal-error".to_string(),
            message: format!(
                "expected {} outcomes, got {}",
                tokens.len(),
                outcomes.len()
            ),
        }));
    }

    let results: Vec<BulkTokenResult> = tokens
        .iter()
        .zip(outcomes)
        .map(|(token, outcome)| BulkTokenResult {
            target_preview: token_preview(token),
            success: outcome.is_success(),
            message_id: outcome.message_id,
            error: outcome.error.map(|e| e.to_string()),
        })
        .collect();

    let success_count = results.iter().filter(|r| r.success).count();
    let failure_count = results.len() - success_count;

    info!(
        total = tokens.len(),
        success = success_count,
        failed = failure_count,
        "bulk notifications sent"
    );

    Ok(HttpResponse::Ok().json(SendBulkNotificationsResponse {
        success: true,
        total_count: tokens.len(),
        success_count,
        failure_count,
        results,
        timestamp: Utc::now(),
    }))
}

/// Pull a required field out of the payload, recording its name when it
/// is absent or blank.
fn require(
    value: Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_records_missing_and_blank_values() {
        let mut missing = Vec::new();
        assert_eq!(require(Some("ok".into()), "a", &mut missing), "ok");
        require(None, "b", &mut missing);
        require(Some("   ".into()), "c", &mut missing);
        assert_eq!(missing, vec!["b", "c"]);
    }
}
