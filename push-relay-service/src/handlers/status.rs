use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::models::{StatusResponse, TestResponse};
use crate::state::AppState;

/// Status summary
///
/// GET /
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        success: true,
        service: "push-relay",
        version: env!("CARGO_PKG_VERSION"),
        runtime: "rust/actix-web",
        port: state.port,
        firebase_ready: state.ready(),
        timestamp: Utc::now(),
    })
}

/// Readiness summary
///
/// GET /test
pub async fn test_status(state: web::Data<AppState>) -> HttpResponse {
    let message = if state.ready() {
        "Push relay is ready to send notifications"
    } else {
        "Push relay is running but Firebase is not initialized"
    };

    HttpResponse::Ok().json(TestResponse {
        success: true,
        message: message.to_string(),
        firebase_ready: state.ready(),
        timestamp: Utc::now(),
    })
}
