use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;

use crate::models::NotFoundResponse;

pub mod send;
pub mod status;

pub use send::{send_bulk_notifications, send_notification};
pub use status::{index, test_status};

/// Everything the relay serves.
pub const AVAILABLE_ENDPOINTS: [&str; 4] = [
    "GET /",
    "GET /test",
    "POST /send-notification",
    "POST /send-bulk-notifications",
];

/// Register routes
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status::index))
        .route("/test", web::get().to(status::test_status))
        .route("/send-notification", web::post().to(send::send_notification))
        .route(
            "/send-bulk-notifications",
            web::post().to(send::send_bulk_notifications),
        );
}

/// Fallback for unmatched routes.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(NotFoundResponse {
        success: false,
        error: "Route not found".to_string(),
        path: req.path().to_string(),
        method: req.method().to_string(),
        available_endpoints: AVAILABLE_ENDPOINTS.to_vec(),
        timestamp: Utc::now(),
    })
}
