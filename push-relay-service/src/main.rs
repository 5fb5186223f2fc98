use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fcm_shared::FcmClient;
use push_relay_service::services::PushSender;
use push_relay_service::{error, handlers, AppState, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting push relay service");

    let config = Config::from_env();

    // Credential failures leave the relay running degraded so the status
    // endpoints stay reachable.
    let sender: Option<Arc<dyn PushSender>> = match config.service_account.as_deref() {
        Some(blob) => match FcmClient::from_json(blob) {
            Ok(client) => {
                tracing::info!(project_id = client.project_id(), "FCM client initialized");
                Some(Arc::new(client))
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize FCM client: {}. Send endpoints disabled",
                    e
                );
                None
            }
        },
        None => {
            tracing::warn!("FIREBASE_SERVICE_ACCOUNT not set. Send endpoints disabled");
            None
        }
    };

    let port = config.port;
    let state = web::Data::new(AppState { sender, port });

    tracing::info!("Starting HTTP server on 0.0.0.0:{}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header();

        App::new()
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(handlers::register_routes)
            .default_service(web::route().to(handlers::not_found))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
