use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use matchmaker::config::{Settings, StorageBackend};
use matchmaker::core::{MatchCore, Stores, SystemClock};
use matchmaker::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use matchmaker::services::{
    LogNotifier, MemoryStore, NotificationSink, PostgresClient, PremiumExpirySweeper, WebhookNotifier,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str, format: &str) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::other(format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    match &settings {
        Ok(s) => init_tracing(&s.logging.level, &s.logging.format),
        Err(_) => init_tracing("info", "json"),
    }
    let settings = settings.map_err(|e| startup_error("Failed to load configuration", e))?;

    info!("Starting Matchmaker service...");

    let stores = match settings.storage.backend {
        StorageBackend::Postgres => {
            let postgres = PostgresClient::from_settings(
                &settings.database.url,
                settings.database.max_connections,
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
                settings.database.idle_timeout_secs,
            )
            .await
            .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

            info!(
                "PostgreSQL store initialized (max: {} connections)",
                settings.database.max_connections.unwrap_or(10)
            );
            Stores::shared(Arc::new(postgres))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory store, data will not survive a restart");
            Stores::shared(Arc::new(MemoryStore::new()))
        }
    };

    let notifier: Arc<dyn NotificationSink> = match &settings.notifier.endpoint {
        Some(endpoint) => {
            let webhook = WebhookNotifier::new(
                endpoint.clone(),
                settings.notifier.api_key.clone(),
                Duration::from_secs(settings.notifier.timeout_secs),
            )
            .map_err(|e| startup_error("Failed to create notifier", e))?;
            info!("Message notifications go to {}", endpoint);
            Arc::new(webhook)
        }
        None => {
            info!("No notifier endpoint configured, message notifications are only logged");
            Arc::new(LogNotifier)
        }
    };

    let policy = settings.discovery_policy();
    info!("Discovery policy: {:?}", policy);

    let core = MatchCore::new(stores, notifier, policy, Arc::new(SystemClock));

    let sweep_interval = Duration::from_secs(settings.scheduler.premium_sweep_interval_secs);
    PremiumExpirySweeper::new(core.premium.clone(), sweep_interval).spawn();
    info!("Premium expiry sweep every {:?}", sweep_interval);

    let app_state = AppState { core };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
