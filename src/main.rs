//! Process bootstrap: configuration, logging, storage, hub, HTTP listener.

use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use despacho::adapters::auth::PlaintextCredentialVerifier;
use despacho::adapters::postgres::{
    PostgresCourierRepository, PostgresCustomerRepository, PostgresDeliveryRepository,
};
use despacho::adapters::relay::HttpBridgeRelay;
use despacho::adapters::websocket::{websocket_router, Hub, WebSocketState};
use despacho::application::{CourierService, CustomerService, DeliveryService};
use despacho::config::AppConfig;
use despacho::ports::MessagingRelay;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.server.log_level)?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Record store.
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!().run(&pool).await?;
        info!("database migrations applied");
    }

    // Messaging relay: session failures are logged, never fatal.
    let relay = Arc::new(HttpBridgeRelay::new(config.messaging.clone()));
    relay.spawn_event_pump();
    if config.messaging.autostart {
        let startup_relay = Arc::clone(&relay);
        tokio::spawn(async move {
            match startup_relay.initialize().await {
                Ok(()) => info!("messaging session started"),
                Err(e) => error!("messaging session failed to start: {}", e),
            }
        });
    }

    // Domain services and the hub.
    let customers = CustomerService::new(Arc::new(PostgresCustomerRepository::new(pool.clone())));
    let deliveries = DeliveryService::new(Arc::new(PostgresDeliveryRepository::new(pool.clone())));
    let couriers = CourierService::new(
        Arc::new(PostgresCourierRepository::new(pool)),
        Arc::new(PlaintextCredentialVerifier),
    );
    let hub = Hub::new(customers, deliveries, couriers, relay);
    hub.spawn_relay_event_pump();

    // HTTP surface: WebSocket endpoint, health probe, static dashboard.
    let cors = if config.server.cors_origins_list().is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .server
            .cors_origins_list()
            .iter()
            .filter_map(|origin| origin.parse::<axum::http::HeaderValue>().ok())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let app = Router::new()
        .merge(websocket_router())
        .route("/health", axum::routing::get(|| async { "ok" }))
        .with_state(WebSocketState::new(hub))
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to install shutdown handler: {}", e);
    }
    info!("shutting down");
}
