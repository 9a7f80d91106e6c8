mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use database::create_pool;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use services::email_service::EmailService;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::default();

    // Configurar logging (DEBUG en desarrollo, INFO en producción)
    let log_level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("🚗 SwiftServe - Car Service Marketplace API");
    info!("===========================================");

    // Inicializar base de datos
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    info!("✅ Base de datos conectada");

    let mailer = Arc::new(EmailService::new(&config));
    let app_state = AppState::new(pool, config.clone(), mailer);

    let cors = if config.is_production() {
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/auth", routes::auth_routes::create_auth_router(app_state.clone()))
        .nest("/api/owners", routes::profile_routes::create_owner_router(app_state.clone()))
        .nest("/api/mechanics", routes::profile_routes::create_mechanic_router(app_state.clone()))
        .nest("/api/garages", routes::profile_routes::create_garage_router(app_state.clone()))
        .nest("/api/cars", routes::car_routes::create_car_router(app_state.clone()))
        .nest(
            "/api/service-requests",
            routes::service_request_routes::create_service_request_router(app_state.clone()),
        )
        .nest(
            "/api/notifications",
            routes::notification_routes::create_notification_router(app_state.clone()),
        )
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔐 Auth:");
    info!("   POST /api/auth/login - Login");
    info!("   GET  /api/auth/me - Sesión actual");
    info!("👤 Registro:");
    info!("   POST /api/owners/register - Registrar propietario");
    info!("   POST /api/mechanics/register - Registrar conductor (pending)");
    info!("   POST /api/garages/register - Registrar garaje (pending)");
    info!("✅ Aprobación (admin):");
    info!("   GET  /api/mechanics/pending - Conductores pendientes");
    info!("   POST /api/mechanics/:id/approve - Aprobar conductor");
    info!("   GET  /api/garages/pending - Garajes pendientes");
    info!("   POST /api/garages/:id/approve - Aprobar garaje");
    info!("🚗 Cars:");
    info!("   POST /api/cars - Registrar vehículo");
    info!("   GET  /api/cars - Listar vehículos");
    info!("📋 Service requests:");
    info!("   POST /api/service-requests - Crear request");
    info!("   GET  /api/service-requests - Listar (scoped por rol)");
    info!("   GET  /api/service-requests/:id - Detalle con work items");
    info!("   POST /api/service-requests/:id/accept_job - Aceptar (conductor)");
    info!("   POST /api/service-requests/:id/pickup_car - Retirar vehículo");
    info!("   POST /api/service-requests/:id/deliver_to_garage - Entregar al garaje");
    info!("   POST /api/service-requests/:id/complete_service - Completar (garaje)");
    info!("   POST /api/service-requests/:id/return_to_owner - Devolver al propietario");
    info!("   POST /api/service-requests/:id/add_work_item - Agregar trabajo");
    info!("   DELETE /api/service-requests/:id/remove_work_item - Quitar trabajo");
    info!("   POST /api/service-requests/:id/assign_mechanic - Asignar conductor (admin)");
    info!("   POST /api/service-requests/:id/update_status - Forzar status (admin)");
    info!("🔔 Notifications:");
    info!("   GET  /api/notifications - Listar (scoped por rol)");
    info!("   POST /api/notifications/:id/mark_read - Marcar leída");
    info!("   POST /api/notifications/send_to_mechanics - Broadcast (admin)");
    info!("   POST /api/notifications/send_to_garages - Broadcast (admin)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "swiftserve-backend",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
