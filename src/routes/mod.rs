//! Routers de la API

use axum::{http::StatusCode, response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

pub mod auth_routes;
pub mod booking_routes;
pub mod user_routes;
pub mod vehicle_routes;

/// Arma el router completo de la aplicación con todos los sub-routers
/// montados bajo /api y los layers globales (CORS + trace)
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_endpoint))
        .nest("/api/auth", auth_routes::create_auth_router())
        .nest("/api/users", user_routes::create_user_router(state.clone()))
        .nest(
            "/api/vehicles",
            vehicle_routes::create_vehicle_router(state.clone()),
        )
        .nest(
            "/api/bookings",
            booking_routes::create_booking_router(state.clone()),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware())
        .with_state(state)
}

async fn root_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Rentify API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Route not found",
        })),
    )
}
