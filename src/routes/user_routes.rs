//! Rutas de usuarios
//!
//! Listado y borrado solo admin; la edición la puede hacer el propio
//! usuario o un admin (la regla fina vive en el controller).

use axum::{
    extract::{Path, State},
    middleware,
    routing::{delete, get, put},
    Extension, Json, Router,
};

use crate::controllers::user_controller::UserController;
use crate::dto::user_dto::{UpdateUserRequest, UserResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::{admin_only_middleware, auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_users).layer(middleware::from_fn(admin_only_middleware)),
        )
        .route("/:userId", put(update_user))
        .route(
            "/:userId",
            delete(delete_user).layer(middleware::from_fn(admin_only_middleware)),
        )
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let users = controller.list().await?;
    Ok(Json(ApiResponse::success_with_message(
        users,
        "Users retrieved successfully".to_string(),
    )))
}

async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(user_id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.update(user_id, &user, request).await?;
    Ok(Json(response))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = UserController::new(state.pool.clone());
    controller.delete(user_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "User deleted successfully"
    })))
}
