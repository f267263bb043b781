//! Rutas de bookings
//!
//! Todas requieren autenticación. La regla "un customer solo reserva para
//! sí mismo" se aplica acá, en el borde de acceso, antes de invocar al
//! engine.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    BookingListing, CreateBookingRequest, CreatedBookingResponse, UpdateBookingStatusRequest,
    UpdatedBookingResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::user::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/", get(get_bookings))
        .route("/:bookingId", put(update_booking))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedBookingResponse>>), AppError> {
    if user.role == Role::Customer && request.customer_id != user.user_id {
        return Err(AppError::Forbidden(
            "Customers can only create bookings for themselves".to_string(),
        ));
    }

    let controller = BookingController::new(state.pool.clone());
    let response = controller.create_booking(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<BookingListing>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let listing = controller.get_bookings_by_role(&user).await?;

    let message = match user.role {
        Role::Admin => "Bookings retrieved successfully",
        Role::Customer => "Your bookings retrieved successfully",
    };

    Ok(Json(ApiResponse::success_with_message(
        listing,
        message.to_string(),
    )))
}

async fn update_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<i32>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<ApiResponse<UpdatedBookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller
        .update_booking_status(booking_id, &request.status, &user)
        .await?;
    Ok(Json(response))
}
