use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{BookingFilters, CreateBookingRequest};
use crate::models::{BookingSession, Caller};
use crate::services::booking_lifecycle::BookingOperation;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route("/active", get(active_bookings))
        .route("/history", get(booking_history))
        .route("/:id", get(get_booking))
        .route("/:id/start", post(start_booking))
        .route("/:id/end", post(end_booking))
        .route("/:id/cancel", post(cancel_booking))
}

fn controller(state: &AppState) -> BookingController {
    BookingController::new(state.pool.clone(), state.overstay_policy())
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(filters): Query<BookingFilters>,
) -> Result<Json<Vec<BookingSession>>, AppError> {
    Ok(Json(controller(&state).list(&caller, filters).await?))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingSession>), AppError> {
    let booking = controller(&state).create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn active_bookings(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<BookingSession>>, AppError> {
    Ok(Json(controller(&state).active(&caller).await?))
}

async fn booking_history(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<BookingSession>>, AppError> {
    Ok(Json(controller(&state).history(&caller).await?))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingSession>, AppError> {
    Ok(Json(controller(&state).get(&caller, id).await?))
}

async fn start_booking(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingSession>, AppError> {
    let booking = controller(&state).transition(&caller, id, BookingOperation::Start).await?;
    Ok(Json(booking))
}

async fn end_booking(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingSession>, AppError> {
    let booking = controller(&state).transition(&caller, id, BookingOperation::End).await?;
    Ok(Json(booking))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingSession>, AppError> {
    let booking = controller(&state).transition(&caller, id, BookingOperation::Cancel).await?;
    Ok(Json(booking))
}
