use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::parking_spot_controller::ParkingSpotController;
use crate::dto::common_dto::{ApiResponse, WithDistance};
use crate::dto::parking_dto::{
    CreateParkingSpotRequest, NearbyQuery, OccupancyResponse, ParkingSpotFilters, UpdateParkingSpotRequest,
};
use crate::models::{Caller, ParkingSpot};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_parking_spot_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_spots).post(create_spot))
        .route("/nearby", get(nearby_spots))
        .route("/:id", get(get_spot).patch(update_spot).put(update_spot).delete(delete_spot))
        .route("/:id/toggle-occupancy", post(toggle_occupancy))
}

async fn list_spots(
    State(state): State<AppState>,
    Query(filters): Query<ParkingSpotFilters>,
) -> Result<Json<Vec<WithDistance<ParkingSpot>>>, AppError> {
    let controller = ParkingSpotController::new(state.pool.clone());
    Ok(Json(controller.list(filters).await?))
}

async fn nearby_spots(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<WithDistance<ParkingSpot>>>, AppError> {
    let controller = ParkingSpotController::new(state.pool.clone());
    let spots = controller
        .nearby(query, state.config.nearby_default_radius_meters)
        .await?;
    Ok(Json(spots))
}

async fn create_spot(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<CreateParkingSpotRequest>,
) -> Result<(StatusCode, Json<ParkingSpot>), AppError> {
    let controller = ParkingSpotController::new(state.pool.clone());
    let spot = controller.create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(spot)))
}

async fn get_spot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ParkingSpot>, AppError> {
    let controller = ParkingSpotController::new(state.pool.clone());
    Ok(Json(controller.get(id).await?))
}

async fn update_spot(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateParkingSpotRequest>,
) -> Result<Json<ParkingSpot>, AppError> {
    let controller = ParkingSpotController::new(state.pool.clone());
    Ok(Json(controller.update(&caller, id, request).await?))
}

async fn delete_spot(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, AppError> {
    let controller = ParkingSpotController::new(state.pool.clone());
    controller.delete(&caller, id).await?;
    Ok(Json(ApiResponse::success_with_message(id, "Parking spot deleted".to_string())))
}

async fn toggle_occupancy(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<OccupancyResponse>, AppError> {
    let controller = ParkingSpotController::new(state.pool.clone());
    Ok(Json(controller.toggle_occupancy(&caller, id).await?))
}
