use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::commercial_controller::CommercialController;
use crate::dto::common_dto::{ApiResponse, WithDistance};
use crate::dto::parking_dto::{
    CommercialSlotFilters, CreateFacilityRequest, CreateSlotsRequest, CreateSlotsResponse, FacilityFilters,
    UpdateFacilityRequest, UpdateSlotRequest,
};
use crate::models::{Caller, CommercialParkingFacility, CommercialParkingSlot};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_facility_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_facilities).post(create_facility))
        .route(
            "/:id",
            get(get_facility)
                .patch(update_facility)
                .put(update_facility)
                .delete(delete_facility),
        )
        .route("/:id/slots", get(list_slots).post(create_slots))
}

pub fn create_commercial_slot_router() -> Router<AppState> {
    Router::new().route("/:id", patch(update_slot))
}

async fn list_facilities(
    State(state): State<AppState>,
    Query(filters): Query<FacilityFilters>,
) -> Result<Json<Vec<WithDistance<CommercialParkingFacility>>>, AppError> {
    let controller = CommercialController::new(state.pool.clone());
    Ok(Json(controller.list(filters).await?))
}

async fn create_facility(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<CreateFacilityRequest>,
) -> Result<(StatusCode, Json<CommercialParkingFacility>), AppError> {
    let controller = CommercialController::new(state.pool.clone());
    let facility = controller.create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(facility)))
}

async fn get_facility(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CommercialParkingFacility>, AppError> {
    let controller = CommercialController::new(state.pool.clone());
    Ok(Json(controller.get(id).await?))
}

async fn update_facility(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFacilityRequest>,
) -> Result<Json<CommercialParkingFacility>, AppError> {
    let controller = CommercialController::new(state.pool.clone());
    Ok(Json(controller.update(&caller, id, request).await?))
}

async fn delete_facility(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, AppError> {
    let controller = CommercialController::new(state.pool.clone());
    controller.delete(&caller, id).await?;
    Ok(Json(ApiResponse::success_with_message(id, "Commercial facility deleted".to_string())))
}

async fn list_slots(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(filters): Query<CommercialSlotFilters>,
) -> Result<Json<Vec<CommercialParkingSlot>>, AppError> {
    let controller = CommercialController::new(state.pool.clone());
    Ok(Json(controller.list_slots(id, filters).await?))
}

async fn create_slots(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateSlotsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateSlotsResponse>>), AppError> {
    let controller = CommercialController::new(state.pool.clone());
    let created = controller.create_slots(&caller, id, request).await?;
    let message = format!("{} slots created", created.created);
    Ok((StatusCode::CREATED, Json(ApiResponse::success_with_message(created, message))))
}

async fn update_slot(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSlotRequest>,
) -> Result<Json<CommercialParkingSlot>, AppError> {
    let controller = CommercialController::new(state.pool.clone());
    Ok(Json(controller.update_slot(&caller, id, request).await?))
}
