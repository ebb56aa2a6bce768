use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::private_listing_controller::PrivateListingController;
use crate::dto::common_dto::{ApiResponse, WithDistance};
use crate::dto::parking_dto::{
    CreatePrivateListingRequest, PricingIntelligenceResponse, PrivateListingFilters, UpdatePrivateListingRequest,
    UpdateSlotRequest,
};
use crate::models::{Caller, PrivateParkingListing, PrivateParkingSlot};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_private_listing_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_listings).post(create_listing))
        .route(
            "/:id",
            get(get_listing)
                .patch(update_listing)
                .put(update_listing)
                .delete(delete_listing),
        )
        .route("/:id/pricing-intelligence", post(pricing_intelligence))
        .route("/:id/slots", get(list_slots))
}

pub fn create_private_slot_router() -> Router<AppState> {
    Router::new().route("/:id", patch(update_slot))
}

async fn list_listings(
    State(state): State<AppState>,
    Query(filters): Query<PrivateListingFilters>,
) -> Result<Json<Vec<WithDistance<PrivateParkingListing>>>, AppError> {
    let controller = PrivateListingController::new(state.pool.clone());
    Ok(Json(controller.list(filters).await?))
}

async fn create_listing(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<CreatePrivateListingRequest>,
) -> Result<(StatusCode, Json<PrivateParkingListing>), AppError> {
    let controller = PrivateListingController::new(state.pool.clone());
    let listing = controller.create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PrivateParkingListing>, AppError> {
    let controller = PrivateListingController::new(state.pool.clone());
    Ok(Json(controller.get(id).await?))
}

async fn update_listing(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePrivateListingRequest>,
) -> Result<Json<PrivateParkingListing>, AppError> {
    let controller = PrivateListingController::new(state.pool.clone());
    Ok(Json(controller.update(&caller, id, request).await?))
}

async fn delete_listing(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, AppError> {
    let controller = PrivateListingController::new(state.pool.clone());
    controller.delete(&caller, id).await?;
    Ok(Json(ApiResponse::success_with_message(id, "Private listing deleted".to_string())))
}

async fn pricing_intelligence(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<PricingIntelligenceResponse>, AppError> {
    let controller = PrivateListingController::new(state.pool.clone());
    Ok(Json(controller.pricing_intelligence(&caller, id).await?))
}

async fn list_slots(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PrivateParkingSlot>>, AppError> {
    let controller = PrivateListingController::new(state.pool.clone());
    Ok(Json(controller.list_slots(id).await?))
}

async fn update_slot(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSlotRequest>,
) -> Result<Json<PrivateParkingSlot>, AppError> {
    let controller = PrivateListingController::new(state.pool.clone());
    Ok(Json(controller.update_slot(&caller, id, request).await?))
}
