use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::dispute_controller::DisputeController;
use crate::dto::dispute_dto::{CreateDisputeRequest, DisputeFilters, ResolveDisputeRequest};
use crate::models::{Caller, DisputeReport};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dispute_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_disputes).post(create_dispute))
        .route("/:id", get(get_dispute))
        .route("/:id/resolve", post(resolve_dispute))
}

async fn list_disputes(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(filters): Query<DisputeFilters>,
) -> Result<Json<Vec<DisputeReport>>, AppError> {
    let controller = DisputeController::new(state.pool.clone());
    Ok(Json(controller.list(&caller, filters).await?))
}

async fn create_dispute(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<CreateDisputeRequest>,
) -> Result<(StatusCode, Json<DisputeReport>), AppError> {
    let controller = DisputeController::new(state.pool.clone());
    let dispute = controller.create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(dispute)))
}

async fn get_dispute(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<DisputeReport>, AppError> {
    let controller = DisputeController::new(state.pool.clone());
    Ok(Json(controller.get(&caller, id).await?))
}

async fn resolve_dispute(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(request): Json<ResolveDisputeRequest>,
) -> Result<Json<DisputeReport>, AppError> {
    let controller = DisputeController::new(state.pool.clone());
    Ok(Json(controller.resolve(&caller, id, request).await?))
}
