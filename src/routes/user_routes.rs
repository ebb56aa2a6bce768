use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{AuthResponse, LoginRequest, RefreshRequest, RefreshResponse, RegisterRequest, UpdateProfileRequest};
use crate::middleware::auth::require_auth;
use crate::models::{Caller, UserResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas de usuario: `/me` y `/switch-role` exigen token, registro y login no
pub fn create_user_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me).patch(update_profile).put(update_profile))
        .route("/switch-role", post(switch_role))
        .route_layer(from_fn_with_state(state, require_auth))
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Refresco de token, público
pub fn create_token_router() -> Router<AppState> {
    Router::new().route("/refresh", post(refresh))
}

fn controller(state: &AppState) -> AuthController {
    AuthController::new(state.pool.clone(), state.jwt.clone())
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = controller(&state).register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = controller(&state).login(request).await?;
    Ok(Json(response))
}

async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let response = controller(&state).refresh(request)?;
    Ok(Json(response))
}

async fn me(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<UserResponse>, AppError> {
    let response = controller(&state).me(&caller).await?;
    Ok(Json(response))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let response = controller(&state).update_profile(&caller, request).await?;
    Ok(Json(response))
}

async fn switch_role(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<UserResponse>, AppError> {
    let response = controller(&state).switch_role(&caller).await?;
    Ok(Json(response))
}
