//! Middleware de autenticación JWT
//!
//! Verifica el token de acceso Bearer, carga el usuario y deja su `Caller`
//! en las extensiones de la request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    repositories::user_repository::UserRepository,
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token, TokenType},
    },
};

/// Middleware de autenticación JWT
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, TokenType::Access, &state.jwt)?;
    let user_id = claims.user_id()?;

    // El usuario puede haberse borrado después de emitir el token
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    request.extensions_mut().insert(user.caller());
    Ok(next.run(request).await)
}
