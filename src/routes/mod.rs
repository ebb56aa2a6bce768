//! Rutas de la API
//!
//! Todas cuelgan de `/api`; salvo registro, login y refresco de token,
//! exigen un token de acceso válido.

pub mod booking_routes;
pub mod commercial_routes;
pub mod dispute_routes;
pub mod parking_spot_routes;
pub mod private_listing_routes;
pub mod user_routes;

use axum::{middleware::from_fn_with_state, Router};

use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn create_api_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/parking-spots", parking_spot_routes::create_parking_spot_router())
        .nest("/commercial-facilities", commercial_routes::create_facility_router())
        .nest("/commercial-slots", commercial_routes::create_commercial_slot_router())
        .nest("/private-listings", private_listing_routes::create_private_listing_router())
        .nest("/private-slots", private_listing_routes::create_private_slot_router())
        .nest("/bookings", booking_routes::create_booking_router())
        .nest("/disputes", dispute_routes::create_dispute_router())
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .nest("/users", user_routes::create_user_router(state))
        .nest("/token", user_routes::create_token_router())
        .merge(protected)
}
