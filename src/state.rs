//! Shared application state
//!
//! Estado compartido que se pasa a través del router de Axum: el pool de
//! conexiones y la configuración de solo lectura.

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::booking_lifecycle::OverstayPolicy;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub jwt: JwtConfig,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let jwt = JwtConfig::from(&config);
        Self { pool, config, jwt }
    }

    pub fn overstay_policy(&self) -> OverstayPolicy {
        OverstayPolicy::from(&self.config)
    }
}
