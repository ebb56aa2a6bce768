//! Configuración de base de datos
//!
//! Este módulo maneja la conexión y configuración de PostgreSQL con SQLx.

use anyhow::{anyhow, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    /// Leer `DATABASE_URL` y tamaños del pool desde el entorno
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow!("DATABASE_URL must be set in environment variables"))?;

        let max_connections = match std::env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse().map_err(|_| anyhow!("DB_MAX_CONNECTIONS must be a valid number"))?,
            Err(_) => 20,
        };
        let min_connections = match std::env::var("DB_MIN_CONNECTIONS") {
            Ok(raw) => raw.parse().map_err(|_| anyhow!("DB_MIN_CONNECTIONS must be a valid number"))?,
            Err(_) => 2,
        };

        Ok(Self::new(url, max_connections, min_connections))
    }

    pub fn new(url: String, max_connections: u32, min_connections: u32) -> Self {
        Self {
            url,
            max_connections,
            min_connections: min_connections.min(max_connections),
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
        }
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
    }

    /// Crear un nuevo pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        self.pool_options().connect(&self.url).await
    }

    /// Crear un pool que no abre conexiones hasta el primer uso
    pub fn create_lazy_pool(&self) -> Result<PgPool, sqlx::Error> {
        self.pool_options().connect_lazy(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_connections_capped_by_max() {
        let config = DatabaseConfig::new("postgres://localhost/parking".to_string(), 4, 10);
        assert_eq!(config.min_connections, 4);
    }
}
