//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use std::{env, str::FromStr};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub jwt_refresh_expiration: u64,
    pub cors_origins: Vec<String>,
    // Facturación de excesos de tiempo
    pub overstay_block_minutes: i64,
    pub overstay_fee_per_block: Decimal,
    // Búsqueda por proximidad
    pub nearby_default_radius_meters: f64,
}

impl EnvironmentConfig {
    /// Cargar la configuración desde las variables de entorno del proceso
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Cargar la configuración a partir de una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: parse_or(&lookup, "PORT", 8000)?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            jwt_secret: lookup("JWT_SECRET")
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| anyhow!("JWT_SECRET must be set"))?,
            jwt_expiration: parse_or(&lookup, "JWT_EXPIRATION", 3600)?,
            jwt_refresh_expiration: parse_or(&lookup, "JWT_REFRESH_EXPIRATION", 604_800)?,
            cors_origins: lookup("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            overstay_block_minutes: parse_or(&lookup, "OVERSTAY_BLOCK_MINUTES", 15)?,
            overstay_fee_per_block: parse_or(&lookup, "OVERSTAY_FEE_PER_BLOCK", Decimal::new(20, 0))?,
            nearby_default_radius_meters: parse_or(&lookup, "NEARBY_DEFAULT_RADIUS_METERS", 5000.0)?,
        };

        if config.overstay_block_minutes <= 0 {
            return Err(anyhow!("OVERSTAY_BLOCK_MINUTES must be greater than zero"));
        }
        if config.overstay_fee_per_block < Decimal::ZERO {
            return Err(anyhow!("OVERSTAY_FEE_PER_BLOCK must not be negative"));
        }

        Ok(config)
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección de escucha del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.overstay_block_minutes, 15);
        assert_eq!(config.overstay_fee_per_block, Decimal::new(20, 0));
        assert_eq!(config.nearby_default_radius_meters, 5000.0);
        assert!(config.cors_origins.is_empty());
        assert!(config.is_development());
    }

    #[test]
    fn test_missing_secret_is_error() {
        assert!(EnvironmentConfig::from_lookup(lookup_from(&[])).is_err());
    }

    #[test]
    fn test_invalid_number_is_error() {
        let lookup = lookup_from(&[("JWT_SECRET", "s"), ("PORT", "not-a-port")]);
        assert!(EnvironmentConfig::from_lookup(lookup).is_err());
    }

    #[test]
    fn test_negative_overstay_fee_is_error() {
        let lookup = lookup_from(&[("JWT_SECRET", "s"), ("OVERSTAY_FEE_PER_BLOCK", "-20")]);
        assert!(EnvironmentConfig::from_lookup(lookup).is_err());

        let free = lookup_from(&[("JWT_SECRET", "s"), ("OVERSTAY_FEE_PER_BLOCK", "0")]);
        let config = EnvironmentConfig::from_lookup(free).unwrap();
        assert_eq!(config.overstay_fee_per_block, Decimal::ZERO);
    }

    #[test]
    fn test_non_positive_block_is_error() {
        let lookup = lookup_from(&[("JWT_SECRET", "s"), ("OVERSTAY_BLOCK_MINUTES", "0")]);
        assert!(EnvironmentConfig::from_lookup(lookup).is_err());
    }

    #[test]
    fn test_cors_origins_are_split() {
        let lookup = lookup_from(&[
            ("JWT_SECRET", "s"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("OVERSTAY_FEE_PER_BLOCK", "25.50"),
        ]);
        let config = EnvironmentConfig::from_lookup(lookup).unwrap();
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.overstay_fee_per_block, Decimal::new(2550, 2));
    }
}
