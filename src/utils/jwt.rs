//! Utilidades JWT
//!
//! Emisión y verificación de los tokens de acceso y de refresco.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

/// Tipo de token emitido
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,           // user_id
    pub token_type: TokenType, // access | refresh
    pub exp: usize,            // expiration timestamp
    pub iat: usize,            // issued at timestamp
}

impl JwtClaims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))
    }
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_expiration: u64,
    pub refresh_expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            access_expiration: config.jwt_expiration,
            refresh_expiration: config.jwt_refresh_expiration,
        }
    }
}

/// Par de tokens devuelto en registro y login
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Generar JWT token para un usuario
pub fn generate_token(
    user_id: Uuid,
    token_type: TokenType,
    config: &JwtConfig,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let lifetime = match token_type {
        TokenType::Access => config.access_expiration,
        TokenType::Refresh => config.refresh_expiration,
    };
    let expires_at = now + chrono::Duration::seconds(lifetime as i64);

    let claims = JwtClaims {
        sub: user_id.to_string(),
        token_type,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))
}

/// Generar el par access + refresh
pub fn generate_token_pair(user_id: Uuid, config: &JwtConfig) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access: generate_token(user_id, TokenType::Access, config)?,
        refresh: generate_token(user_id, TokenType::Refresh, config)?,
    })
}

/// Verificar y decodificar JWT token, exigiendo el tipo esperado
pub fn verify_token(
    token: &str,
    expected: TokenType,
    config: &JwtConfig,
) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

    if token_data.claims.token_type != expected {
        return Err(AppError::Jwt("Tipo de token incorrecto".to_string()));
    }

    Ok(token_data.claims)
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Header Authorization debe comenzar con 'Bearer '".to_string()))?;

    if token.trim().is_empty() {
        return Err(AppError::Unauthorized("Token no puede estar vacío".to_string()));
    }

    Ok(token.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            access_expiration: 3600,
            refresh_expiration: 7200,
        }
    }

    #[test]
    fn test_access_token_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = generate_token(user_id, TokenType::Access, &config()).unwrap();
        let claims = verify_token(&token, TokenType::Access, &config()).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let pair = generate_token_pair(Uuid::new_v4(), &config()).unwrap();
        assert!(verify_token(&pair.refresh, TokenType::Access, &config()).is_err());
        assert!(verify_token(&pair.refresh, TokenType::Refresh, &config()).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = generate_token(Uuid::new_v4(), TokenType::Access, &config()).unwrap();
        let other = JwtConfig { secret: "other".to_string(), ..config() };
        assert!(verify_token(&token, TokenType::Access, &other).is_err());
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_token_from_header("Basic xyz").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
    }
}
