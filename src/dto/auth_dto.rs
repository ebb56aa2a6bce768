use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserResponse;
use crate::utils::jwt::TokenPair;
use crate::utils::validation::{validate_phone, validate_required_text};

// Registro de usuario
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(custom = "validate_phone")]
    pub phone_number: Option<String>,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(must_match = "password")]
    pub password_confirm: String,
    #[serde(default)]
    pub is_host: bool,
}

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom = "validate_required_text")]
    #[serde(default)]
    pub email: String,
    #[validate(custom = "validate_required_text")]
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

// Usuario junto con sus tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokenPair,
}

// Actualización parcial de perfil
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone_number: Option<String>,
    #[validate(url)]
    pub profile_image_url: Option<String>,
    pub is_host: Option<bool>,
}
