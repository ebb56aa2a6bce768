use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

use crate::dto::auth_dto::{
    AuthResponse, LoginRequest, RefreshRequest, RefreshResponse, RegisterRequest, UpdateProfileRequest,
};
use crate::models::{Caller, UserResponse};
use crate::repositories::user_repository::{NewUser, ProfileChanges, UserRepository};
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::jwt::{generate_token, generate_token_pair, verify_token, JwtConfig, TokenType};

pub struct AuthController {
    repository: UserRepository,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt: JwtConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            jwt,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        if self.repository.email_exists(&email).await? {
            return Err(conflict_error("User", "email", &email));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?;

        let user = self
            .repository
            .create(&NewUser {
                email,
                name: request.name.trim().to_string(),
                phone_number: request.phone_number,
                is_host: request.is_host,
                password_hash,
            })
            .await?;

        let tokens = generate_token_pair(user.id, &self.jwt)?;
        info!("👤 Usuario registrado: {}", user.id);

        Ok(AuthResponse {
            user: user.into(),
            tokens,
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let user = self
            .repository
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;

        if !valid {
            warn!("🔒 Login fallido para {}", user.id);
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let tokens = generate_token_pair(user.id, &self.jwt)?;
        info!("🔑 Login correcto: {}", user.id);

        Ok(AuthResponse {
            user: user.into(),
            tokens,
        })
    }

    /// Nuevo token de acceso a partir de un token de refresco
    pub fn refresh(&self, request: RefreshRequest) -> Result<RefreshResponse, AppError> {
        let claims = verify_token(&request.refresh, TokenType::Refresh, &self.jwt)?;
        let access = generate_token(claims.user_id()?, TokenType::Access, &self.jwt)?;
        Ok(RefreshResponse { access })
    }

    pub async fn me(&self, caller: &Caller) -> Result<UserResponse, AppError> {
        let user = self
            .repository
            .find_by_id(caller.user_id)
            .await?
            .ok_or_else(|| not_found_error("User", &caller.user_id.to_string()))?;

        Ok(user.into())
    }

    pub async fn update_profile(&self, caller: &Caller, request: UpdateProfileRequest) -> Result<UserResponse, AppError> {
        request.validate()?;

        let changes = ProfileChanges {
            name: request.name.map(|name| name.trim().to_string()),
            phone_number: request.phone_number,
            profile_image_url: request.profile_image_url,
            is_host: request.is_host,
        };

        let user = self
            .repository
            .update_profile(caller.user_id, &changes)
            .await?
            .ok_or_else(|| not_found_error("User", &caller.user_id.to_string()))?;

        Ok(user.into())
    }

    pub async fn switch_role(&self, caller: &Caller) -> Result<UserResponse, AppError> {
        let user = self
            .repository
            .toggle_host(caller.user_id)
            .await?
            .ok_or_else(|| not_found_error("User", &caller.user_id.to_string()))?;

        info!("🔄 Usuario {} ahora es anfitrión: {}", user.id, user.is_host);
        Ok(user.into())
    }
}
