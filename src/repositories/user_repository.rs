use sqlx::PgPool;
use uuid::Uuid;

use crate::models::User;
use crate::utils::errors::{conflict_error, AppError};

/// Datos de registro con la contraseña ya hasheada
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub is_host: bool,
    pub password_hash: String,
}

/// Cambios parciales de perfil
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_image_url: Option<String>,
    pub is_host: Option<bool>,
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar un usuario; un email repetido es `Conflict` aunque dos
    /// registros concurrentes pasen la comprobación previa
    pub async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, phone_number, is_host, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.phone_number)
        .bind(user.is_host)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(created) => Ok(created),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(conflict_error("User", "email", &user.email))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    pub async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                phone_number = COALESCE($3, phone_number),
                profile_image_url = COALESCE($4, profile_image_url),
                is_host = COALESCE($5, is_host)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.phone_number)
        .bind(&changes.profile_image_url)
        .bind(changes.is_host)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Alternar entre conductor y anfitrión
    pub async fn toggle_host(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("UPDATE users SET is_host = NOT is_host WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}
