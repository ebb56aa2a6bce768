//! Modelo de User
//!
//! Conductores y anfitriones comparten la misma tabla `users`; el personal
//! (`is_staff`) resuelve disputas y ve todas las reservas.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// User - mapea exactamente a la tabla users
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub profile_image_url: Option<String>,
    pub is_host: bool,
    pub is_staff: bool,
    pub host_rating: Decimal,
    pub total_bookings: i32,
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

impl User {
    pub fn caller(&self) -> Caller {
        Caller {
            user_id: self.id,
            is_staff: self.is_staff,
            is_host: self.is_host,
        }
    }
}

/// Identidad explícita de quien hace la petición
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub is_staff: bool,
    pub is_host: bool,
}

impl Caller {
    /// El dueño del recurso o el personal
    pub fn can_access(&self, owner_id: Uuid) -> bool {
        self.is_staff || self.user_id == owner_id
    }
}

/// Response de usuario para la API (sin hash de contraseña)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub profile_image_url: Option<String>,
    pub is_host: bool,
    pub host_rating: Decimal,
    pub total_bookings: i32,
    pub date_joined: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone_number: user.phone_number,
            profile_image_url: user.profile_image_url,
            is_host: user.is_host,
            host_rating: user.host_rating,
            total_bookings: user.total_bookings,
            date_joined: user.date_joined,
        }
    }
}
