//! Modelo de BookingSession
//!
//! Una reserva apunta a una de tres variantes reservables mediante el par
//! (spot_id, spot_type) de la tabla `booking_sessions`; en Rust ese par se
//! expone como la suma `SpotRef`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

/// Estado de la reserva - mapea al ENUM booking_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
    Disputed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Disputed => "disputed",
        }
    }

    /// Estados finales del flujo normal
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Etiqueta de variante almacenada en `spot_type` - mapea al ENUM spot_kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "spot_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SpotKind {
    ParkingSpot,
    CommercialSlot,
    PrivateSlot,
}

/// Referencia a la unidad reservada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpotRef {
    Spot(Uuid),
    CommercialSlot(Uuid),
    PrivateSlot(Uuid),
}

impl SpotRef {
    pub fn new(kind: SpotKind, id: Uuid) -> Self {
        match kind {
            SpotKind::ParkingSpot => SpotRef::Spot(id),
            SpotKind::CommercialSlot => SpotRef::CommercialSlot(id),
            SpotKind::PrivateSlot => SpotRef::PrivateSlot(id),
        }
    }

    pub fn kind(&self) -> SpotKind {
        match self {
            SpotRef::Spot(_) => SpotKind::ParkingSpot,
            SpotRef::CommercialSlot(_) => SpotKind::CommercialSlot,
            SpotRef::PrivateSlot(_) => SpotKind::PrivateSlot,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            SpotRef::Spot(id) | SpotRef::CommercialSlot(id) | SpotRef::PrivateSlot(id) => *id,
        }
    }
}

/// Reserva - mapea exactamente a la tabla booking_sessions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub spot_id: Uuid,
    pub spot_type: SpotKind,
    pub booking_time: DateTime<Utc>,
    pub scheduled_start_time: DateTime<Utc>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub scheduled_end_time: DateTime<Utc>,
    pub actual_end_time: Option<DateTime<Utc>>,
    /// Horas
    pub duration: Decimal,
    pub total_cost: Decimal,
    pub overstay_fee: Option<Decimal>,
    pub status: BookingStatus,
    pub access_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingSession {
    pub fn spot(&self) -> SpotRef {
        SpotRef::new(self.spot_type, self.spot_id)
    }
}

/// Datos de una reserva nueva ya validados
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub spot: SpotRef,
    pub scheduled_start_time: DateTime<Utc>,
    pub scheduled_end_time: DateTime<Utc>,
    pub duration: Decimal,
    pub total_cost: Decimal,
    pub access_code: String,
}
