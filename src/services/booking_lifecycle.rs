//! Ciclo de vida de las reservas
//!
//! `plan_transition` decide, sin efectos, qué columnas cambia una operación
//! (start, end, cancel) y calcula el recargo por exceso de tiempo. El servicio
//! aplica el plan con un compare-and-swap sobre el estado esperado, de modo
//! que dos peticiones concurrentes no pueden aplicar la misma transición.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::EnvironmentConfig,
    models::{BookingSession, BookingStatus, Caller},
    repositories::booking_repository::BookingStore,
    utils::errors::{not_found_error, AppError, AppResult},
};

/// Operaciones que mutan una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingOperation {
    Start,
    End,
    Cancel,
}

impl BookingOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingOperation::Start => "start",
            BookingOperation::End => "end",
            BookingOperation::Cancel => "cancel",
        }
    }
}

impl fmt::Display for BookingOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot {operation} a booking in status '{current}'")]
    InvalidTransition {
        operation: BookingOperation,
        current: BookingStatus,
    },
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::InvalidTransition { operation, current } => AppError::InvalidTransition {
                entity: "booking",
                operation: operation.as_str(),
                current_status: current.as_str().to_string(),
            },
        }
    }
}

/// Tarifa por bloques de exceso de tiempo
#[derive(Debug, Clone, PartialEq)]
pub struct OverstayPolicy {
    pub block_minutes: i64,
    pub fee_per_block: Decimal,
}

impl Default for OverstayPolicy {
    fn default() -> Self {
        Self {
            block_minutes: 15,
            fee_per_block: Decimal::new(20, 0),
        }
    }
}

impl From<&EnvironmentConfig> for OverstayPolicy {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            block_minutes: config.overstay_block_minutes,
            fee_per_block: config.overstay_fee_per_block,
        }
    }
}

impl OverstayPolicy {
    /// Recargo por salir después del fin programado.
    ///
    /// `None` si no hubo exceso; solo se facturan bloques completos, así que
    /// un exceso menor que un bloque devuelve `Some(0)`.
    pub fn fee_for(&self, scheduled_end: DateTime<Utc>, actual_end: DateTime<Utc>) -> Option<Decimal> {
        if actual_end <= scheduled_end {
            return None;
        }
        let overstay_seconds = (actual_end - scheduled_end).num_seconds();
        let billable_blocks = overstay_seconds / (self.block_minutes * 60);
        Some(Decimal::from(billable_blocks) * self.fee_per_block)
    }
}

/// Valores que una transición escribe, junto con el estado que espera encontrar
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTransition {
    pub operation: BookingOperation,
    pub expected_status: BookingStatus,
    pub new_status: BookingStatus,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
    pub overstay_fee: Option<Decimal>,
    pub total_cost: Decimal,
}

impl PlannedTransition {
    /// Aplicar el plan a una copia en memoria
    pub fn apply_to(&self, booking: &BookingSession, now: DateTime<Utc>) -> BookingSession {
        BookingSession {
            status: self.new_status,
            actual_start_time: self.actual_start_time,
            actual_end_time: self.actual_end_time,
            overstay_fee: self.overstay_fee,
            total_cost: self.total_cost,
            updated_at: now,
            ..booking.clone()
        }
    }
}

/// Calcular la transición sin tocar la base de datos
pub fn plan_transition(
    booking: &BookingSession,
    operation: BookingOperation,
    now: DateTime<Utc>,
    policy: &OverstayPolicy,
) -> Result<PlannedTransition, LifecycleError> {
    let rejected = || LifecycleError::InvalidTransition {
        operation,
        current: booking.status,
    };

    let mut plan = PlannedTransition {
        operation,
        expected_status: booking.status,
        new_status: booking.status,
        actual_start_time: booking.actual_start_time,
        actual_end_time: booking.actual_end_time,
        overstay_fee: booking.overstay_fee,
        total_cost: booking.total_cost,
    };

    match operation {
        BookingOperation::Start => {
            if booking.status != BookingStatus::Confirmed {
                return Err(rejected());
            }
            plan.new_status = BookingStatus::Active;
            plan.actual_start_time = Some(now);
        }
        BookingOperation::End => {
            if booking.status != BookingStatus::Active {
                return Err(rejected());
            }
            plan.new_status = BookingStatus::Completed;
            plan.actual_end_time = Some(now);

            if let Some(fee) = policy.fee_for(booking.scheduled_end_time, now) {
                plan.overstay_fee = Some(fee);
                plan.total_cost = booking.total_cost + fee;
            }
        }
        BookingOperation::Cancel => {
            if booking.status.is_terminal() {
                return Err(rejected());
            }
            plan.new_status = BookingStatus::Cancelled;
        }
    }

    Ok(plan)
}

/// Servicio que aplica transiciones sobre un `BookingStore`
pub struct BookingLifecycleService<S> {
    store: S,
    policy: OverstayPolicy,
}

impl<S: BookingStore> BookingLifecycleService<S> {
    pub fn new(store: S, policy: OverstayPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Cargar una reserva visible para quien llama.
    ///
    /// Las reservas ajenas se comportan como inexistentes para quien no es staff.
    pub async fn load_visible(&self, caller: &Caller, booking_id: Uuid) -> AppResult<BookingSession> {
        match self.store.find_by_id(booking_id).await? {
            Some(booking) if caller.can_access(booking.user_id) => Ok(booking),
            _ => Err(not_found_error("Booking", &booking_id.to_string())),
        }
    }

    pub async fn start(&self, caller: &Caller, booking_id: Uuid, now: DateTime<Utc>) -> AppResult<BookingSession> {
        self.apply(caller, booking_id, BookingOperation::Start, now).await
    }

    pub async fn end(&self, caller: &Caller, booking_id: Uuid, now: DateTime<Utc>) -> AppResult<BookingSession> {
        self.apply(caller, booking_id, BookingOperation::End, now).await
    }

    pub async fn cancel(&self, caller: &Caller, booking_id: Uuid, now: DateTime<Utc>) -> AppResult<BookingSession> {
        self.apply(caller, booking_id, BookingOperation::Cancel, now).await
    }

    /// Aplicar una operación con compare-and-swap sobre el estado
    pub async fn apply(
        &self,
        caller: &Caller,
        booking_id: Uuid,
        operation: BookingOperation,
        now: DateTime<Utc>,
    ) -> AppResult<BookingSession> {
        let booking = self.load_visible(caller, booking_id).await?;
        let plan = plan_transition(&booking, operation, now, &self.policy)?;

        if let Some(updated) = self.store.apply_transition(booking_id, &plan, now).await? {
            info!(
                "🅿️ Reserva {} {}: {} -> {}",
                booking_id, operation, plan.expected_status, plan.new_status
            );
            if let Some(fee) = updated.overstay_fee {
                info!("⏱️ Reserva {} con recargo por exceso de {}", booking_id, fee);
            }
            return Ok(updated);
        }

        // Otra petición cambió el estado entre la lectura y la escritura
        let fresh = self
            .store
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &booking_id.to_string()))?;
        plan_transition(&fresh, operation, now, &self.policy)?;

        warn!(
            "⚠️ Reserva {} modificada concurrentemente durante {}",
            booking_id, operation
        );
        Err(AppError::Conflict(format!(
            "Booking {} was modified concurrently, retry the {} operation",
            booking_id, operation
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn policy() -> OverstayPolicy {
        OverstayPolicy::default()
    }

    #[test]
    fn test_fee_for_no_overstay() {
        let end = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(policy().fee_for(end, end), None);
        assert_eq!(policy().fee_for(end, end - Duration::minutes(5)), None);
    }

    #[test]
    fn test_fee_for_partial_and_full_blocks() {
        let end = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(policy().fee_for(end, end + Duration::minutes(10)), Some(Decimal::ZERO));
        assert_eq!(
            policy().fee_for(end, end + Duration::minutes(14) + Duration::seconds(59)),
            Some(Decimal::ZERO)
        );
        assert_eq!(policy().fee_for(end, end + Duration::minutes(15)), Some(Decimal::new(20, 0)));
        assert_eq!(policy().fee_for(end, end + Duration::minutes(46)), Some(Decimal::new(60, 0)));
    }

    #[test]
    fn test_fee_for_custom_policy() {
        let end = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let custom = OverstayPolicy { block_minutes: 30, fee_per_block: Decimal::new(5050, 2) };
        assert_eq!(custom.fee_for(end, end + Duration::minutes(61)), Some(Decimal::new(10100, 2)));
    }
}
