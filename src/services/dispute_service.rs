//! Resolución de disputas
//!
//! Solo el personal resuelve, y solo disputas abiertas (`pending` o
//! `under_review`). La escritura es condicional sobre el estado abierto.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    models::{BookingSession, BookingStatus, Caller, DisputeReport},
    repositories::dispute_repository::DisputeStore,
    utils::errors::{forbidden_error, not_found_error, validation_error, AppError, AppResult},
};

/// Una disputa solo se abre sobre reservas activas o completadas
pub fn ensure_disputable(booking: &BookingSession) -> AppResult<()> {
    match booking.status {
        BookingStatus::Active | BookingStatus::Completed => Ok(()),
        other => Err(AppError::InvalidTransition {
            entity: "booking",
            operation: "dispute",
            current_status: other.as_str().to_string(),
        }),
    }
}

fn already_closed(dispute: &DisputeReport) -> AppError {
    AppError::InvalidTransition {
        entity: "dispute",
        operation: "resolve",
        current_status: dispute.status.as_str().to_string(),
    }
}

pub struct DisputeService<S> {
    store: S,
}

impl<S: DisputeStore> DisputeService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn resolve(
        &self,
        caller: &Caller,
        dispute_id: Uuid,
        resolution: &str,
        now: DateTime<Utc>,
    ) -> AppResult<DisputeReport> {
        if !caller.is_staff {
            warn!("⛔ Usuario {} intentó resolver la disputa {}", caller.user_id, dispute_id);
            return Err(forbidden_error("resolve dispute", "only staff can resolve disputes"));
        }

        let dispute = self
            .store
            .find_by_id(dispute_id)
            .await?
            .ok_or_else(|| not_found_error("Dispute", &dispute_id.to_string()))?;

        let resolution = resolution.trim();
        if resolution.is_empty() {
            return Err(validation_error("resolution", "Resolution text required"));
        }

        if !dispute.status.is_open() {
            return Err(already_closed(&dispute));
        }

        match self.store.resolve(dispute_id, resolution, now).await? {
            Some(resolved) => {
                info!("⚖️ Disputa {} resuelta por {}", dispute_id, caller.user_id);
                Ok(resolved)
            }
            None => {
                // Cerrada por otra petición entre la lectura y la escritura
                let fresh = self
                    .store
                    .find_by_id(dispute_id)
                    .await?
                    .ok_or_else(|| not_found_error("Dispute", &dispute_id.to_string()))?;
                if !fresh.status.is_open() {
                    return Err(already_closed(&fresh));
                }
                Err(AppError::Conflict(format!(
                    "Dispute {} was modified concurrently, retry the resolve operation",
                    dispute_id
                )))
            }
        }
    }
}
