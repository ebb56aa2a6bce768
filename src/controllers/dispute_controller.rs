use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::dispute_dto::{CreateDisputeRequest, DisputeFilters, ResolveDisputeRequest};
use crate::models::{Caller, DisputeReport};
use crate::repositories::booking_repository::{BookingRepository, BookingStore};
use crate::repositories::dispute_repository::{DisputeQuery, DisputeRepository, DisputeStore};
use crate::services::dispute_service::{ensure_disputable, DisputeService};
use crate::utils::errors::{not_found_error, AppError};

pub struct DisputeController {
    service: DisputeService<DisputeRepository>,
    bookings: BookingRepository,
}

impl DisputeController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: DisputeService::new(DisputeRepository::new(pool.clone())),
            bookings: BookingRepository::new(pool),
        }
    }

    fn repository(&self) -> &DisputeRepository {
        self.service.store()
    }

    pub async fn list(&self, caller: &Caller, filters: DisputeFilters) -> Result<Vec<DisputeReport>, AppError> {
        let query = DisputeQuery {
            booking_owner: (!caller.is_staff).then_some(caller.user_id),
            booking_id: filters.booking_id,
            status: filters.status,
        };
        self.repository().list(&query).await
    }

    pub async fn create(&self, caller: &Caller, request: CreateDisputeRequest) -> Result<DisputeReport, AppError> {
        request.validate()?;

        let booking = match self.bookings.find_by_id(request.booking_id).await? {
            Some(booking) if caller.can_access(booking.user_id) => booking,
            _ => return Err(not_found_error("Booking", &request.booking_id.to_string())),
        };
        ensure_disputable(&booking)?;

        let dispute = self
            .repository()
            .create(
                booking.id,
                request.reason.trim(),
                request.description.trim(),
                &request.photo_urls,
            )
            .await?;

        info!("⚠️ Disputa {} abierta sobre la reserva {}", dispute.id, booking.id);
        Ok(dispute)
    }

    pub async fn get(&self, caller: &Caller, id: Uuid) -> Result<DisputeReport, AppError> {
        let dispute = self
            .repository()
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Dispute", &id.to_string()))?;

        if !caller.is_staff {
            let owns_booking = self
                .bookings
                .find_by_id(dispute.booking_id)
                .await?
                .is_some_and(|booking| booking.user_id == caller.user_id);
            if !owns_booking {
                return Err(not_found_error("Dispute", &id.to_string()));
            }
        }

        Ok(dispute)
    }

    pub async fn resolve(
        &self,
        caller: &Caller,
        id: Uuid,
        request: ResolveDisputeRequest,
    ) -> Result<DisputeReport, AppError> {
        let resolution = request.resolution.unwrap_or_default();
        self.service.resolve(caller, id, &resolution, Utc::now()).await
    }
}
