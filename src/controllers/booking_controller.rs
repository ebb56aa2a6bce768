use chrono::Utc;
use rand::Rng;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::booking_dto::{BookingFilters, CreateBookingRequest};
use crate::models::{BookingSession, BookingStatus, Caller, NewBooking};
use crate::repositories::booking_repository::{BookingOrder, BookingOrderField, BookingQuery, BookingRepository};
use crate::services::booking_lifecycle::{BookingLifecycleService, BookingOperation, OverstayPolicy};
use crate::services::spot_resolver::SpotResolver;
use crate::utils::errors::{validation_error, AppError};

/// Código de acceso de 6 dígitos
pub fn generate_access_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

pub struct BookingController {
    lifecycle: BookingLifecycleService<BookingRepository>,
    resolver: SpotResolver,
}

impl BookingController {
    pub fn new(pool: PgPool, policy: OverstayPolicy) -> Self {
        Self {
            lifecycle: BookingLifecycleService::new(BookingRepository::new(pool.clone()), policy),
            resolver: SpotResolver::new(pool),
        }
    }

    fn repository(&self) -> &BookingRepository {
        self.lifecycle.store()
    }

    /// Alcance de listado: propias, o sobre plazas propias con `host_spots`
    fn scoped_query(caller: &Caller, host_spots: bool) -> BookingQuery {
        let mut query = BookingQuery::default();
        if host_spots && caller.is_host {
            query.host_id = Some(caller.user_id);
        } else if !caller.is_staff {
            query.user_id = Some(caller.user_id);
        }
        query
    }

    pub async fn create(&self, caller: &Caller, request: CreateBookingRequest) -> Result<BookingSession, AppError> {
        request.validate()?;

        let spot = self.resolver.resolve(request.spot()).await?.ensure_bookable()?;

        let booking = self
            .repository()
            .create(&NewBooking {
                user_id: caller.user_id,
                spot: request.spot(),
                scheduled_start_time: request.scheduled_start_time,
                scheduled_end_time: request.scheduled_end_time,
                duration: request.duration,
                total_cost: request.total_cost,
                access_code: request.access_code.unwrap_or_else(generate_access_code),
            })
            .await?;

        info!(
            "📅 Reserva {} confirmada para {} en {:?} {}",
            booking.id,
            caller.user_id,
            booking.spot_type,
            spot.id()
        );
        Ok(booking)
    }

    pub async fn list(&self, caller: &Caller, filters: BookingFilters) -> Result<Vec<BookingSession>, AppError> {
        let mut query = Self::scoped_query(caller, filters.host_spots);
        query.statuses = filters.status.into_iter().collect();
        query.spot_id = filters.spot_id;
        query.spot_type = filters.spot_type;
        if let Some(raw) = filters.ordering.as_deref() {
            query.order = BookingOrder::parse(raw)
                .ok_or_else(|| validation_error("ordering", "Unsupported ordering field"))?;
        }

        self.repository().list(&query).await
    }

    /// Sesiones en curso
    pub async fn active(&self, caller: &Caller) -> Result<Vec<BookingSession>, AppError> {
        let mut query = Self::scoped_query(caller, false);
        query.statuses = vec![BookingStatus::Active];
        query.open_only = true;
        self.repository().list(&query).await
    }

    /// Completadas o canceladas, las más recientes primero
    pub async fn history(&self, caller: &Caller) -> Result<Vec<BookingSession>, AppError> {
        let mut query = Self::scoped_query(caller, false);
        query.statuses = vec![BookingStatus::Completed, BookingStatus::Cancelled];
        query.order = BookingOrder {
            field: BookingOrderField::BookingTime,
            descending: true,
        };
        self.repository().list(&query).await
    }

    /// Detalle de una reserva: propia, de staff, o sobre una plaza del
    /// anfitrión. Las transiciones siguen reservadas al dueño y a staff.
    pub async fn get(&self, caller: &Caller, id: Uuid) -> Result<BookingSession, AppError> {
        match self.lifecycle.load_visible(caller, id).await {
            Err(AppError::NotFound(message)) if caller.is_host => self
                .repository()
                .find_for_host(id, caller.user_id)
                .await?
                .ok_or(AppError::NotFound(message)),
            other => other,
        }
    }

    pub async fn transition(
        &self,
        caller: &Caller,
        id: Uuid,
        operation: BookingOperation,
    ) -> Result<BookingSession, AppError> {
        self.lifecycle.apply(caller, id, operation, Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_code_is_six_digits() {
        for _ in 0..50 {
            let code = generate_access_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_scoped_query() {
        let driver = Caller { user_id: Uuid::new_v4(), is_staff: false, is_host: false };
        let host = Caller { user_id: Uuid::new_v4(), is_staff: false, is_host: true };
        let staff = Caller { user_id: Uuid::new_v4(), is_staff: true, is_host: false };

        assert_eq!(BookingController::scoped_query(&driver, true).user_id, Some(driver.user_id));
        assert_eq!(BookingController::scoped_query(&host, true).host_id, Some(host.user_id));
        assert_eq!(BookingController::scoped_query(&host, true).user_id, None);
        assert_eq!(BookingController::scoped_query(&staff, false).user_id, None);
    }
}
