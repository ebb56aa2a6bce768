use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{BookingSession, BookingStatus, NewBooking, SpotKind};
use crate::services::booking_lifecycle::PlannedTransition;
use crate::utils::errors::AppError;

/// Operaciones de persistencia que necesita el ciclo de vida de reservas
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookingSession>, AppError>;

    /// Escribir el plan solo si el estado sigue siendo `plan.expected_status`.
    ///
    /// `None` cuando el estado ya no coincide (o la reserva no existe).
    async fn apply_transition(
        &self,
        id: Uuid,
        plan: &PlannedTransition,
        now: DateTime<Utc>,
    ) -> Result<Option<BookingSession>, AppError>;
}

/// Columna de ordenación permitida en listados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingOrderField {
    #[default]
    BookingTime,
    ScheduledStartTime,
    ScheduledEndTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BookingOrder {
    pub field: BookingOrderField,
    pub descending: bool,
}

impl BookingOrder {
    /// Formato `campo` o `-campo`
    pub fn parse(raw: &str) -> Option<Self> {
        let (descending, name) = match raw.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, raw),
        };
        let field = match name {
            "booking_time" => BookingOrderField::BookingTime,
            "scheduled_start_time" => BookingOrderField::ScheduledStartTime,
            "scheduled_end_time" => BookingOrderField::ScheduledEndTime,
            _ => return None,
        };
        Some(Self { field, descending })
    }

    fn sql(&self) -> &'static str {
        match (self.field, self.descending) {
            (BookingOrderField::BookingTime, false) => " ORDER BY booking_time ASC",
            (BookingOrderField::BookingTime, true) => " ORDER BY booking_time DESC",
            (BookingOrderField::ScheduledStartTime, false) => " ORDER BY scheduled_start_time ASC",
            (BookingOrderField::ScheduledStartTime, true) => " ORDER BY scheduled_start_time DESC",
            (BookingOrderField::ScheduledEndTime, false) => " ORDER BY scheduled_end_time ASC",
            (BookingOrderField::ScheduledEndTime, true) => " ORDER BY scheduled_end_time DESC",
        }
    }
}

/// Filtros de listado de reservas
#[derive(Debug, Clone, Default)]
pub struct BookingQuery {
    /// Solo reservas de este usuario
    pub user_id: Option<Uuid>,
    /// Solo reservas sobre plazas de este anfitrión
    pub host_id: Option<Uuid>,
    pub statuses: Vec<BookingStatus>,
    pub spot_id: Option<Uuid>,
    pub spot_type: Option<SpotKind>,
    /// Solo sesiones sin hora de fin real
    pub open_only: bool,
    pub order: BookingOrder,
}

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear una reserva confirmada y contarla en el usuario, en una transacción
    pub async fn create(&self, booking: &NewBooking) -> Result<BookingSession, AppError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, BookingSession>(
            r#"
            INSERT INTO booking_sessions (
                id, user_id, spot_id, spot_type, booking_time, scheduled_start_time,
                scheduled_end_time, duration, total_cost, status, access_code
            )
            VALUES ($1, $2, $3, $4, NOW(), $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking.user_id)
        .bind(booking.spot.id())
        .bind(booking.spot.kind())
        .bind(booking.scheduled_start_time)
        .bind(booking.scheduled_end_time)
        .bind(booking.duration)
        .bind(booking.total_cost)
        .bind(BookingStatus::Confirmed)
        .bind(&booking.access_code)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET total_bookings = total_bookings + 1 WHERE id = $1")
            .bind(booking.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Reserva sobre una plaza del anfitrión, sea del tipo que sea
    pub async fn find_for_host(&self, id: Uuid, host_id: Uuid) -> Result<Option<BookingSession>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM booking_sessions WHERE id = ");
        builder.push_bind(id);
        push_host_scope(&mut builder, host_id);

        let booking = builder
            .build_query_as::<BookingSession>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn list(&self, query: &BookingQuery) -> Result<Vec<BookingSession>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM booking_sessions WHERE TRUE");

        if let Some(user_id) = query.user_id {
            builder.push(" AND user_id = ").push_bind(user_id);
        }

        if let Some(host_id) = query.host_id {
            push_host_scope(&mut builder, host_id);
        }

        if !query.statuses.is_empty() {
            builder.push(" AND status IN (");
            let mut separated = builder.separated(", ");
            for status in &query.statuses {
                separated.push_bind(*status);
            }
            separated.push_unseparated(")");
        }

        if let Some(spot_id) = query.spot_id {
            builder.push(" AND spot_id = ").push_bind(spot_id);
        }

        if let Some(spot_type) = query.spot_type {
            builder.push(" AND spot_type = ").push_bind(spot_type);
        }

        if query.open_only {
            builder.push(" AND actual_end_time IS NULL");
        }

        builder.push(query.order.sql());

        let bookings = builder
            .build_query_as::<BookingSession>()
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }
}

/// Restringir a reservas cuya plaza pertenece a `host_id`
fn push_host_scope(builder: &mut QueryBuilder<'_, Postgres>, host_id: Uuid) {
    builder
        .push(" AND ((spot_type = 'parking_spot' AND spot_id IN (SELECT id FROM parking_spots WHERE owner_id = ")
        .push_bind(host_id)
        .push(")) OR (spot_type = 'commercial_slot' AND spot_id IN (SELECT s.id FROM commercial_parking_slots s JOIN commercial_parking_facilities f ON f.id = s.facility_id WHERE f.owner_id = ")
        .push_bind(host_id)
        .push(")) OR (spot_type = 'private_slot' AND spot_id IN (SELECT s.id FROM private_parking_slots s JOIN private_parking_listings l ON l.id = s.listing_id WHERE l.owner_id = ")
        .push_bind(host_id)
        .push(")))");
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookingSession>, AppError> {
        let booking = sqlx::query_as::<_, BookingSession>("SELECT * FROM booking_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    async fn apply_transition(
        &self,
        id: Uuid,
        plan: &PlannedTransition,
        now: DateTime<Utc>,
    ) -> Result<Option<BookingSession>, AppError> {
        let booking = sqlx::query_as::<_, BookingSession>(
            r#"
            UPDATE booking_sessions
            SET status = $3, actual_start_time = $4, actual_end_time = $5,
                overstay_fee = $6, total_cost = $7, updated_at = $8
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(plan.expected_status)
        .bind(plan.new_status)
        .bind(plan.actual_start_time)
        .bind(plan.actual_end_time)
        .bind(plan.overstay_fee)
        .bind(plan.total_cost)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }
}
