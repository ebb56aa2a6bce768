use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::parking_dto::{
    CreatePrivateListingRequest, PrivateListingFilters, UpdatePrivateListingRequest, UpdateSlotRequest,
};
use crate::models::{PrivateParkingListing, PrivateParkingSlot};
use crate::repositories::ordering::ListOrder;
use crate::utils::errors::AppError;

const LISTING_SELECT: &str = r#"
    SELECT l.*,
        (l.total_slots - (SELECT COUNT(*) FROM private_parking_slots s
            WHERE s.listing_id = l.id AND s.is_occupied = TRUE))::BIGINT AS available_slots
    FROM private_parking_listings l
"#;

pub struct PrivateListingRepository {
    pool: PgPool,
}

impl PrivateListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear el anuncio junto con sus plazas numeradas 1..=total_slots
    pub async fn create(
        &self,
        owner_id: Uuid,
        request: &CreatePrivateListingRequest,
    ) -> Result<PrivateParkingListing, AppError> {
        let mut tx = self.pool.begin().await?;
        let listing_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO private_parking_listings (
                id, owner_id, title, address, latitude, longitude, description, total_slots,
                hourly_rate, daily_rate, monthly_rate, flat_full_booking_rate, auto_accept_bookings,
                instant_booking_discount, has_cctv, is_covered, has_ev_charging, has_security_guard,
                has_water_access, is_24_hours, available_from, available_to, max_booking_duration
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18,
                    $19, $20, $21, $22, $23)
            "#,
        )
        .bind(listing_id)
        .bind(owner_id)
        .bind(&request.title)
        .bind(&request.address)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(&request.description)
        .bind(request.total_slots)
        .bind(request.hourly_rate)
        .bind(request.daily_rate)
        .bind(request.monthly_rate)
        .bind(request.flat_full_booking_rate)
        .bind(request.auto_accept_bookings)
        .bind(request.instant_booking_discount)
        .bind(request.has_cctv)
        .bind(request.is_covered)
        .bind(request.has_ev_charging)
        .bind(request.has_security_guard)
        .bind(request.has_water_access)
        .bind(request.is_24_hours)
        .bind(request.available_from)
        .bind(request.available_to)
        .bind(request.max_booking_duration)
        .execute(&mut *tx)
        .await?;

        let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO private_parking_slots (id, listing_id, slot_number) ");
        builder.push_values(1..=request.total_slots, |mut row, number| {
            row.push_bind(Uuid::new_v4()).push_bind(listing_id).push_bind(number);
        });
        builder.build().execute(&mut *tx).await?;

        let listing = sqlx::query_as::<_, PrivateParkingListing>(&format!("{} WHERE l.id = $1", LISTING_SELECT))
            .bind(listing_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(listing)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PrivateParkingListing>, AppError> {
        let listing = sqlx::query_as::<_, PrivateParkingListing>(&format!("{} WHERE l.id = $1", LISTING_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(listing)
    }

    pub async fn list(
        &self,
        filters: &PrivateListingFilters,
        order: ListOrder,
    ) -> Result<Vec<PrivateParkingListing>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(LISTING_SELECT);
        builder.push(" WHERE TRUE");

        if let Some(has_cctv) = filters.has_cctv {
            builder.push(" AND l.has_cctv = ").push_bind(has_cctv);
        }
        if let Some(is_covered) = filters.is_covered {
            builder.push(" AND l.is_covered = ").push_bind(is_covered);
        }
        if let Some(has_ev_charging) = filters.has_ev_charging {
            builder.push(" AND l.has_ev_charging = ").push_bind(has_ev_charging);
        }
        if let Some(is_24_hours) = filters.is_24_hours {
            builder.push(" AND l.is_24_hours = ").push_bind(is_24_hours);
        }
        if let Some(auto_accept) = filters.auto_accept_bookings {
            builder.push(" AND l.auto_accept_bookings = ").push_bind(auto_accept);
        }
        if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            builder
                .push(" AND (l.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR l.address ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR l.description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        order.push_to(&mut builder, "l.");

        let listings = builder
            .build_query_as::<PrivateParkingListing>()
            .fetch_all(&self.pool)
            .await?;

        Ok(listings)
    }

    /// Edición parcial del anuncio; sus plazas no se tocan
    pub async fn update(
        &self,
        id: Uuid,
        changes: &UpdatePrivateListingRequest,
    ) -> Result<Option<PrivateParkingListing>, AppError> {
        let updated = sqlx::query(
            r#"
            UPDATE private_parking_listings
            SET title = COALESCE($2, title),
                address = COALESCE($3, address),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                description = COALESCE($6, description),
                hourly_rate = COALESCE($7, hourly_rate),
                daily_rate = COALESCE($8, daily_rate),
                monthly_rate = COALESCE($9, monthly_rate),
                flat_full_booking_rate = COALESCE($10, flat_full_booking_rate),
                auto_accept_bookings = COALESCE($11, auto_accept_bookings),
                instant_booking_discount = COALESCE($12, instant_booking_discount),
                has_cctv = COALESCE($13, has_cctv),
                is_covered = COALESCE($14, is_covered),
                has_ev_charging = COALESCE($15, has_ev_charging),
                has_security_guard = COALESCE($16, has_security_guard),
                has_water_access = COALESCE($17, has_water_access),
                is_24_hours = COALESCE($18, is_24_hours),
                available_from = COALESCE($19, available_from),
                available_to = COALESCE($20, available_to),
                max_booking_duration = COALESCE($21, max_booking_duration),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.address)
        .bind(changes.latitude)
        .bind(changes.longitude)
        .bind(&changes.description)
        .bind(changes.hourly_rate)
        .bind(changes.daily_rate)
        .bind(changes.monthly_rate)
        .bind(changes.flat_full_booking_rate)
        .bind(changes.auto_accept_bookings)
        .bind(changes.instant_booking_discount)
        .bind(changes.has_cctv)
        .bind(changes.is_covered)
        .bind(changes.has_ev_charging)
        .bind(changes.has_security_guard)
        .bind(changes.has_water_access)
        .bind(changes.is_24_hours)
        .bind(changes.available_from)
        .bind(changes.available_to)
        .bind(changes.max_booking_duration)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// Todos los anuncios salvo `exclude`, candidatos del análisis de precios
    pub async fn list_others(&self, exclude: Uuid) -> Result<Vec<PrivateParkingListing>, AppError> {
        let listings = sqlx::query_as::<_, PrivateParkingListing>(&format!("{} WHERE l.id <> $1", LISTING_SELECT))
            .bind(exclude)
            .fetch_all(&self.pool)
            .await?;

        Ok(listings)
    }

    pub async fn set_suggested_rate(&self, id: Uuid, rate: Decimal) -> Result<(), AppError> {
        sqlx::query("UPDATE private_parking_listings SET suggested_hourly_rate = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(rate)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM private_parking_listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_slots(&self, listing_id: Uuid) -> Result<Vec<PrivateParkingSlot>, AppError> {
        let slots = sqlx::query_as::<_, PrivateParkingSlot>(
            "SELECT * FROM private_parking_slots WHERE listing_id = $1 ORDER BY slot_number",
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }

    pub async fn find_slot(&self, id: Uuid) -> Result<Option<PrivateParkingSlot>, AppError> {
        let slot = sqlx::query_as::<_, PrivateParkingSlot>("SELECT * FROM private_parking_slots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(slot)
    }

    /// Dueño del anuncio al que pertenece la plaza
    pub async fn slot_owner(&self, slot_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let owner: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT l.owner_id
            FROM private_parking_slots s
            JOIN private_parking_listings l ON l.id = s.listing_id
            WHERE s.id = $1
            "#,
        )
        .bind(slot_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner.map(|(id,)| id))
    }

    pub async fn update_slot(&self, id: Uuid, changes: &UpdateSlotRequest) -> Result<Option<PrivateParkingSlot>, AppError> {
        let slot = sqlx::query_as::<_, PrivateParkingSlot>(
            r#"
            UPDATE private_parking_slots
            SET is_occupied = COALESCE($2, is_occupied),
                is_disabled = COALESCE($3, is_disabled),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.is_occupied)
        .bind(changes.is_disabled)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slot)
    }
}
