use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::parking_dto::{
    CommercialSlotFilters, CreateFacilityRequest, CreateSlotsRequest, FacilityFilters, UpdateFacilityRequest,
    UpdateSlotRequest,
};
use crate::models::{commercial_slot_number, CommercialParkingFacility, CommercialParkingSlot};
use crate::repositories::ordering::ListOrder;
use crate::utils::errors::AppError;

// Recuentos derivados de plazas en cada lectura de instalación
const FACILITY_SELECT: &str = r#"
    SELECT f.*,
        (SELECT COUNT(*) FROM commercial_parking_slots s WHERE s.facility_id = f.id) AS total_slots,
        (SELECT COUNT(*) FROM commercial_parking_slots s
            WHERE s.facility_id = f.id AND s.is_occupied = FALSE AND s.is_disabled = FALSE) AS available_slots
    FROM commercial_parking_facilities f
"#;

pub struct CommercialRepository {
    pool: PgPool,
}

impl CommercialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_facility(
        &self,
        owner_id: Uuid,
        request: &CreateFacilityRequest,
    ) -> Result<CommercialParkingFacility, AppError> {
        let facility = sqlx::query_as::<_, CommercialParkingFacility>(
            r#"
            WITH inserted AS (
                INSERT INTO commercial_parking_facilities (
                    id, owner_id, name, address, latitude, longitude, facility_type,
                    default_hourly_rate, flat_day_rate, has_cctv, has_ev_charging,
                    has_valet_service, has_car_wash, is_24_hours
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                RETURNING *
            )
            SELECT inserted.*, 0::BIGINT AS total_slots, 0::BIGINT AS available_slots FROM inserted
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&request.name)
        .bind(&request.address)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(request.facility_type)
        .bind(request.default_hourly_rate)
        .bind(request.flat_day_rate)
        .bind(request.has_cctv)
        .bind(request.has_ev_charging)
        .bind(request.has_valet_service)
        .bind(request.has_car_wash)
        .bind(request.is_24_hours)
        .fetch_one(&self.pool)
        .await?;

        Ok(facility)
    }

    pub async fn find_facility(&self, id: Uuid) -> Result<Option<CommercialParkingFacility>, AppError> {
        let facility = sqlx::query_as::<_, CommercialParkingFacility>(&format!("{} WHERE f.id = $1", FACILITY_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(facility)
    }

    pub async fn list_facilities(
        &self,
        filters: &FacilityFilters,
        order: ListOrder,
    ) -> Result<Vec<CommercialParkingFacility>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(FACILITY_SELECT);
        builder.push(" WHERE TRUE");

        if let Some(facility_type) = filters.facility_type {
            builder.push(" AND f.facility_type = ").push_bind(facility_type);
        }
        if let Some(has_cctv) = filters.has_cctv {
            builder.push(" AND f.has_cctv = ").push_bind(has_cctv);
        }
        if let Some(has_ev_charging) = filters.has_ev_charging {
            builder.push(" AND f.has_ev_charging = ").push_bind(has_ev_charging);
        }
        if let Some(has_valet_service) = filters.has_valet_service {
            builder.push(" AND f.has_valet_service = ").push_bind(has_valet_service);
        }
        if let Some(is_24_hours) = filters.is_24_hours {
            builder.push(" AND f.is_24_hours = ").push_bind(is_24_hours);
        }
        if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            builder
                .push(" AND (f.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR f.address ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        order.push_to(&mut builder, "f.");

        let facilities = builder
            .build_query_as::<CommercialParkingFacility>()
            .fetch_all(&self.pool)
            .await?;

        Ok(facilities)
    }

    /// Edición parcial; los recuentos de plazas se recalculan en la lectura
    pub async fn update_facility(
        &self,
        id: Uuid,
        changes: &UpdateFacilityRequest,
    ) -> Result<Option<CommercialParkingFacility>, AppError> {
        let facility = sqlx::query_as::<_, CommercialParkingFacility>(
            r#"
            WITH updated AS (
                UPDATE commercial_parking_facilities
                SET name = COALESCE($2, name),
                    address = COALESCE($3, address),
                    latitude = COALESCE($4, latitude),
                    longitude = COALESCE($5, longitude),
                    facility_type = COALESCE($6, facility_type),
                    default_hourly_rate = COALESCE($7, default_hourly_rate),
                    flat_day_rate = COALESCE($8, flat_day_rate),
                    has_cctv = COALESCE($9, has_cctv),
                    has_ev_charging = COALESCE($10, has_ev_charging),
                    has_valet_service = COALESCE($11, has_valet_service),
                    has_car_wash = COALESCE($12, has_car_wash),
                    is_24_hours = COALESCE($13, is_24_hours),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT updated.*,
                (SELECT COUNT(*) FROM commercial_parking_slots s WHERE s.facility_id = updated.id) AS total_slots,
                (SELECT COUNT(*) FROM commercial_parking_slots s
                    WHERE s.facility_id = updated.id AND s.is_occupied = FALSE AND s.is_disabled = FALSE) AS available_slots
            FROM updated
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.address)
        .bind(changes.latitude)
        .bind(changes.longitude)
        .bind(changes.facility_type)
        .bind(changes.default_hourly_rate)
        .bind(changes.flat_day_rate)
        .bind(changes.has_cctv)
        .bind(changes.has_ev_charging)
        .bind(changes.has_valet_service)
        .bind(changes.has_car_wash)
        .bind(changes.is_24_hours)
        .fetch_optional(&self.pool)
        .await?;

        Ok(facility)
    }

    pub async fn delete_facility(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM commercial_parking_facilities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_slots(
        &self,
        facility_id: Uuid,
        filters: &CommercialSlotFilters,
    ) -> Result<Vec<CommercialParkingSlot>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM commercial_parking_slots WHERE facility_id = ");
        builder.push_bind(facility_id);

        if let Some(floor) = filters.floor {
            builder.push(" AND floor = ").push_bind(floor);
        }
        if let Some(slot_type) = filters.slot_type {
            builder.push(" AND slot_type = ").push_bind(slot_type);
        }
        if filters.available_only {
            builder.push(" AND is_occupied = FALSE AND is_disabled = FALSE");
        }

        builder.push(" ORDER BY floor, created_at, slot_number");

        let slots = builder
            .build_query_as::<CommercialParkingSlot>()
            .fetch_all(&self.pool)
            .await?;

        Ok(slots)
    }

    /// Alta masiva en una planta, numerando a continuación de las existentes.
    ///
    /// La fila de la instalación se bloquea para que dos altas simultáneas en
    /// la misma instalación no calculen la misma numeración.
    pub async fn create_slots(
        &self,
        facility_id: Uuid,
        request: &CreateSlotsRequest,
    ) -> Result<Vec<CommercialParkingSlot>, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM commercial_parking_facilities WHERE id = $1 FOR UPDATE")
            .bind(facility_id)
            .execute(&mut *tx)
            .await?;

        let (existing,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM commercial_parking_slots WHERE facility_id = $1 AND floor = $2")
                .bind(facility_id)
                .bind(request.floor)
                .fetch_one(&mut *tx)
                .await?;

        let numbers: Vec<String> = (1..=request.count)
            .map(|offset| commercial_slot_number(request.floor, existing + offset))
            .collect();

        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO commercial_parking_slots (id, facility_id, slot_number, floor, slot_type) ",
        );
        builder.push_values(&numbers, |mut row, number| {
            row.push_bind(Uuid::new_v4())
                .push_bind(facility_id)
                .push_bind(number.clone())
                .push_bind(request.floor)
                .push_bind(request.slot_type);
        });
        builder.push(" RETURNING *");

        let slots = builder
            .build_query_as::<CommercialParkingSlot>()
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(slots)
    }

    /// Dueño de la instalación a la que pertenece la plaza
    pub async fn slot_owner(&self, slot_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let owner: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT f.owner_id
            FROM commercial_parking_slots s
            JOIN commercial_parking_facilities f ON f.id = s.facility_id
            WHERE s.id = $1
            "#,
        )
        .bind(slot_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner.map(|(id,)| id))
    }

    pub async fn find_slot(&self, id: Uuid) -> Result<Option<CommercialParkingSlot>, AppError> {
        let slot = sqlx::query_as::<_, CommercialParkingSlot>("SELECT * FROM commercial_parking_slots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(slot)
    }

    pub async fn update_slot(
        &self,
        id: Uuid,
        changes: &UpdateSlotRequest,
    ) -> Result<Option<CommercialParkingSlot>, AppError> {
        let slot = sqlx::query_as::<_, CommercialParkingSlot>(
            r#"
            UPDATE commercial_parking_slots
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
