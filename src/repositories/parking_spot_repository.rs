use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::parking_dto::{CreateParkingSpotRequest, ParkingSpotFilters, UpdateParkingSpotRequest};
use crate::models::ParkingSpot;
use crate::repositories::ordering::ListOrder;
use crate::utils::errors::AppError;

pub struct ParkingSpotRepository {
    pool: PgPool,
}

impl ParkingSpotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: Uuid, request: &CreateParkingSpotRequest) -> Result<ParkingSpot, AppError> {
        let spot = sqlx::query_as::<_, ParkingSpot>(
            r#"
            INSERT INTO parking_spots (
                id, owner_id, address, latitude, longitude, spot_type, price_per_hour,
                daily_rate, monthly_rate, has_cctv, is_covered, has_ev_charging, is_accessible,
                is_24_hours, has_insurance, has_valet_service, has_car_wash, has_security_guard,
                has_water_access, access_pin
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&request.address)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(request.spot_type)
        .bind(request.price_per_hour)
        .bind(request.daily_rate)
        .bind(request.monthly_rate)
        .bind(request.has_cctv)
        .bind(request.is_covered)
        .bind(request.has_ev_charging)
        .bind(request.is_accessible)
        .bind(request.is_24_hours)
        .bind(request.has_insurance)
        .bind(request.has_valet_service)
        .bind(request.has_car_wash)
        .bind(request.has_security_guard)
        .bind(request.has_water_access)
        .bind(&request.access_pin)
        .fetch_one(&self.pool)
        .await?;

        Ok(spot)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ParkingSpot>, AppError> {
        let spot = sqlx::query_as::<_, ParkingSpot>("SELECT * FROM parking_spots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(spot)
    }

    /// Listado filtrado, más recientes primero
    pub async fn list(&self, filters: &ParkingSpotFilters, order: ListOrder) -> Result<Vec<ParkingSpot>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM parking_spots WHERE TRUE");

        if let Some(spot_type) = filters.spot_type {
            builder.push(" AND spot_type = ").push_bind(spot_type);
        }
        if let Some(is_occupied) = filters.is_occupied {
            builder.push(" AND is_occupied = ").push_bind(is_occupied);
        }
        if let Some(has_cctv) = filters.has_cctv {
            builder.push(" AND has_cctv = ").push_bind(has_cctv);
        }
        if let Some(is_covered) = filters.is_covered {
            builder.push(" AND is_covered = ").push_bind(is_covered);
        }
        if let Some(has_ev_charging) = filters.has_ev_charging {
            builder.push(" AND has_ev_charging = ").push_bind(has_ev_charging);
        }
        if let Some(is_24_hours) = filters.is_24_hours {
            builder.push(" AND is_24_hours = ").push_bind(is_24_hours);
        }
        if let Some(max_price) = filters.max_price {
            builder.push(" AND price_per_hour <= ").push_bind(max_price);
        }
        if filters.available_only {
            builder.push(" AND is_occupied = FALSE AND is_disabled = FALSE");
        }
        if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            builder.push(" AND address ILIKE ").push_bind(format!("%{}%", search));
        }

        order.push_to(&mut builder, "");

        let spots = builder.build_query_as::<ParkingSpot>().fetch_all(&self.pool).await?;
        Ok(spots)
    }

    /// Plazas libres y habilitadas
    pub async fn list_available(&self) -> Result<Vec<ParkingSpot>, AppError> {
        let spots = sqlx::query_as::<_, ParkingSpot>(
            "SELECT * FROM parking_spots WHERE is_occupied = FALSE AND is_disabled = FALSE ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(spots)
    }

    pub async fn update(&self, id: Uuid, changes: &UpdateParkingSpotRequest) -> Result<Option<ParkingSpot>, AppError> {
        let spot = sqlx::query_as::<_, ParkingSpot>(
            r#"
            UPDATE parking_spots
            SET address = COALESCE($2, address),
                latitude = COALESCE($3, latitude),
                longitude = COALESCE($4, longitude),
                spot_type = COALESCE($5, spot_type),
                price_per_hour = COALESCE($6, price_per_hour),
                daily_rate = COALESCE($7, daily_rate),
                monthly_rate = COALESCE($8, monthly_rate),
                has_cctv = COALESCE($9, has_cctv),
                is_covered = COALESCE($10, is_covered),
                has_ev_charging = COALESCE($11, has_ev_charging),
                is_accessible = COALESCE($12, is_accessible),
                is_24_hours = COALESCE($13, is_24_hours),
                has_insurance = COALESCE($14, has_insurance),
                has_valet_service = COALESCE($15, has_valet_service),
                has_car_wash = COALESCE($16, has_car_wash),
                has_security_guard = COALESCE($17, has_security_guard),
                has_water_access = COALESCE($18, has_water_access),
                is_disabled = COALESCE($19, is_disabled),
                access_pin = COALESCE($20, access_pin),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.address)
        .bind(changes.latitude)
        .bind(changes.longitude)
        .bind(changes.spot_type)
        .bind(changes.price_per_hour)
        .bind(changes.daily_rate)
        .bind(changes.monthly_rate)
        .bind(changes.has_cctv)
        .bind(changes.is_covered)
        .bind(changes.has_ev_charging)
        .bind(changes.is_accessible)
        .bind(changes.is_24_hours)
        .bind(changes.has_insurance)
        .bind(changes.has_valet_service)
        .bind(changes.has_car_wash)
        .bind(changes.has_security_guard)
        .bind(changes.has_water_access)
        .bind(changes.is_disabled)
        .bind(&changes.access_pin)
        .fetch_optional(&self.pool)
        .await?;

        Ok(spot)
    }

    /// Alternar ocupación en una sola sentencia
    pub async fn toggle_occupancy(&self, id: Uuid) -> Result<Option<ParkingSpot>, AppError> {
        let spot = sqlx::query_as::<_, ParkingSpot>(
            "UPDATE parking_spots SET is_occupied = NOT is_occupied, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(spot)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM parking_spots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
