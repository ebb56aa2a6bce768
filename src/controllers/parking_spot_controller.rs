use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{query_point, with_distances, WithDistance};
use crate::dto::parking_dto::{
    CreateParkingSpotRequest, NearbyQuery, OccupancyResponse, ParkingSpotFilters, UpdateParkingSpotRequest,
};
use crate::models::{Caller, ParkingSpot};
use crate::repositories::ordering::{ListOrder, SPOT_ORDER_FIELDS};
use crate::repositories::parking_spot_repository::ParkingSpotRepository;
use crate::utils::errors::{forbidden_error, not_found_error, validation_error, AppError};

pub struct ParkingSpotController {
    repository: ParkingSpotRepository,
}

impl ParkingSpotController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ParkingSpotRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: ParkingSpotFilters) -> Result<Vec<WithDistance<ParkingSpot>>, AppError> {
        let point = query_point(filters.lat, filters.lon)?;
        let order = ListOrder::from_query(filters.ordering.as_deref(), SPOT_ORDER_FIELDS)?;
        let spots = self.repository.list(&filters, order).await?;
        with_distances(spots, point, None)
    }

    /// Plazas disponibles dentro del radio, las más cercanas primero
    pub async fn nearby(
        &self,
        query: NearbyQuery,
        default_radius: f64,
    ) -> Result<Vec<WithDistance<ParkingSpot>>, AppError> {
        let (Some(lat), Some(lon)) = (query.lat, query.lon) else {
            return Err(validation_error("lat", "Latitude and longitude required"));
        };
        let point = query_point(Some(lat), Some(lon))?;
        let radius = query.radius.unwrap_or(default_radius);

        let spots = self.repository.list_available().await?;
        with_distances(spots, point, Some(radius))
    }

    pub async fn get(&self, id: Uuid) -> Result<ParkingSpot, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Parking spot", &id.to_string()))
    }

    pub async fn create(&self, caller: &Caller, request: CreateParkingSpotRequest) -> Result<ParkingSpot, AppError> {
        request.validate()?;
        let spot = self.repository.create(caller.user_id, &request).await?;
        info!("🅿️ Plaza {} publicada por {}", spot.id, caller.user_id);
        Ok(spot)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        request: UpdateParkingSpotRequest,
    ) -> Result<ParkingSpot, AppError> {
        request.validate()?;
        self.ensure_owner(caller, id, "update parking spot").await?;

        self.repository
            .update(id, &request)
            .await?
            .ok_or_else(|| not_found_error("Parking spot", &id.to_string()))
    }

    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        self.ensure_owner(caller, id, "delete parking spot").await?;

        if !self.repository.delete(id).await? {
            return Err(not_found_error("Parking spot", &id.to_string()));
        }
        info!("🗑️ Plaza {} eliminada", id);
        Ok(())
    }

    pub async fn toggle_occupancy(&self, caller: &Caller, id: Uuid) -> Result<OccupancyResponse, AppError> {
        self.ensure_owner(caller, id, "toggle occupancy").await?;

        let spot = self
            .repository
            .toggle_occupancy(id)
            .await?
            .ok_or_else(|| not_found_error("Parking spot", &id.to_string()))?;

        Ok(OccupancyResponse::new(spot.is_occupied))
    }

    async fn ensure_owner(&self, caller: &Caller, id: Uuid, operation: &str) -> Result<(), AppError> {
        let spot = self.get(id).await?;
        if !caller.can_access(spot.owner_id) {
            return Err(forbidden_error(operation, "only the owner can modify this spot"));
        }
        Ok(())
    }
}
