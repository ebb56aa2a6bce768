use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{query_point, with_distances, WithDistance};
use crate::dto::parking_dto::{
    CreatePrivateListingRequest, PricingIntelligenceResponse, PrivateListingFilters, UpdatePrivateListingRequest,
    UpdateSlotRequest,
};
use crate::models::{Caller, PrivateParkingListing, PrivateParkingSlot};
use crate::repositories::ordering::{ListOrder, LISTING_ORDER_FIELDS};
use crate::repositories::private_listing_repository::PrivateListingRepository;
use crate::services::geo::{GeoError, GeoLocated};
use crate::services::pricing::{analyze_nearby_rates, RatedLocation, PRICING_RADIUS_METERS};
use crate::utils::errors::{forbidden_error, not_found_error, AppError};

pub struct PrivateListingController {
    repository: PrivateListingRepository,
}

impl PrivateListingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PrivateListingRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        filters: PrivateListingFilters,
    ) -> Result<Vec<WithDistance<PrivateParkingListing>>, AppError> {
        let point = query_point(filters.lat, filters.lon)?;
        let order = ListOrder::from_query(filters.ordering.as_deref(), LISTING_ORDER_FIELDS)?;
        let listings = self.repository.list(&filters, order).await?;
        with_distances(listings, point, None)
    }

    pub async fn get(&self, id: Uuid) -> Result<PrivateParkingListing, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Private listing", &id.to_string()))
    }

    pub async fn create(
        &self,
        caller: &Caller,
        request: CreatePrivateListingRequest,
    ) -> Result<PrivateParkingListing, AppError> {
        request.validate()?;
        let listing = self.repository.create(caller.user_id, &request).await?;
        info!(
            "🏠 Anuncio {} creado por {} con {} plazas",
            listing.id, caller.user_id, listing.total_slots
        );
        Ok(listing)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        request: UpdatePrivateListingRequest,
    ) -> Result<PrivateParkingListing, AppError> {
        request.validate()?;
        self.ensure_owner(caller, id, "update listing").await?;

        let listing = self
            .repository
            .update(id, &request)
            .await?
            .ok_or_else(|| not_found_error("Private listing", &id.to_string()))?;
        info!("🏠 Anuncio {} actualizado", id);
        Ok(listing)
    }

    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        self.ensure_owner(caller, id, "delete listing").await?;

        if !self.repository.delete(id).await? {
            return Err(not_found_error("Private listing", &id.to_string()));
        }
        Ok(())
    }

    /// Comparar con anuncios en un radio de 5 km y guardar la tarifa sugerida
    pub async fn pricing_intelligence(&self, caller: &Caller, id: Uuid) -> Result<PricingIntelligenceResponse, AppError> {
        let listing = self.get(id).await?;
        if !caller.can_access(listing.owner_id) {
            return Err(forbidden_error("analyze pricing", "only the owner can analyze this listing"));
        }

        let origin = listing
            .location()
            .ok_or(GeoError::MissingCoordinates { index: 0 })?;
        let others = self.repository.list_others(id).await?;
        let candidates: Vec<RatedLocation> = others.iter().map(RatedLocation::from).collect();

        let analysis = analyze_nearby_rates(origin, listing.hourly_rate, candidates, PRICING_RADIUS_METERS)?;
        self.repository.set_suggested_rate(id, analysis.suggested_hourly_rate).await?;

        info!(
            "💶 Tarifa sugerida para {}: {} ({} anuncios cercanos)",
            id, analysis.suggested_hourly_rate, analysis.nearby_listings_count
        );
        Ok(analysis)
    }

    pub async fn list_slots(&self, listing_id: Uuid) -> Result<Vec<PrivateParkingSlot>, AppError> {
        self.get(listing_id).await?;
        self.repository.list_slots(listing_id).await
    }

    pub async fn update_slot(
        &self,
        caller: &Caller,
        slot_id: Uuid,
        request: UpdateSlotRequest,
    ) -> Result<PrivateParkingSlot, AppError> {
        let owner = self
            .repository
            .slot_owner(slot_id)
            .await?
            .ok_or_else(|| not_found_error("Private slot", &slot_id.to_string()))?;
        if !caller.can_access(owner) {
            return Err(forbidden_error("update slot", "only the listing owner can modify its slots"));
        }

        self.repository
            .update_slot(slot_id, &request)
            .await?
            .ok_or_else(|| not_found_error("Private slot", &slot_id.to_string()))
    }

    async fn ensure_owner(&self, caller: &Caller, id: Uuid, operation: &str) -> Result<(), AppError> {
        let listing = self.get(id).await?;
        if !caller.can_access(listing.owner_id) {
            return Err(forbidden_error(operation, "only the owner can modify this listing"));
        }
        Ok(())
    }
}
