use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{query_point, with_distances, WithDistance};
use crate::dto::parking_dto::{
    CommercialSlotFilters, CreateFacilityRequest, CreateSlotsRequest, CreateSlotsResponse, FacilityFilters,
    UpdateFacilityRequest, UpdateSlotRequest,
};
use crate::models::{Caller, CommercialParkingFacility, CommercialParkingSlot};
use crate::repositories::commercial_repository::CommercialRepository;
use crate::repositories::ordering::{ListOrder, FACILITY_ORDER_FIELDS};
use crate::utils::errors::{forbidden_error, not_found_error, AppError};

pub struct CommercialController {
    repository: CommercialRepository,
}

impl CommercialController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CommercialRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        filters: FacilityFilters,
    ) -> Result<Vec<WithDistance<CommercialParkingFacility>>, AppError> {
        let point = query_point(filters.lat, filters.lon)?;
        let order = ListOrder::from_query(filters.ordering.as_deref(), FACILITY_ORDER_FIELDS)?;
        let facilities = self.repository.list_facilities(&filters, order).await?;
        with_distances(facilities, point, None)
    }

    pub async fn get(&self, id: Uuid) -> Result<CommercialParkingFacility, AppError> {
        self.repository
            .find_facility(id)
            .await?
            .ok_or_else(|| not_found_error("Commercial facility", &id.to_string()))
    }

    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateFacilityRequest,
    ) -> Result<CommercialParkingFacility, AppError> {
        request.validate()?;
        let facility = self.repository.create_facility(caller.user_id, &request).await?;
        info!("🏢 Instalación {} creada por {}", facility.id, caller.user_id);
        Ok(facility)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        request: UpdateFacilityRequest,
    ) -> Result<CommercialParkingFacility, AppError> {
        request.validate()?;
        self.ensure_owner(caller, id, "update facility").await?;

        let facility = self
            .repository
            .update_facility(id, &request)
            .await?
            .ok_or_else(|| not_found_error("Commercial facility", &id.to_string()))?;
        info!("🏢 Instalación {} actualizada", id);
        Ok(facility)
    }

    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        self.ensure_owner(caller, id, "delete facility").await?;

        if !self.repository.delete_facility(id).await? {
            return Err(not_found_error("Commercial facility", &id.to_string()));
        }
        Ok(())
    }

    pub async fn list_slots(
        &self,
        facility_id: Uuid,
        filters: CommercialSlotFilters,
    ) -> Result<Vec<CommercialParkingSlot>, AppError> {
        self.get(facility_id).await?;
        self.repository.list_slots(facility_id, &filters).await
    }

    pub async fn create_slots(
        &self,
        caller: &Caller,
        facility_id: Uuid,
        request: CreateSlotsRequest,
    ) -> Result<CreateSlotsResponse, AppError> {
        request.validate()?;

        self.ensure_owner(caller, facility_id, "create slots").await?;

        let slots = self.repository.create_slots(facility_id, &request).await?;
        info!(
            "🏢 {} plazas creadas en la planta {} de {}",
            slots.len(),
            request.floor,
            facility_id
        );

        Ok(CreateSlotsResponse {
            created: slots.len(),
            slot_numbers: slots.into_iter().map(|slot| slot.slot_number).collect(),
        })
    }

    pub async fn update_slot(
        &self,
        caller: &Caller,
        slot_id: Uuid,
        request: UpdateSlotRequest,
    ) -> Result<CommercialParkingSlot, AppError> {
        let owner = self
            .repository
            .slot_owner(slot_id)
            .await?
            .ok_or_else(|| not_found_error("Commercial slot", &slot_id.to_string()))?;
        if !caller.can_access(owner) {
            return Err(forbidden_error("update slot", "only the facility owner can modify its slots"));
        }

        self.repository
            .update_slot(slot_id, &request)
            .await?
            .ok_or_else(|| not_found_error("Commercial slot", &slot_id.to_string()))
    }

    async fn ensure_owner(&self, caller: &Caller, id: Uuid, operation: &str) -> Result<(), AppError> {
        let facility = self.get(id).await?;
        if !caller.can_access(facility.owner_id) {
            return Err(forbidden_error(operation, "only the owner can modify this facility"));
        }
        Ok(())
    }
}
