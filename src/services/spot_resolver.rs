//! Resolución de `SpotRef` a la fila concreta de su variante

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CommercialParkingSlot, ParkingSpot, PrivateParkingSlot, SpotRef};
use crate::repositories::{
    commercial_repository::CommercialRepository, parking_spot_repository::ParkingSpotRepository,
    private_listing_repository::PrivateListingRepository,
};
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Unidad reservable ya cargada
#[derive(Debug, Clone)]
pub enum ResolvedSpot {
    Spot(ParkingSpot),
    CommercialSlot(CommercialParkingSlot),
    PrivateSlot(PrivateParkingSlot),
}

impl ResolvedSpot {
    pub fn id(&self) -> Uuid {
        match self {
            ResolvedSpot::Spot(spot) => spot.id,
            ResolvedSpot::CommercialSlot(slot) => slot.id,
            ResolvedSpot::PrivateSlot(slot) => slot.id,
        }
    }

    pub fn is_disabled(&self) -> bool {
        match self {
            ResolvedSpot::Spot(spot) => spot.is_disabled,
            ResolvedSpot::CommercialSlot(slot) => slot.is_disabled,
            ResolvedSpot::PrivateSlot(slot) => slot.is_disabled,
        }
    }

    /// Una plaza deshabilitada no admite reservas nuevas
    pub fn ensure_bookable(self) -> AppResult<Self> {
        if self.is_disabled() {
            return Err(AppError::BadRequest(format!(
                "Spot '{}' is disabled and cannot be booked",
                self.id()
            )));
        }
        Ok(self)
    }
}

pub struct SpotResolver {
    spots: ParkingSpotRepository,
    commercial: CommercialRepository,
    private: PrivateListingRepository,
}

impl SpotResolver {
    pub fn new(pool: PgPool) -> Self {
        Self {
            spots: ParkingSpotRepository::new(pool.clone()),
            commercial: CommercialRepository::new(pool.clone()),
            private: PrivateListingRepository::new(pool),
        }
    }

    /// Cargar la fila según la variante; `NotFound` si no existe
    pub async fn resolve(&self, spot: SpotRef) -> AppResult<ResolvedSpot> {
        let resolved = match spot {
            SpotRef::Spot(id) => self.spots.find_by_id(id).await?.map(ResolvedSpot::Spot),
            SpotRef::CommercialSlot(id) => self.commercial.find_slot(id).await?.map(ResolvedSpot::CommercialSlot),
            SpotRef::PrivateSlot(id) => self.private.find_slot(id).await?.map(ResolvedSpot::PrivateSlot),
        };

        resolved.ok_or_else(|| not_found_error(resource_name(&spot), &spot.id().to_string()))
    }
}

fn resource_name(spot: &SpotRef) -> &'static str {
    match spot {
        SpotRef::Spot(_) => "Parking spot",
        SpotRef::CommercialSlot(_) => "Commercial slot",
        SpotRef::PrivateSlot(_) => "Private slot",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn private_slot(is_disabled: bool) -> PrivateParkingSlot {
        PrivateParkingSlot {
            id: Uuid::new_v4(),
            listing_id: Uuid::new_v4(),
            slot_number: 1,
            is_occupied: false,
            is_disabled,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_disabled_slot_not_bookable() {
        assert!(ResolvedSpot::PrivateSlot(private_slot(true)).ensure_bookable().is_err());
        assert!(ResolvedSpot::PrivateSlot(private_slot(false)).ensure_bookable().is_ok());
    }

    #[test]
    fn test_resource_name_per_variant() {
        let id = Uuid::new_v4();
        assert_eq!(resource_name(&SpotRef::Spot(id)), "Parking spot");
        assert_eq!(resource_name(&SpotRef::PrivateSlot(id)), "Private slot");
    }
}
