use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{BookingDurationLimit, CommercialSlotType, FacilityType, ParkingSpotType};
use crate::utils::validation::{
    validate_amount, validate_latitude, validate_longitude, validate_price, validate_required_text,
};

// ---------------------------------------------------------------------------
// Plazas independientes
// ---------------------------------------------------------------------------

// Request para publicar una plaza
#[derive(Debug, Deserialize, Validate)]
pub struct CreateParkingSpotRequest {
    #[validate(custom = "validate_required_text")]
    pub address: String,
    #[validate(custom = "validate_latitude")]
    pub latitude: Decimal,
    #[validate(custom = "validate_longitude")]
    pub longitude: Decimal,
    pub spot_type: ParkingSpotType,
    #[validate(custom = "validate_price")]
    pub price_per_hour: Decimal,
    #[validate(custom = "validate_price")]
    pub daily_rate: Option<Decimal>,
    #[validate(custom = "validate_price")]
    pub monthly_rate: Option<Decimal>,
    #[serde(default)]
    pub has_cctv: bool,
    #[serde(default)]
    pub is_covered: bool,
    #[serde(default)]
    pub has_ev_charging: bool,
    #[serde(default)]
    pub is_accessible: bool,
    #[serde(default)]
    pub is_24_hours: bool,
    #[serde(default)]
    pub has_insurance: bool,
    #[serde(default)]
    pub has_valet_service: bool,
    #[serde(default)]
    pub has_car_wash: bool,
    #[serde(default)]
    pub has_security_guard: bool,
    #[serde(default)]
    pub has_water_access: bool,
    #[validate(length(max = 10))]
    pub access_pin: Option<String>,
}

// Request de actualización parcial
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateParkingSpotRequest {
    #[validate(custom = "validate_required_text")]
    pub address: Option<String>,
    #[validate(custom = "validate_latitude")]
    pub latitude: Option<Decimal>,
    #[validate(custom = "validate_longitude")]
    pub longitude: Option<Decimal>,
    pub spot_type: Option<ParkingSpotType>,
    #[validate(custom = "validate_price")]
    pub price_per_hour: Option<Decimal>,
    #[validate(custom = "validate_price")]
    pub daily_rate: Option<Decimal>,
    #[validate(custom = "validate_price")]
    pub monthly_rate: Option<Decimal>,
    pub has_cctv: Option<bool>,
    pub is_covered: Option<bool>,
    pub has_ev_charging: Option<bool>,
    pub is_accessible: Option<bool>,
    pub is_24_hours: Option<bool>,
    pub has_insurance: Option<bool>,
    pub has_valet_service: Option<bool>,
    pub has_car_wash: Option<bool>,
    pub has_security_guard: Option<bool>,
    pub has_water_access: Option<bool>,
    pub is_disabled: Option<bool>,
    #[validate(length(max = 10))]
    pub access_pin: Option<String>,
}

// Filtros de listado
#[derive(Debug, Default, Deserialize)]
pub struct ParkingSpotFilters {
    pub spot_type: Option<ParkingSpotType>,
    pub is_occupied: Option<bool>,
    pub has_cctv: Option<bool>,
    pub is_covered: Option<bool>,
    pub has_ev_charging: Option<bool>,
    pub is_24_hours: Option<bool>,
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub available_only: bool,
    pub search: Option<String>,
    /// `price_per_hour`, `rating` o `created_at`, con `-` para descendente
    pub ordering: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

// Parámetros de /nearby
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct OccupancyResponse {
    pub status: &'static str,
    pub is_occupied: bool,
}

impl OccupancyResponse {
    pub fn new(is_occupied: bool) -> Self {
        Self {
            status: if is_occupied { "occupied" } else { "available" },
            is_occupied,
        }
    }
}

// ---------------------------------------------------------------------------
// Instalaciones comerciales
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFacilityRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(custom = "validate_required_text")]
    pub address: String,
    #[validate(custom = "validate_latitude")]
    pub latitude: Decimal,
    #[validate(custom = "validate_longitude")]
    pub longitude: Decimal,
    pub facility_type: FacilityType,
    #[validate(custom = "validate_price")]
    pub default_hourly_rate: Decimal,
    #[validate(custom = "validate_price")]
    pub flat_day_rate: Option<Decimal>,
    #[serde(default)]
    pub has_cctv: bool,
    #[serde(default)]
    pub has_ev_charging: bool,
    #[serde(default)]
    pub has_valet_service: bool,
    #[serde(default)]
    pub has_car_wash: bool,
    #[serde(default)]
    pub is_24_hours: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct FacilityFilters {
    pub facility_type: Option<FacilityType>,
    pub has_cctv: Option<bool>,
    pub has_ev_charging: Option<bool>,
    pub has_valet_service: Option<bool>,
    pub is_24_hours: Option<bool>,
    pub search: Option<String>,
    /// `default_hourly_rate`, `rating` o `created_at`
    pub ordering: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateFacilityRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(custom = "validate_required_text")]
    pub address: Option<String>,
    #[validate(custom = "validate_latitude")]
    pub latitude: Option<Decimal>,
    #[validate(custom = "validate_longitude")]
    pub longitude: Option<Decimal>,
    pub facility_type: Option<FacilityType>,
    #[validate(custom = "validate_price")]
    pub default_hourly_rate: Option<Decimal>,
    #[validate(custom = "validate_price")]
    pub flat_day_rate: Option<Decimal>,
    pub has_cctv: Option<bool>,
    pub has_ev_charging: Option<bool>,
    pub has_valet_service: Option<bool>,
    pub has_car_wash: Option<bool>,
    pub is_24_hours: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommercialSlotFilters {
    pub floor: Option<i32>,
    pub slot_type: Option<CommercialSlotType>,
    #[serde(default)]
    pub available_only: bool,
}

fn default_floor() -> i32 {
    1
}

// Alta masiva de plazas comerciales
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSlotsRequest {
    #[validate(range(min = 1, max = 500))]
    pub count: i64,
    #[serde(default = "default_floor")]
    pub floor: i32,
    #[serde(default)]
    pub slot_type: CommercialSlotType,
}

#[derive(Debug, Serialize)]
pub struct CreateSlotsResponse {
    pub created: usize,
    pub slot_numbers: Vec<String>,
}

// Cambio de flags de una plaza (comercial o privada)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSlotRequest {
    pub is_occupied: Option<bool>,
    pub is_disabled: Option<bool>,
}

// ---------------------------------------------------------------------------
// Anuncios privados
// ---------------------------------------------------------------------------

fn default_total_slots() -> i32 {
    1
}

fn default_hourly_rate() -> Decimal {
    Decimal::new(40, 0)
}

fn default_daily_rate() -> Decimal {
    Decimal::new(300, 0)
}

fn default_monthly_rate() -> Decimal {
    Decimal::new(3000, 0)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePrivateListingRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(custom = "validate_required_text")]
    pub address: String,
    #[validate(custom = "validate_latitude")]
    pub latitude: Decimal,
    #[validate(custom = "validate_longitude")]
    pub longitude: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_total_slots")]
    #[validate(range(min = 1, max = 500))]
    pub total_slots: i32,
    #[serde(default = "default_hourly_rate")]
    #[validate(custom = "validate_price")]
    pub hourly_rate: Decimal,
    #[serde(default = "default_daily_rate")]
    #[validate(custom = "validate_price")]
    pub daily_rate: Decimal,
    #[serde(default = "default_monthly_rate")]
    #[validate(custom = "validate_price")]
    pub monthly_rate: Decimal,
    #[validate(custom = "validate_price")]
    pub flat_full_booking_rate: Option<Decimal>,
    #[serde(default)]
    pub auto_accept_bookings: bool,
    #[validate(custom = "validate_amount")]
    pub instant_booking_discount: Option<Decimal>,
    #[serde(default)]
    pub has_cctv: bool,
    #[serde(default)]
    pub is_covered: bool,
    #[serde(default)]
    pub has_ev_charging: bool,
    #[serde(default)]
    pub has_security_guard: bool,
    #[serde(default)]
    pub has_water_access: bool,
    #[serde(default)]
    pub is_24_hours: bool,
    pub available_from: Option<NaiveTime>,
    pub available_to: Option<NaiveTime>,
    #[serde(default)]
    pub max_booking_duration: BookingDurationLimit,
}

#[derive(Debug, Default, Deserialize)]
pub struct PrivateListingFilters {
    pub has_cctv: Option<bool>,
    pub is_covered: Option<bool>,
    pub has_ev_charging: Option<bool>,
    pub is_24_hours: Option<bool>,
    pub auto_accept_bookings: Option<bool>,
    pub search: Option<String>,
    /// `hourly_rate`, `daily_rate`, `rating` o `created_at`
    pub ordering: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

// Edición parcial; el número de plazas no cambia tras la creación
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePrivateListingRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(custom = "validate_required_text")]
    pub address: Option<String>,
    #[validate(custom = "validate_latitude")]
    pub latitude: Option<Decimal>,
    #[validate(custom = "validate_longitude")]
    pub longitude: Option<Decimal>,
    pub description: Option<String>,
    #[validate(custom = "validate_price")]
    pub hourly_rate: Option<Decimal>,
    #[validate(custom = "validate_price")]
    pub daily_rate: Option<Decimal>,
    #[validate(custom = "validate_price")]
    pub monthly_rate: Option<Decimal>,
    #[validate(custom = "validate_price")]
    pub flat_full_booking_rate: Option<Decimal>,
    pub auto_accept_bookings: Option<bool>,
    #[validate(custom = "validate_amount")]
    pub instant_booking_discount: Option<Decimal>,
    pub has_cctv: Option<bool>,
    pub is_covered: Option<bool>,
    pub has_ev_charging: Option<bool>,
    pub has_security_guard: Option<bool>,
    pub has_water_access: Option<bool>,
    pub is_24_hours: Option<bool>,
    pub available_from: Option<NaiveTime>,
    pub available_to: Option<NaiveTime>,
    pub max_booking_duration: Option<BookingDurationLimit>,
}

/// Resultado del análisis de precios de la zona
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingIntelligenceResponse {
    pub suggested_hourly_rate: Decimal,
    pub current_rate: Decimal,
    pub nearby_listings_count: usize,
    pub avg_nearby_rate: Option<Decimal>,
    pub min_nearby_rate: Option<Decimal>,
    pub max_nearby_rate: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_slots_defaults() {
        let request: CreateSlotsRequest = serde_json::from_str(r#"{"count": 3}"#).unwrap();
        assert_eq!(request.floor, 1);
        assert_eq!(request.slot_type, CommercialSlotType::Regular);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_slots_count_bounds() {
        let zero: CreateSlotsRequest = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert!(zero.validate().is_err());
        let too_many: CreateSlotsRequest = serde_json::from_str(r#"{"count": 501}"#).unwrap();
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_private_listing_defaults() {
        let request: CreatePrivateListingRequest = serde_json::from_str(
            r#"{"title": "Driveway", "address": "12 MG Road", "latitude": "28.6139", "longitude": "77.2090"}"#,
        )
        .unwrap();
        assert_eq!(request.total_slots, 1);
        assert_eq!(request.hourly_rate, Decimal::new(40, 0));
        assert_eq!(request.max_booking_duration, BookingDurationLimit::Unlimited);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_facility_is_partial() {
        let request: UpdateFacilityRequest = serde_json::from_str(r#"{"default_hourly_rate": "65.00"}"#).unwrap();
        assert_eq!(request.default_hourly_rate, Some(Decimal::new(6500, 2)));
        assert!(request.name.is_none());
        assert!(request.validate().is_ok());

        let negative: UpdateFacilityRequest = serde_json::from_str(r#"{"default_hourly_rate": "-1"}"#).unwrap();
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_update_listing_rejects_blank_title() {
        let request: UpdatePrivateListingRequest = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(request.validate().is_err());

        let request: UpdatePrivateListingRequest =
            serde_json::from_str(r#"{"hourly_rate": "55", "max_booking_duration": "daily"}"#).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_filters_accept_ordering() {
        let filters: PrivateListingFilters = serde_json::from_str(r#"{"ordering": "-daily_rate"}"#).unwrap();
        assert_eq!(filters.ordering.as_deref(), Some("-daily_rate"));
    }

    #[test]
    fn test_spot_request_rejects_bad_latitude() {
        let request: CreateParkingSpotRequest = serde_json::from_str(
            r#"{"address": "Mall", "latitude": "95", "longitude": "77.2", "spot_type": "mall", "price_per_hour": "50"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }
}
