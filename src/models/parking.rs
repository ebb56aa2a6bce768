//! Modelos de inventario de aparcamiento
//!
//! Tres variantes de anuncio comparten coordenadas y precio: plazas
//! independientes, instalaciones comerciales (con sus plazas numeradas) y
//! anuncios privados (con sus plazas). Mapean a las tablas del mismo nombre.

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::services::geo::{GeoLocated, GeoPoint};

/// Tipo de plaza independiente - mapea al ENUM parking_spot_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "parking_spot_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ParkingSpotType {
    Mall,
    PrivateDriveway,
    Office,
    Apartment,
    Hospital,
    Airport,
    Stadium,
}

/// Tipo de instalación comercial - mapea al ENUM facility_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "facility_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    Mall,
    Office,
    Apartment,
    Hospital,
    Airport,
    Stadium,
}

/// Tipo de plaza comercial - mapea al ENUM commercial_slot_type
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "commercial_slot_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommercialSlotType {
    #[default]
    Regular,
    Compact,
    Ev,
    Handicap,
    Vip,
}

/// Duración máxima de reserva de un anuncio privado
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_duration_limit", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingDurationLimit {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    #[default]
    Unlimited,
}

fn decimal_point(latitude: &Decimal, longitude: &Decimal) -> Option<GeoPoint> {
    Some(GeoPoint::new(latitude.to_f64()?, longitude.to_f64()?))
}

/// Plaza independiente
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ParkingSpot {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub address: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub spot_type: ParkingSpotType,
    pub price_per_hour: Decimal,
    pub daily_rate: Option<Decimal>,
    pub monthly_rate: Option<Decimal>,
    pub has_cctv: bool,
    pub is_covered: bool,
    pub has_ev_charging: bool,
    pub is_accessible: bool,
    pub is_24_hours: bool,
    pub has_insurance: bool,
    pub has_valet_service: bool,
    pub has_car_wash: bool,
    pub has_security_guard: bool,
    pub has_water_access: bool,
    pub is_occupied: bool,
    pub is_disabled: bool,
    pub rating: Decimal,
    pub review_count: i32,
    pub access_pin: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ParkingSpot {
    pub fn is_available(&self) -> bool {
        !self.is_occupied && !self.is_disabled
    }
}

impl GeoLocated for ParkingSpot {
    fn location(&self) -> Option<GeoPoint> {
        decimal_point(&self.latitude, &self.longitude)
    }
}

/// Instalación comercial con recuento de plazas calculado en la consulta
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommercialParkingFacility {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub facility_type: FacilityType,
    pub default_hourly_rate: Decimal,
    pub flat_day_rate: Option<Decimal>,
    pub has_cctv: bool,
    pub has_ev_charging: bool,
    pub has_valet_service: bool,
    pub has_car_wash: bool,
    pub is_24_hours: bool,
    pub rating: Decimal,
    pub review_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_slots: i64,
    pub available_slots: i64,
}

impl GeoLocated for CommercialParkingFacility {
    fn location(&self) -> Option<GeoPoint> {
        decimal_point(&self.latitude, &self.longitude)
    }
}

/// Plaza dentro de una instalación comercial
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommercialParkingSlot {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub slot_number: String,
    pub floor: i32,
    pub slot_type: CommercialSlotType,
    pub is_occupied: bool,
    pub is_disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Número de plaza comercial: `F{planta}-{n}`
pub fn commercial_slot_number(floor: i32, position: i64) -> String {
    format!("F{}-{}", floor, position)
}

/// Anuncio privado de un particular
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PrivateParkingListing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub address: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub description: String,
    pub total_slots: i32,
    pub hourly_rate: Decimal,
    pub daily_rate: Decimal,
    pub monthly_rate: Decimal,
    pub flat_full_booking_rate: Option<Decimal>,
    pub auto_accept_bookings: bool,
    pub instant_booking_discount: Option<Decimal>,
    pub has_cctv: bool,
    pub is_covered: bool,
    pub has_ev_charging: bool,
    pub has_security_guard: bool,
    pub has_water_access: bool,
    pub is_24_hours: bool,
    pub available_from: Option<NaiveTime>,
    pub available_to: Option<NaiveTime>,
    pub rating: Decimal,
    pub review_count: i32,
    pub max_booking_duration: BookingDurationLimit,
    pub suggested_hourly_rate: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub available_slots: i64,
}

impl GeoLocated for PrivateParkingListing {
    fn location(&self) -> Option<GeoPoint> {
        decimal_point(&self.latitude, &self.longitude)
    }
}

/// Plaza de un anuncio privado
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PrivateParkingSlot {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub slot_number: i32,
    pub is_occupied: bool,
    pub is_disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commercial_slot_number() {
        assert_eq!(commercial_slot_number(2, 7), "F2-7");
    }

    #[test]
    fn test_decimal_point_conversion() {
        let point = decimal_point(&Decimal::new(286_139_000, 7), &Decimal::new(772_090_000, 7)).unwrap();
        assert!((point.latitude - 28.6139).abs() < 1e-9);
        assert!((point.longitude - 77.2090).abs() < 1e-9);
    }

    #[test]
    fn test_slot_type_wire_format() {
        let parsed: CommercialSlotType = serde_json::from_str("\"handicap\"").unwrap();
        assert_eq!(parsed, CommercialSlotType::Handicap);
        assert_eq!(serde_json::to_string(&ParkingSpotType::PrivateDriveway).unwrap(), "\"private_driveway\"");
    }
}
