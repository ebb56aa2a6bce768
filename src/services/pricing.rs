//! Análisis de precios de anuncios privados cercanos

use rust_decimal::{Decimal, RoundingStrategy};

use crate::dto::parking_dto::PricingIntelligenceResponse;
use crate::models::PrivateParkingListing;
use crate::services::geo::{rank_by_distance, GeoError, GeoLocated, GeoPoint};

/// Radio de comparación en metros
pub const PRICING_RADIUS_METERS: f64 = 5000.0;

/// Tarifa horaria con su ubicación
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatedLocation {
    pub point: Option<GeoPoint>,
    pub hourly_rate: Decimal,
}

impl From<&PrivateParkingListing> for RatedLocation {
    fn from(listing: &PrivateParkingListing) -> Self {
        Self {
            point: listing.location(),
            hourly_rate: listing.hourly_rate,
        }
    }
}

impl GeoLocated for RatedLocation {
    fn location(&self) -> Option<GeoPoint> {
        self.point
    }
}

/// Comparar la tarifa actual con los anuncios dentro del radio.
///
/// La sugerencia es la media cercana redondeada a 2 decimales, o la tarifa
/// actual si no hay ningún anuncio cerca.
pub fn analyze_nearby_rates<I>(
    origin: GeoPoint,
    current_rate: Decimal,
    candidates: I,
    radius_meters: f64,
) -> Result<PricingIntelligenceResponse, GeoError>
where
    I: IntoIterator<Item = RatedLocation>,
{
    let nearby = rank_by_distance(origin, candidates, Some(radius_meters))?;
    let rates: Vec<Decimal> = nearby.iter().map(|ranked| ranked.item.hourly_rate).collect();

    if rates.is_empty() {
        return Ok(PricingIntelligenceResponse {
            suggested_hourly_rate: current_rate,
            current_rate,
            nearby_listings_count: 0,
            avg_nearby_rate: None,
            min_nearby_rate: None,
            max_nearby_rate: None,
        });
    }

    let total: Decimal = rates.iter().copied().sum();
    let average = (total / Decimal::from(rates.len()))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Ok(PricingIntelligenceResponse {
        suggested_hourly_rate: average,
        current_rate,
        nearby_listings_count: rates.len(),
        avg_nearby_rate: Some(average),
        min_nearby_rate: rates.iter().min().copied(),
        max_nearby_rate: rates.iter().max().copied(),
    })
}
