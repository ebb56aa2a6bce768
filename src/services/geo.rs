//! Ranking por proximidad
//!
//! Distancia de gran círculo (haversine) entre un punto de consulta y un
//! conjunto de anuncios geolocalizados, con ordenación ascendente estable y
//! filtro opcional por radio.

use serde::Serialize;
use thiserror::Error;

use crate::utils::errors::AppError;

/// Radio medio de la Tierra en metros
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Punto en grados decimales
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Cualquier entidad con coordenadas
pub trait GeoLocated {
    /// `None` cuando las coordenadas no se pueden representar
    fn location(&self) -> Option<GeoPoint>;
}

impl GeoLocated for GeoPoint {
    fn location(&self) -> Option<GeoPoint> {
        Some(*self)
    }
}

impl<T: GeoLocated> GeoLocated for &T {
    fn location(&self) -> Option<GeoPoint> {
        (*self).location()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("invalid query point ({latitude}, {longitude})")]
    InvalidQueryPoint { latitude: f64, longitude: f64 },

    #[error("candidate at position {index} has no valid coordinates")]
    MissingCoordinates { index: usize },

    #[error("radius must be a non-negative number of meters, got {0}")]
    InvalidRadius(f64),
}

impl From<GeoError> for AppError {
    fn from(err: GeoError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Candidato anotado con su distancia al punto de consulta
#[derive(Debug, Clone, Serialize)]
pub struct Ranked<T> {
    #[serde(flatten)]
    pub item: T,
    /// Metros
    pub distance: f64,
}

/// Distancia haversine en metros
pub fn haversine_distance(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // el redondeo puede dejar `a` ligeramente por encima de 1 en puntos antipodales
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_METERS * c
}

/// Ordenar candidatos por distancia al punto de consulta.
///
/// Con `radius_meters`, los candidatos más lejanos se excluyen (la distancia
/// igual al radio se conserva). Los empates mantienen el orden de entrada.
/// Un candidato sin coordenadas válidas aborta el ranking completo.
pub fn rank_by_distance<T, I>(
    query: GeoPoint,
    candidates: I,
    radius_meters: Option<f64>,
) -> Result<Vec<Ranked<T>>, GeoError>
where
    T: GeoLocated,
    I: IntoIterator<Item = T>,
{
    if !query.is_valid() {
        return Err(GeoError::InvalidQueryPoint {
            latitude: query.latitude,
            longitude: query.longitude,
        });
    }
    if let Some(radius) = radius_meters {
        if !radius.is_finite() || radius < 0.0 {
            return Err(GeoError::InvalidRadius(radius));
        }
    }

    let mut ranked = Vec::new();
    for (index, item) in candidates.into_iter().enumerate() {
        let point = item
            .location()
            .filter(GeoPoint::is_valid)
            .ok_or(GeoError::MissingCoordinates { index })?;
        let distance = haversine_distance(query, point);

        if radius_meters.map_or(true, |radius| distance <= radius) {
            ranked.push(Ranked { item, distance });
        }
    }

    // sort_by es estable
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_equator_degree() {
        let d = haversine_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert!((d - 111_194.93).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn test_haversine_antipodal_is_half_circumference() {
        let d = haversine_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_METERS).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let result = rank_by_distance::<GeoPoint, _>(GeoPoint::new(0.0, 0.0), vec![], Some(-1.0));
        assert_eq!(result.unwrap_err(), GeoError::InvalidRadius(-1.0));
    }
}
