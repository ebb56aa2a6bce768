use serde::Serialize;

use crate::services::geo::{rank_by_distance, GeoLocated, GeoPoint, Ranked};
use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::validate_coordinates;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

/// Elemento de listado con distancia opcional (metros)
#[derive(Debug, Serialize)]
pub struct WithDistance<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl<T> WithDistance<T> {
    pub fn plain(item: T) -> Self {
        Self { item, distance: None }
    }
}

impl<T> From<Ranked<T>> for WithDistance<T> {
    fn from(ranked: Ranked<T>) -> Self {
        Self {
            item: ranked.item,
            distance: Some(ranked.distance),
        }
    }
}

/// Ordenar por distancia si hay punto de consulta; si no, conservar el orden
pub fn with_distances<T: GeoLocated>(
    items: Vec<T>,
    point: Option<GeoPoint>,
    radius_meters: Option<f64>,
) -> Result<Vec<WithDistance<T>>, AppError> {
    match point {
        Some(point) => Ok(rank_by_distance(point, items, radius_meters)?
            .into_iter()
            .map(WithDistance::from)
            .collect()),
        None => Ok(items.into_iter().map(WithDistance::plain).collect()),
    }
}

/// Punto de consulta a partir de `lat`/`lon` de la query string.
///
/// Ambos ausentes: sin ranking. Solo uno presente: error de validación.
pub fn query_point(lat: Option<f64>, lon: Option<f64>) -> Result<Option<GeoPoint>, AppError> {
    match (lat, lon) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => {
            validate_coordinates(lat, lon)
                .map_err(|_| validation_error("lat", "Latitude or longitude out of range"))?;
            Ok(Some(GeoPoint::new(lat, lon)))
        }
        (Some(_), None) => Err(validation_error("lon", "Longitude is required together with latitude")),
        (None, Some(_)) => Err(validation_error("lat", "Latitude is required together with longitude")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_point_requires_both() {
        assert!(query_point(None, None).unwrap().is_none());
        assert!(query_point(Some(28.6), Some(77.2)).unwrap().is_some());
        assert!(query_point(Some(28.6), None).is_err());
        assert!(query_point(None, Some(77.2)).is_err());
        assert!(query_point(Some(95.0), Some(77.2)).is_err());
    }

    #[test]
    fn test_with_distances_keeps_order_without_point() {
        let far = GeoPoint::new(19.0760, 72.8777);
        let near = GeoPoint::new(28.6140, 77.2091);

        let plain = with_distances(vec![far, near], None, None).unwrap();
        assert_eq!(plain[0].item, far);
        assert!(plain.iter().all(|entry| entry.distance.is_none()));

        let ranked = with_distances(vec![far, near], Some(GeoPoint::new(28.6139, 77.2090)), None).unwrap();
        assert_eq!(ranked[0].item, near);
        assert!(ranked[0].distance.unwrap() < ranked[1].distance.unwrap());
    }

    #[test]
    fn test_with_distance_flattens() {
        #[derive(Serialize)]
        struct Item {
            id: u32,
        }
        let value = serde_json::to_value(WithDistance { item: Item { id: 7 }, distance: Some(12.5) }).unwrap();
        assert_eq!(value, serde_json::json!({ "id": 7, "distance": 12.5 }));

        let value = serde_json::to_value(WithDistance::plain(Item { id: 7 })).unwrap();
        assert_eq!(value, serde_json::json!({ "id": 7 }));
    }
}
