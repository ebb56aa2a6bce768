use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{BookingStatus, SpotKind, SpotRef};
use crate::utils::validation::{validate_amount, validate_duration_hours};

// Reserva nueva; `spot_type` + `spot_id` identifican la unidad reservada
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_schedule", skip_on_field_errors = false))]
pub struct CreateBookingRequest {
    pub spot_id: Uuid,
    pub spot_type: SpotKind,
    pub scheduled_start_time: DateTime<Utc>,
    pub scheduled_end_time: DateTime<Utc>,
    #[validate(custom = "validate_duration_hours")]
    pub duration: Decimal,
    #[validate(custom = "validate_amount")]
    pub total_cost: Decimal,
    #[validate(length(min = 1, max = 10))]
    pub access_code: Option<String>,
}

impl CreateBookingRequest {
    pub fn spot(&self) -> SpotRef {
        SpotRef::new(self.spot_type, self.spot_id)
    }
}

fn validate_schedule(request: &CreateBookingRequest) -> Result<(), ValidationError> {
    if request.scheduled_end_time <= request.scheduled_start_time {
        let mut error = ValidationError::new("schedule");
        error.message = Some("scheduled_end_time must be after scheduled_start_time".into());
        return Err(error);
    }
    Ok(())
}

// Filtros de listado
#[derive(Debug, Default, Deserialize)]
pub struct BookingFilters {
    pub status: Option<BookingStatus>,
    pub spot_id: Option<Uuid>,
    pub spot_type: Option<SpotKind>,
    #[serde(default)]
    pub host_spots: bool,
    pub ordering: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(hours: i64) -> CreateBookingRequest {
        let start = Utc::now();
        CreateBookingRequest {
            spot_id: Uuid::new_v4(),
            spot_type: SpotKind::PrivateSlot,
            scheduled_start_time: start,
            scheduled_end_time: start + Duration::hours(hours),
            duration: Decimal::from(hours.max(1)),
            total_cost: Decimal::new(8000, 2),
            access_code: None,
        }
    }

    #[test]
    fn test_schedule_must_move_forward() {
        assert!(request(2).validate().is_ok());
        assert!(request(0).validate().is_err());
        assert!(request(-1).validate().is_err());
    }

    #[test]
    fn test_spot_ref_from_request() {
        let req = request(2);
        assert_eq!(req.spot(), SpotRef::PrivateSlot(req.spot_id));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let mut req = request(2);
        req.total_cost = Decimal::new(-1, 0);
        assert!(req.validate().is_err());
    }
}
