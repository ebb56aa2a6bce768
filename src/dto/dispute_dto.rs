use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::DisputeStatus;
use crate::utils::validation::validate_required_text;

// Disputa nueva sobre una reserva propia
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDisputeRequest {
    #[serde(alias = "booking")]
    pub booking_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub reason: String,
    #[validate(custom = "validate_required_text")]
    pub description: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveDisputeRequest {
    #[serde(default)]
    pub resolution: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DisputeFilters {
    pub status: Option<DisputeStatus>,
    #[serde(alias = "booking")]
    pub booking_id: Option<Uuid>,
}
