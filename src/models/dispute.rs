//! Modelo de DisputeReport

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

/// Estado de la disputa - mapea al ENUM dispute_status
///
/// `Rejected` existe en la taxonomía pero ninguna operación lo alcanza.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "dispute_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    Pending,
    UnderReview,
    Resolved,
    Rejected,
}

impl DisputeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisputeStatus::Pending => "pending",
            DisputeStatus::UnderReview => "under_review",
            DisputeStatus::Resolved => "resolved",
            DisputeStatus::Rejected => "rejected",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DisputeStatus::Pending | DisputeStatus::UnderReview)
    }
}

impl fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disputa - mapea exactamente a la tabla dispute_reports
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DisputeReport {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub reason: String,
    pub description: String,
    pub photo_urls: Vec<String>,
    pub status: DisputeStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution: Option<String>,
}
