use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use parking_marketplace::models::{BookingSession, BookingStatus, Caller, DisputeReport, DisputeStatus, SpotKind};
use parking_marketplace::repositories::dispute_repository::DisputeStore;
use parking_marketplace::services::dispute_service::{ensure_disputable, DisputeService};
use parking_marketplace::utils::errors::AppError;

#[derive(Default)]
struct MemoryDisputes {
    disputes: Mutex<HashMap<Uuid, DisputeReport>>,
}

impl MemoryDisputes {
    fn with(dispute: DisputeReport) -> Self {
        let store = Self::default();
        store.disputes.lock().unwrap().insert(dispute.id, dispute);
        store
    }

    fn snapshot(&self, id: Uuid) -> DisputeReport {
        self.disputes.lock().unwrap().get(&id).cloned().unwrap()
    }
}

#[async_trait]
impl DisputeStore for MemoryDisputes {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DisputeReport>, AppError> {
        Ok(self.disputes.lock().unwrap().get(&id).cloned())
    }

    async fn resolve(
        &self,
        id: Uuid,
        resolution: &str,
        resolved_at: DateTime<Utc>,
    ) -> Result<Option<DisputeReport>, AppError> {
        let mut disputes = self.disputes.lock().unwrap();
        match disputes.get_mut(&id) {
            Some(dispute) if dispute.status.is_open() => {
                dispute.status = DisputeStatus::Resolved;
                dispute.resolution = Some(resolution.to_string());
                dispute.resolved_at = Some(resolved_at);
                Ok(Some(dispute.clone()))
            }
            _ => Ok(None),
        }
    }
}

/// Otro miembro del personal resuelve la disputa antes que nosotros
struct RacingDisputes {
    inner: MemoryDisputes,
}

#[async_trait]
impl DisputeStore for RacingDisputes {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DisputeReport>, AppError> {
        self.inner.find_by_id(id).await
    }

    async fn resolve(
        &self,
        id: Uuid,
        _resolution: &str,
        resolved_at: DateTime<Utc>,
    ) -> Result<Option<DisputeReport>, AppError> {
        self.inner.resolve(id, "refund issued", resolved_at).await?;
        Ok(None)
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 12, 9, 30, 0).unwrap()
}

fn dispute(status: DisputeStatus) -> DisputeReport {
    DisputeReport {
        id: Uuid::new_v4(),
        booking_id: Uuid::new_v4(),
        reason: "Spot blocked".to_string(),
        description: "Another car was parked in my spot".to_string(),
        photo_urls: vec!["https://img.example.com/1.jpg".to_string()],
        status,
        created_at: now() - Duration::days(1),
        resolved_at: None,
        resolution: None,
    }
}

fn staff() -> Caller {
    Caller { user_id: Uuid::new_v4(), is_staff: true, is_host: false }
}

#[tokio::test]
async fn test_staff_resolves_pending_dispute() {
    let open = dispute(DisputeStatus::Pending);
    let id = open.id;
    let service = DisputeService::new(MemoryDisputes::with(open));

    let resolved = service.resolve(&staff(), id, "  Refunded the booking  ", now()).await.unwrap();
    assert_eq!(resolved.status, DisputeStatus::Resolved);
    assert_eq!(resolved.resolution.as_deref(), Some("Refunded the booking"));
    assert_eq!(resolved.resolved_at, Some(now()));
}

#[tokio::test]
async fn test_under_review_can_be_resolved() {
    let open = dispute(DisputeStatus::UnderReview);
    let id = open.id;
    let service = DisputeService::new(MemoryDisputes::with(open));

    let resolved = service.resolve(&staff(), id, "Partial refund", now()).await.unwrap();
    assert_eq!(resolved.status, DisputeStatus::Resolved);
}

#[tokio::test]
async fn test_non_staff_forbidden() {
    let open = dispute(DisputeStatus::Pending);
    let id = open.id;
    let service = DisputeService::new(MemoryDisputes::with(open));

    let host = Caller { user_id: Uuid::new_v4(), is_staff: false, is_host: true };
    let err = service.resolve(&host, id, "I say so", now()).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)), "got {:?}", err);
    assert_eq!(service.store().snapshot(id).status, DisputeStatus::Pending);
}

#[tokio::test]
async fn test_missing_dispute_not_found() {
    let service = DisputeService::new(MemoryDisputes::default());
    let err = service.resolve(&staff(), Uuid::new_v4(), "Refund", now()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_blank_resolution_rejected() {
    let open = dispute(DisputeStatus::Pending);
    let id = open.id;
    let service = DisputeService::new(MemoryDisputes::with(open));

    for blank in ["", "   "] {
        let err = service.resolve(&staff(), id, blank, now()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "got {:?}", err);
    }
    let stored = service.store().snapshot(id);
    assert_eq!(stored.status, DisputeStatus::Pending);
    assert_eq!(stored.resolution, None);
}

#[tokio::test]
async fn test_closed_dispute_cannot_be_resolved_again() {
    for status in [DisputeStatus::Resolved, DisputeStatus::Rejected] {
        let closed = dispute(status);
        let id = closed.id;
        let service = DisputeService::new(MemoryDisputes::with(closed));

        let err = service.resolve(&staff(), id, "Again", now()).await.unwrap_err();
        match err {
            AppError::InvalidTransition { entity, current_status, .. } => {
                assert_eq!(entity, "dispute");
                assert_eq!(current_status, status.as_str());
            }
            other => panic!("expected InvalidTransition, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_lost_race_reports_invalid_transition() {
    let open = dispute(DisputeStatus::Pending);
    let id = open.id;
    let service = DisputeService::new(RacingDisputes { inner: MemoryDisputes::with(open) });

    let err = service.resolve(&staff(), id, "Refund", now()).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }), "got {:?}", err);
    assert_eq!(
        service.store().inner.snapshot(id).resolution.as_deref(),
        Some("refund issued")
    );
}

fn booking(status: BookingStatus) -> BookingSession {
    let start = now() - Duration::hours(3);
    BookingSession {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        spot_id: Uuid::new_v4(),
        spot_type: SpotKind::PrivateSlot,
        booking_time: start,
        scheduled_start_time: start,
        actual_start_time: None,
        scheduled_end_time: start + Duration::hours(2),
        actual_end_time: None,
        duration: Decimal::new(2, 0),
        total_cost: Decimal::new(80, 0),
        overstay_fee: None,
        status,
        access_code: None,
        created_at: start,
        updated_at: start,
    }
}

#[test]
fn test_only_active_or_completed_bookings_are_disputable() {
    assert!(ensure_disputable(&booking(BookingStatus::Active)).is_ok());
    assert!(ensure_disputable(&booking(BookingStatus::Completed)).is_ok());

    for status in [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Disputed,
    ] {
        let err = ensure_disputable(&booking(status)).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { entity: "booking", .. }), "got {:?}", err);
    }
}
