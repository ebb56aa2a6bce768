use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use parking_marketplace::models::{BookingSession, BookingStatus, Caller, SpotKind};
use parking_marketplace::repositories::booking_repository::BookingStore;
use parking_marketplace::services::booking_lifecycle::{
    BookingLifecycleService, BookingOperation, OverstayPolicy, PlannedTransition,
};
use parking_marketplace::utils::errors::AppError;

/// Store en memoria con la misma semántica condicional que la tabla
#[derive(Default)]
struct MemoryStore {
    bookings: Mutex<HashMap<Uuid, BookingSession>>,
}

impl MemoryStore {
    fn with(booking: BookingSession) -> Self {
        let store = Self::default();
        store.bookings.lock().unwrap().insert(booking.id, booking);
        store
    }

    fn snapshot(&self, id: Uuid) -> BookingSession {
        self.bookings.lock().unwrap().get(&id).cloned().unwrap()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookingSession>, AppError> {
        Ok(self.bookings.lock().unwrap().get(&id).cloned())
    }

    async fn apply_transition(
        &self,
        id: Uuid,
        plan: &PlannedTransition,
        now: DateTime<Utc>,
    ) -> Result<Option<BookingSession>, AppError> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings.get_mut(&id) {
            Some(booking) if booking.status == plan.expected_status => {
                *booking = plan.apply_to(booking, now);
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }
}

/// Simula otra petición que cambia el estado justo antes de la escritura
struct RacingStore {
    inner: MemoryStore,
    status_after_race: BookingStatus,
}

#[async_trait]
impl BookingStore for RacingStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookingSession>, AppError> {
        self.inner.find_by_id(id).await
    }

    async fn apply_transition(
        &self,
        id: Uuid,
        _plan: &PlannedTransition,
        _now: DateTime<Utc>,
    ) -> Result<Option<BookingSession>, AppError> {
        if let Some(booking) = self.inner.bookings.lock().unwrap().get_mut(&id) {
            booking.status = self.status_after_race;
        }
        Ok(None)
    }
}

fn scheduled_end() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
}

fn booking(owner: Uuid, status: BookingStatus) -> BookingSession {
    let start = scheduled_end() - Duration::hours(2);
    BookingSession {
        id: Uuid::new_v4(),
        user_id: owner,
        spot_id: Uuid::new_v4(),
        spot_type: SpotKind::ParkingSpot,
        booking_time: start - Duration::days(1),
        scheduled_start_time: start,
        actual_start_time: None,
        scheduled_end_time: scheduled_end(),
        actual_end_time: None,
        duration: Decimal::new(2, 0),
        total_cost: Decimal::new(100, 0),
        overstay_fee: None,
        status,
        access_code: Some("123456".to_string()),
        created_at: start - Duration::days(1),
        updated_at: start - Duration::days(1),
    }
}

fn driver() -> Caller {
    Caller { user_id: Uuid::new_v4(), is_staff: false, is_host: false }
}

fn service(store: MemoryStore) -> BookingLifecycleService<MemoryStore> {
    BookingLifecycleService::new(store, OverstayPolicy::default())
}

fn assert_invalid_transition(err: AppError, expected_status: &str) {
    match err {
        AppError::InvalidTransition { entity, current_status, .. } => {
            assert_eq!(entity, "booking");
            assert_eq!(current_status, expected_status);
        }
        other => panic!("expected InvalidTransition, got {:?}", other),
    }
}

#[tokio::test]
async fn test_start_confirmed_booking() {
    let caller = driver();
    let original = booking(caller.user_id, BookingStatus::Confirmed);
    let id = original.id;
    let service = service(MemoryStore::with(original));
    let now = scheduled_end() - Duration::hours(2);

    let started = service.start(&caller, id, now).await.unwrap();
    assert_eq!(started.status, BookingStatus::Active);
    assert_eq!(started.actual_start_time, Some(now));
    assert_eq!(service.store().snapshot(id).status, BookingStatus::Active);
}

#[tokio::test]
async fn test_start_rejected_outside_confirmed() {
    for status in [
        BookingStatus::Pending,
        BookingStatus::Active,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ] {
        let caller = driver();
        let original = booking(caller.user_id, status);
        let id = original.id;
        let service = service(MemoryStore::with(original));

        let err = service.start(&caller, id, scheduled_end()).await.unwrap_err();
        assert_invalid_transition(err, status.as_str());

        let stored = service.store().snapshot(id);
        assert_eq!(stored.status, status);
        assert_eq!(stored.actual_start_time, None);
    }
}

#[tokio::test]
async fn test_end_without_overstay() {
    let caller = driver();
    let original = booking(caller.user_id, BookingStatus::Active);
    let id = original.id;
    let service = service(MemoryStore::with(original));
    let now = scheduled_end() - Duration::minutes(5);

    let ended = service.end(&caller, id, now).await.unwrap();
    assert_eq!(ended.status, BookingStatus::Completed);
    assert_eq!(ended.actual_end_time, Some(now));
    assert_eq!(ended.overstay_fee, None);
    assert_eq!(ended.total_cost, Decimal::new(100, 0));
}

#[tokio::test]
async fn test_end_overstay_fees() {
    let cases = [
        (Duration::minutes(10), Decimal::ZERO),
        (Duration::minutes(16), Decimal::new(20, 0)),
        (Duration::minutes(46), Decimal::new(60, 0)),
    ];

    for (overstay, fee) in cases {
        let caller = driver();
        let original = booking(caller.user_id, BookingStatus::Active);
        let id = original.id;
        let service = service(MemoryStore::with(original));

        let ended = service.end(&caller, id, scheduled_end() + overstay).await.unwrap();
        assert_eq!(ended.status, BookingStatus::Completed);
        assert_eq!(ended.overstay_fee, Some(fee));
        assert_eq!(ended.total_cost, Decimal::new(100, 0) + fee);
    }
}

#[tokio::test]
async fn test_end_requires_active() {
    let caller = driver();
    let original = booking(caller.user_id, BookingStatus::Confirmed);
    let id = original.id;
    let service = service(MemoryStore::with(original));

    let err = service.end(&caller, id, scheduled_end()).await.unwrap_err();
    assert_invalid_transition(err, "confirmed");
    assert_eq!(service.store().snapshot(id).actual_end_time, None);
}

#[tokio::test]
async fn test_cancel_twice() {
    let caller = driver();
    let original = booking(caller.user_id, BookingStatus::Confirmed);
    let id = original.id;
    let service = service(MemoryStore::with(original));

    let cancelled = service.cancel(&caller, id, scheduled_end()).await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let err = service.cancel(&caller, id, scheduled_end()).await.unwrap_err();
    assert_invalid_transition(err, "cancelled");
}

#[tokio::test]
async fn test_cancel_completed_rejected() {
    let caller = driver();
    let original = booking(caller.user_id, BookingStatus::Completed);
    let id = original.id;
    let service = service(MemoryStore::with(original));

    let err = service.cancel(&caller, id, scheduled_end()).await.unwrap_err();
    assert_invalid_transition(err, "completed");
    assert_eq!(service.store().snapshot(id).status, BookingStatus::Completed);
}

#[tokio::test]
async fn test_other_users_booking_is_not_found() {
    let owner = driver();
    let original = booking(owner.user_id, BookingStatus::Confirmed);
    let id = original.id;
    let service = service(MemoryStore::with(original));

    let stranger = Caller { user_id: Uuid::new_v4(), is_staff: false, is_host: true };
    let err = service.start(&stranger, id, scheduled_end()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(service.store().snapshot(id).status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn test_missing_booking_is_not_found() {
    let service = service(MemoryStore::default());
    let err = service.cancel(&driver(), Uuid::new_v4(), scheduled_end()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_staff_can_cancel_any_booking() {
    let owner = driver();
    let original = booking(owner.user_id, BookingStatus::Active);
    let id = original.id;
    let service = service(MemoryStore::with(original));

    let staff = Caller { user_id: Uuid::new_v4(), is_staff: true, is_host: false };
    let cancelled = service.cancel(&staff, id, scheduled_end()).await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(cancelled.user_id, owner.user_id);
}

#[tokio::test]
async fn test_apply_dispatches_operation() {
    let caller = driver();
    let original = booking(caller.user_id, BookingStatus::Confirmed);
    let id = original.id;
    let service = service(MemoryStore::with(original));

    let started = service
        .apply(&caller, id, BookingOperation::Start, scheduled_end())
        .await
        .unwrap();
    assert_eq!(started.status, BookingStatus::Active);
}

#[tokio::test]
async fn test_lost_race_reports_invalid_transition() {
    let caller = driver();
    let original = booking(caller.user_id, BookingStatus::Confirmed);
    let id = original.id;
    let service = BookingLifecycleService::new(
        RacingStore {
            inner: MemoryStore::with(original),
            status_after_race: BookingStatus::Cancelled,
        },
        OverstayPolicy::default(),
    );

    let err = service.start(&caller, id, scheduled_end()).await.unwrap_err();
    assert_invalid_transition(err, "cancelled");
}

#[tokio::test]
async fn test_lost_race_still_valid_is_conflict() {
    let caller = driver();
    let original = booking(caller.user_id, BookingStatus::Confirmed);
    let id = original.id;
    let service = BookingLifecycleService::new(
        RacingStore {
            inner: MemoryStore::with(original),
            status_after_race: BookingStatus::Active,
        },
        OverstayPolicy::default(),
    );

    // cancel sigue siendo válido desde active
    let err = service.cancel(&caller, id, scheduled_end()).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_concurrent_starts_apply_once() {
    let caller = driver();
    let original = booking(caller.user_id, BookingStatus::Confirmed);
    let id = original.id;
    let service = std::sync::Arc::new(service(MemoryStore::with(original)));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.start(&caller, id, scheduled_end()).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(err) => assert!(
                matches!(err, AppError::InvalidTransition { .. }),
                "got {:?}",
                err
            ),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(service.store().snapshot(id).status, BookingStatus::Active);
}
