use chrono::NaiveDate;
use slotbook_common::models::{AppointmentChanges, AppointmentStatus, NewAppointment};
use slotbook_db::{AppointmentRepository, DbClient, DbError, SqlAppointmentRepository};

async fn repository() -> SqlAppointmentRepository {
    let client = DbClient::from_url("sqlite::memory:")
        .await
        .expect("in-memory database");
    let repository = SqlAppointmentRepository::new(client);
    repository.init_schema().await.expect("schema");
    repository
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_appointment(booking_id: &str, time: &str) -> NewAppointment {
    NewAppointment {
        booking_id: booking_id.to_string(),
        customer_name: "Grace Hopper".to_string(),
        customer_email: "grace@example.com".to_string(),
        appointment_date: date(2099, 1, 1),
        appointment_time: time.to_string(),
        duration: 30,
        status: AppointmentStatus::Confirmed,
        notes: None,
    }
}

#[tokio::test]
async fn init_schema_is_idempotent() {
    let repository = repository().await;
    repository.init_schema().await.unwrap();
}

#[tokio::test]
async fn insert_then_find_round_trips_the_date() {
    let repository = repository().await;
    let inserted = repository
        .insert(&new_appointment("BK1", "09:00"))
        .await
        .unwrap();

    assert_eq!(inserted.appointment_date, date(2099, 1, 1));
    assert_eq!(inserted.status, AppointmentStatus::Confirmed);
    assert_eq!(inserted.notes, None);
    assert_eq!(inserted.created_at, inserted.updated_at);

    let found = repository.find_by_booking_id("BK1").await.unwrap().unwrap();
    assert_eq!(found, inserted);
    assert!(repository.find_by_booking_id("BK404").await.unwrap().is_none());
}

#[tokio::test]
async fn active_slot_index_rejects_a_second_live_booking() {
    let repository = repository().await;
    repository.insert(&new_appointment("BK1", "10:00")).await.unwrap();

    let err = repository
        .insert(&new_appointment("BK2", "10:00"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::SlotTaken), "got {err:?}");
}

#[tokio::test]
async fn cancelled_bookings_free_their_slot() {
    let repository = repository().await;
    repository.insert(&new_appointment("BK1", "10:00")).await.unwrap();
    repository.cancel("BK1", "Cancelled by user").await.unwrap().unwrap();

    let rebooked = repository.insert(&new_appointment("BK2", "10:00")).await;
    assert!(rebooked.is_ok());

    let active = repository.find_active_on_date(date(2099, 1, 1)).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].booking_id, "BK2");
}

#[tokio::test]
async fn duplicate_booking_ids_are_reported_separately() {
    let repository = repository().await;
    repository.insert(&new_appointment("BK1", "09:00")).await.unwrap();

    let err = repository
        .insert(&new_appointment("BK1", "11:00"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::DuplicateBookingId), "got {err:?}");
}

#[tokio::test]
async fn find_active_at_can_exclude_a_booking() {
    let repository = repository().await;
    repository.insert(&new_appointment("BK1", "13:30")).await.unwrap();

    let holder = repository
        .find_active_at(date(2099, 1, 1), "13:30", None)
        .await
        .unwrap();
    assert_eq!(holder.unwrap().booking_id, "BK1");

    let others = repository
        .find_active_at(date(2099, 1, 1), "13:30", Some("BK1"))
        .await
        .unwrap();
    assert!(others.is_none());
}

#[tokio::test]
async fn update_touches_only_supplied_fields() {
    let repository = repository().await;
    repository.insert(&new_appointment("BK1", "09:00")).await.unwrap();

    let changes = AppointmentChanges {
        notes: Some(Some("Bring documents".to_string())),
        duration: Some(60),
        ..Default::default()
    };
    let updated = repository.update("BK1", &changes).await.unwrap().unwrap();

    assert_eq!(updated.notes.as_deref(), Some("Bring documents"));
    assert_eq!(updated.duration, 60);
    assert_eq!(updated.customer_name, "Grace Hopper");
    assert_eq!(updated.appointment_time, "09:00");

    let cleared = AppointmentChanges {
        notes: Some(None),
        ..Default::default()
    };
    let updated = repository.update("BK1", &cleared).await.unwrap().unwrap();
    assert_eq!(updated.notes, None);
}

#[tokio::test]
async fn update_into_a_taken_slot_is_a_conflict() {
    let repository = repository().await;
    repository.insert(&new_appointment("BK1", "09:00")).await.unwrap();
    repository.insert(&new_appointment("BK2", "09:30")).await.unwrap();

    let changes = AppointmentChanges {
        appointment_time: Some("09:00".to_string()),
        ..Default::default()
    };
    let err = repository.update("BK2", &changes).await.unwrap_err();
    assert!(matches!(err, DbError::SlotTaken), "got {err:?}");
}

#[tokio::test]
async fn cancel_happens_at_most_once() {
    let repository = repository().await;
    repository.insert(&new_appointment("BK1", "09:00")).await.unwrap();

    let cancelled = repository
        .cancel("BK1", "Cancelled: client request")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert_eq!(cancelled.notes.as_deref(), Some("Cancelled: client request"));

    assert!(repository.cancel("BK1", "again").await.unwrap().is_none());
    assert!(repository
        .update("BK1", &AppointmentChanges::default())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn list_pages_newest_first_with_status_filter() {
    let repository = repository().await;
    for (i, time) in ["09:00", "09:30", "10:00"].iter().enumerate() {
        repository
            .insert(&new_appointment(&format!("BK{}", i + 1), time))
            .await
            .unwrap();
    }
    repository.cancel("BK2", "Cancelled by user").await.unwrap();

    let first = repository.list(1, 2, None).await.unwrap();
    assert_eq!(first.total, 3);
    let ids: Vec<_> = first.appointments.iter().map(|a| a.booking_id.as_str()).collect();
    assert_eq!(ids, vec!["BK3", "BK2"]);

    let second = repository.list(2, 2, None).await.unwrap();
    assert_eq!(second.appointments.len(), 1);
    assert_eq!(second.appointments[0].booking_id, "BK1");

    let cancelled = repository
        .list(1, 10, Some(AppointmentStatus::Cancelled))
        .await
        .unwrap();
    assert_eq!(cancelled.total, 1);
    assert_eq!(cancelled.appointments[0].booking_id, "BK2");
}

#[tokio::test]
async fn list_far_past_the_last_page_is_empty() {
    let repository = repository().await;
    repository.insert(&new_appointment("BK1", "09:00")).await.unwrap();

    let page = repository.list(u32::MAX, u32::MAX, None).await.unwrap();
    assert!(page.appointments.is_empty());
    assert_eq!(page.total, 1);
}
