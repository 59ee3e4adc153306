//! Admission control integration tests
//!
//! These tests require a running PostgreSQL instance. Set DATABASE_URL
//! and run with `cargo test -- --ignored`.

use chrono::{NaiveDate, NaiveTime};
use nido_core::models::{Reservation, ReservationStatus};
use nido_core::traits::ReservationRepository;
use nido_core::AppError;
use nido_db::{create_pool, PgReservationRepository};
use rust_decimal_macros::dec;
use sqlx::PgPool;
use std::sync::Arc;

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = create_pool(&url, Some(10)).await.expect("pool");
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

/// Insert a space and return its id
async fn seed_space(pool: &PgPool, host_id: i32) -> i32 {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO spaces (host_id, title, hourly_rate, max_guests, status)
        VALUES ($1, 'Test studio', 5000, 10, 'active')
        RETURNING id
        "#,
    )
    .bind(host_id)
    .fetch_one(pool)
    .await
    .expect("seed space");
    id
}

async fn cleanup(pool: &PgPool, space_id: i32) {
    sqlx::query("DELETE FROM reservations WHERE space_id = $1")
        .bind(space_id)
        .execute(pool)
        .await
        .ok();
    sqlx::query("DELETE FROM spaces WHERE id = $1")
        .bind(space_id)
        .execute(pool)
        .await
        .ok();
}

fn reservation(space_id: i32, guest_id: i32, start_h: u32, end_h: u32) -> Reservation {
    Reservation::new(
        space_id,
        guest_id,
        1,
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        NaiveTime::from_hms_opt(start_h, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(end_h, 0, 0).unwrap(),
        2,
        dec!(20000),
        dec!(2000),
        None,
    )
}

#[tokio::test]
#[ignore] // Requires database
async fn test_concurrent_admission_single_winner() {
    let pool = test_pool().await;
    let space_id = seed_space(&pool, 1).await;
    let repo = Arc::new(PgReservationRepository::new(pool.clone()));

    // Ten concurrent requests for the same slot; exactly one may win.
    let mut handles = Vec::new();
    for guest_id in 100..110 {
        let repo = repo.clone();
        let res = reservation(space_id, guest_id, 14, 18);
        handles.push(tokio::spawn(
            async move { repo.create_if_free(&res).await },
        ));
    }

    let mut winners = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("task") {
            Ok(_) => winners += 1,
            Err(AppError::SlotUnavailable) => conflicts += 1,
            Err(e) => panic!("unexpected admission error: {}", e),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(conflicts, 9);

    cleanup(&pool, space_id).await;
}

#[tokio::test]
#[ignore] // Requires database
async fn test_touching_slots_both_admitted() {
    let pool = test_pool().await;
    let space_id = seed_space(&pool, 1).await;
    let repo = PgReservationRepository::new(pool.clone());

    repo.create_if_free(&reservation(space_id, 100, 10, 12))
        .await
        .expect("first slot");
    repo.create_if_free(&reservation(space_id, 101, 12, 14))
        .await
        .expect("touching slot");

    cleanup(&pool, space_id).await;
}

#[tokio::test]
#[ignore] // Requires database
async fn test_cancelled_slot_is_reusable() {
    let pool = test_pool().await;
    let space_id = seed_space(&pool, 1).await;
    let repo = PgReservationRepository::new(pool.clone());

    let first = repo
        .create_if_free(&reservation(space_id, 100, 10, 12))
        .await
        .expect("first slot");

    let blocked = repo.create_if_free(&reservation(space_id, 101, 10, 12)).await;
    assert!(matches!(blocked, Err(AppError::SlotUnavailable)));

    repo.update_status(
        first.id,
        ReservationStatus::Pending,
        ReservationStatus::Cancelled,
        Some(100),
        None,
    )
    .await
    .expect("cancel");

    repo.create_if_free(&reservation(space_id, 101, 10, 12))
        .await
        .expect("slot released by cancellation");

    cleanup(&pool, space_id).await;
}

#[tokio::test]
#[ignore] // Requires database
async fn test_stale_status_transition_rejected() {
    let pool = test_pool().await;
    let space_id = seed_space(&pool, 1).await;
    let repo = PgReservationRepository::new(pool.clone());

    let created = repo
        .create_if_free(&reservation(space_id, 100, 10, 12))
        .await
        .expect("create");

    repo.update_status(
        created.id,
        ReservationStatus::Pending,
        ReservationStatus::Cancelled,
        Some(100),
        None,
    )
    .await
    .expect("cancel");

    // Confirming against the stale pending status must fail without
    // touching the record.
    let result = repo
        .update_status(
            created.id,
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            None,
            None,
        )
        .await;
    assert!(matches!(result, Err(AppError::InvalidTransition { .. })));

    let current = repo.find_by_id(created.id).await.expect("fetch").unwrap();
    assert_eq!(current.status, ReservationStatus::Cancelled);

    cleanup(&pool, space_id).await;
}
