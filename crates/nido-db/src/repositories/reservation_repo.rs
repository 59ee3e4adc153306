//! Reservation repository implementation
//!
//! PostgreSQL-backed reservation store. The admission path
//! (`create_if_free`) pairs the conflict check with the insert inside a
//! single transaction, serialized per `(space_id, date)` through a
//! Postgres advisory lock, so two concurrent requests for overlapping
//! slots can never both commit. Requests for different spaces or dates
//! take independent locks and proceed in parallel.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use nido_core::{
    models::{BookingRole, Reservation, ReservationStatus},
    traits::ReservationRepository,
    AppError, AppResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Column list shared by every reservation query
const RESERVATION_COLUMNS: &str = r#"
    id, space_id, guest_id, host_id,
    date, start_time, end_time, guest_count,
    total_price, service_fee, status,
    cancelled_by, cancellation_reason, guest_message,
    created_at, updated_at
"#;

/// PostgreSQL implementation of ReservationRepository
pub struct PgReservationRepository {
    pool: PgPool,
}

impl PgReservationRepository {
    /// Create a new reservation repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse reservation status from string
    fn parse_status(s: &str) -> ReservationStatus {
        ReservationStatus::from_str(s).unwrap_or(ReservationStatus::Pending)
    }

    /// Whether a database error is transient contention worth retrying
    ///
    /// SQLSTATE 40001 (serialization_failure) and 40P01 (deadlock_detected)
    /// mean the transaction lost a race, not that the slot is booked.
    fn is_serialization_failure(e: &sqlx::Error) -> bool {
        e.as_database_error()
            .and_then(|d| d.code())
            .map(|code| code == "40001" || code == "40P01")
            .unwrap_or(false)
    }

    /// Map a sqlx error from the admission transaction to an AppError
    fn map_admission_err(e: sqlx::Error, context: &str) -> AppError {
        if Self::is_serialization_failure(&e) {
            warn!("Transient contention during {}: {}", context, e);
            AppError::Transaction(format!("{}: {}", context, e))
        } else {
            error!("Database error during {}: {}", context, e);
            AppError::Database(format!("{}: {}", context, e))
        }
    }

    /// Check whether any active reservation overlaps `[start, end)` on
    /// the given space and date
    ///
    /// Half-open interval overlap: `start_time < $end AND end_time > $start`,
    /// so a slot ending exactly when another starts does not conflict.
    async fn conflict_exists<'e>(
        executor: impl sqlx::PgExecutor<'e>,
        space_id: i32,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> AppResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM reservations
                WHERE space_id = $1
                  AND date = $2
                  AND status IN ('pending', 'confirmed')
                  AND start_time < $4
                  AND end_time > $3
            )
            "#,
        )
        .bind(space_id)
        .bind(date)
        .bind(start)
        .bind(end)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            error!("Database error checking slot conflicts: {}", e);
            AppError::Database(format!("Failed to check slot conflicts: {}", e))
        })?;

        Ok(exists)
    }

    /// Pure read of slot availability, outside any critical section
    ///
    /// Suitable for advisory availability displays only; admission always
    /// re-checks inside the locked transaction.
    #[instrument(skip(self))]
    pub async fn has_conflict(
        &self,
        space_id: i32,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> AppResult<bool> {
        Self::conflict_exists(&self.pool, space_id, date, start, end).await
    }
}

#[async_trait]
impl ReservationRepository for PgReservationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        debug!("Finding reservation by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, ReservationRow>(&format!(
            "SELECT {} FROM reservations WHERE id = $1",
            RESERVATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding reservation {}: {}", id, e);
            AppError::Database(format!("Failed to find reservation: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list_for_user(
        &self,
        user_id: i32,
        role: Option<BookingRole>,
        status: Option<ReservationStatus>,
    ) -> AppResult<Vec<Reservation>> {
        debug!(
            "Listing reservations for user {} (role: {:?}, status: {:?})",
            user_id, role, status
        );

        let role_clause = match role {
            Some(BookingRole::Guest) => "guest_id = $1",
            Some(BookingRole::Host) => "host_id = $1",
            None => "(guest_id = $1 OR host_id = $1)",
        };

        let mut sql = format!(
            "SELECT {} FROM reservations WHERE {}",
            RESERVATION_COLUMNS, role_clause
        );
        if status.is_some() {
            sql.push_str(" AND status = $2");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<sqlx::Postgres, ReservationRow>(&sql).bind(user_id);
        if let Some(status) = status {
            query = query.bind(status.to_string());
        }

        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            error!("Database error listing reservations: {}", e);
            AppError::Database(format!("Failed to list reservations: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, reservation))]
    async fn create_if_free(&self, reservation: &Reservation) -> AppResult<Reservation> {
        debug!(
            "Admitting reservation for space {} on {} [{} - {})",
            reservation.space_id, reservation.date, reservation.start_time, reservation.end_time
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::map_admission_err(e, "begin admission transaction"))?;

        // Serialize all admissions for this (space_id, date). The lock is
        // released automatically at commit or rollback.
        sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
            .bind(reservation.space_id)
            .bind(Reservation::date_lock_key(reservation.date))
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::map_admission_err(e, "acquire admission lock"))?;

        let conflict = Self::conflict_exists(
            &mut *tx,
            reservation.space_id,
            reservation.date,
            reservation.start_time,
            reservation.end_time,
        )
        .await?;

        if conflict {
            // Dropping the transaction rolls it back and releases the lock.
            info!(
                "Slot conflict for space {} on {} [{} - {})",
                reservation.space_id,
                reservation.date,
                reservation.start_time,
                reservation.end_time
            );
            return Err(AppError::SlotUnavailable);
        }

        let row = sqlx::query_as::<sqlx::Postgres, ReservationRow>(&format!(
            r#"
            INSERT INTO reservations (
                id, space_id, guest_id, host_id,
                date, start_time, end_time, guest_count,
                total_price, service_fee, status,
                guest_message, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            RESERVATION_COLUMNS
        ))
        .bind(reservation.id)
        .bind(reservation.space_id)
        .bind(reservation.guest_id)
        .bind(reservation.host_id)
        .bind(reservation.date)
        .bind(reservation.start_time)
        .bind(reservation.end_time)
        .bind(reservation.guest_count)
        .bind(reservation.total_price)
        .bind(reservation.service_fee)
        .bind(reservation.status.to_string())
        .bind(&reservation.guest_message)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Self::map_admission_err(e, "insert reservation"))?;

        tx.commit()
            .await
            .map_err(|e| Self::map_admission_err(e, "commit admission transaction"))?;

        info!(
            "Created reservation {} for space {} on {}",
            reservation.id, reservation.space_id, reservation.date
        );

        Ok(row.into())
    }

    #[instrument(skip(self, reason))]
    async fn update_status(
        &self,
        id: Uuid,
        expected: ReservationStatus,
        target: ReservationStatus,
        cancelled_by: Option<i32>,
        reason: Option<String>,
    ) -> AppResult<Reservation> {
        debug!(
            "Updating reservation {} status: {} -> {}",
            id, expected, target
        );

        // Compare-and-swap on the stored status. A concurrent transition
        // leaves zero rows updated and the record untouched.
        let row = sqlx::query_as::<sqlx::Postgres, ReservationRow>(&format!(
            r#"
            UPDATE reservations
            SET status = $3,
                cancelled_by = COALESCE($4, cancelled_by),
                cancellation_reason = COALESCE($5, cancellation_reason),
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            RESERVATION_COLUMNS
        ))
        .bind(id)
        .bind(expected.to_string())
        .bind(target.to_string())
        .bind(cancelled_by)
        .bind(&reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating reservation status: {}", e);
            AppError::Database(format!("Failed to update reservation status: {}", e))
        })?;

        match row {
            Some(row) => Ok(row.into()),
            None => {
                // Distinguish a missing record from a lost transition race.
                let current = self.find_by_id(id).await?;
                match current {
                    Some(res) => {
                        warn!(
                            "Status transition lost: reservation {} is {} (expected {})",
                            id, res.status, expected
                        );
                        Err(AppError::InvalidTransition {
                            from: res.status.to_string(),
                            to: target.to_string(),
                        })
                    }
                    None => Err(AppError::NotFound(format!("Reservation {}", id))),
                }
            }
        }
    }

    #[instrument(skip(self))]
    async fn complete_elapsed(&self, now: NaiveDateTime) -> AppResult<i64> {
        debug!("Completing confirmed reservations elapsed before {}", now);

        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET status = 'completed',
                updated_at = NOW()
            WHERE status = 'confirmed'
              AND (date + end_time) <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error completing reservations: {}", e);
            AppError::Database(format!("Failed to complete reservations: {}", e))
        })?;

        let completed = result.rows_affected() as i64;

        if completed > 0 {
            info!("Completed {} elapsed reservations", completed);
        }

        Ok(completed)
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    id: Uuid,
    space_id: i32,
    guest_id: i32,
    host_id: i32,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    guest_count: i32,
    total_price: Decimal,
    service_fee: Decimal,
    status: String,
    cancelled_by: Option<i32>,
    cancellation_reason: Option<String>,
    guest_message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Self {
            id: row.id,
            space_id: row.space_id,
            guest_id: row.guest_id,
            host_id: row.host_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            guest_count: row.guest_count,
            total_price: row.total_price,
            service_fee: row.service_fee,
            status: PgReservationRepository::parse_status(&row.status),
            cancelled_by: row.cancelled_by,
            cancellation_reason: row.cancellation_reason,
            guest_message: row.guest_message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(
            PgReservationRepository::parse_status("pending"),
            ReservationStatus::Pending
        );
        assert_eq!(
            PgReservationRepository::parse_status("confirmed"),
            ReservationStatus::Confirmed
        );
        assert_eq!(
            PgReservationRepository::parse_status("cancelled"),
            ReservationStatus::Cancelled
        );
        assert_eq!(
            PgReservationRepository::parse_status("completed"),
            ReservationStatus::Completed
        );
    }

    #[test]
    fn test_date_lock_key_is_stable() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(
            Reservation::date_lock_key(date),
            Reservation::date_lock_key(date)
        );
        assert_ne!(
            Reservation::date_lock_key(date),
            Reservation::date_lock_key(date.succ_opt().unwrap())
        );
    }
}
