//! Booking service
//!
//! Orchestrates booking admission control and the reservation lifecycle:
//! - Validates inbound booking requests against the space
//! - Prices the slot and snapshots the result on the reservation
//! - Admits the reservation through the store's atomic check-and-insert
//! - Applies status transitions under the state machine's rules
//!
//! All pricing and transition validation is pure computation; only the
//! store operations suspend.

use nido_core::{
    config::BookingConfig,
    models::{BookingRole, Reservation, ReservationStatus},
    traits::{Notifier, NotifyEvent, ReservationRepository, SpaceRepository},
    AppError, AppResult,
};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::constants::DEFAULT_FEE_RATE;
use crate::pricing;

/// A validated booking request
///
/// Built once at the service boundary from the inbound payload; the
/// guest identity comes from the authenticated session, never from the
/// request body.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub space_id: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub guest_count: i32,
    pub message: Option<String>,
}

/// Result of a successful admission
#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    /// Identifier of the created reservation
    pub reservation_id: Uuid,

    /// Total amount charged to the guest (base price + service fee)
    pub total_charge: Decimal,
}

/// Booking service
///
/// Generic over the store and notification seams so business rules can
/// be tested against in-memory implementations.
pub struct BookingService<S: SpaceRepository, R: ReservationRepository, N: Notifier> {
    space_repo: Arc<S>,
    reservation_repo: Arc<R>,
    notifier: Arc<N>,
    fee_rate: Decimal,
    admission_max_retries: u32,
}

impl<S: SpaceRepository, R: ReservationRepository, N: Notifier> BookingService<S, R, N> {
    /// Create a new booking service
    pub fn new(
        space_repo: Arc<S>,
        reservation_repo: Arc<R>,
        notifier: Arc<N>,
        config: &BookingConfig,
    ) -> Self {
        let fee_rate = Decimal::try_from(config.fee_rate).unwrap_or(DEFAULT_FEE_RATE);

        Self {
            space_repo,
            reservation_repo,
            notifier,
            fee_rate,
            admission_max_retries: config.admission_max_retries,
        }
    }

    /// Fire-and-forget notification dispatch
    ///
    /// Notification failures never affect the booking outcome; the
    /// notifier logs its own errors.
    fn dispatch_notify(&self, user_id: i32, event: NotifyEvent, payload: serde_json::Value) {
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            notifier.notify(user_id, event, payload).await;
        });
    }

    /// Create a new reservation
    ///
    /// Validates the request, prices the slot, and admits the
    /// reservation through the store's atomic check-and-insert. A losing
    /// concurrent request receives `SlotUnavailable`; transient store
    /// contention is retried a bounded number of times before giving up.
    ///
    /// # Errors
    ///
    /// - `NotFound` - the space does not exist
    /// - `Unavailable` - the space is inactive
    /// - `SelfBooking` - the guest owns the space
    /// - `Capacity` - guest count exceeds the space's capacity
    /// - `InvalidRange` - malformed or non-hour-aligned time range
    /// - `SlotUnavailable` - an active reservation overlaps the slot
    #[instrument(skip(self, request), fields(space_id = request.space_id))]
    pub async fn create_reservation(
        &self,
        guest_id: i32,
        request: BookingRequest,
    ) -> AppResult<BookingConfirmation> {
        if request.guest_count < 1 {
            return Err(AppError::Validation(
                "guest count must be positive".to_string(),
            ));
        }

        pricing::validate_slot(request.start_time, request.end_time)?;

        let space = self
            .space_repo
            .find_by_id(request.space_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Space {}", request.space_id)))?;

        if !space.is_bookable() {
            return Err(AppError::Unavailable(format!("Space {}", space.id)));
        }

        if space.host_id == guest_id {
            return Err(AppError::SelfBooking);
        }

        if request.guest_count > space.max_guests {
            return Err(AppError::Capacity {
                requested: request.guest_count,
                max: space.max_guests,
            });
        }

        // Price is snapshotted here; later listing price changes never
        // touch existing reservations.
        let quote = pricing::compute_price(
            space.hourly_rate,
            request.start_time,
            request.end_time,
            self.fee_rate,
        )?;

        let reservation = Reservation::new(
            space.id,
            guest_id,
            space.host_id,
            request.date,
            request.start_time,
            request.end_time,
            request.guest_count,
            quote.total_price,
            quote.service_fee,
            request.message,
        );

        let created = self.admit_with_retry(&reservation).await?;

        info!(
            "Reservation {} created for space {} on {} by guest {}",
            created.id, created.space_id, created.date, guest_id
        );

        self.dispatch_notify(
            created.host_id,
            NotifyEvent::BookingCreated,
            json!({
                "reservation_id": created.id,
                "space_id": created.space_id,
                "date": created.date,
                "guest_id": created.guest_id,
            }),
        );

        Ok(BookingConfirmation {
            reservation_id: created.id,
            total_charge: created.total_charge(),
        })
    }

    /// Run the atomic admission with bounded retry on transient contention
    ///
    /// A lost serialization race means the slot may actually still be
    /// free; retrying distinguishes that from a genuine conflict, which
    /// surfaces immediately as `SlotUnavailable`.
    async fn admit_with_retry(&self, reservation: &Reservation) -> AppResult<Reservation> {
        let mut attempt = 0;
        loop {
            match self.reservation_repo.create_if_free(reservation).await {
                Ok(created) => return Ok(created),
                Err(e) if e.is_retryable() && attempt < self.admission_max_retries => {
                    attempt += 1;
                    warn!(
                        "Transient admission contention for space {} (attempt {}): {}",
                        reservation.space_id, attempt, e
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// List reservations involving a user, most recent first
    #[instrument(skip(self))]
    pub async fn list_reservations(
        &self,
        user_id: i32,
        role: Option<BookingRole>,
        status: Option<ReservationStatus>,
    ) -> AppResult<Vec<Reservation>> {
        self.reservation_repo
            .list_for_user(user_id, role, status)
            .await
    }

    /// Get full reservation detail
    ///
    /// Only the guest or host on the record may read it.
    #[instrument(skip(self))]
    pub async fn get_reservation(
        &self,
        id: Uuid,
        requesting_user_id: i32,
    ) -> AppResult<Reservation> {
        let reservation = self
            .reservation_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {}", id)))?;

        if !reservation.involves(requesting_user_id) {
            return Err(AppError::Unauthorized(
                "not a party to this reservation".to_string(),
            ));
        }

        Ok(reservation)
    }

    /// Apply a status transition requested by a user
    ///
    /// Authorization and state-machine validation happen before the
    /// single atomic status write:
    /// - only the host may confirm
    /// - either party may cancel while non-terminal; the cancelling
    ///   actor and optional reason are recorded
    /// - completion is system-driven and never user-requested
    ///
    /// # Errors
    ///
    /// - `NotFound` - no such reservation
    /// - `Unauthorized` - requester is not a party, or lacks the role
    ///   for this transition
    /// - `InvalidTransition` - the transition is not legal from the
    ///   current status
    #[instrument(skip(self, reason))]
    pub async fn change_status(
        &self,
        id: Uuid,
        requesting_user_id: i32,
        target: ReservationStatus,
        reason: Option<String>,
    ) -> AppResult<Reservation> {
        let reservation = self
            .reservation_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {}", id)))?;

        let role = reservation.role_of(requesting_user_id).ok_or_else(|| {
            AppError::Unauthorized("not a party to this reservation".to_string())
        })?;

        match target {
            ReservationStatus::Confirmed => {
                if role != BookingRole::Host {
                    return Err(AppError::Unauthorized(
                        "only the host can confirm a reservation".to_string(),
                    ));
                }
            }
            ReservationStatus::Cancelled => {
                // Either party may cancel.
            }
            ReservationStatus::Completed => {
                return Err(AppError::Unauthorized(
                    "completion is applied by the system once the slot has elapsed".to_string(),
                ));
            }
            ReservationStatus::Pending => {
                return Err(AppError::InvalidTransition {
                    from: reservation.status.to_string(),
                    to: target.to_string(),
                });
            }
        }

        if !reservation.status.can_transition_to(target) {
            return Err(AppError::InvalidTransition {
                from: reservation.status.to_string(),
                to: target.to_string(),
            });
        }

        let (cancelled_by, reason) = if target == ReservationStatus::Cancelled {
            (Some(requesting_user_id), reason)
        } else {
            (None, None)
        };

        let updated = self
            .reservation_repo
            .update_status(id, reservation.status, target, cancelled_by, reason)
            .await?;

        info!(
            "Reservation {} transitioned {} -> {} by user {}",
            id, reservation.status, target, requesting_user_id
        );

        let (recipient, event) = match target {
            ReservationStatus::Confirmed => (updated.guest_id, NotifyEvent::BookingConfirmed),
            _ => {
                // Cancellation notifies the counterparty.
                let recipient = if requesting_user_id == updated.guest_id {
                    updated.host_id
                } else {
                    updated.guest_id
                };
                (recipient, NotifyEvent::BookingCancelled)
            }
        };

        self.dispatch_notify(
            recipient,
            event,
            json!({
                "reservation_id": updated.id,
                "space_id": updated.space_id,
                "status": updated.status,
            }),
        );

        Ok(updated)
    }
}
