//! Common traits for repositories and collaborator services
//!
//! Defines the seams between the booking core, the reservation store,
//! and external collaborators (listing store, notifications).

use crate::error::AppError;
use crate::models::{BookingRole, Reservation, ReservationStatus, Space};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::Value;
use uuid::Uuid;

/// Read-only access to the listing store
///
/// Listings are owned by a separate subsystem; the booking core only
/// needs to resolve a space id to its booking-relevant attributes.
#[async_trait]
pub trait SpaceRepository: Send + Sync {
    /// Find a space by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Space>, AppError>;
}

/// Reservation store
///
/// The sole writer of reservation records. `create_if_free` is the
/// admission boundary: the conflict check and the insert must be atomic
/// with respect to concurrent admissions on the same `(space_id, date)`.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Find a reservation by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, AppError>;

    /// List reservations involving a user, most recent first
    ///
    /// `role` narrows to bookings where the user is guest or host;
    /// `status` narrows to a single lifecycle status.
    async fn list_for_user(
        &self,
        user_id: i32,
        role: Option<BookingRole>,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>, AppError>;

    /// Atomically check the slot for conflicts and insert the reservation
    ///
    /// Runs the overlap check and the insert inside one critical section
    /// keyed by `(space_id, date)`. Returns `SlotUnavailable` when an
    /// active reservation overlaps; either the full insert succeeds or
    /// nothing is persisted.
    async fn create_if_free(&self, reservation: &Reservation) -> Result<Reservation, AppError>;

    /// Compare-and-swap status update with audit fields
    ///
    /// The update only applies while the stored status still equals
    /// `expected`; a concurrent transition surfaces as
    /// `InvalidTransition`. Cancellations record the cancelling actor
    /// and optional reason in the same write.
    async fn update_status(
        &self,
        id: Uuid,
        expected: ReservationStatus,
        target: ReservationStatus,
        cancelled_by: Option<i32>,
        reason: Option<String>,
    ) -> Result<Reservation, AppError>;

    /// Mark elapsed confirmed reservations as completed
    ///
    /// Returns the number of reservations transitioned.
    async fn complete_elapsed(&self, now: NaiveDateTime) -> Result<i64, AppError>;
}

/// Booking lifecycle events published to the notification collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyEvent {
    /// A reservation was created and awaits host confirmation
    BookingCreated,
    /// The host confirmed a reservation
    BookingConfirmed,
    /// A party cancelled a reservation
    BookingCancelled,
}

impl NotifyEvent {
    /// Stable event name for downstream consumers
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyEvent::BookingCreated => "booking_created",
            NotifyEvent::BookingConfirmed => "booking_confirmed",
            NotifyEvent::BookingCancelled => "booking_cancelled",
        }
    }
}

/// Fire-and-forget notification collaborator
///
/// The booking core calls this after create/confirm/cancel but never
/// blocks on or retries its failure; implementations must swallow and
/// log their own errors.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Deliver an event to a user
    async fn notify(&self, user_id: i32, event: NotifyEvent, payload: Value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_event_names() {
        assert_eq!(NotifyEvent::BookingCreated.as_str(), "booking_created");
        assert_eq!(NotifyEvent::BookingConfirmed.as_str(), "booking_confirmed");
        assert_eq!(NotifyEvent::BookingCancelled.as_str(), "booking_cancelled");
    }
}
