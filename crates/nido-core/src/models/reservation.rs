//! Reservation model and booking state machine
//!
//! A reservation is a single time-slot booking of a space by a guest.
//! Its lifecycle is governed by a small state machine:
//!
//! 1. Created as `Pending` after passing admission control
//! 2. `Confirmed` by the host, or `Cancelled` by either party
//! 3. `Completed` by the system once the booked slot has elapsed
//!
//! `Cancelled` and `Completed` are terminal; terminal records are
//! immutable except for audit fields.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Awaiting confirmation by the host; occupies the time slot
    #[default]
    Pending,
    /// Confirmed by the host; occupies the time slot
    Confirmed,
    /// Cancelled by guest or host; terminal
    Cancelled,
    /// Booked slot fully elapsed; terminal
    Completed,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationStatus::Pending => write!(f, "pending"),
            ReservationStatus::Confirmed => write!(f, "confirmed"),
            ReservationStatus::Cancelled => write!(f, "cancelled"),
            ReservationStatus::Completed => write!(f, "completed"),
        }
    }
}

impl ReservationStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ReservationStatus::Pending),
            "confirmed" => Some(ReservationStatus::Confirmed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            "completed" => Some(ReservationStatus::Completed),
            _ => None,
        }
    }

    /// Check if the reservation still occupies its time slot
    ///
    /// Active reservations are the ones considered during conflict checks.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
    }

    /// Check if the status is terminal
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Check whether a transition to `target` is permitted
    ///
    /// Permitted transitions:
    /// - pending -> confirmed
    /// - pending -> cancelled
    /// - confirmed -> cancelled
    /// - confirmed -> completed
    ///
    /// A `pending` reservation must pass through `confirmed` before it can
    /// be completed.
    pub fn can_transition_to(&self, target: ReservationStatus) -> bool {
        matches!(
            (self, target),
            (ReservationStatus::Pending, ReservationStatus::Confirmed)
                | (ReservationStatus::Pending, ReservationStatus::Cancelled)
                | (ReservationStatus::Confirmed, ReservationStatus::Cancelled)
                | (ReservationStatus::Confirmed, ReservationStatus::Completed)
        )
    }
}

/// Role of a user relative to a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingRole {
    /// The user who requested the booking
    Guest,
    /// The owner of the booked space
    Host,
}

impl BookingRole {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "guest" => Some(BookingRole::Guest),
            "host" => Some(BookingRole::Host),
            _ => None,
        }
    }
}

/// Half-open interval overlap check
///
/// Two slots `[s1, e1)` and `[s2, e2)` conflict iff `s1 < e2 && s2 < e1`.
/// A slot ending exactly when another starts does not conflict.
pub fn overlaps(s1: NaiveTime, e1: NaiveTime, s2: NaiveTime, e2: NaiveTime) -> bool {
    s1 < e2 && s2 < e1
}

/// Reservation entity
///
/// The central record of the booking core. Created only through admission
/// control, mutated only through status transitions, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique identifier (UUID v4), immutable
    pub id: Uuid,

    /// Booked space
    pub space_id: i32,

    /// Requesting guest
    pub guest_id: i32,

    /// Owner of the booked space, denormalized at creation
    pub host_id: i32,

    /// Calendar day of the booking
    pub date: NaiveDate,

    /// Slot start (wall clock, same day as `end_time`)
    pub start_time: NaiveTime,

    /// Slot end, strictly after `start_time`
    pub end_time: NaiveTime,

    /// Number of guests, validated against space capacity at creation
    pub guest_count: i32,

    /// Base price, snapshotted at creation from the space's hourly rate
    pub total_price: Decimal,

    /// Platform fee, derived from `total_price` at creation
    pub service_fee: Decimal,

    /// Current lifecycle status
    pub status: ReservationStatus,

    /// Who cancelled the reservation, if cancelled
    pub cancelled_by: Option<i32>,

    /// Free-text cancellation reason
    pub cancellation_reason: Option<String>,

    /// Optional message from the guest to the host
    pub guest_message: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Create a new pending reservation
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        space_id: i32,
        guest_id: i32,
        host_id: i32,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        guest_count: i32,
        total_price: Decimal,
        service_fee: Decimal,
        guest_message: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            space_id,
            guest_id,
            host_id,
            date,
            start_time,
            end_time,
            guest_count,
            total_price,
            service_fee,
            status: ReservationStatus::Pending,
            cancelled_by: None,
            cancellation_reason: None,
            guest_message,
            created_at: now,
            updated_at: now,
        }
    }

    /// Total amount charged to the guest (base price + service fee)
    #[inline]
    pub fn total_charge(&self) -> Decimal {
        self.total_price + self.service_fee
    }

    /// Whether the reservation still occupies its time slot
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whether `user_id` is a party (guest or host) to this reservation
    pub fn involves(&self, user_id: i32) -> bool {
        self.guest_id == user_id || self.host_id == user_id
    }

    /// Role of `user_id` on this reservation, if any
    pub fn role_of(&self, user_id: i32) -> Option<BookingRole> {
        if self.guest_id == user_id {
            Some(BookingRole::Guest)
        } else if self.host_id == user_id {
            Some(BookingRole::Host)
        } else {
            None
        }
    }

    /// Whether the booked slot has fully elapsed at `now` (wall clock)
    pub fn has_ended(&self, now: NaiveDateTime) -> bool {
        self.date.and_time(self.end_time) <= now
    }

    /// Whether this reservation's slot conflicts with `[start, end)` on the
    /// same space and date
    pub fn conflicts_with(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> bool {
        self.is_active()
            && self.date == date
            && overlaps(self.start_time, self.end_time, start, end)
    }

    /// Advisory lock key for this reservation's `(space_id, date)` slot
    ///
    /// Day number since the common era fits an i32, which pairs with the
    /// space id as the two-int form of a Postgres advisory lock.
    pub fn date_lock_key(date: NaiveDate) -> i32 {
        date.num_days_from_ce()
    }
}
