//! Booking DTOs
//!
//! Request and response types for booking endpoints.

use nido_core::models::Reservation;
use nido_services::BookingRequest;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Booking creation request
///
/// The guest identity comes from the authenticated session, never from
/// the request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookingCreateRequest {
    /// Space to book
    #[validate(range(min = 1, message = "Space id is required"))]
    pub space_id: i32,

    /// Calendar day of the booking
    pub date: NaiveDate,

    /// Slot start (must fall on an hour boundary)
    pub start_time: NaiveTime,

    /// Slot end (must fall on an hour boundary, strictly after start)
    pub end_time: NaiveTime,

    /// Number of guests
    #[validate(range(min = 1, max = 1000))]
    pub guest_count: i32,

    /// Optional message from the guest to the host
    #[validate(length(max = 500))]
    pub message: Option<String>,
}

impl BookingCreateRequest {
    /// Convert to the service-level request
    pub fn to_request(&self) -> BookingRequest {
        BookingRequest {
            space_id: self.space_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            guest_count: self.guest_count,
            message: self.message.clone(),
        }
    }
}

/// Query parameters for listing bookings
#[derive(Debug, Clone, Deserialize)]
pub struct BookingFilterParams {
    /// Filter by the caller's role on the booking (guest/host)
    pub role: Option<String>,

    /// Filter by booking status
    pub status: Option<String>,
}

/// Status transition request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StatusChangeRequest {
    /// Target status (confirmed/cancelled)
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,

    /// Optional reason, recorded on cancellation
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Response returned on successful booking creation
#[derive(Debug, Clone, Serialize)]
pub struct BookingCreatedResponse {
    /// Reservation ID
    pub id: String,

    /// Total amount charged to the guest (base price + service fee)
    pub total_charge: f64,

    /// Initial status
    pub status: String,
}

/// Full booking detail response
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    /// Reservation ID
    pub id: String,

    /// Booked space
    pub space_id: i32,

    /// Requesting guest
    pub guest_id: i32,

    /// Space owner
    pub host_id: i32,

    /// Calendar day of the booking
    pub date: NaiveDate,

    /// Slot start
    pub start_time: NaiveTime,

    /// Slot end
    pub end_time: NaiveTime,

    /// Number of guests
    pub guest_count: i32,

    /// Base price snapshotted at creation
    pub total_price: f64,

    /// Platform service fee
    pub service_fee: f64,

    /// Total amount charged to the guest
    pub total_charge: f64,

    /// Current status
    pub status: String,

    /// Who cancelled the booking, if cancelled
    pub cancelled_by: Option<i32>,

    /// Cancellation reason
    pub cancellation_reason: Option<String>,

    /// Message from the guest
    pub guest_message: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for BookingResponse {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id.to_string(),
            space_id: r.space_id,
            guest_id: r.guest_id,
            host_id: r.host_id,
            date: r.date,
            start_time: r.start_time,
            end_time: r.end_time,
            guest_count: r.guest_count,
            total_price: r.total_price.to_f64().unwrap_or(0.0),
            service_fee: r.service_fee.to_f64().unwrap_or(0.0),
            total_charge: r.total_charge().to_f64().unwrap_or(0.0),
            status: r.status.to_string(),
            cancelled_by: r.cancelled_by,
            cancellation_reason: r.cancellation_reason,
            guest_message: r.guest_message,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
