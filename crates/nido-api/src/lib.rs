//! API layer for Nido
//!
//! HTTP handlers and DTOs for the booking endpoints.

#![forbid(unsafe_code)]

pub mod dto;
pub mod handlers;

use nido_db::{PgReservationRepository, PgSpaceRepository};
use nido_services::{BookingService, TracingNotifier};

/// The booking service as wired in production
pub type AppBookingService =
    BookingService<PgSpaceRepository, PgReservationRepository, TracingNotifier>;

pub use dto::ApiResponse;
pub use handlers::configure_bookings;
