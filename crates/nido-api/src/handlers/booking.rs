//! Booking handlers
//!
//! HTTP handlers for the booking endpoints. All routes require an
//! authenticated user; authorization beyond that (who may read or
//! transition a booking) lives in the booking service.

use crate::dto::booking::{
    BookingCreateRequest, BookingCreatedResponse, BookingFilterParams, BookingResponse,
    StatusChangeRequest,
};
use crate::dto::ApiResponse;
use crate::AppBookingService;
use actix_web::{web, HttpResponse};
use nido_auth::AuthenticatedUser;
use nido_core::models::{BookingRole, ReservationStatus};
use nido_core::AppError;
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Create a new booking
///
/// POST /api/v1/bookings
#[instrument(skip(service, user, req), fields(user_id = user.user_id))]
pub async fn create_booking(
    service: web::Data<AppBookingService>,
    user: AuthenticatedUser,
    req: web::Json<BookingCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Booking creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(space_id = req.space_id, date = %req.date, "Creating booking");

    let confirmation = service
        .create_reservation(user.user_id, req.to_request())
        .await?;

    let response = BookingCreatedResponse {
        id: confirmation.reservation_id.to_string(),
        total_charge: confirmation.total_charge.to_f64().unwrap_or(0.0),
        status: ReservationStatus::Pending.to_string(),
    };

    Ok(HttpResponse::Created().json(ApiResponse::with_message(response, "Booking created")))
}

/// List the caller's bookings, most recent first
///
/// GET /api/v1/bookings
#[instrument(skip(service, user, query), fields(user_id = user.user_id))]
pub async fn list_bookings(
    service: web::Data<AppBookingService>,
    user: AuthenticatedUser,
    query: web::Query<BookingFilterParams>,
) -> Result<HttpResponse, AppError> {
    let role = match query.role.as_deref() {
        Some(s) => Some(BookingRole::from_str(s).ok_or_else(|| {
            AppError::Validation(format!("Unknown role filter '{}'", s))
        })?),
        None => None,
    };

    let status = match query.status.as_deref() {
        Some(s) => Some(ReservationStatus::from_str(s).ok_or_else(|| {
            AppError::Validation(format!("Unknown status filter '{}'", s))
        })?),
        None => None,
    };

    debug!(?role, ?status, "Listing bookings");

    let reservations = service
        .list_reservations(user.user_id, role, status)
        .await?;

    let response: Vec<BookingResponse> = reservations.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Get full booking detail
///
/// GET /api/v1/bookings/{id}
#[instrument(skip(service, user), fields(user_id = user.user_id))]
pub async fn get_booking(
    service: web::Data<AppBookingService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let reservation = service.get_reservation(id, user.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(BookingResponse::from(reservation))))
}

/// Apply a status transition to a booking
///
/// PATCH /api/v1/bookings/{id}/status
#[instrument(skip(service, user, req), fields(user_id = user.user_id))]
pub async fn change_booking_status(
    service: web::Data<AppBookingService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<StatusChangeRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Status change validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let id = path.into_inner();

    let target = ReservationStatus::from_str(&req.status)
        .ok_or_else(|| AppError::Validation(format!("Unknown status '{}'", req.status)))?;

    debug!(%id, target = %target, "Changing booking status");

    let updated = service
        .change_status(id, user.user_id, target, req.reason.clone())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(BookingResponse::from(updated))))
}

/// Configure booking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::post().to(create_booking))
            .route("", web::get().to(list_bookings))
            .route("/{id}", web::get().to(get_booking))
            .route("/{id}/status", web::patch().to(change_booking_status)),
    );
}
