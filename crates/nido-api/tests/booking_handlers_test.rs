//! Integration tests for booking API DTOs
//!
//! These tests exercise the request/response conversion layer with mock
//! data. For full integration testing, set DATABASE_URL environment
//! variable and run the ignored database tests in nido-db.

#[cfg(test)]
mod tests {
    use nido_api::dto::{
        BookingCreateRequest, BookingFilterParams, BookingResponse, StatusChangeRequest,
    };
    use nido_core::models::{Reservation, ReservationStatus};
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal_macros::dec;
    use validator::Validate;

    fn sample_request() -> BookingCreateRequest {
        BookingCreateRequest {
            space_id: 42,
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            guest_count: 4,
            message: Some("Team offsite".to_string()),
        }
    }

    fn sample_reservation() -> Reservation {
        Reservation::new(
            42,
            10,
            20,
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            4,
            dec!(15000),
            dec!(1500),
            Some("Team offsite".to_string()),
        )
    }

    #[test]
    fn test_create_request_to_service_request() {
        let req = sample_request();
        assert!(req.validate().is_ok());

        let service_req = req.to_request();
        assert_eq!(service_req.space_id, 42);
        assert_eq!(service_req.guest_count, 4);
        assert_eq!(service_req.message, Some("Team offsite".to_string()));
    }

    #[test]
    fn test_create_request_rejects_missing_space() {
        let mut req = sample_request();
        req.space_id = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_oversized_message() {
        let mut req = sample_request();
        req.message = Some("x".repeat(501));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_booking_response_conversion() {
        let reservation = sample_reservation();
        let id = reservation.id;

        let response = BookingResponse::from(reservation);

        assert_eq!(response.id, id.to_string());
        assert_eq!(response.space_id, 42);
        assert_eq!(response.guest_id, 10);
        assert_eq!(response.host_id, 20);
        assert_eq!(response.total_price, 15000.0);
        assert_eq!(response.service_fee, 1500.0);
        assert_eq!(response.total_charge, 16500.0);
        assert_eq!(response.status, "pending");
        assert_eq!(response.cancelled_by, None);
    }

    #[test]
    fn test_booking_response_after_cancellation() {
        let mut reservation = sample_reservation();
        reservation.status = ReservationStatus::Cancelled;
        reservation.cancelled_by = Some(10);
        reservation.cancellation_reason = Some("plans changed".to_string());

        let response = BookingResponse::from(reservation);

        assert_eq!(response.status, "cancelled");
        assert_eq!(response.cancelled_by, Some(10));
        assert_eq!(
            response.cancellation_reason,
            Some("plans changed".to_string())
        );
    }

    #[test]
    fn test_filter_params_deserialization() {
        let params: BookingFilterParams =
            serde_json::from_str(r#"{"role": "guest", "status": "pending"}"#).unwrap();
        assert_eq!(params.role.as_deref(), Some("guest"));
        assert_eq!(params.status.as_deref(), Some("pending"));

        let empty: BookingFilterParams = serde_json::from_str("{}").unwrap();
        assert!(empty.role.is_none());
        assert!(empty.status.is_none());
    }

    #[test]
    fn test_status_change_request_deserialization() {
        let req: StatusChangeRequest =
            serde_json::from_str(r#"{"status": "cancelled", "reason": "double booked"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.status, "cancelled");
        assert_eq!(req.reason.as_deref(), Some("double booked"));
    }
}
