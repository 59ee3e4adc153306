//! Pricing calculator
//!
//! Pure price computation for a booking slot. Billing is whole-hour:
//! start and end times must be hour-aligned, and the base price is the
//! number of hours times the space's hourly rate at booking time. The
//! platform service fee is a configurable percentage on top.
//!
//! Hour alignment is enforced here rather than silently truncating
//! partial hours, so a 14:30-16:00 request is rejected instead of being
//! billed as one hour.

use chrono::{NaiveTime, Timelike};
use nido_core::{AppError, AppResult};
use rust_decimal::Decimal;

/// A priced booking slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Base price: hours x hourly rate
    pub total_price: Decimal,

    /// Platform fee derived from the base price
    pub service_fee: Decimal,
}

impl Quote {
    /// Total amount charged to the guest
    #[inline]
    pub fn total_charge(&self) -> Decimal {
        self.total_price + self.service_fee
    }
}

/// Validate a booking time range
///
/// # Errors
///
/// Returns `InvalidRange` when the end is not strictly after the start,
/// or when either bound is not aligned to a whole hour.
pub fn validate_slot(start: NaiveTime, end: NaiveTime) -> AppResult<()> {
    if end <= start {
        return Err(AppError::InvalidRange(
            "end time must be after start time".to_string(),
        ));
    }

    if start.minute() != 0 || start.second() != 0 || end.minute() != 0 || end.second() != 0 {
        return Err(AppError::InvalidRange(
            "booking times must be aligned to whole hours".to_string(),
        ));
    }

    Ok(())
}

/// Duration of a validated slot in whole hours
pub fn duration_hours(start: NaiveTime, end: NaiveTime) -> u32 {
    end.hour() - start.hour()
}

/// Compute the price of a booking slot
///
/// # Arguments
///
/// * `hourly_rate` - The space's price per hour at booking time
/// * `start` / `end` - Hour-aligned slot bounds, `end > start`
/// * `fee_rate` - Platform fee rate (0.10 = 10%)
///
/// # Errors
///
/// Returns `InvalidRange` for malformed slots and `InvalidInput` for a
/// negative rate.
pub fn compute_price(
    hourly_rate: Decimal,
    start: NaiveTime,
    end: NaiveTime,
    fee_rate: Decimal,
) -> AppResult<Quote> {
    if hourly_rate < Decimal::ZERO {
        return Err(AppError::InvalidInput(
            "hourly rate must be non-negative".to_string(),
        ));
    }

    validate_slot(start, end)?;

    let hours = Decimal::from(duration_hours(start, end));
    let total_price = hours * hourly_rate;
    let service_fee = (total_price * fee_rate).round_dp(2);

    Ok(Quote {
        total_price,
        service_fee,
    })
}
