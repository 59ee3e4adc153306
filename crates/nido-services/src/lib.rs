//! Business logic services for Nido
//!
//! This crate contains the booking business logic that sits between the
//! HTTP handlers and the storage layer.
//!
//! # Architecture
//!
//! Services are designed to be composable and testable:
//! - Each service owns its dependencies behind repository traits
//! - Services are wrapped in Arc for safe sharing across async tasks
//! - All operations are instrumented with tracing
//! - Comprehensive error handling with AppError
//!
//! # Services
//!
//! - `BookingService` - Admission control and reservation lifecycle
//! - `CompletionSweeper` - Background completion of elapsed slots
//! - `TracingNotifier` - Best-effort notification dispatch

pub mod booking;
pub mod completion;
pub mod notify;
pub mod pricing;

pub use booking::{BookingConfirmation, BookingRequest, BookingService};
pub use completion::CompletionSweeper;
pub use notify::TracingNotifier;
pub use pricing::{compute_price, validate_slot, Quote};

/// Business logic constants
pub mod constants {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Default platform service fee rate applied to the base price
    pub const DEFAULT_FEE_RATE: Decimal = dec!(0.10);

    /// Minimum bookable slot duration in hours
    pub const MIN_SLOT_HOURS: i64 = 1;

    /// Default interval between completion sweeps in seconds
    pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;
}
