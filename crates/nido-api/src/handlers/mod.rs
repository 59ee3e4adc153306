//! HTTP request handlers

pub mod booking;

pub use booking::configure as configure_bookings;
