//! Domain models for the Nido booking core

pub mod reservation;
pub mod space;
pub mod user;

pub use reservation::{overlaps, BookingRole, Reservation, ReservationStatus};
pub use space::{Space, SpaceStatus};
pub use user::{User, UserRole};
