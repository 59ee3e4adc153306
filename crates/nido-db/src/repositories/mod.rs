//! Repository implementations
//!
//! This module contains concrete implementations of the repository traits
//! defined in nido-core, using sqlx for PostgreSQL access.

pub mod reservation_repo;
pub mod space_repo;

pub use reservation_repo::PgReservationRepository;
pub use space_repo::PgSpaceRepository;
