//! Nido Database Layer
//!
//! This crate provides PostgreSQL database access and repository
//! implementations for the Nido booking backend. It includes:
//!
//! - Connection pool management with sqlx
//! - The reservation store with atomic slot admission
//! - Read-only access to the listing store

pub mod pool;
pub mod repositories;

pub use pool::create_pool;
pub use repositories::*;

// Re-export commonly used types
pub use nido_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres, Transaction};
