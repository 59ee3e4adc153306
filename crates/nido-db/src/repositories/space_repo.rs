//! Space repository implementation
//!
//! Read-only access to the listing store. The booking core never writes
//! spaces; listing CRUD is handled by a separate subsystem sharing the
//! same database.

use async_trait::async_trait;
use nido_core::{
    models::{Space, SpaceStatus},
    traits::SpaceRepository,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of SpaceRepository
pub struct PgSpaceRepository {
    pool: PgPool,
}

impl PgSpaceRepository {
    /// Create a new space repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse space status from string
    fn parse_status(s: &str) -> SpaceStatus {
        SpaceStatus::from_str(s).unwrap_or(SpaceStatus::Inactive)
    }
}

#[async_trait]
impl SpaceRepository for PgSpaceRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Space>> {
        debug!("Finding space by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, SpaceRow>(
            r#"
            SELECT id, host_id, title, hourly_rate, daily_rate, max_guests, status
            FROM spaces
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding space {}: {}", id, e);
            AppError::Database(format!("Failed to find space: {}", e))
        })?;

        Ok(result.map(Into::into))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct SpaceRow {
    id: i32,
    host_id: i32,
    title: String,
    hourly_rate: Decimal,
    daily_rate: Option<Decimal>,
    max_guests: i32,
    status: String,
}

impl From<SpaceRow> for Space {
    fn from(row: SpaceRow) -> Self {
        Self {
            id: row.id,
            host_id: row.host_id,
            title: row.title,
            hourly_rate: row.hourly_rate,
            daily_rate: row.daily_rate,
            max_guests: row.max_guests,
            status: PgSpaceRepository::parse_status(&row.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(
            PgSpaceRepository::parse_status("active"),
            SpaceStatus::Active
        );
        assert_eq!(
            PgSpaceRepository::parse_status("inactive"),
            SpaceStatus::Inactive
        );
        // Unknown statuses are treated as not bookable
        assert_eq!(
            PgSpaceRepository::parse_status("draft"),
            SpaceStatus::Inactive
        );
    }
}
