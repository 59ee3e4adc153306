//! Space model
//!
//! A space is a bookable physical listing (studio, venue, workspace).
//! The booking core reads spaces but never writes them; listing CRUD
//! lives in a separate subsystem.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Space status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpaceStatus {
    /// Active listing - accepts bookings
    #[default]
    Active,
    /// Inactive listing - not bookable
    Inactive,
}

impl fmt::Display for SpaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpaceStatus::Active => write!(f, "active"),
            SpaceStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl SpaceStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(SpaceStatus::Active),
            "inactive" => Some(SpaceStatus::Inactive),
            _ => None,
        }
    }
}

/// Space entity (read-only to the booking core)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    /// Unique identifier
    pub id: i32,

    /// Owning host
    pub host_id: i32,

    /// Listing title, carried into reservation summaries
    pub title: String,

    /// Price per whole hour
    pub hourly_rate: Decimal,

    /// Optional flat daily price
    pub daily_rate: Option<Decimal>,

    /// Maximum guest count
    pub max_guests: i32,

    /// Listing status
    pub status: SpaceStatus,
}

impl Space {
    /// Whether the space currently accepts bookings
    pub fn is_bookable(&self) -> bool {
        matches!(self.status, SpaceStatus::Active)
    }
}
