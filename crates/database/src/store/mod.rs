//! Read access to rooms and bookings, plus the few writes the service makes.
//!
//! [`PostgresStore`] backs the deployed service; [`MemoryStore`] holds the
//! same data in process for development and tests.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use models::{
    days::Day,
    room::{Booking, Reservation, Room},
    semester::{CalendarError, Semester, SemesterId},
};
use sea_orm::DbErr;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Backend(#[from] DbErr),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt {entity} record {id}: {reason}")]
    Corrupt {
        entity: &'static str,
        id: String,
        reason: String,
    },

    #[error("invalid semester calendar: {0}")]
    Calendar(#[from] CalendarError),
}

impl StoreError {
    /// Whether the same call may succeed if repeated later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Unavailable(_))
    }
}

/// Outcome of an attempt to reserve a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveOutcome {
    Reserved,
    /// A recurring booking or another reservation already holds the room
    Conflict,
    RoomMissing,
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Every configured semester, in no particular order
    async fn semesters(&self) -> StoreResult<Vec<Semester>>;

    /// Distinct campus names, sorted
    async fn campuses(&self) -> StoreResult<Vec<String>>;

    async fn room(&self, id: Uuid) -> StoreResult<Option<Room>>;

    /// Rooms on `campus` seating at least `min_capacity`
    async fn rooms_on_campus(&self, campus: &str, min_capacity: u32) -> StoreResult<Vec<Room>>;

    /// Recurring bookings of `room_ids` on `day` during `semester`
    async fn bookings_for(
        &self,
        room_ids: &[Uuid],
        day: Day,
        semester: SemesterId,
    ) -> StoreResult<Vec<Booking>>;

    /// One-off reservations of `room_ids` on `date`
    async fn reservations_for(
        &self,
        room_ids: &[Uuid],
        date: NaiveDate,
    ) -> StoreResult<Vec<Reservation>>;

    /// Stores `reservation` unless something already holds its room for an
    /// overlapping time. The check and the insert are atomic.
    async fn reserve(
        &self,
        reservation: &Reservation,
        semester: SemesterId,
    ) -> StoreResult<ReserveOutcome>;
}

#[async_trait]
pub trait LoginStore: Send + Sync {
    /// The user a login cookie belongs to, if the token is known
    async fn username_for_token(&self, token: &str) -> StoreResult<Option<String>>;
}

/// Login tokens are stored only as the hex SHA-256 of their value
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
