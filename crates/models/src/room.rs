use crate::{days::Day, semester::SemesterId, time_range::TimeRange};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable room on one campus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub campus: String,
    /// Display name, e.g. "UA1350"
    pub name: String,
    pub building: String,
    pub capacity: u32,
    pub description: Option<String>,
}

/// A recurring block on one day of one semester during which a room is in use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub room_id: Uuid,
    pub day: Day,
    pub semester: SemesterId,
    pub time: TimeRange,
}

/// A one-off reservation made by a user for a specific date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub room_id: Uuid,
    pub username: String,
    pub date: NaiveDate,
    pub time: TimeRange,
    pub num_people: u32,
}
