use chrono::{NaiveDate, NaiveTime};
use models::{
    request::{BookingRequest, RawRequestFields},
    room::{Reservation, Room},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The room request form. Every field is optional here so that missing
/// fields are reported together rather than by the extractor.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SearchForm {
    /// Start time, `HH:MM` or `h:MM AM`
    #[schema(example = "13:00")]
    pub select_time: Option<String>,
    /// Duration in minutes
    #[schema(example = "60")]
    pub select_duration: Option<String>,
    /// Date, `YYYY-MM-DD`
    #[schema(example = "2026-10-19")]
    pub select_date: Option<String>,
    #[schema(example = "Main")]
    pub select_campus: Option<String>,
    #[schema(example = "4")]
    pub select_num_people: Option<String>,
}

impl From<SearchForm> for RawRequestFields {
    fn from(form: SearchForm) -> Self {
        Self {
            select_time: form.select_time,
            select_duration: form.select_duration,
            select_date: form.select_date,
            select_campus: form.select_campus,
            select_num_people: form.select_num_people,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomResponse {
    pub id: Uuid,
    pub name: String,
    pub building: String,
    pub campus: String,
    pub capacity: u32,
    pub description: Option<String>,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            name: room.name,
            building: room.building,
            campus: room.campus,
            capacity: room.capacity,
            description: room.description,
        }
    }
}

/// A normalized search, as saved in the session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuerySummary {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i64,
    pub campus: String,
    pub num_people: u32,
    /// One-letter day code, `M` through `U`
    pub day: String,
    #[schema(example = "Fall2026")]
    pub semester: String,
}

impl From<&BookingRequest> for QuerySummary {
    fn from(request: &BookingRequest) -> Self {
        Self {
            date: request.date,
            start_time: request.start_time(),
            end_time: request.end_time(),
            duration_minutes: request.duration_minutes,
            campus: request.campus.clone(),
            num_people: request.min_capacity,
            day: request.day.to_string(),
            semester: request.semester.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub query: QuerySummary,
    /// Free rooms ordered by name; empty when none qualify
    pub rooms: Vec<RoomResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub room_id: Uuid,
    pub username: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub num_people: u32,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            room_id: reservation.room_id,
            username: reservation.username,
            date: reservation.date,
            start_time: reservation.time.begin,
            end_time: reservation.time.end,
            num_people: reservation.num_people,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookedResponse {
    #[schema(example = "Room booked!")]
    pub message: String,
    pub reservation: ReservationResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CampusesResponse {
    pub campuses: Vec<String>,
}
