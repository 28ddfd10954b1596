//! Decides which rooms are free for a time window.
//!
//! A room is available when it is on the requested campus, seats at least
//! the requested number of people, and none of its bookings for the same
//! day of week and semester overlap the window. Windows are half-open, so a
//! booking that ends exactly when the window starts is not a conflict.

use crate::{
    days::Day,
    request::BookingRequest,
    room::{Booking, Reservation, Room},
    semester::SemesterId,
    time_range::TimeRange,
};
use chrono::NaiveDate;
use std::collections::HashSet;
use uuid::Uuid;

/// Parameters of a single availability lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub window: TimeRange,
    pub day: Day,
    pub semester: SemesterId,
    pub campus: String,
    pub min_capacity: u32,
}

impl From<&BookingRequest> for AvailabilityQuery {
    fn from(request: &BookingRequest) -> Self {
        Self {
            window: request.time,
            day: request.day,
            semester: request.semester,
            campus: request.campus.clone(),
            min_capacity: request.min_capacity,
        }
    }
}

impl AvailabilityQuery {
    /// Whether `room` passes the campus and capacity filters
    pub fn admits(&self, room: &Room) -> bool {
        room.campus == self.campus && room.capacity >= self.min_capacity
    }

    /// Whether `booking` takes its room during the queried window
    pub fn conflicts_with(&self, booking: &Booking) -> bool {
        booking.day == self.day
            && booking.semester == self.semester
            && booking.time.overlaps(&self.window)
    }
}

/// Filters `rooms` down to those free for `query`, ordered by name then id.
///
/// `bookings` may contain entries for any room, day or semester; only those
/// matching the query's day and semester are considered.
pub fn find_available(
    rooms: &[Room],
    bookings: &[Booking],
    query: &AvailabilityQuery,
) -> Vec<Room> {
    let busy: HashSet<Uuid> = bookings
        .iter()
        .filter(|booking| query.conflicts_with(booking))
        .map(|booking| booking.room_id)
        .collect();

    let mut available: Vec<Room> = rooms
        .iter()
        .filter(|room| query.admits(room) && !busy.contains(&room.id))
        .cloned()
        .collect();

    available.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    available
}

/// Drops rooms that already carry a reservation on `date` overlapping `window`
pub fn exclude_reserved(
    rooms: Vec<Room>,
    reservations: &[Reservation],
    date: NaiveDate,
    window: &TimeRange,
) -> Vec<Room> {
    let reserved: HashSet<Uuid> = reservations
        .iter()
        .filter(|r| r.date == date && r.time.overlaps(window))
        .map(|r| r.room_id)
        .collect();

    rooms
        .into_iter()
        .filter(|room| !reserved.contains(&room.id))
        .collect()
}
