//! Conversions between stored rows and domain types.

use crate::{
    entities::{bookings, reservations, rooms, semesters},
    store::StoreError,
};
use models::{
    days::Day,
    room::{Booking, Reservation, Room},
    semester::{Semester, SemesterId},
    time_range::TimeRange,
};
use std::str::FromStr;

fn corrupt(entity: &'static str, id: impl ToString, reason: impl ToString) -> StoreError {
    StoreError::Corrupt {
        entity,
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

impl From<rooms::Model> for Room {
    fn from(room: rooms::Model) -> Self {
        Room {
            id: room.id,
            campus: room.campus,
            name: room.name,
            building: room.building,
            // A negative capacity can never satisfy a request
            capacity: u32::try_from(room.capacity).unwrap_or(0),
            description: room.description,
        }
    }
}

impl TryFrom<bookings::Model> for Booking {
    type Error = StoreError;

    fn try_from(booking: bookings::Model) -> Result<Self, Self::Error> {
        let day = Day::from_str(&booking.day).map_err(|e| corrupt("booking", booking.id, e))?;
        let semester = SemesterId::from_str(&booking.semester)
            .map_err(|e| corrupt("booking", booking.id, e))?;
        let time = TimeRange::new(booking.time_start, booking.time_end)
            .ok_or_else(|| corrupt("booking", booking.id, "start is not before end"))?;

        Ok(Booking {
            room_id: booking.room_id,
            day,
            semester,
            time,
        })
    }
}

impl TryFrom<reservations::Model> for Reservation {
    type Error = StoreError;

    fn try_from(reservation: reservations::Model) -> Result<Self, Self::Error> {
        let time = TimeRange::new(reservation.time_start, reservation.time_end)
            .ok_or_else(|| corrupt("reservation", reservation.id, "start is not before end"))?;

        Ok(Reservation {
            id: reservation.id,
            room_id: reservation.room_id,
            username: reservation.username,
            date: reservation.date,
            time,
            num_people: u32::try_from(reservation.num_people).unwrap_or(0),
        })
    }
}

impl TryFrom<semesters::Model> for Semester {
    type Error = StoreError;

    fn try_from(semester: semesters::Model) -> Result<Self, Self::Error> {
        let id = SemesterId::from_str(&semester.id)
            .map_err(|e| corrupt("semester", &semester.id, e))?;

        Ok(Semester {
            id,
            first_day: semester.first_day,
            last_day: semester.last_day,
        })
    }
}
