//! Seed data for running without a database (`STORE=memory`).

use chrono::NaiveDate;
use database::store::MemoryStore;
use models::{
    days::Day,
    room::{Booking, Room},
    semester::{Season, Semester, SemesterId},
    time_range::TimeRange,
};
use uuid::Uuid;

/// Login cookie value accepted by the demo store
pub const DEMO_TOKEN: &str = "demo";
pub const DEMO_USER: &str = "demo";

pub const UA1350: Uuid = Uuid::from_u128(0x1350);
pub const UA1120: Uuid = Uuid::from_u128(0x1120);
pub const SIRC2060: Uuid = Uuid::from_u128(0x2060);
pub const DTA202: Uuid = Uuid::from_u128(0x0202);

fn semester(season: Season, year: i32, first: (i32, u32, u32), last: (i32, u32, u32)) -> Semester {
    let date = |(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    Semester {
        id: SemesterId::new(season, year),
        first_day: date(first),
        last_day: date(last),
    }
}

fn room(id: Uuid, campus: &str, name: &str, building: &str, capacity: u32) -> Room {
    Room {
        id,
        campus: campus.to_string(),
        name: name.to_string(),
        building: building.to_string(),
        capacity,
        description: None,
    }
}

fn booking(
    room_id: Uuid,
    day: Day,
    semester: SemesterId,
    begin: &str,
    end: &str,
) -> Option<Booking> {
    Some(Booking {
        room_id,
        day,
        semester,
        time: TimeRange::from_strings(begin, end)?,
    })
}

pub fn demo_store() -> MemoryStore {
    let fall_2024 = SemesterId::new(Season::Fall, 2024);
    let fall_2026 = SemesterId::new(Season::Fall, 2026);

    let bookings = [
        booking(UA1350, Day::Monday, fall_2024, "13:00", "14:00"),
        booking(UA1350, Day::Monday, fall_2026, "13:00", "14:00"),
        booking(UA1120, Day::Wednesday, fall_2026, "09:00", "11:00"),
        booking(SIRC2060, Day::Thursday, fall_2026, "12:30", "15:30"),
    ];

    let store = MemoryStore::new()
        .with_semester(semester(Season::Fall, 2024, (2024, 9, 3), (2024, 12, 20)))
        .with_semester(semester(Season::Winter, 2025, (2025, 1, 6), (2025, 4, 30)))
        .with_semester(semester(Season::Fall, 2026, (2026, 9, 1), (2026, 12, 18)))
        .with_semester(semester(Season::Winter, 2027, (2027, 1, 5), (2027, 4, 30)))
        .with_room(room(UA1350, "Main", "UA1350", "UA", 30))
        .with_room(room(UA1120, "Main", "UA1120", "UA", 12))
        .with_room(room(SIRC2060, "Main", "SIRC2060", "SIRC", 60))
        .with_room(room(DTA202, "Downtown", "DTA202", "DTA", 20))
        .with_login(DEMO_TOKEN, DEMO_USER);

    bookings.into_iter().flatten().fold(store, MemoryStore::with_booking)
}
