use super::{LoginStore, ReserveOutcome, RoomStore, StoreError, StoreResult, hash_token};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use models::{
    days::Day,
    room::{Booking, Reservation, Room},
    semester::{Semester, SemesterId},
};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

#[derive(Default)]
struct Data {
    semesters: Vec<Semester>,
    rooms: Vec<Room>,
    bookings: Vec<Booking>,
    reservations: Vec<Reservation>,
    logins: HashMap<String, String>,
    outage: Option<String>,
}

/// In-process store for development and tests
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<Data>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_semester(self, semester: Semester) -> Self {
        self.data.write().semesters.push(semester);
        self
    }

    pub fn with_room(self, room: Room) -> Self {
        self.data.write().rooms.push(room);
        self
    }

    pub fn with_booking(self, booking: Booking) -> Self {
        self.data.write().bookings.push(booking);
        self
    }

    /// Registers a login cookie value for `username`
    pub fn with_login(self, token: &str, username: &str) -> Self {
        self.data
            .write()
            .logins
            .insert(hash_token(token), username.to_string());
        self
    }

    /// Makes every subsequent call fail as if the database were unreachable,
    /// or restores service with `None`
    pub fn set_outage(&self, reason: Option<&str>) {
        self.data.write().outage = reason.map(str::to_string);
    }

    pub fn reservations(&self) -> Vec<Reservation> {
        self.data.read().reservations.clone()
    }

    fn check(data: &Data) -> StoreResult<()> {
        match &data.outage {
            Some(reason) => Err(StoreError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn semesters(&self) -> StoreResult<Vec<Semester>> {
        let data = self.data.read();
        Self::check(&data)?;
        Ok(data.semesters.clone())
    }

    async fn campuses(&self) -> StoreResult<Vec<String>> {
        let data = self.data.read();
        Self::check(&data)?;
        let campuses: BTreeSet<&String> = data.rooms.iter().map(|r| &r.campus).collect();
        Ok(campuses.into_iter().cloned().collect())
    }

    async fn room(&self, id: Uuid) -> StoreResult<Option<Room>> {
        let data = self.data.read();
        Self::check(&data)?;
        Ok(data.rooms.iter().find(|r| r.id == id).cloned())
    }

    async fn rooms_on_campus(&self, campus: &str, min_capacity: u32) -> StoreResult<Vec<Room>> {
        let data = self.data.read();
        Self::check(&data)?;
        Ok(data
            .rooms
            .iter()
            .filter(|r| r.campus == campus && r.capacity >= min_capacity)
            .cloned()
            .collect())
    }

    async fn bookings_for(
        &self,
        room_ids: &[Uuid],
        day: Day,
        semester: SemesterId,
    ) -> StoreResult<Vec<Booking>> {
        let data = self.data.read();
        Self::check(&data)?;
        Ok(data
            .bookings
            .iter()
            .filter(|b| room_ids.contains(&b.room_id) && b.day == day && b.semester == semester)
            .cloned()
            .collect())
    }

    async fn reservations_for(
        &self,
        room_ids: &[Uuid],
        date: NaiveDate,
    ) -> StoreResult<Vec<Reservation>> {
        let data = self.data.read();
        Self::check(&data)?;
        Ok(data
            .reservations
            .iter()
            .filter(|r| room_ids.contains(&r.room_id) && r.date == date)
            .cloned()
            .collect())
    }

    async fn reserve(
        &self,
        reservation: &Reservation,
        semester: SemesterId,
    ) -> StoreResult<ReserveOutcome> {
        let mut data = self.data.write();
        Self::check(&data)?;

        if !data.rooms.iter().any(|r| r.id == reservation.room_id) {
            return Ok(ReserveOutcome::RoomMissing);
        }

        let day = Day::from(reservation.date.weekday());
        let booked = data.bookings.iter().any(|b| {
            b.room_id == reservation.room_id
                && b.day == day
                && b.semester == semester
                && b.time.overlaps(&reservation.time)
        });
        let reserved = data.reservations.iter().any(|r| {
            r.room_id == reservation.room_id
                && r.date == reservation.date
                && r.time.overlaps(&reservation.time)
        });

        if booked || reserved {
            return Ok(ReserveOutcome::Conflict);
        }

        data.reservations.push(reservation.clone());
        Ok(ReserveOutcome::Reserved)
    }
}

#[async_trait]
impl LoginStore for MemoryStore {
    async fn username_for_token(&self, token: &str) -> StoreResult<Option<String>> {
        let data = self.data.read();
        Self::check(&data)?;
        Ok(data.logins.get(&hash_token(token)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{semester::Season, time_range::TimeRange};

    fn room(id: u128, campus: &str) -> Room {
        Room {
            id: Uuid::from_u128(id),
            campus: campus.to_string(),
            name: format!("R{id}"),
            building: "R".to_string(),
            capacity: 20,
            description: None,
        }
    }

    fn range(begin: u32, end: u32) -> TimeRange {
        TimeRange::from_strings(&format!("{begin}:00"), &format!("{end}:00")).unwrap()
    }

    #[tokio::test]
    async fn test_campuses_are_distinct_and_sorted() {
        let store = MemoryStore::new()
            .with_room(room(1, "North"))
            .with_room(room(2, "Downtown"))
            .with_room(room(3, "North"));

        assert_eq!(store.campuses().await.unwrap(), vec!["Downtown", "North"]);
    }

    #[tokio::test]
    async fn test_reserve_detects_conflicts() {
        let fall = SemesterId::new(Season::Fall, 2024);
        // 2024-10-14 is a Monday
        let date = NaiveDate::from_ymd_opt(2024, 10, 14).unwrap();
        let store = MemoryStore::new().with_room(room(1, "North")).with_booking(Booking {
            room_id: Uuid::from_u128(1),
            day: Day::Monday,
            semester: fall,
            time: range(9, 10),
        });

        let reservation = |time: TimeRange, room_id: u128| Reservation {
            id: Uuid::new_v4(),
            room_id: Uuid::from_u128(room_id),
            username: "jdoe".to_string(),
            date,
            time,
            num_people: 4,
        };

        let outcome = store.reserve(&reservation(range(9, 11), 1), fall).await.unwrap();
        assert_eq!(outcome, ReserveOutcome::Conflict);

        let outcome = store.reserve(&reservation(range(10, 11), 1), fall).await.unwrap();
        assert_eq!(outcome, ReserveOutcome::Reserved);

        let outcome = store.reserve(&reservation(range(10, 12), 1), fall).await.unwrap();
        assert_eq!(outcome, ReserveOutcome::Conflict);

        let outcome = store.reserve(&reservation(range(10, 11), 9), fall).await.unwrap();
        assert_eq!(outcome, ReserveOutcome::RoomMissing);

        assert_eq!(store.reservations().len(), 1);
    }

    #[tokio::test]
    async fn test_outage_fails_every_call() {
        let store = MemoryStore::new().with_login("secret", "jdoe");
        assert_eq!(
            store.username_for_token("secret").await.unwrap().as_deref(),
            Some("jdoe")
        );

        store.set_outage(Some("connection refused"));
        assert!(matches!(
            store.username_for_token("secret").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.semesters().await.is_err());

        store.set_outage(None);
        assert!(store.username_for_token("unknown").await.unwrap().is_none());
    }
}
