use super::{LoginStore, ReserveOutcome, RoomStore, StoreResult, hash_token};
use crate::entities::{bookings, logins, reservations, rooms, semesters};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use models::{
    days::Day,
    room::{Booking, Reservation, Room},
    semester::{Semester, SemesterId},
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

/// Store backed by the Postgres schema from the `migration` crate
#[derive(Clone)]
pub struct PostgresStore {
    db: DatabaseConnection,
}

impl PostgresStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Capacities are stored as `INTEGER`
fn capacity_bound(min_capacity: u32) -> i32 {
    i32::try_from(min_capacity).unwrap_or(i32::MAX)
}

#[async_trait]
impl RoomStore for PostgresStore {
    async fn semesters(&self) -> StoreResult<Vec<Semester>> {
        semesters::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(Semester::try_from)
            .collect()
    }

    async fn campuses(&self) -> StoreResult<Vec<String>> {
        Ok(rooms::Entity::find()
            .select_only()
            .column(rooms::Column::Campus)
            .distinct()
            .order_by_asc(rooms::Column::Campus)
            .into_tuple::<String>()
            .all(&self.db)
            .await?)
    }

    async fn room(&self, id: Uuid) -> StoreResult<Option<Room>> {
        Ok(rooms::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Room::from))
    }

    async fn rooms_on_campus(&self, campus: &str, min_capacity: u32) -> StoreResult<Vec<Room>> {
        let rooms = rooms::Entity::find()
            .filter(rooms::Column::Campus.eq(campus))
            .filter(rooms::Column::Capacity.gte(capacity_bound(min_capacity)))
            .order_by_asc(rooms::Column::Name)
            .order_by_asc(rooms::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rooms.into_iter().map(Room::from).collect())
    }

    async fn bookings_for(
        &self,
        room_ids: &[Uuid],
        day: Day,
        semester: SemesterId,
    ) -> StoreResult<Vec<Booking>> {
        if room_ids.is_empty() {
            return Ok(vec![]);
        }

        bookings::Entity::find()
            .filter(bookings::Column::RoomId.is_in(room_ids.iter().copied()))
            .filter(bookings::Column::Day.eq(day.to_string()))
            .filter(bookings::Column::Semester.eq(semester.to_string()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(Booking::try_from)
            .collect()
    }

    async fn reservations_for(
        &self,
        room_ids: &[Uuid],
        date: NaiveDate,
    ) -> StoreResult<Vec<Reservation>> {
        if room_ids.is_empty() {
            return Ok(vec![]);
        }

        reservations::Entity::find()
            .filter(reservations::Column::RoomId.is_in(room_ids.iter().copied()))
            .filter(reservations::Column::Date.eq(date))
            .all(&self.db)
            .await?
            .into_iter()
            .map(Reservation::try_from)
            .collect()
    }

    async fn reserve(
        &self,
        reservation: &Reservation,
        semester: SemesterId,
    ) -> StoreResult<ReserveOutcome> {
        let txn = self.db.begin().await?;

        // Row lock on the room serialises concurrent reservations of it
        let room = rooms::Entity::find_by_id(reservation.room_id)
            .lock_exclusive()
            .one(&txn)
            .await?;
        if room.is_none() {
            return Ok(ReserveOutcome::RoomMissing);
        }

        let day = Day::from(reservation.date.weekday());
        let window = reservation.time;

        let booked = bookings::Entity::find()
            .filter(bookings::Column::RoomId.eq(reservation.room_id))
            .filter(bookings::Column::Day.eq(day.to_string()))
            .filter(bookings::Column::Semester.eq(semester.to_string()))
            .filter(bookings::Column::TimeStart.lt(window.end))
            .filter(bookings::Column::TimeEnd.gt(window.begin))
            .count(&txn)
            .await?;

        let reserved = reservations::Entity::find()
            .filter(reservations::Column::RoomId.eq(reservation.room_id))
            .filter(reservations::Column::Date.eq(reservation.date))
            .filter(reservations::Column::TimeStart.lt(window.end))
            .filter(reservations::Column::TimeEnd.gt(window.begin))
            .count(&txn)
            .await?;

        if booked > 0 || reserved > 0 {
            return Ok(ReserveOutcome::Conflict);
        }

        reservations::Entity::insert(reservations::ActiveModel {
            id: Set(reservation.id),
            room_id: Set(reservation.room_id),
            username: Set(reservation.username.clone()),
            date: Set(reservation.date),
            time_start: Set(window.begin),
            time_end: Set(window.end),
            num_people: Set(capacity_bound(reservation.num_people)),
            created_at: Set(Utc::now().naive_utc()),
        })
        .exec(&txn)
        .await?;

        txn.commit().await?;
        Ok(ReserveOutcome::Reserved)
    }
}

#[async_trait]
impl LoginStore for PostgresStore {
    async fn username_for_token(&self, token: &str) -> StoreResult<Option<String>> {
        Ok(logins::Entity::find_by_id(hash_token(token))
            .one(&self.db)
            .await?
            .map(|login| login.username))
    }
}
