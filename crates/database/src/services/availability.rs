use crate::store::{RoomStore, StoreResult};
use models::{
    availability::{self, AvailabilityQuery},
    request::BookingRequest,
    room::Room,
};
use uuid::Uuid;

pub struct AvailabilityService;

impl AvailabilityService {
    /// Rooms free for the query's window on its day of week and semester.
    ///
    /// Loads the campus's rooms and their bookings for the one
    /// (day, semester) bucket, then filters that snapshot. An empty result
    /// means no room qualifies; storage faults are returned as errors.
    pub async fn find_available(
        store: &dyn RoomStore,
        query: &AvailabilityQuery,
    ) -> StoreResult<Vec<Room>> {
        let rooms = store
            .rooms_on_campus(&query.campus, query.min_capacity)
            .await?;

        if rooms.is_empty() {
            return Ok(vec![]);
        }

        let room_ids: Vec<Uuid> = rooms.iter().map(|r| r.id).collect();
        let bookings = store
            .bookings_for(&room_ids, query.day, query.semester)
            .await?;

        Ok(availability::find_available(&rooms, &bookings, query))
    }

    /// Rooms free for a normalized request, also excluding rooms other
    /// users have already reserved on that date
    pub async fn search(store: &dyn RoomStore, request: &BookingRequest) -> StoreResult<Vec<Room>> {
        let query = AvailabilityQuery::from(request);
        let rooms = Self::find_available(store, &query).await?;

        if rooms.is_empty() {
            return Ok(rooms);
        }

        let room_ids: Vec<Uuid> = rooms.iter().map(|r| r.id).collect();
        let reservations = store.reservations_for(&room_ids, request.date).await?;

        Ok(availability::exclude_reserved(
            rooms,
            &reservations,
            request.date,
            &query.window,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use chrono::{NaiveDate, NaiveTime};
    use models::{
        days::Day,
        room::{Booking, Reservation},
        semester::{Season, SemesterId},
        time_range::TimeRange,
    };

    const FALL_2024: SemesterId = SemesterId::new(Season::Fall, 2024);

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn window(begin: (u32, u32), end: (u32, u32)) -> TimeRange {
        TimeRange::new(t(begin.0, begin.1), t(end.0, end.1)).unwrap()
    }

    fn r1() -> Room {
        Room {
            id: Uuid::from_u128(1),
            campus: "Main".to_string(),
            name: "R1".to_string(),
            building: "R".to_string(),
            capacity: 30,
            description: None,
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new().with_room(r1()).with_booking(Booking {
            room_id: r1().id,
            day: Day::Monday,
            semester: FALL_2024,
            time: window((13, 0), (14, 0)),
        })
    }

    fn query(time: TimeRange) -> AvailabilityQuery {
        AvailabilityQuery {
            window: time,
            day: Day::Monday,
            semester: FALL_2024,
            campus: "Main".to_string(),
            min_capacity: 10,
        }
    }

    #[tokio::test]
    async fn test_room_free_right_after_booking() {
        let rooms = AvailabilityService::find_available(&store(), &query(window((14, 0), (15, 0))))
            .await
            .unwrap();
        assert_eq!(rooms, vec![r1()]);
    }

    #[tokio::test]
    async fn test_room_excluded_during_booking() {
        let query = query(window((13, 30), (14, 30)));
        let rooms = AvailabilityService::find_available(&store(), &query)
            .await
            .unwrap();
        assert!(rooms.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_campus_is_empty() {
        let mut q = query(window((8, 0), (9, 0)));
        q.campus = "Elsewhere".to_string();
        assert!(AvailabilityService::find_available(&store(), &q).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_outage_is_an_error_not_an_empty_result() {
        let store = store();
        store.set_outage(Some("timeout"));

        let query = query(window((8, 0), (9, 0)));
        let result = AvailabilityService::find_available(&store, &query).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_search_excludes_reservations_on_the_same_date() {
        let store = store();
        let date = NaiveDate::from_ymd_opt(2024, 10, 14).unwrap();
        let request = BookingRequest {
            date,
            time: window((15, 0), (16, 0)),
            duration_minutes: 60,
            campus: "Main".to_string(),
            min_capacity: 5,
            day: Day::Monday,
            semester: FALL_2024,
        };

        assert_eq!(AvailabilityService::search(&store, &request).await.unwrap().len(), 1);

        store
            .reserve(
                &Reservation {
                    id: Uuid::new_v4(),
                    room_id: r1().id,
                    username: "someone".to_string(),
                    date,
                    time: window((15, 30), (16, 30)),
                    num_people: 2,
                },
                FALL_2024,
            )
            .await
            .unwrap();

        assert!(AvailabilityService::search(&store, &request).await.unwrap().is_empty());

        // The same window a week later is unaffected
        let next_week = BookingRequest {
            date: NaiveDate::from_ymd_opt(2024, 10, 21).unwrap(),
            ..request
        };
        assert_eq!(AvailabilityService::search(&store, &next_week).await.unwrap().len(), 1);
    }
}
