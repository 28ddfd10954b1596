use crate::store::{ReserveOutcome, RoomStore, StoreError};
use log::info;
use models::{request::BookingRequest, room::Reservation};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("room {0} does not exist")]
    RoomNotFound(Uuid),

    #[error("room seats {capacity}, but {requested} people were requested")]
    TooSmall { capacity: u32, requested: u32 },

    #[error("room {0} is no longer free at that time")]
    Unavailable(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct BookingService;

impl BookingService {
    /// Reserves `room_id` for the window and date of `request` on behalf of `username`
    pub async fn book(
        store: &dyn RoomStore,
        room_id: Uuid,
        username: &str,
        request: &BookingRequest,
    ) -> Result<Reservation, BookingError> {
        let room = store
            .room(room_id)
            .await?
            .ok_or(BookingError::RoomNotFound(room_id))?;

        if room.capacity < request.min_capacity {
            return Err(BookingError::TooSmall {
                capacity: room.capacity,
                requested: request.min_capacity,
            });
        }

        let reservation = Reservation {
            id: Uuid::new_v4(),
            room_id,
            username: username.to_string(),
            date: request.date,
            time: request.time,
            num_people: request.min_capacity,
        };

        match store.reserve(&reservation, request.semester).await? {
            ReserveOutcome::Reserved => {
                info!(
                    "{username} reserved {} on {} {}",
                    room.name, reservation.date, reservation.time
                );
                Ok(reservation)
            }
            ReserveOutcome::Conflict => Err(BookingError::Unavailable(room_id)),
            ReserveOutcome::RoomMissing => Err(BookingError::RoomNotFound(room_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use models::{
        days::Day,
        room::{Booking, Room},
        semester::{Season, SemesterId},
        time_range::TimeRange,
    };

    const FALL_2024: SemesterId = SemesterId::new(Season::Fall, 2024);

    fn room() -> Room {
        Room {
            id: Uuid::from_u128(7),
            campus: "Main".to_string(),
            name: "UA1350".to_string(),
            building: "UA".to_string(),
            capacity: 12,
            description: Some("Lab".to_string()),
        }
    }

    fn request(begin: &str, end: &str, people: u32) -> BookingRequest {
        let time = TimeRange::from_strings(begin, end).unwrap();
        BookingRequest {
            date: NaiveDate::from_ymd_opt(2024, 10, 14).unwrap(),
            time,
            duration_minutes: time.duration_minutes(),
            campus: "Main".to_string(),
            min_capacity: people,
            day: Day::Monday,
            semester: FALL_2024,
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new().with_room(room()).with_booking(Booking {
            room_id: room().id,
            day: Day::Monday,
            semester: FALL_2024,
            time: TimeRange::from_strings("13:00", "14:00").unwrap(),
        })
    }

    #[tokio::test]
    async fn test_book_free_room() {
        let store = store();
        let request = request("14:00", "15:00", 5);
        let reservation = BookingService::book(&store, room().id, "jdoe", &request)
            .await
            .unwrap();

        assert_eq!(reservation.username, "jdoe");
        assert_eq!(reservation.num_people, 5);
        assert_eq!(store.reservations(), vec![reservation]);
    }

    #[tokio::test]
    async fn test_book_rejects_conflicts_and_double_booking() {
        let store = store();

        let err = BookingService::book(&store, room().id, "jdoe", &request("13:30", "14:30", 5))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Unavailable(_)));

        BookingService::book(&store, room().id, "jdoe", &request("15:00", "16:00", 5))
            .await
            .unwrap();
        let err = BookingService::book(&store, room().id, "asmith", &request("15:30", "16:00", 2))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_book_rejects_missing_or_small_rooms() {
        let store = store();

        let err = BookingService::book(
            &store,
            Uuid::from_u128(99),
            "jdoe",
            &request("8:00", "9:00", 1),
        )
        .await
            .unwrap_err();
        assert!(matches!(err, BookingError::RoomNotFound(_)));

        let err = BookingService::book(&store, room().id, "jdoe", &request("8:00", "9:00", 40))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::TooSmall { capacity: 12, requested: 40 }));
    }
}
