use crate::{
    error::ImportError,
    rows::{BookingRow, RoomRow},
};
use database::{services::import::LabeledBooking, store::RoomStore};
use log::warn;
use models::room::Room;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

/// Room ids by campus and name, as currently stored
#[derive(Debug, Default)]
pub struct RoomIndex {
    ids: HashMap<(String, String), Uuid>,
}

impl RoomIndex {
    /// Loads every stored room on the given campuses
    pub async fn load<'a>(
        store: &dyn RoomStore,
        campuses: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ImportError> {
        let campuses: BTreeSet<&str> = campuses.into_iter().collect();
        let mut index = Self::default();

        for campus in campuses {
            for room in store.rooms_on_campus(campus, 0).await? {
                index.insert(&room);
            }
        }

        Ok(index)
    }

    fn insert(&mut self, room: &Room) {
        self.ids
            .insert((room.campus.clone(), room.name.clone()), room.id);
    }

    pub fn id_of(&self, campus: &str, name: &str) -> Option<Uuid> {
        self.ids
            .get(&(campus.to_string(), name.to_string()))
            .copied()
    }

    /// Rooms for `rows`, keeping the stored id of a room already known by name.
    /// A room listed twice is saved once, with the values of its last row.
    pub fn assign_ids(&mut self, rows: Vec<RoomRow>) -> Vec<Room> {
        let mut rooms: Vec<Room> = Vec::with_capacity(rows.len());
        let mut positions: HashMap<(String, String), usize> = HashMap::new();

        for row in rows {
            let key = (row.campus.clone(), row.name.clone());
            let line = row.line;
            let id = row
                .id
                .or_else(|| self.ids.get(&key).copied())
                .unwrap_or_else(Uuid::new_v4);
            let room = row.into_room(id);
            self.insert(&room);

            match positions.get(&key) {
                Some(&at) => {
                    warn!("line {line}: {} on {} is listed again; using this row", key.1, key.0);
                    rooms[at] = room;
                }
                None => {
                    positions.insert(key, rooms.len());
                    rooms.push(room);
                }
            }
        }

        rooms
    }

    /// One booking per row and day, failing on the first unknown room
    pub fn resolve_bookings(
        &self,
        rows: &[BookingRow],
    ) -> Result<Vec<LabeledBooking>, ImportError> {
        let mut bookings = Vec::new();

        for row in rows {
            let room_id = self
                .id_of(&row.campus, &row.room)
                .ok_or_else(|| ImportError::UnknownRoom {
                    line: row.line,
                    campus: row.campus.clone(),
                    room: row.room.clone(),
                })?;
            bookings.extend(row.expand(room_id));
        }

        Ok(bookings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::{read_bookings, read_rooms};
    use database::store::MemoryStore;

    fn stored_room() -> Room {
        Room {
            id: Uuid::from_u128(1350),
            campus: "Main".to_string(),
            name: "UA1350".to_string(),
            building: "UA".to_string(),
            capacity: 30,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_reimported_rooms_keep_their_id() {
        let store = MemoryStore::new().with_room(stored_room());
        let rows = read_rooms("campus,name,capacity\nMain,UA1350,40\nMain,UA1120,12\n".as_bytes())
            .unwrap();

        let mut index = RoomIndex::load(&store, rows.iter().map(|r| r.campus.as_str()))
            .await
            .unwrap();
        let rooms = index.assign_ids(rows);

        assert_eq!(rooms[0].id, Uuid::from_u128(1350));
        assert_eq!(rooms[0].capacity, 40);
        assert_ne!(rooms[1].id, Uuid::from_u128(1350));
        assert_eq!(index.id_of("Main", "UA1120"), Some(rooms[1].id));
    }

    #[tokio::test]
    async fn test_repeated_room_is_saved_once() {
        let store = MemoryStore::new();
        let rows = read_rooms(
            "campus,name,capacity\nMain,UA1120,12\nMain,UA1350,30\nMain,UA1120,16\n".as_bytes(),
        )
        .unwrap();

        let mut index = RoomIndex::load(&store, ["Main"]).await.unwrap();
        let rooms = index.assign_ids(rows);

        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].name, "UA1120");
        assert_eq!(rooms[0].capacity, 16);
        assert_eq!(index.id_of("Main", "UA1120"), Some(rooms[0].id));
    }

    #[tokio::test]
    async fn test_resolve_bookings() {
        let store = MemoryStore::new().with_room(stored_room());
        let index = RoomIndex::load(&store, ["Main"]).await.unwrap();

        let rows = read_bookings(
            "campus,room,days,semester,start,end\nMain,UA1350,TR,Fall2024,10:00,11:30\n".as_bytes(),
        )
        .unwrap();
        let bookings = index.resolve_bookings(&rows).unwrap();
        assert_eq!(bookings.len(), 2);
        assert!(bookings.iter().all(|b| b.booking.room_id == Uuid::from_u128(1350)));

        let rows = read_bookings(
            "campus,room,days,semester,start,end\nDowntown,UA1350,M,Fall2024,10:00,11:00\n"
                .as_bytes(),
        )
        .unwrap();
        assert!(matches!(
            index.resolve_bookings(&rows),
            Err(ImportError::UnknownRoom { line: 2, .. })
        ));
    }
}
