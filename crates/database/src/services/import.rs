use crate::entities::{bookings, rooms, semesters};
use futures::future::try_join_all;
use log::{error, info};
use models::{
    room::{Booking, Room},
    semester::{Semester, SemesterId},
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    TransactionTrait, sea_query::OnConflict,
};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A recurring booking together with what occupies the room
#[derive(Debug, Clone)]
pub struct LabeledBooking {
    pub booking: Booking,
    pub label: Option<String>,
}

pub struct ImportService;

impl ImportService {
    /// The number of rows to save in a single batch
    const BATCH_SIZE: usize = 200;

    /// Inserts or updates semesters by identifier
    pub async fn save_semesters(
        db: &DatabaseConnection,
        semesters: Vec<Semester>,
    ) -> Result<usize, DbErr> {
        if semesters.is_empty() {
            return Ok(0);
        }

        let total = semesters.len();
        let models = semesters.into_iter().map(|s| semesters::ActiveModel {
            id: Set(s.id.to_string()),
            first_day: Set(s.first_day),
            last_day: Set(s.last_day),
        });

        semesters::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(semesters::Column::Id)
                    .update_columns([semesters::Column::FirstDay, semesters::Column::LastDay])
                    .to_owned(),
            )
            .exec(db)
            .await?;

        info!("Saved {total} semesters");
        Ok(total)
    }

    /// Inserts or updates rooms by id, in parallel batches
    pub async fn save_rooms(db: &DatabaseConnection, rooms: Vec<Room>) -> Result<usize, DbErr> {
        let total_rooms = rooms.len();
        info!(
            "Starting to save {} rooms in batches of {}",
            total_rooms,
            Self::BATCH_SIZE
        );

        let batch_futures = rooms
            .chunks(Self::BATCH_SIZE)
            .enumerate()
            .map(|(batch_idx, batch)| {
                let db = db.clone();
                let batch_vec = batch.to_vec();

                async move {
                    let result = Self::save_room_batch(&db, batch_vec).await;

                    match &result {
                        Ok(count) => {
                            info!("Completed batch {}, {} rooms saved", batch_idx + 1, count)
                        }
                        Err(e) => error!("Error in batch {}: {}", batch_idx + 1, e),
                    }

                    result
                }
            });

        let counts: Vec<usize> = try_join_all(batch_futures).await?;
        let saved = counts.into_iter().sum();

        info!("Successfully saved all {saved} rooms");
        Ok(saved)
    }

    async fn save_room_batch(db: &DatabaseConnection, rooms: Vec<Room>) -> Result<usize, DbErr> {
        let count = rooms.len();
        let models = rooms.into_iter().map(|room| rooms::ActiveModel {
            id: Set(room.id),
            campus: Set(room.campus),
            name: Set(room.name),
            building: Set(room.building),
            capacity: Set(i32::try_from(room.capacity).unwrap_or(i32::MAX)),
            description: Set(room.description),
        });

        rooms::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(rooms::Column::Id)
                    .update_columns([
                        rooms::Column::Campus,
                        rooms::Column::Name,
                        rooms::Column::Building,
                        rooms::Column::Capacity,
                        rooms::Column::Description,
                    ])
                    .to_owned(),
            )
            .exec(db)
            .await?;

        Ok(count)
    }

    /// Replaces the recurring bookings of every semester present in `bookings`.
    ///
    /// Runs in one transaction so searches never see a half-imported semester.
    pub async fn replace_bookings(
        db: &DatabaseConnection,
        bookings: Vec<LabeledBooking>,
    ) -> Result<usize, DbErr> {
        if bookings.is_empty() {
            return Ok(0);
        }

        let semesters: BTreeSet<SemesterId> = bookings.iter().map(|b| b.booking.semester).collect();
        let total = bookings.len();

        let txn = db.begin().await?;

        let removed = bookings::Entity::delete_many()
            .filter(bookings::Column::Semester.is_in(semesters.iter().map(|s| s.to_string())))
            .exec(&txn)
            .await?;
        info!(
            "Removed {} existing bookings for {} semesters",
            removed.rows_affected,
            semesters.len()
        );

        for (batch_idx, batch) in bookings.chunks(Self::BATCH_SIZE).enumerate() {
            let models = batch.iter().map(|labeled| bookings::ActiveModel {
                id: Set(Uuid::new_v4()),
                room_id: Set(labeled.booking.room_id),
                day: Set(labeled.booking.day.to_string()),
                semester: Set(labeled.booking.semester.to_string()),
                time_start: Set(labeled.booking.time.begin),
                time_end: Set(labeled.booking.time.end),
                label: Set(labeled.label.clone()),
            });

            bookings::Entity::insert_many(models).exec(&txn).await?;

            if (batch_idx + 1).is_multiple_of(10) {
                info!("  Saved {} of {total} bookings", (batch_idx + 1) * Self::BATCH_SIZE);
            }
        }

        txn.commit().await?;
        info!("Successfully saved all {total} bookings");
        Ok(total)
    }
}
