use crate::m20250901_create_all_tables::{Bookings, Reservations, Rooms};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Searches filter rooms by campus and capacity
        manager
            .create_index(
                Index::create()
                    .name("idx_rooms_campus_capacity")
                    .table(Rooms::Table)
                    .col(Rooms::Campus)
                    .col(Rooms::Capacity)
                    .to_owned(),
            )
            .await?;

        // Availability looks up bookings per (semester, day) for a set of rooms
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_semester_day_room")
                    .table(Bookings::Table)
                    .col(Bookings::Semester)
                    .col(Bookings::Day)
                    .col(Bookings::RoomId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_room_id_date")
                    .table(Reservations::Table)
                    .col(Reservations::RoomId)
                    .col(Reservations::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes in reverse order
        manager
            .drop_index(Index::drop().name("idx_reservations_room_id_date").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_bookings_semester_day_room").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_rooms_campus_capacity").to_owned())
            .await
    }
}
