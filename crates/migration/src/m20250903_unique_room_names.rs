use crate::m20250901_create_all_tables::Rooms;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The importer identifies rooms by campus and name
        manager
            .create_index(
                Index::create()
                    .name("idx_rooms_campus_name")
                    .table(Rooms::Table)
                    .col(Rooms::Campus)
                    .col(Rooms::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_rooms_campus_name").to_owned())
            .await
    }
}
