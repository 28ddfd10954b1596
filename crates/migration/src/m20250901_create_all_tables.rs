use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create rooms table
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rooms::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rooms::Campus).string().not_null())
                    .col(ColumnDef::new(Rooms::Name).string().not_null())
                    .col(ColumnDef::new(Rooms::Building).string().not_null())
                    .col(ColumnDef::new(Rooms::Capacity).integer().not_null())
                    .col(ColumnDef::new(Rooms::Description).text())
                    .to_owned(),
            )
            .await?;

        // Create semesters table
        manager
            .create_table(
                Table::create()
                    .table(Semesters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Semesters::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Semesters::FirstDay).date().not_null())
                    .col(ColumnDef::new(Semesters::LastDay).date().not_null())
                    .to_owned(),
            )
            .await?;

        // Create bookings table (recurring, per day of week and semester)
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bookings::RoomId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::Day).string_len(1).not_null())
                    .col(ColumnDef::new(Bookings::Semester).string().not_null())
                    .col(ColumnDef::new(Bookings::TimeStart).time().not_null())
                    .col(ColumnDef::new(Bookings::TimeEnd).time().not_null())
                    .col(ColumnDef::new(Bookings::Label).string())
                    .check(Expr::col(Bookings::TimeStart).lt(Expr::col(Bookings::TimeEnd)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bookings-room_id")
                            .from(Bookings::Table, Bookings::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create reservations table (one-off, made by users)
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::RoomId).uuid().not_null())
                    .col(ColumnDef::new(Reservations::Username).string().not_null())
                    .col(ColumnDef::new(Reservations::Date).date().not_null())
                    .col(ColumnDef::new(Reservations::TimeStart).time().not_null())
                    .col(ColumnDef::new(Reservations::TimeEnd).time().not_null())
                    .col(ColumnDef::new(Reservations::NumPeople).integer().not_null())
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Reservations::TimeStart).lt(Expr::col(Reservations::TimeEnd)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reservations-room_id")
                            .from(Reservations::Table, Reservations::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create logins table
        manager
            .create_table(
                Table::create()
                    .table(Logins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Logins::TokenHash)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Logins::Username).string().not_null())
                    .col(
                        ColumnDef::new(Logins::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Logins::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Semesters::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum Rooms {
    Table,
    Id,
    Campus,
    Name,
    Building,
    Capacity,
    Description,
}

#[derive(Iden)]
enum Semesters {
    Table,
    Id,
    FirstDay,
    LastDay,
}

#[derive(Iden)]
pub(crate) enum Bookings {
    Table,
    Id,
    RoomId,
    Day,
    Semester,
    TimeStart,
    TimeEnd,
    Label,
}

#[derive(Iden)]
pub(crate) enum Reservations {
    Table,
    Id,
    RoomId,
    Username,
    Date,
    TimeStart,
    TimeEnd,
    NumPeople,
    CreatedAt,
}

#[derive(Iden)]
enum Logins {
    Table,
    TokenHash,
    Username,
    CreatedAt,
}
