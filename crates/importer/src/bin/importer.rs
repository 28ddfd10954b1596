use clap::{Parser, Subcommand};
use database::{
    db::connect_from_env,
    services::{import::ImportService, login::LoginService},
    store::{PostgresStore, RoomStore},
};
use importer::{
    error::ImportError,
    index::RoomIndex,
    rows::{read_bookings, read_rooms, read_semesters},
};
use log::{error, info, warn};
use migration::{Migrator, MigratorTrait};
use models::semester::{Semester, SemesterCalendar};
use sea_orm::DatabaseConnection;
use std::{
    collections::BTreeSet,
    fs::File,
    path::{Path, PathBuf},
    process::ExitCode,
};

#[derive(Parser)]
#[command(name = "importer")]
#[command(about = "Loads Free Room Finder reference data into Postgres", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Insert or update semesters from a CSV file
    Semesters { csv: PathBuf },
    /// Insert or update rooms from a CSV file
    Rooms { csv: PathBuf },
    /// Replace the recurring bookings of every semester named in a CSV file
    Bookings { csv: PathBuf },
    /// Issue a login cookie value for a user and print it
    Grant { username: String },
}

fn open(path: &Path) -> Result<File, ImportError> {
    File::open(path).map_err(|source| ImportError::Open {
        path: path.display().to_string(),
        source,
    })
}

/// Stored semesters with `incoming` replacing any of the same id
fn merged_calendar(
    stored: Vec<Semester>,
    incoming: &[Semester],
) -> Result<SemesterCalendar, ImportError> {
    let replaced: BTreeSet<_> = incoming.iter().map(|s| s.id).collect();
    let merged = stored
        .into_iter()
        .filter(|s| !replaced.contains(&s.id))
        .chain(incoming.iter().copied())
        .collect();

    Ok(SemesterCalendar::new(merged)?)
}

async fn run(command: Commands, db: DatabaseConnection) -> Result<(), ImportError> {
    let store = PostgresStore::new(db.clone());

    match command {
        Commands::Migrate => {
            Migrator::up(&db, None).await?;
            info!("Schema is up to date");
        }
        Commands::Semesters { csv } => {
            let semesters = read_semesters(open(&csv)?)?;
            merged_calendar(store.semesters().await?, &semesters)?;

            let saved = ImportService::save_semesters(&db, semesters).await?;
            println!("Saved {saved} semesters from {}.", csv.display());
        }
        Commands::Rooms { csv } => {
            let rows = read_rooms(open(&csv)?)?;
            let mut index = RoomIndex::load(&store, rows.iter().map(|r| r.campus.as_str())).await?;
            let rooms = index.assign_ids(rows);

            let saved = ImportService::save_rooms(&db, rooms).await?;
            println!("Saved {saved} rooms from {}.", csv.display());
        }
        Commands::Bookings { csv } => {
            let rows = read_bookings(open(&csv)?)?;

            let calendar = SemesterCalendar::new(store.semesters().await?)?;
            let configured: BTreeSet<_> = calendar.semesters().iter().map(|s| s.id).collect();
            for semester in rows.iter().map(|r| r.semester).collect::<BTreeSet<_>>() {
                if !configured.contains(&semester) {
                    warn!("Semester {semester} is not configured; its bookings will never match");
                }
            }

            let index = RoomIndex::load(&store, rows.iter().map(|r| r.campus.as_str())).await?;
            let bookings = index.resolve_bookings(&rows)?;

            let saved = ImportService::replace_bookings(&db, bookings).await?;
            println!("Saved {saved} bookings from {}.", csv.display());
        }
        Commands::Grant { username } => {
            let token = LoginService::grant(&db, &username).await?;
            println!("{token}");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let db = match connect_from_env().await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to the database: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, db).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
