use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::{env, time::Duration};

/// Environment variable holding the Postgres connection string
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Creates a database connection
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    Database::connect(options).await
}

/// Creates a database connection from `DATABASE_URL`, reading `.env` if present
pub async fn connect_from_env() -> Result<DatabaseConnection, DbErr> {
    dotenvy::dotenv().ok();

    let url = env::var(DATABASE_URL_VAR)
        .map_err(|_| DbErr::Custom(format!("{DATABASE_URL_VAR} is not set")))?;

    create_connection(&url).await
}
