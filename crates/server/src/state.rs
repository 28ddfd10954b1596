use crate::{
    config::{Config, StoreKind},
    demo,
    session::SessionStore,
};
use database::{
    db::create_connection,
    store::{LoginStore, PostgresStore, RoomStore, StoreError},
};
use log::{info, warn};
use migration::{Migrator, MigratorTrait};
use models::semester::SemesterCalendar;
use sea_orm::DbErr;
use std::{sync::Arc, time::Duration};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("could not connect to the database: {0}")]
    Connect(#[source] DbErr),

    #[error("could not apply migrations: {0}")]
    Migrate(#[source] DbErr),

    #[error("could not load the semester calendar: {0}")]
    Calendar(#[from] StoreError),
}

/// Shared handles cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<dyn RoomStore>,
    pub logins: Arc<dyn LoginStore>,
    pub sessions: Arc<SessionStore>,
    /// Loaded once at startup; searches never query it from storage
    pub calendar: Arc<SemesterCalendar>,
    pub secure_cookies: bool,
}

impl AppState {
    /// Builds state over a store implementing both storage traits
    pub async fn with_store<S>(
        store: Arc<S>,
        session_ttl: Duration,
        secure_cookies: bool,
    ) -> Result<Self, StartupError>
    where
        S: RoomStore + LoginStore + 'static,
    {
        let calendar = SemesterCalendar::new(store.semesters().await?).map_err(StoreError::from)?;
        if calendar.is_empty() {
            warn!("No semesters are configured; every search will be rejected");
        } else {
            info!("Loaded {} semesters", calendar.semesters().len());
        }

        Ok(Self {
            rooms: store.clone(),
            logins: store,
            sessions: Arc::new(SessionStore::new(session_ttl)),
            calendar: Arc::new(calendar),
            secure_cookies,
        })
    }

    pub async fn from_config(config: &Config) -> Result<Self, StartupError> {
        match &config.store {
            StoreKind::Postgres { database_url } => {
                let db = create_connection(database_url)
                    .await
                    .map_err(StartupError::Connect)?;

                if config.run_migrations {
                    info!("Applying pending migrations");
                    Migrator::up(&db, None).await.map_err(StartupError::Migrate)?;
                }

                let store = Arc::new(PostgresStore::new(db));
                Self::with_store(store, config.session_ttl, config.secure_cookies).await
            }
            StoreKind::Memory => {
                warn!(
                    "Serving demo data; log in with the cookie {}={}",
                    crate::auth::LOGIN_COOKIE,
                    demo::DEMO_TOKEN
                );
                let store = Arc::new(demo::demo_store());
                Self::with_store(store, config.session_ttl, config.secure_cookies).await
            }
        }
    }
}
