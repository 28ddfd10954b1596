use database::store::StoreError;
use models::semester::CalendarError;
use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("could not open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("line {line}: {reason}")]
    Invalid { line: u64, reason: String },

    #[error("line {line}: no room named {room:?} on campus {campus:?}")]
    UnknownRoom {
        line: u64,
        campus: String,
        room: String,
    },

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ImportError {
    pub(crate) fn invalid(line: u64, reason: impl Into<String>) -> Self {
        Self::Invalid {
            line,
            reason: reason.into(),
        }
    }
}
