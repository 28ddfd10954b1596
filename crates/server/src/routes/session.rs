use crate::{auth::AuthContext, dtos::room::QuerySummary, error::AppError, state::AppState};
use axum::{Extension, Json, extract::State};

/// The last search made in this session
#[utoipa::path(
    get,
    path = "/session/query",
    responses(
        (status = 200, description = "Saved search", body = QuerySummary),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No search has been made yet")
    ),
    security(("login" = [])),
    tag = "Session"
)]
pub async fn saved_query(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<QuerySummary>, AppError> {
    state
        .sessions
        .saved_query(&auth.session_id)
        .map(|request| Json(QuerySummary::from(&request)))
        .ok_or(AppError::NotFound("no search has been made in this session"))
}
