use crate::{dtos::room::CampusesResponse, error::AppError, state::AppState};
use axum::{Json, extract::State};

/// List campuses that have rooms, for the request form
#[utoipa::path(
    get,
    path = "/campuses",
    responses(
        (status = 200, description = "Campus names, sorted", body = CampusesResponse),
        (status = 401, description = "Not logged in"),
        (status = 503, description = "Room data temporarily unavailable")
    ),
    security(("login" = [])),
    tag = "Rooms"
)]
pub async fn list_campuses(
    State(state): State<AppState>,
) -> Result<Json<CampusesResponse>, AppError> {
    let campuses = state.rooms.campuses().await?;
    Ok(Json(CampusesResponse { campuses }))
}
