use crate::{
    auth::AuthContext,
    dtos::room::{BookedResponse, QuerySummary, RoomResponse, SearchForm, SearchResponse},
    error::{ApiError, AppError},
    state::AppState,
};
use axum::{
    Extension, Form, Json,
    extract::{Path, State, rejection::FormRejection},
    http::StatusCode,
};
use database::services::{availability::AvailabilityService, booking::BookingService};
use log::info;
use models::request::{RawRequestFields, normalize};
use uuid::Uuid;

/// Search for rooms free for the requested window
#[utoipa::path(
    post,
    path = "/rooms/search",
    request_body(content = SearchForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Free rooms, possibly none", body = SearchResponse),
        (status = 400, description = "Missing or invalid form fields", body = ApiError),
        (status = 401, description = "Not logged in", body = ApiError),
        (status = 503, description = "Room data temporarily unavailable", body = ApiError)
    ),
    security(("login" = [])),
    tag = "Rooms"
)]
pub async fn search_rooms(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    form: Result<Form<SearchForm>, FormRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Form(form) = form?;
    let raw = RawRequestFields::from(form);
    let request = normalize(&raw, &state.calendar)?;

    state.sessions.save_query(&auth.session_id, request.clone());

    let rooms = AvailabilityService::search(state.rooms.as_ref(), &request).await?;
    info!(
        "{} searched {} on {} {}: {} free rooms",
        auth.username,
        request.campus,
        request.date,
        request.time,
        rooms.len()
    );

    Ok(Json(SearchResponse {
        query: QuerySummary::from(&request),
        rooms: rooms.into_iter().map(RoomResponse::from).collect(),
    }))
}

/// Book a room for the search saved in the session
#[utoipa::path(
    post,
    path = "/rooms/{room_id}/book",
    params(
        ("room_id" = Uuid, Path, description = "Room ID")
    ),
    responses(
        (status = 201, description = "Room booked", body = BookedResponse),
        (status = 400, description = "No search saved in this session", body = ApiError),
        (status = 401, description = "Not logged in", body = ApiError),
        (status = 404, description = "Room not found", body = ApiError),
        (status = 409, description = "Room no longer available or too small", body = ApiError),
        (status = 503, description = "Room data temporarily unavailable", body = ApiError)
    ),
    security(("login" = [])),
    tag = "Rooms"
)]
pub async fn book_room(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(room_id): Path<Uuid>,
) -> Result<(StatusCode, Json<BookedResponse>), AppError> {
    let request = state
        .sessions
        .saved_query(&auth.session_id)
        .ok_or(AppError::NoSavedQuery)?;

    let reservation =
        BookingService::book(state.rooms.as_ref(), room_id, &auth.username, &request).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookedResponse {
            message: "Room booked!".to_string(),
            reservation: reservation.into(),
        }),
    ))
}
