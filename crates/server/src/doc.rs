use crate::{
    auth::LOGIN_COOKIE,
    dtos::room::{
        BookedResponse, CampusesResponse, QuerySummary, ReservationResponse, RoomResponse,
        SearchForm, SearchResponse,
    },
    error::ApiError,
    routes::{
        campuses,
        health::{self, HealthResponse},
        rooms, session,
    },
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "login",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(LOGIN_COOKIE))),
            );
        }
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        rooms::search_rooms,
        rooms::book_room,
        campuses::list_campuses,
        session::saved_query
    ),
    components(schemas(
        ApiError,
        HealthResponse,
        SearchForm,
        SearchResponse,
        QuerySummary,
        RoomResponse,
        BookedResponse,
        ReservationResponse,
        CampusesResponse
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Rooms", description = "Room search and booking"),
        (name = "Session", description = "Per-session state"),
    ),
    info(
        title = "Free Room Finder API",
        version = "1.0.0",
        description = "Find and book free campus rooms",
        license(
            name = "AGPL-3.0-or-later",
        )
    )
)]
pub struct ApiDoc;
