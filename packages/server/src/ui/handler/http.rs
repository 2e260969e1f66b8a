//! HTTP endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, response::Html};

use crate::{
    infrastructure::dto::http::{LiveRoomDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Room list page
///
/// Room ids only contain `[A-Za-z0-9_-]`, so they are inserted without escaping.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let items: String = state
        .list_rooms_usecase
        .execute()
        .iter()
        .map(|room| {
            format!(
                "<li><a href=\"/ws/{id}\" data-room=\"{id}\">#{id}</a></li>",
                id = room.as_str()
            )
        })
        .collect();

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Hiroba</title></head>\n\
         <body>\n<h1>Rooms</h1>\n<ul>{items}</ul>\n</body>\n</html>\n"
    ))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state
        .list_rooms_usecase
        .execute()
        .iter()
        .map(RoomSummaryDto::from)
        .collect();
    Json(rooms)
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint to get live room state (for testing purposes)
pub async fn debug_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<LiveRoomDto>> {
    let rooms = state
        .connection_manager
        .snapshot()
        .await
        .iter()
        .map(LiveRoomDto::from)
        .collect();
    Json(rooms)
}
