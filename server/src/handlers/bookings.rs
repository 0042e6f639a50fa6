use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::{is_blank, parse_id};
use crate::models::Booker;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::empty_success;

const BOOK_FAILED: &str = "The slot could not be booked. It may be taken or may not exist";
const CANCEL_FAILED: &str = "The booking could not be cancelled";

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Resolves both path ids; an unparseable id behaves like an unknown one.
fn slot_ids(event_id: &str, slot_id: &str, message: &str) -> Result<(Uuid, Uuid), AppError> {
    match (parse_id(event_id), parse_id(slot_id)) {
        (Some(event), Some(slot)) => Ok((event, slot)),
        (None, _) => Err(AppError::BookingRejected(format!(
            "{}: event {} not found",
            message, event_id
        ))),
        (_, None) => Err(AppError::BookingRejected(format!(
            "{}: slot {} not found",
            message, slot_id
        ))),
    }
}

/// POST /api/events/:event_id/book/:slot_id
pub async fn book_slot(
    State(state): State<AppState>,
    Path((event_id, slot_id)): Path<(String, String)>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;
    if is_blank(&request.name) || is_blank(&request.email) {
        return Err(AppError::ValidationError("Name and email are required".to_string()));
    }

    let (event_id, slot_id) = slot_ids(&event_id, &slot_id, BOOK_FAILED)?;
    let booker = Booker {
        name: request.name,
        email: request.email,
    };

    state
        .store
        .book_slot(event_id, slot_id, booker)
        .await
        .map_err(|e| AppError::booking(e, BOOK_FAILED))?;

    Ok(empty_success("Slot booked successfully"))
}

/// DELETE /api/events/:event_id/book/:slot_id
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path((event_id, slot_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let (event_id, slot_id) = slot_ids(&event_id, &slot_id, CANCEL_FAILED)?;

    state
        .store
        .cancel_booking(event_id, slot_id)
        .await
        .map_err(|e| AppError::booking(e, CANCEL_FAILED))?;

    Ok(empty_success("Booking cancelled successfully"))
}
