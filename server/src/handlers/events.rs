use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use super::{is_blank, parse_id};
use crate::models::NewEvent;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};

#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    #[serde(rename = "adminEmail")]
    pub admin_email: Option<String>,
}

fn event_not_found(event_id: &str) -> AppError {
    AppError::NotFound(format!("Event '{}' was not found", event_id))
}

fn validate_new_event(input: &NewEvent) -> Result<(), AppError> {
    if is_blank(&input.title) || is_blank(&input.admin_email) || input.time_slots.is_empty() {
        return Err(AppError::ValidationError(
            "Missing required fields (title, adminEmail or timeSlots)".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(input) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;
    validate_new_event(&input)?;

    let event = state.store.create_event(input).await?;
    Ok(success(event, "Event created successfully"))
}

/// GET /api/events?adminEmail=
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Response, AppError> {
    let admin_email = query
        .admin_email
        .filter(|email| !is_blank(email))
        .ok_or_else(|| AppError::ValidationError("adminEmail is required".to_string()))?;

    let events = state.store.get_events_by_admin(&admin_email).await?;
    Ok(success(events, "Events retrieved successfully"))
}

/// GET /api/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&event_id).ok_or_else(|| event_not_found(&event_id))?;
    let event = state
        .store
        .get_event(id)
        .await?
        .ok_or_else(|| event_not_found(&event_id))?;

    Ok(success(event, "Event retrieved successfully"))
}

/// DELETE /api/events/:event_id
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&event_id).ok_or_else(|| event_not_found(&event_id))?;
    state.store.delete_event(id).await?;

    Ok(empty_success("Event deleted successfully"))
}

/// GET /api/events/:event_id/stats
pub async fn get_event_stats(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&event_id).ok_or_else(|| event_not_found(&event_id))?;
    let stats = state
        .store
        .get_event_stats(id)
        .await?
        .ok_or_else(|| event_not_found(&event_id))?;

    Ok(success(stats, "Event stats retrieved successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTimeSlot;

    fn input(title: &str, admin_email: &str, slots: usize) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            description: None,
            admin_email: admin_email.to_string(),
            invited_emails: vec![],
            time_slots: (0..slots)
                .map(|_| NewTimeSlot {
                    date: "2025-06-01".to_string(),
                    start_time: "09:00".to_string(),
                    end_time: "10:00".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_validate_new_event() {
        assert!(validate_new_event(&input("Sync", "a@x.com", 1)).is_ok());
        assert!(validate_new_event(&input("  ", "a@x.com", 1)).is_err());
        assert!(validate_new_event(&input("Sync", "", 1)).is_err());
        assert!(validate_new_event(&input("Sync", "a@x.com", 0)).is_err());
    }
}
