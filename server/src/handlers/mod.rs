use axum::response::Response;
use serde::Serialize;
use uuid::Uuid;

use crate::utils::response::success;

pub mod bookings;
pub mod events;

pub use bookings::{book_slot, cancel_booking};
pub use events::{create_event, delete_event, get_event, get_event_stats, list_events};

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "agenda-api",
    };

    success(payload, "Health check successful")
}

/// Path ids that are not UUIDs can never match a stored id.
fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
