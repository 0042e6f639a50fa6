use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::{
    book_slot, cancel_booking, create_event, delete_event, get_event, get_event_stats,
    health_check, list_events,
};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let api = Router::new()
        .route("/events", post(create_event).get(list_events))
        .route("/events/:event_id", get(get_event).delete(delete_event))
        .route("/events/:event_id/stats", get(get_event_stats))
        .route(
            "/events/:event_id/book/:slot_id",
            post(book_slot).delete(cancel_booking),
        );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config.production))
        .layer(create_cors_layer(&config.cors_allowed_origins))
}
