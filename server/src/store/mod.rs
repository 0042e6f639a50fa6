//! Event storage.
//!
//! [`EventStore`] is the single storage capability the HTTP layer talks to.
//! The concrete backend is chosen once at start-up by [`connect`]:
//! PostgreSQL when a database URL is configured, otherwise the in-process
//! [`InMemoryEventStore`].

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::models::{Booker, EventStats, NewEvent, ScheduleEvent};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryEventStore;
pub use postgres::PgEventStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("event {0} not found")]
    EventNotFound(Uuid),

    #[error("slot {slot_id} not found in event {event_id}")]
    SlotNotFound { event_id: Uuid, slot_id: Uuid },

    #[error("slot {0} is already booked")]
    SlotAlreadyBooked(Uuid),

    #[error("slot {0} is not booked")]
    SlotNotBooked(Uuid),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// True for the expected negative outcomes (missing ids, booking conflicts),
    /// false for backend failures.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            StoreError::EventNotFound(_)
                | StoreError::SlotNotFound { .. }
                | StoreError::SlotAlreadyBooked(_)
                | StoreError::SlotNotBooked(_)
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create_event(&self, input: NewEvent) -> StoreResult<ScheduleEvent>;

    async fn get_event(&self, event_id: Uuid) -> StoreResult<Option<ScheduleEvent>>;

    /// Events owned by `admin_email` (exact match) in creation order.
    async fn get_events_by_admin(&self, admin_email: &str) -> StoreResult<Vec<ScheduleEvent>>;

    /// Claims an open slot. Check and write happen atomically.
    async fn book_slot(&self, event_id: Uuid, slot_id: Uuid, booker: Booker) -> StoreResult<()>;

    async fn cancel_booking(&self, event_id: Uuid, slot_id: Uuid) -> StoreResult<()>;

    async fn delete_event(&self, event_id: Uuid) -> StoreResult<()>;

    async fn get_event_stats(&self, event_id: Uuid) -> StoreResult<Option<EventStats>> {
        Ok(self
            .get_event(event_id)
            .await?
            .map(|event| EventStats::for_event(&event)))
    }
}

/// Builds the backend selected by `config`.
pub async fn connect(config: &Config) -> StoreResult<Arc<dyn EventStore>> {
    match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await?;
            tracing::info!("Successfully connected to database");

            sqlx::migrate!().run(&pool).await?;
            tracing::info!("Migrations run successfully");

            Ok(Arc::new(PgEventStore::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not configured, events are kept in memory only");
            Ok(Arc::new(InMemoryEventStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_distinguished_from_backend_failures() {
        let id = Uuid::new_v4();
        assert!(StoreError::EventNotFound(id).is_rejection());
        assert!(StoreError::SlotAlreadyBooked(id).is_rejection());
        assert!(StoreError::SlotNotBooked(id).is_rejection());
        assert!(StoreError::SlotNotFound {
            event_id: id,
            slot_id: id
        }
        .is_rejection());
        assert!(!StoreError::Database(sqlx::Error::PoolTimedOut).is_rejection());
    }

    #[tokio::test]
    async fn test_connect_without_database_url_uses_memory() {
        let config = Config {
            database_url: None,
            ..Config::default()
        };
        let store = connect(&config).await.unwrap();

        assert!(store.get_events_by_admin("a@x.com").await.unwrap().is_empty());
    }
}
