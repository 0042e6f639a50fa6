use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EventStore, StoreError, StoreResult};
use crate::models::{Booker, NewEvent, ScheduleEvent};

/// In-process store. Nothing survives a restart.
///
/// Events live in creation order behind one lock; every mutation takes the
/// write half, so booking a slot cannot interleave with another booking.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<ScheduleEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn find_event_mut(
    events: &mut [ScheduleEvent],
    event_id: Uuid,
) -> StoreResult<&mut ScheduleEvent> {
    events
        .iter_mut()
        .find(|event| event.id == event_id)
        .ok_or(StoreError::EventNotFound(event_id))
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn create_event(&self, input: NewEvent) -> StoreResult<ScheduleEvent> {
        let event = ScheduleEvent::new(input);
        self.events.write().await.push(event.clone());

        tracing::info!(
            event_id = %event.id,
            slots = event.time_slots.len(),
            "Event created"
        );
        Ok(event)
    }

    async fn get_event(&self, event_id: Uuid) -> StoreResult<Option<ScheduleEvent>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|event| event.id == event_id).cloned())
    }

    async fn get_events_by_admin(&self, admin_email: &str) -> StoreResult<Vec<ScheduleEvent>> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|event| event.admin_email == admin_email)
            .cloned()
            .collect())
    }

    async fn book_slot(&self, event_id: Uuid, slot_id: Uuid, booker: Booker) -> StoreResult<()> {
        let mut events = self.events.write().await;
        let event = find_event_mut(&mut events, event_id)?;
        let slot = event
            .slot_mut(slot_id)
            .ok_or(StoreError::SlotNotFound { event_id, slot_id })?;

        if !slot.book(booker, Utc::now()) {
            tracing::debug!(%event_id, %slot_id, "Slot already booked");
            return Err(StoreError::SlotAlreadyBooked(slot_id));
        }

        tracing::info!(%event_id, %slot_id, "Slot booked");
        Ok(())
    }

    async fn cancel_booking(&self, event_id: Uuid, slot_id: Uuid) -> StoreResult<()> {
        let mut events = self.events.write().await;
        let event = find_event_mut(&mut events, event_id)?;
        let slot = event
            .slot_mut(slot_id)
            .ok_or(StoreError::SlotNotFound { event_id, slot_id })?;

        if !slot.release() {
            tracing::debug!(%event_id, %slot_id, "Slot was not booked");
            return Err(StoreError::SlotNotBooked(slot_id));
        }

        tracing::info!(%event_id, %slot_id, "Booking cancelled");
        Ok(())
    }

    async fn delete_event(&self, event_id: Uuid) -> StoreResult<()> {
        let mut events = self.events.write().await;
        let index = events
            .iter()
            .position(|event| event.id == event_id)
            .ok_or(StoreError::EventNotFound(event_id))?;
        events.remove(index);

        tracing::info!(%event_id, "Event deleted");
        Ok(())
    }
}
