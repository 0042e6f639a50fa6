use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{EventStore, StoreError, StoreResult};
use crate::models::{Booker, NewEvent, ScheduleEvent, TimeSlot};

const EVENT_COLUMNS: &str =
    "id, title, description, admin_email, invited_emails, is_active, created_at";
const SLOT_COLUMNS: &str = "id, event_id, date, start_time, end_time, is_booked, \
     booked_by_name, booked_by_email, booked_at";

#[derive(Debug, Clone, FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    admin_email: String,
    invited_emails: Vec<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct TimeSlotRow {
    id: Uuid,
    event_id: Uuid,
    date: String,
    start_time: String,
    end_time: String,
    is_booked: bool,
    booked_by_name: Option<String>,
    booked_by_email: Option<String>,
    booked_at: Option<DateTime<Utc>>,
}

impl From<TimeSlotRow> for TimeSlot {
    fn from(row: TimeSlotRow) -> Self {
        let booked_by = match (row.booked_by_name, row.booked_by_email) {
            (Some(name), Some(email)) if row.is_booked => Some(Booker { name, email }),
            _ => None,
        };
        let booked_at = if row.is_booked { row.booked_at } else { None };

        Self {
            id: row.id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            is_booked: row.is_booked,
            booked_by,
            booked_at,
        }
    }
}

impl EventRow {
    fn into_event(self, time_slots: Vec<TimeSlot>) -> ScheduleEvent {
        ScheduleEvent {
            id: self.id,
            title: self.title,
            description: self.description,
            admin_email: self.admin_email,
            invited_emails: self.invited_emails,
            is_active: self.is_active,
            created_at: self.created_at,
            time_slots,
        }
    }
}

/// Postgres keeps microseconds; truncating up front keeps returned values
/// equal to what a later read sees.
fn db_timestamp(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}

/// Groups slot rows (already ordered by position) under their events.
fn assemble(events: Vec<EventRow>, slots: Vec<TimeSlotRow>) -> Vec<ScheduleEvent> {
    let mut by_event: HashMap<Uuid, Vec<TimeSlot>> = HashMap::new();
    for slot in slots {
        by_event.entry(slot.event_id).or_default().push(slot.into());
    }

    events
        .into_iter()
        .map(|event| {
            let time_slots = by_event.remove(&event.id).unwrap_or_default();
            event.into_event(time_slots)
        })
        .collect()
}

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_slots(&self, event_ids: &[Uuid]) -> StoreResult<Vec<TimeSlotRow>> {
        let query = format!(
            "SELECT {SLOT_COLUMNS} FROM time_slots WHERE event_id = ANY($1) \
             ORDER BY event_id, position"
        );
        let rows = sqlx::query_as::<_, TimeSlotRow>(&query)
            .bind(event_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Explains why a conditional update on a slot touched no row.
    async fn classify_miss(
        &self,
        event_id: Uuid,
        slot_id: Uuid,
        conflict: StoreError,
    ) -> StoreError {
        let slot = sqlx::query_scalar::<_, bool>(
            "SELECT is_booked FROM time_slots WHERE id = $1 AND event_id = $2",
        )
        .bind(slot_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;

        match slot {
            Ok(Some(_)) => conflict,
            Ok(None) => match self.event_exists(event_id).await {
                Ok(true) => StoreError::SlotNotFound { event_id, slot_id },
                Ok(false) => StoreError::EventNotFound(event_id),
                Err(e) => e,
            },
            Err(e) => StoreError::Database(e),
        }
    }

    async fn event_exists(&self, event_id: Uuid) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM schedule_events WHERE id = $1)",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn create_event(&self, input: NewEvent) -> StoreResult<ScheduleEvent> {
        let mut event = ScheduleEvent::new(input);
        event.created_at = db_timestamp(event.created_at);
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO schedule_events \
             (id, title, description, admin_email, invited_emails, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.admin_email)
        .bind(&event.invited_emails)
        .bind(event.is_active)
        .bind(event.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, slot) in event.time_slots.iter().enumerate() {
            sqlx::query(
                "INSERT INTO time_slots \
                 (id, event_id, position, date, start_time, end_time, is_booked) \
                 VALUES ($1, $2, $3, $4, $5, $6, FALSE)",
            )
            .bind(slot.id)
            .bind(event.id)
            .bind(position as i32)
            .bind(&slot.date)
            .bind(&slot.start_time)
            .bind(&slot.end_time)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            event_id = %event.id,
            slots = event.time_slots.len(),
            "Event created"
        );
        Ok(event)
    }

    async fn get_event(&self, event_id: Uuid) -> StoreResult<Option<ScheduleEvent>> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM schedule_events WHERE id = $1");
        let Some(row) = sqlx::query_as::<_, EventRow>(&query)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let slots = self.load_slots(&[event_id]).await?;
        Ok(assemble(vec![row], slots).pop())
    }

    async fn get_events_by_admin(&self, admin_email: &str) -> StoreResult<Vec<ScheduleEvent>> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM schedule_events WHERE admin_email = $1 \
             ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, EventRow>(&query)
            .bind(admin_email)
            .fetch_all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let slots = self.load_slots(&ids).await?;
        Ok(assemble(rows, slots))
    }

    async fn book_slot(&self, event_id: Uuid, slot_id: Uuid, booker: Booker) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE time_slots \
             SET is_booked = TRUE, booked_by_name = $3, booked_by_email = $4, booked_at = $5 \
             WHERE id = $1 AND event_id = $2 AND is_booked = FALSE",
        )
        .bind(slot_id)
        .bind(event_id)
        .bind(&booker.name)
        .bind(&booker.email)
        .bind(db_timestamp(Utc::now()))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let err = self
                .classify_miss(event_id, slot_id, StoreError::SlotAlreadyBooked(slot_id))
                .await;
            tracing::debug!(%event_id, %slot_id, error = %err, "Booking rejected");
            return Err(err);
        }

        tracing::info!(%event_id, %slot_id, "Slot booked");
        Ok(())
    }

    async fn cancel_booking(&self, event_id: Uuid, slot_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE time_slots \
             SET is_booked = FALSE, booked_by_name = NULL, booked_by_email = NULL, booked_at = NULL \
             WHERE id = $1 AND event_id = $2 AND is_booked = TRUE",
        )
        .bind(slot_id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let err = self
                .classify_miss(event_id, slot_id, StoreError::SlotNotBooked(slot_id))
                .await;
            tracing::debug!(%event_id, %slot_id, error = %err, "Cancellation rejected");
            return Err(err);
        }

        tracing::info!(%event_id, %slot_id, "Booking cancelled");
        Ok(())
    }

    async fn delete_event(&self, event_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM schedule_events WHERE id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::EventNotFound(event_id));
        }

        tracing::info!(%event_id, "Event deleted");
        Ok(())
    }
}
