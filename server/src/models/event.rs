use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time_slot::{NewTimeSlot, TimeSlot};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub admin_email: String,
    pub invited_emails: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub time_slots: Vec<TimeSlot>,
}

impl ScheduleEvent {
    /// Builds a fresh event with generated ids and every slot open.
    pub fn new(input: NewEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            admin_email: input.admin_email,
            invited_emails: input.invited_emails,
            is_active: true,
            created_at: Utc::now(),
            time_slots: input.time_slots.into_iter().map(TimeSlot::new).collect(),
        }
    }

    pub fn slot(&self, slot_id: Uuid) -> Option<&TimeSlot> {
        self.time_slots.iter().find(|slot| slot.id == slot_id)
    }

    pub fn slot_mut(&mut self, slot_id: Uuid) -> Option<&mut TimeSlot> {
        self.time_slots.iter_mut().find(|slot| slot.id == slot_id)
    }

    pub fn booked_count(&self) -> usize {
        self.time_slots.iter().filter(|slot| slot.is_booked).count()
    }
}

/// Input for creating an event. Validation happens in the request layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub admin_email: String,
    #[serde(default)]
    pub invited_emails: Vec<String>,
    #[serde(default)]
    pub time_slots: Vec<NewTimeSlot>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample_input(slots: usize) -> NewEvent {
        NewEvent {
            title: "Sync".to_string(),
            description: None,
            admin_email: "a@x.com".to_string(),
            invited_emails: vec!["bob@x.com".to_string()],
            time_slots: (0..slots)
                .map(|i| NewTimeSlot {
                    date: "2025-06-01".to_string(),
                    start_time: format!("{:02}:00", 9 + i),
                    end_time: format!("{:02}:00", 10 + i),
                })
                .collect(),
        }
    }

    #[test]
    fn test_new_event_starts_active_with_open_slots() {
        let event = ScheduleEvent::new(sample_input(2));

        assert!(event.is_active);
        assert_eq!(event.time_slots.len(), 2);
        assert!(event.time_slots.iter().all(|s| !s.is_booked));
        assert!(event.time_slots.iter().all(|s| s.booked_by.is_none()));
        assert_eq!(event.time_slots[0].start_time, "09:00");
        assert_eq!(event.time_slots[1].start_time, "10:00");
    }

    #[test]
    fn test_slot_ids_are_unique_within_event() {
        let event = ScheduleEvent::new(sample_input(20));
        let ids: HashSet<Uuid> = event.time_slots.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_serializes_camel_case_and_omits_absent_fields() {
        let event = ScheduleEvent::new(sample_input(1));
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["adminEmail"], "a@x.com");
        assert_eq!(json["isActive"], true);
        assert!(json.get("description").is_none());
        assert!(json["timeSlots"][0].get("bookedBy").is_none());
        assert!(json["timeSlots"][0].get("bookedAt").is_none());
        assert_eq!(json["timeSlots"][0]["isBooked"], false);
    }

    #[test]
    fn test_new_event_deserializes_without_optional_fields() {
        let input: NewEvent = serde_json::from_value(serde_json::json!({
            "title": "Sync",
            "adminEmail": "a@x.com",
            "timeSlots": [{"date": "2025-06-01", "startTime": "09:00", "endTime": "10:00"}]
        }))
        .unwrap();

        assert!(input.invited_emails.is_empty());
        assert!(input.description.is_none());
        assert_eq!(input.time_slots.len(), 1);
    }
}
