use serde::Serialize;

use super::event::ScheduleEvent;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub total_slots: usize,
    pub booked_slots: usize,
    pub available_slots: usize,
    /// Percentage of booked slots, 0 for an event without slots.
    pub booking_rate: f64,
}

impl EventStats {
    pub fn for_event(event: &ScheduleEvent) -> Self {
        let total_slots = event.time_slots.len();
        let booked_slots = event.booked_count();
        let booking_rate = if total_slots > 0 {
            booked_slots as f64 / total_slots as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_slots,
            booked_slots,
            available_slots: total_slots - booked_slots,
            booking_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Booker, NewEvent, NewTimeSlot};
    use chrono::Utc;

    fn event_with_slots(count: usize) -> ScheduleEvent {
        ScheduleEvent::new(NewEvent {
            title: "Sync".to_string(),
            description: None,
            admin_email: "a@x.com".to_string(),
            invited_emails: vec![],
            time_slots: (0..count)
                .map(|_| NewTimeSlot {
                    date: "2025-06-01".to_string(),
                    start_time: "09:00".to_string(),
                    end_time: "10:00".to_string(),
                })
                .collect(),
        })
    }

    #[test]
    fn test_empty_event_has_zero_rate() {
        let stats = EventStats::for_event(&event_with_slots(0));
        assert_eq!(stats.total_slots, 0);
        assert_eq!(stats.booking_rate, 0.0);
    }

    #[test]
    fn test_counts_add_up() {
        let mut event = event_with_slots(3);
        let booker = Booker {
            name: "Bob".to_string(),
            email: "bob@x.com".to_string(),
        };
        event.time_slots[2].book(booker, Utc::now());

        let stats = EventStats::for_event(&event);
        assert_eq!(stats.booked_slots, 1);
        assert_eq!(stats.available_slots, 2);
        assert_eq!(stats.total_slots, stats.booked_slots + stats.available_slots);
        assert!((stats.booking_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(EventStats::for_event(&event_with_slots(2))).unwrap();
        assert_eq!(json["totalSlots"], 2);
        assert_eq!(json["availableSlots"], 2);
        assert_eq!(json["bookingRate"], 0.0);
    }
}
