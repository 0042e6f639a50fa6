use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booker {
    pub name: String,
    pub email: String,
}

/// A bookable range inside an event.
///
/// `booked_by` and `booked_at` are set exactly when `is_booked` is true.
/// Use [`TimeSlot::book`] and [`TimeSlot::release`] to change booking state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: Uuid,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub is_booked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booked_by: Option<Booker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booked_at: Option<DateTime<Utc>>,
}

impl TimeSlot {
    pub fn new(input: NewTimeSlot) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            is_booked: false,
            booked_by: None,
            booked_at: None,
        }
    }

    /// Claims the slot. Returns false if it is already taken.
    pub fn book(&mut self, booker: Booker, at: DateTime<Utc>) -> bool {
        if self.is_booked {
            return false;
        }
        self.is_booked = true;
        self.booked_by = Some(booker);
        self.booked_at = Some(at);
        true
    }

    /// Clears the booking. Returns false if the slot was open.
    pub fn release(&mut self) -> bool {
        if !self.is_booked {
            return false;
        }
        self.is_booked = false;
        self.booked_by = None;
        self.booked_at = None;
        true
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimeSlot {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_slot() -> TimeSlot {
        TimeSlot::new(NewTimeSlot {
            date: "2025-06-01".to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
        })
    }

    fn bob() -> Booker {
        Booker {
            name: "Bob".to_string(),
            email: "bob@x.com".to_string(),
        }
    }

    #[test]
    fn test_book_sets_all_booking_fields() {
        let mut slot = open_slot();
        let now = Utc::now();

        assert!(slot.book(bob(), now));
        assert!(slot.is_booked);
        assert_eq!(slot.booked_by, Some(bob()));
        assert_eq!(slot.booked_at, Some(now));
    }

    #[test]
    fn test_second_booking_keeps_first_booker() {
        let mut slot = open_slot();
        assert!(slot.book(bob(), Utc::now()));

        let carol = Booker {
            name: "Carol".to_string(),
            email: "carol@x.com".to_string(),
        };
        assert!(!slot.book(carol, Utc::now()));
        assert_eq!(slot.booked_by, Some(bob()));
    }

    #[test]
    fn test_release_restores_open_shape() {
        let pristine = open_slot();
        let mut slot = pristine.clone();

        assert!(!slot.release());
        assert!(slot.book(bob(), Utc::now()));
        assert!(slot.release());
        assert_eq!(slot, pristine);
        assert!(!slot.release());
    }
}
