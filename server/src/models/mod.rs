pub mod event;
pub mod stats;
pub mod time_slot;

pub use event::{NewEvent, ScheduleEvent};
pub use stats::EventStats;
pub use time_slot::{Booker, NewTimeSlot, TimeSlot};
