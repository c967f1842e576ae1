//! Appointment slot rules.
//!
//! A slot is bookable when it falls on a weekday, on or after today's date
//! in the clinic's time zone, on a 15-minute boundary, and not earlier than
//! the current time.

use jiff::Zoned;
use jiff::civil::Weekday;
use jiff::tz::TimeZone;
use thiserror::Error;

pub const SLOT_STEP_MINUTES: i8 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("date {date} is before today ({today})")]
    InPast {
        date: jiff::civil::Date,
        today: jiff::civil::Date,
    },

    #[error("time {time} today has already passed")]
    Elapsed { time: jiff::civil::Time },

    #[error("appointments cannot be booked on {0:?}")]
    Weekend(Weekday),

    #[error("time {hour:02}:{minute:02} is not on a 15-minute step")]
    OffGrid { hour: i8, minute: i8 },
}

pub fn validate_slot(slot: &Zoned, now: &Zoned) -> Result<(), SlotError> {
    let today = now.with_time_zone(slot.time_zone().clone()).date();
    let date = slot.date();
    if date < today {
        return Err(SlotError::InPast { date, today });
    }

    let weekday = slot.weekday();
    if matches!(weekday, Weekday::Saturday | Weekday::Sunday) {
        return Err(SlotError::Weekend(weekday));
    }

    if slot.minute() % SLOT_STEP_MINUTES != 0 || slot.second() != 0 || slot.subsec_nanosecond() != 0
    {
        return Err(SlotError::OffGrid {
            hour: slot.hour(),
            minute: slot.minute(),
        });
    }

    if slot.timestamp() < now.timestamp() {
        return Err(SlotError::Elapsed { time: slot.time() });
    }

    Ok(())
}

/// Long human-readable rendering of an attendance date for listings.
pub fn format_attendance_date(date: jiff::Timestamp, tz: &TimeZone) -> String {
    date.to_zoned(tz.clone())
        .strftime("%A, %B %d, %Y at %I:%M %p")
        .to_string()
}

/// Source of "now" for the date rules.
pub trait Clock: Send + Sync {
    fn now(&self) -> Zoned;
}

/// Wall clock in a fixed clinic time zone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    tz: TimeZone,
}

impl SystemClock {
    pub fn new(tz: TimeZone) -> Self {
        Self { tz }
    }

    pub fn time_zone(&self) -> &TimeZone {
        &self.tz
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Zoned::now().with_time_zone(self.tz.clone())
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone)]
pub struct FixedClock(pub Zoned);

impl Clock for FixedClock {
    fn now(&self) -> Zoned {
        self.0.clone()
    }
}
