use super::*;
use std::sync::{Mutex, PoisonError};
use tracing::trace;

/// A TID generator that never issues the same or a smaller timestamp twice.
///
/// Shared between threads by reference; the last issued timestamp is
/// guarded by a mutex so concurrent callers still observe strictly
/// increasing output, even when called faster than the system clock ticks
/// or when the system clock steps backwards.
#[derive(Debug)]
pub struct Clock {
    id: u16,
    last: Mutex<u64>,
}

impl Clock {
    pub fn new(id: u16) -> Self {
        Self {
            id: id & CLOCK_ID_MASK,
            last: Mutex::new(0),
        }
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    /// Returns a TID for the current time.
    pub fn now(&self) -> String {
        let now = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000;
        self.now_at(u64::try_from(now).unwrap_or(0))
    }

    /// Returns a TID for `micros`, or for one microsecond after the last
    /// issued TID if `micros` is not later than it.
    /// Only the low 53 bits of `micros` are significant.
    pub fn now_at(&self, micros: u64) -> String {
        let micros = micros & TIMESTAMP_MASK;
        let timestamp = {
            let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
            let timestamp = if micros <= *last {
                let next = last.saturating_add(1);
                trace!(
                    "Clock {} not advanced past {}, issuing {next}",
                    self.id,
                    *last
                );
                next
            } else {
                micros
            };
            *last = timestamp;
            timestamp
        };
        create(timestamp, self.id)
    }
}
