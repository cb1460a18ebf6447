use std::time::{Duration, Instant};

/// Fixed-period driver for the engine's countdown
///
/// The clock never runs on its own thread; the owner asks how many ticks are due.
#[derive(Debug, Clone)]
pub struct Clock {
    period: Duration,
    next_due: Option<Instant>,
}

impl Clock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Start (or restart) the schedule; any previous schedule is discarded
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Count the ticks that elapsed up to `now` and advance the schedule past them
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        let mut ticks = 0;
        while due <= now {
            ticks += 1;
            due += self.period;
        }
        self.next_due = Some(due);
        ticks
    }
}
