//! Fixed-period tick scheduling for the event loop

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct IntervalTimer {
    period: Duration,
    next_deadline: Instant,
}

impl IntervalTimer {
    /// Timer whose first deadline is one period after `start`
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next_deadline: start + period,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.next_deadline
    }

    /// Returns true at most once per call once the deadline has passed.
    /// Missed periods are dropped: the next deadline is `now + period`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_deadline {
            return false;
        }
        self.next_deadline = now + self.period;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(200);

    #[test]
    fn test_fires_at_deadline() {
        let start = Instant::now();
        let mut timer = IntervalTimer::new(PERIOD, start);

        assert!(!timer.poll(start));
        assert!(!timer.poll(start + Duration::from_millis(199)));
        assert!(timer.poll(start + PERIOD));
        assert_eq!(timer.deadline(), start + PERIOD * 2);
    }

    #[test]
    fn test_late_poll_fires_once() {
        let start = Instant::now();
        let mut timer = IntervalTimer::new(PERIOD, start);
        let late = start + PERIOD * 5;

        assert!(timer.poll(late));
        assert!(!timer.poll(late));
        assert_eq!(timer.deadline(), late + PERIOD);
    }
}
