//! Trailing-edge debounce for the search box.

use std::time::{Duration, Instant};

/// Holds the latest value until `delay` passes without another push.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace the pending value and restart the delay.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, d)| *d)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn fires_after_quiet_period() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.push("par", start);

        assert_eq!(d.poll(start + Duration::from_millis(299)), None);
        assert_eq!(d.poll(start + DELAY), Some("par"));
        assert!(!d.is_pending());
        assert_eq!(d.poll(start + DELAY * 2), None);
    }

    #[test]
    fn each_push_restarts_the_delay() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.push("p", start);
        d.push("pa", start + Duration::from_millis(200));
        d.push("par", start + Duration::from_millis(400));

        assert_eq!(d.poll(start + Duration::from_millis(650)), None);
        assert_eq!(d.poll(start + Duration::from_millis(700)), Some("par"));
    }

    #[test]
    fn zero_delay_fires_immediately() {
        let now = Instant::now();
        let mut d = Debouncer::new(Duration::ZERO);
        d.push(1, now);
        assert_eq!(d.poll(now), Some(1));
    }

    #[test]
    fn cancel_drops_pending_value() {
        let now = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.push(1, now);
        assert_eq!(d.deadline(), Some(now + DELAY));
        d.cancel();
        assert_eq!(d.poll(now + DELAY), None);
    }
}
