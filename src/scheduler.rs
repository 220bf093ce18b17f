use std::time::{Duration, Instant};

/// Single-timer debouncer
///
/// Every `schedule` call replaces the pending timer, so a burst of events
/// fires once, for the last key, `delay` after the last event.
#[derive(Debug, Clone)]
pub struct Debouncer<K> {
    delay: Duration,
    pending: Option<(K, Instant)>,
}

impl<K> Debouncer<K> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Reset the timer to fire for `key` at `now + delay`
    pub fn schedule(&mut self, key: K, now: Instant) {
        self.pending = Some((key, now + self.delay));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Time left until the timer fires, if one is pending
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }

    /// Take the pending key once its deadline has passed
    pub fn due(&mut self, now: Instant) -> Option<K> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(key, _)| key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(50);

    #[test]
    fn test_fires_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule("MAIN.ls", start);

        assert_eq!(debouncer.due(start + Duration::from_millis(49)), None);
        assert_eq!(debouncer.due(start + DELAY), Some("MAIN.ls"));
        assert_eq!(debouncer.due(start + DELAY * 2), None);
    }

    #[test]
    fn test_burst_coalesces_into_last_event() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule("A.ls", start);
        debouncer.schedule("B.ls", start + Duration::from_millis(30));

        // first deadline passed, but the timer was reset
        assert_eq!(debouncer.due(start + Duration::from_millis(60)), None);
        assert_eq!(debouncer.due(start + Duration::from_millis(80)), Some("B.ls"));
    }

    #[test]
    fn test_cancel_and_remaining() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        assert_eq!(debouncer.remaining(start), None);

        debouncer.schedule(1, start);
        assert_eq!(debouncer.remaining(start + Duration::from_millis(20)), Some(Duration::from_millis(30)));
        assert_eq!(debouncer.remaining(start + Duration::from_secs(1)), Some(Duration::ZERO));

        debouncer.cancel();
        assert_eq!(debouncer.remaining(start), None);
        assert_eq!(debouncer.due(start + DELAY), None);
    }
}
