/// Tracks connectivity and consecutive all-zero ticks.
///
/// While disconnected the session synthesises one zero tick per frame until
/// a full window of zeros has been pushed, then the chart freezes until the
/// next connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdleGuard {
    zero_streak: usize,
    connected:   bool,
}

impl IdleGuard {
    /// Starts disconnected; the first connection attempt is still pending.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn zero_streak(&self) -> usize {
        self.zero_streak
    }

    pub fn on_connect(&mut self) {
        self.zero_streak = 0;
        self.connected = true;
    }

    pub fn on_disconnect(&mut self) {
        self.connected = false;
    }

    /// Count a pushed tick: all-zero extends the streak, anything else resets it.
    pub fn record(&mut self, all_zero: bool) {
        if all_zero {
            self.zero_streak += 1;
        } else {
            self.zero_streak = 0;
        }
    }

    /// Whether this frame should push a filler tick.
    pub fn should_fill(&self, capacity: usize) -> bool {
        !self.connected && self.zero_streak < capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_until_streak_reaches_capacity() {
        let mut guard = IdleGuard::new();
        let mut filled = 0;
        for _ in 0..150 {
            if guard.should_fill(100) {
                guard.record(true);
                filled += 1;
            }
        }
        assert_eq!(filled, 100);
        assert_eq!(guard.zero_streak(), 100);
    }

    #[test]
    fn non_zero_tick_resets_streak() {
        let mut guard = IdleGuard::new();
        guard.record(true);
        guard.record(true);
        guard.record(false);
        assert_eq!(guard.zero_streak(), 0);
    }

    #[test]
    fn connecting_stops_filling() {
        let mut guard = IdleGuard::new();
        guard.record(true);
        guard.on_connect();
        assert!(guard.connected());
        assert_eq!(guard.zero_streak(), 0);
        assert!(!guard.should_fill(100));

        guard.on_disconnect();
        assert!(guard.should_fill(100));
    }
}
