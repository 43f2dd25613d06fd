use crate::series::lerp;

/// Easing factor applied to `position` on every frame.
pub const SCROLL_EASING: f64 = 0.3;

/// Distance (in slots) under which `position` snaps onto `target`.
const SNAP_DISTANCE: f64 = 1e-3;

/// Smallest window the projector can lay out (`capacity - 3` slots wide).
pub const MIN_CAPACITY: usize = 5;

/// Scroll state shared by every series.
///
/// `target` is where the view wants to be; `position` eases toward it each
/// frame so scrolling animates instead of jumping.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    position: f64,
    target:   usize,
    capacity: usize,
}

impl Viewport {
    pub fn new(capacity: usize) -> Self {
        Self {
            position: 0.0,
            target:   0,
            capacity: capacity.max(MIN_CAPACITY),
        }
    }

    /// Fractional left edge of the window, in samples.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Index of the first sample in the window (`floor(position)`).
    pub fn slot(&self) -> usize {
        self.position.floor() as usize
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Number of visible slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Highest valid target for a history of `history_len` samples.
    pub fn max_target(&self, history_len: usize) -> usize {
        history_len.saturating_sub(self.capacity)
    }

    /// Advance `target` by one when the window is full and the target sits
    /// within `margin` samples of the live edge.  Returns `true` if it moved.
    pub fn auto_follow(&mut self, window_len: usize, history_len: usize, margin: usize) -> bool {
        if window_len < self.capacity {
            return false;
        }
        let behind = history_len.saturating_sub(window_len);
        if self.target + margin < behind {
            return false;
        }

        let next = (self.target + 1).min(self.max_target(history_len));
        let moved = next != self.target;
        self.target = next;
        moved
    }

    /// Scroll by `delta` slots; positive scrolls toward older data.
    pub fn pan(&mut self, delta: i64, history_len: usize) {
        let max = self.max_target(history_len) as i64;
        self.target = (self.target as i64 - delta).clamp(0, max) as usize;
    }

    /// Jump the target to the newest full window.
    pub fn follow_live_edge(&mut self, history_len: usize) {
        self.target = self.max_target(history_len);
    }

    /// Change the window size (at least [`MIN_CAPACITY`]).  A target within
    /// `margin` samples of the old live edge moves to the new live edge so
    /// auto-follow keeps running; any other target is only clamped.
    pub fn set_capacity(&mut self, capacity: usize, history_len: usize, margin: usize) {
        let pinned = self.target + margin >= self.max_target(history_len);
        self.capacity = capacity.max(MIN_CAPACITY);

        let max = self.max_target(history_len);
        self.target = if pinned { max } else { self.target.min(max) };
    }

    /// Ease `position` toward `target`.  Returns the new slot when the floored
    /// position changed, i.e. when the selected window must be resliced.
    pub fn tick(&mut self) -> Option<usize> {
        let target = self.target as f64;
        if self.position == target {
            return None;
        }

        let before = self.slot();
        self.position = lerp(self.position, target, SCROLL_EASING);
        if (target - self.position).abs() < SNAP_DISTANCE {
            self.position = target;
        }

        let after = self.slot();
        (after != before).then_some(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Viewport pinned to the live edge of `history_len` samples.
    fn pinned(capacity: usize, history_len: usize) -> Viewport {
        let mut viewport = Viewport::new(capacity);
        for len in capacity + 1..=history_len {
            viewport.auto_follow(capacity, len, 5);
        }
        viewport
    }

    #[test]
    fn follows_live_edge_while_window_full() {
        let viewport = pinned(50, 100);
        assert_eq!(viewport.target(), 50);
    }

    #[test]
    fn does_not_follow_while_filling() {
        let mut viewport = Viewport::new(50);
        assert!(!viewport.auto_follow(30, 30, 5));
        assert!(!viewport.auto_follow(50, 50, 5));
        assert_eq!(viewport.target(), 0);
    }

    #[test]
    fn pan_toward_older_data() {
        let mut viewport = pinned(50, 100);
        viewport.pan(10, 100);
        assert_eq!(viewport.target(), 40);
    }

    #[test]
    fn pan_is_clamped_both_ways() {
        let mut viewport = pinned(50, 100);
        viewport.pan(500, 100);
        assert_eq!(viewport.target(), 0);
        viewport.pan(-500, 100);
        assert_eq!(viewport.target(), 50);
    }

    #[test]
    fn panning_away_disengages_follow() {
        let mut viewport = pinned(50, 100);
        viewport.pan(20, 100);
        assert!(!viewport.auto_follow(50, 101, 5));
        assert_eq!(viewport.target(), 30);

        viewport.pan(-18, 101);
        assert!(viewport.auto_follow(50, 102, 5));
    }

    #[test]
    fn tick_eases_and_reports_slot_changes() {
        let mut viewport = pinned(10, 20);
        assert_eq!(viewport.tick(), Some(3)); // 0 → 3.0
        assert!((viewport.position() - 3.0).abs() < 1e-9);

        let mut slots = vec![3];
        slots.extend((0..100).filter_map(|_| viewport.tick()));
        assert_eq!(slots, vec![3, 5, 6, 7, 8, 9, 10]);
        assert_eq!(viewport.position(), 10.0);
        assert_eq!(viewport.slot(), 10);
    }

    #[test]
    fn tick_settles_exactly_on_target() {
        let mut viewport = pinned(10, 60);
        for _ in 0..200 {
            viewport.tick();
        }
        assert_eq!(viewport.position(), viewport.target() as f64);
        assert_eq!(viewport.tick(), None);
    }

    #[test]
    fn capacity_has_a_floor_and_clamps_target() {
        let mut viewport = pinned(50, 100);
        viewport.set_capacity(80, 100, 5);
        assert_eq!(viewport.target(), 20);

        viewport.set_capacity(1, 100, 5);
        assert_eq!(viewport.capacity(), MIN_CAPACITY);
    }

    #[test]
    fn shrinking_while_pinned_moves_to_new_live_edge() {
        let mut viewport = pinned(50, 100);
        viewport.set_capacity(20, 100, 5);
        assert_eq!(viewport.target(), 80);
        assert!(viewport.auto_follow(20, 101, 5));
        assert_eq!(viewport.target(), 81);
    }

    #[test]
    fn resizing_after_panning_away_only_clamps() {
        let mut viewport = pinned(50, 100);
        viewport.pan(30, 100);
        viewport.set_capacity(20, 100, 5);
        assert_eq!(viewport.target(), 20);

        viewport.set_capacity(90, 100, 5);
        assert_eq!(viewport.target(), 10);
    }
}
