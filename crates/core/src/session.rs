use std::collections::VecDeque;

use tracing::{debug, info};

use crate::{
    event::IngestEvent,
    idle::IdleGuard,
    sample::{Metric, Sample},
    series::{Series, SeriesSpec},
    viewport::Viewport,
};

/// Tunables for a [`Session`], normally taken from the `[view]` config section.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Window size before the first resize.
    pub initial_capacity: usize,
    /// Horizontal pixels per slot; capacity = floor(width / slot_width).
    pub slot_width: f32,
    /// All-zero samples pushed at start-up; also the minimum window length
    /// before the display range is computed.
    pub warmup_samples: usize,
    /// How close to the live edge the target must be for auto-follow.
    pub follow_margin: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            initial_capacity: 100,
            slot_width:       20.0,
            warmup_samples:   3,
            follow_margin:    5,
        }
    }
}

/// All per-session chart state: series, viewport, idle tracking and the
/// queue of ingest events waiting for the next frame.
///
/// The session is the single writer of history.  Ingest events are only
/// applied inside [`Session::frame`], so every series receives the same
/// sample in the same frame.
#[derive(Debug, Clone)]
pub struct Session {
    series:   Vec<Series>,
    selected: usize,
    viewport: Viewport,
    idle:     IdleGuard,
    pending:  VecDeque<IngestEvent>,
    settings: SessionSettings,
}

impl Session {
    pub fn new(specs: [SeriesSpec; Metric::COUNT], settings: SessionSettings) -> Self {
        let mut session = Self {
            series:   specs.into_iter().map(Series::new).collect(),
            selected: 0,
            viewport: Viewport::new(settings.initial_capacity),
            idle:     IdleGuard::new(),
            pending:  VecDeque::new(),
            settings,
        };

        for _ in 0..session.settings.warmup_samples {
            session.push(Sample::ZERO);
        }
        session
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> &Series {
        &self.series[self.selected]
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn idle(&self) -> &IdleGuard {
        &self.idle
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Number of ticks recorded so far (identical for every series).
    pub fn history_len(&self) -> usize {
        self.selected().history().len()
    }

    /// Ingest events waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    // ── Ingest ────────────────────────────────────────────────────────────────

    /// Queue an ingest event; it takes effect at the start of the next frame.
    pub fn enqueue(&mut self, event: IngestEvent) {
        self.pending.push_back(event);
    }

    /// Append one aligned tick to every series, then update the idle streak
    /// and auto-follow.
    pub fn push(&mut self, sample: Sample) {
        let capacity = self.viewport.capacity();
        for (series, metric) in self.series.iter_mut().zip(Metric::ALL) {
            series.push(sample.get(metric), capacity);
        }

        self.idle.record(sample.is_zero());

        let selected = &self.series[self.selected];
        self.viewport.auto_follow(
            selected.window().len(),
            selected.history().len(),
            self.settings.follow_margin,
        );
    }

    fn apply(&mut self, event: IngestEvent) {
        match event {
            IngestEvent::Connected => {
                info!("Source connected");
                self.idle.on_connect();
            }
            IngestEvent::Disconnected => {
                if self.idle.connected() {
                    info!("Source disconnected; zero-filling");
                } else {
                    debug!("Connection attempt failed");
                }
                self.idle.on_disconnect();
                self.push(Sample::ZERO);
            }
            IngestEvent::Sample(sample) => self.push(sample),
        }
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    /// One fixed-rate frame: drain queued ingest events, push a filler tick
    /// if idle, ease the viewport (reslicing on slot change), then recompute
    /// the selected series' display range.
    pub fn frame(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            self.apply(event);
        }

        let capacity = self.viewport.capacity();
        if self.idle.should_fill(capacity) {
            self.push(Sample::ZERO);
            if !self.idle.should_fill(capacity) {
                debug!("Idle streak reached {capacity}; chart frozen");
            }
        }

        if let Some(slot) = self.viewport.tick() {
            self.series[self.selected].reslice(slot, capacity);
        }

        let selected = &mut self.series[self.selected];
        if selected.window().len() > self.settings.warmup_samples {
            selected.compute_range();
        }
    }

    // ── User actions ──────────────────────────────────────────────────────────

    /// Scroll by `delta` slots; positive scrolls toward older data.
    pub fn pan(&mut self, delta: i64) {
        let len = self.history_len();
        self.viewport.pan(delta, len);
    }

    /// Select series `index` (clamped).  The newly selected series is
    /// resliced at the current position.  Returns `true` if the selection
    /// changed.
    pub fn select(&mut self, index: usize) -> bool {
        let index = index.min(self.series.len() - 1);
        if index == self.selected {
            return false;
        }

        self.selected = index;
        let (slot, capacity) = (self.viewport.slot(), self.viewport.capacity());
        self.series[index].reslice(slot, capacity);
        true
    }

    pub fn focus_next(&mut self) -> bool {
        self.select(self.selected + 1)
    }

    pub fn focus_previous(&mut self) -> bool {
        self.select(self.selected.saturating_sub(1))
    }

    /// Re-derive the window capacity from the chart width.  Returns `true`
    /// if the capacity changed.
    pub fn resize(&mut self, width: f32) -> bool {
        if !width.is_finite() || width <= 0.0 || self.settings.slot_width <= 0.0 {
            return false;
        }

        let capacity = (width / self.settings.slot_width).floor() as usize;
        let len = self.history_len();
        let before = self.viewport.capacity();
        self.viewport.set_capacity(capacity, len, self.settings.follow_margin);
        if self.viewport.capacity() == before {
            return false;
        }

        debug!("Window capacity {before} → {}", self.viewport.capacity());
        let (slot, capacity) = (self.viewport.slot(), self.viewport.capacity());
        self.series[self.selected].reslice(slot, capacity);
        true
    }

    /// Accept a reconnect request if the source is disconnected, pointing the
    /// viewport back at the live edge.  Returns `true` if a new connection
    /// attempt should be made.
    pub fn request_reconnect(&mut self) -> bool {
        if self.idle.connected() {
            return false;
        }
        let len = self.history_len();
        self.viewport.follow_live_edge(len);
        true
    }

    /// Replace labels, units and scales (e.g. after a config reload).
    pub fn set_specs(&mut self, specs: [SeriesSpec; Metric::COUNT]) {
        for (series, spec) in self.series.iter_mut().zip(specs) {
            series.set_spec(spec);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Metric::ALL.map(SeriesSpec::default_for), SessionSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(capacity: usize) -> Session {
        Session::new(
            Metric::ALL.map(SeriesSpec::default_for),
            SessionSettings {
                initial_capacity: capacity,
                warmup_samples: 0,
                ..SessionSettings::default()
            },
        )
    }

    fn live(value: f64) -> Sample {
        Sample { memory: value, cpu: value, read: value, write: value }
    }

    #[test]
    fn warmup_pushes_zero_ticks() {
        let session = Session::default();
        assert_eq!(session.history_len(), 3);
        assert_eq!(session.idle().zero_streak(), 3);
    }

    #[test]
    fn pushes_stay_aligned_across_series() {
        let mut session = session(10);
        session.push(Sample { memory: 1.0, cpu: 2.0, read: 3.0, write: 4.0 });
        session.push(Sample { memory: 5.0, cpu: 6.0, read: 7.0, write: 8.0 });

        for series in session.series() {
            assert_eq!(series.history().len(), 2);
        }
        assert_eq!(session.series()[Metric::Read.index()].history(), &[3.0, 7.0]);
    }

    #[test]
    fn idle_fill_stops_after_one_window() {
        let mut session = session(100);
        for _ in 0..150 {
            session.frame();
        }
        assert_eq!(session.idle().zero_streak(), 100);
        assert_eq!(session.history_len(), 100);
    }

    #[test]
    fn live_sample_after_disconnect_resets_streak() {
        let mut session = session(100);
        session.enqueue(IngestEvent::Connected);
        session.frame();
        session.push(live(4.0));
        session.push(live(5.0));

        session.enqueue(IngestEvent::Disconnected);
        session.frame();
        let before = session.history_len();
        assert!(session.idle().zero_streak() > 0);

        session.push(live(9.0));
        assert_eq!(session.idle().zero_streak(), 0);
        assert_eq!(session.history_len(), before + 1);
        assert_eq!(&session.selected().history()[..2], &[4.0, 5.0]);
        assert_eq!(session.selected().history().last(), Some(&9.0));
    }

    #[test]
    fn disconnect_pushes_a_zero_tick_immediately() {
        let mut session = session(100);
        session.enqueue(IngestEvent::Connected);
        session.frame();
        session.push(live(7.0));

        session.enqueue(IngestEvent::Disconnected);
        session.frame();
        // one tick from the disconnect, one filler tick from the frame
        assert_eq!(session.selected().history(), &[7.0, 0.0, 0.0]);
    }

    #[test]
    fn ingest_is_deferred_until_frame() {
        let mut session = session(100);
        session.enqueue(IngestEvent::Connected);
        session.enqueue(IngestEvent::Sample(live(1.0)));
        assert_eq!(session.history_len(), 0);
        assert_eq!(session.pending(), 2);

        session.frame();
        assert_eq!(session.pending(), 0);
        assert_eq!(session.history_len(), 1);
        assert!(session.idle().connected());
    }

    #[test]
    fn pan_from_live_edge() {
        let mut session = session(50);
        session.enqueue(IngestEvent::Connected);
        session.frame();
        for i in 0..100 {
            session.push(live(i as f64 * 10.0));
        }
        assert_eq!(session.viewport().target(), 50);

        session.pan(10);
        assert_eq!(session.viewport().target(), 40);
    }

    #[test]
    fn frames_scroll_the_selected_window() {
        let mut session = session(10);
        session.enqueue(IngestEvent::Connected);
        session.frame();
        for i in 0..30 {
            session.push(live(i as f64));
        }
        for _ in 0..100 {
            session.frame();
        }

        assert_eq!(session.viewport().slot(), 20);
        assert_eq!(session.selected().window().first(), Some(&20.0));
        assert_eq!(session.selected().window().len(), 10);
        assert!(session.selected().range().is_some());
    }

    #[test]
    fn focus_switch_reslices_new_series() {
        let mut session = session(10);
        session.enqueue(IngestEvent::Connected);
        session.frame();
        for i in 0..30 {
            session.push(Sample { cpu: i as f64, ..Sample::ZERO });
        }
        for _ in 0..100 {
            session.frame();
        }

        assert!(session.focus_next());
        assert_eq!(session.selected_index(), Metric::Cpu.index());
        assert_eq!(session.selected().window().first(), Some(&20.0));
    }

    #[test]
    fn focus_is_clamped_not_wrapped() {
        let mut session = session(10);
        assert!(!session.focus_previous());
        assert_eq!(session.selected_index(), 0);

        for _ in 0..10 {
            session.focus_next();
        }
        assert_eq!(session.selected_index(), Metric::COUNT - 1);
    }

    #[test]
    fn resize_rederives_capacity_and_reslices() {
        let mut session = session(10);
        for i in 0..8 {
            session.push(live(i as f64));
        }

        assert!(session.resize(100.0));
        assert_eq!(session.viewport().capacity(), 5);
        assert_eq!(session.selected().window().len(), 5);
        assert!(!session.resize(110.0));
        assert!(!session.resize(f32::NAN));
    }

    #[test]
    fn shrinking_while_pinned_keeps_following() {
        let mut session = session(50);
        session.enqueue(IngestEvent::Connected);
        session.frame();
        for i in 0..100 {
            session.push(live(i as f64));
        }
        for _ in 0..100 {
            session.frame();
        }
        assert_eq!(session.viewport().target(), 50);

        assert!(session.resize(400.0));
        assert_eq!(session.viewport().capacity(), 20);
        for i in 100..150 {
            session.push(live(i as f64));
            session.frame();
        }

        let len = session.history_len();
        assert_eq!(session.viewport().target(), session.viewport().max_target(len));
        for _ in 0..100 {
            session.frame();
        }
        assert_eq!(session.selected().window().last(), Some(&149.0));
    }

    #[test]
    fn reconnect_only_while_disconnected() {
        let mut session = session(10);
        for i in 0..30 {
            session.push(live(i as f64));
        }
        session.pan(15);
        assert!(session.request_reconnect());
        assert_eq!(session.viewport().target(), 20);

        session.enqueue(IngestEvent::Connected);
        session.frame();
        assert!(!session.request_reconnect());
    }
}
