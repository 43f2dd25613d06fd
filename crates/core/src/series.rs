use crate::sample::Metric;

/// Easing factor for the legend value and the display range.
pub const SMOOTHING: f64 = 0.2;

/// Linear interpolation from `a` toward `b` by fraction `t`.
#[inline]
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Static description of one series: display label, unit suffix and the
/// metric's natural magnitude (drives range padding and grid spacing).
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub name:       String,
    pub unit:       String,
    pub unit_scale: f64,
}

impl SeriesSpec {
    pub fn new(name: impl Into<String>, unit: impl Into<String>, unit_scale: f64) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            unit_scale,
        }
    }

    /// Built-in label, unit and scale for `metric`.
    pub fn default_for(metric: Metric) -> Self {
        match metric {
            Metric::Memory => Self::new("MEMORY", " KB", 1000.0),
            Metric::Cpu    => Self::new("CPU", " %", 5.0),
            Metric::Read   => Self::new("READ", " B", 10_000.0),
            Metric::Write  => Self::new("WRITE", " B", 10_000.0),
        }
    }
}

/// Auto-scaled vertical bounds of the selected series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRange {
    pub min: f64,
    pub max: f64,
}

impl DisplayRange {
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// One metric's full history plus its display and smoothing state.
///
/// `history` is append-only.  `window` is a copy of the slice currently
/// scrolled into view; it is only kept accurate for the selected series.
#[derive(Debug, Clone)]
pub struct Series {
    spec:     SeriesSpec,
    history:  Vec<f64>,
    window:   Vec<f64>,
    smoothed: f64,
    range:    Option<DisplayRange>,
}

impl Series {
    pub fn new(spec: SeriesSpec) -> Self {
        Self {
            spec,
            history:  Vec::new(),
            window:   Vec::new(),
            smoothed: 0.0,
            range:    None,
        }
    }

    pub fn spec(&self) -> &SeriesSpec {
        &self.spec
    }

    /// Replace label, unit and scale without touching any recorded data.
    pub fn set_spec(&mut self, spec: SeriesSpec) {
        self.spec = spec;
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn window(&self) -> &[f64] {
        &self.window
    }

    /// Exponential moving average of pushed values (legend only).
    pub fn smoothed(&self) -> f64 {
        self.smoothed
    }

    /// Current display range; `None` until the first range computation.
    pub fn range(&self) -> Option<DisplayRange> {
        self.range
    }

    /// Append `value` to history.  While the window is still shorter than
    /// `capacity` the value is appended to it directly.
    pub fn push(&mut self, value: f64, capacity: usize) {
        self.history.push(value);
        if self.window.len() < capacity {
            self.window.push(value);
        }
        self.smoothed = lerp(self.smoothed, value, SMOOTHING);
    }

    /// Set the window to `history[start .. start + capacity]`, clamped to the
    /// available samples.
    pub fn reslice(&mut self, start: usize, capacity: usize) {
        let len = self.history.len();
        let from = start.min(len);
        let to = start.saturating_add(capacity).min(len);

        self.window.clear();
        self.window.extend_from_slice(&self.history[from..to]);
    }

    /// Recompute the display range from the window.
    ///
    /// Values are clamped at zero, padded by ten steps above and five below,
    /// and eased toward the new bounds.  The first computation assigns the
    /// padded bounds directly.  An empty window leaves the range unchanged.
    pub fn compute_range(&mut self) {
        let mut clamped = self.window.iter().map(|v| v.max(0.0));
        let Some(first) = clamped.next() else {
            return;
        };
        let (raw_min, raw_max) =
            clamped.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

        let diff = ((raw_max - raw_min) / 100.0).max(self.spec.unit_scale / 8.0);
        let padded = DisplayRange {
            min: raw_min - diff * 5.0,
            max: raw_max + diff * 10.0,
        };

        self.range = Some(match self.range {
            None => padded,
            Some(current) => DisplayRange {
                min: lerp(current.min, padded.min, SMOOTHING),
                max: lerp(current.max, padded.max, SMOOTHING),
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu() -> Series {
        Series::new(SeriesSpec::default_for(Metric::Cpu))
    }

    #[test]
    fn push_fills_window_up_to_capacity() {
        let mut series = cpu();
        for n in 1..=25 {
            series.push(n as f64, 10);
            series.reslice(0, 10);
            assert_eq!(series.history().len(), n);
            assert_eq!(series.window().len(), n.min(10));
        }
    }

    #[test]
    fn fast_path_stops_at_capacity() {
        let mut series = cpu();
        for n in 0..15 {
            series.push(n as f64, 10);
        }
        assert_eq!(series.window(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn reslice_is_idempotent_and_clamped() {
        let mut series = cpu();
        for n in 0..20 {
            series.push(n as f64, 8);
        }

        series.reslice(15, 8);
        let first = series.window().to_vec();
        series.reslice(15, 8);
        assert_eq!(series.window(), first.as_slice());
        assert_eq!(first, vec![15.0, 16.0, 17.0, 18.0, 19.0]);

        series.reslice(40, 8);
        assert!(series.window().is_empty());
    }

    #[test]
    fn first_range_contains_every_clamped_value() {
        let mut series = cpu();
        for v in [3.0, -4.0, 80.0, 12.5, 0.0, 41.0] {
            series.push(v, 10);
        }
        series.compute_range();

        let range = series.range().unwrap();
        for v in series.window() {
            assert!(range.contains(v.max(0.0)), "{v} outside {range:?}");
        }
    }

    #[test]
    fn first_range_is_assigned_not_eased() {
        let mut series = cpu();
        for v in [10.0, 20.0, 30.0] {
            series.push(v, 10);
        }
        series.compute_range();

        // diff = max(20 / 100, 5 / 8) = 0.625
        let range = series.range().unwrap();
        assert!((range.max - (30.0 + 6.25)).abs() < 1e-9);
        assert!((range.min - (10.0 - 3.125)).abs() < 1e-9);
    }

    #[test]
    fn later_ranges_ease_toward_padded_bounds() {
        let mut series = cpu();
        series.push(0.0, 4);
        series.compute_range();
        let before = series.range().unwrap();

        for _ in 0..3 {
            series.push(1000.0, 4);
        }
        series.compute_range();
        let after = series.range().unwrap();

        // padded max = 1000 + 10 * 10 = 1100; eased by 0.2
        let expected = before.max + (1100.0 - before.max) * SMOOTHING;
        assert!((after.max - expected).abs() < 1e-9);
    }

    #[test]
    fn range_of_empty_window_is_untouched() {
        let mut series = cpu();
        series.compute_range();
        assert!(series.range().is_none());
    }

    #[test]
    fn smoothed_converges_monotonically() {
        let mut series = cpu();
        let target = 50.0;
        let mut previous_gap = f64::INFINITY;

        for _ in 0..30 {
            series.push(target, 10);
            let gap = (target - series.smoothed()).abs();
            assert!(gap < previous_gap);
            previous_gap = gap;
        }
        // 50 * 0.8^30 ≈ 0.062
        assert!(previous_gap < 0.1);
    }
}
