use serde::{Deserialize, Serialize};
use std::time::Duration;
use strip_core::{Metric, SeriesSpec, SessionSettings};

/// Root configuration structure parsed from `strip.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// Where samples come from.
    pub source: SourceConfig,
    /// Frame rate, slot geometry and viewport behaviour.
    pub view: ViewConfig,
    /// Per-metric label / unit / scale / colour overrides.
    pub series: SeriesTable,
    /// Theme / visual settings.
    pub theme: ThemeConfig,
}

impl StripConfig {
    /// Resolved label, unit and scale for every series, in [`Metric::ALL`] order.
    pub fn series_specs(&self) -> [SeriesSpec; Metric::COUNT] {
        Metric::ALL.map(|metric| self.series.get(metric).resolve(metric))
    }

    /// Base colour (hex) for `metric`.
    pub fn series_color(&self, metric: Metric) -> &str {
        self.series
            .get(metric)
            .color
            .as_deref()
            .unwrap_or_else(|| default_color(metric))
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            initial_capacity: self.view.initial_capacity,
            slot_width:       self.view.slot_width,
            warmup_samples:   self.view.warmup_samples,
            follow_margin:    self.view.follow_margin,
        }
    }
}

/// Live data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// WebSocket URL of the sample feed.
    pub url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8889".to_string(),
        }
    }
}

/// Chart timing and geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Frames per second of the render / filler loop.
    pub frame_rate: u32,
    /// Horizontal pixels per sample slot.
    pub slot_width: f32,
    /// Window size used until the chart is first laid out.
    pub initial_capacity: usize,
    /// Zero samples pushed at start-up.
    pub warmup_samples: usize,
    /// Auto-follow engages while the view is within this many samples of the live edge.
    pub follow_margin: usize,
}

impl ViewConfig {
    /// Time between frames (a zero frame rate is treated as 1 fps).
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            frame_rate:       30,
            slot_width:       20.0,
            initial_capacity: 100,
            warmup_samples:   3,
            follow_margin:    5,
        }
    }
}

/// One `[series.<metric>]` table per metric.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesTable {
    pub memory: SeriesConfig,
    pub cpu:    SeriesConfig,
    pub read:   SeriesConfig,
    pub write:  SeriesConfig,
}

impl SeriesTable {
    pub fn get(&self, metric: Metric) -> &SeriesConfig {
        match metric {
            Metric::Memory => &self.memory,
            Metric::Cpu    => &self.cpu,
            Metric::Read   => &self.read,
            Metric::Write  => &self.write,
        }
    }
}

/// Per-series overrides; unset fields fall back to the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SeriesConfig {
    /// Legend label, e.g. `"MEMORY"`.
    pub label: Option<String>,
    /// Unit suffix appended to values, e.g. `" KB"`.
    pub unit: Option<String>,
    /// Natural magnitude of the metric (range padding and grid spacing).
    pub scale: Option<f64>,
    /// Base colour (hex, e.g. `"#00ffff"`).
    pub color: Option<String>,
}

impl SeriesConfig {
    fn resolve(&self, metric: Metric) -> SeriesSpec {
        let base = SeriesSpec::default_for(metric);
        SeriesSpec {
            name:       self.label.clone().unwrap_or(base.name),
            unit:       self.unit.clone().unwrap_or(base.unit),
            unit_scale: self.scale.filter(|s| s.is_finite() && *s > 0.0).unwrap_or(base.unit_scale),
        }
    }
}

fn default_color(metric: Metric) -> &'static str {
    match metric {
        Metric::Memory => "#00ffff",
        Metric::Cpu    => "#0080ff",
        Metric::Read   => "#00ff00",
        Metric::Write  => "#ff0000",
    }
}

/// Theme / styling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Window background colour (hex).
    pub background: String,
    /// Indicator and cursor marker colour (hex).
    pub foreground: String,
    /// Legend and cursor label size in points.
    pub font_size: f32,
    /// Stroke width of the area curve.
    pub line_width: f32,
    /// Stroke width of grid lines.
    pub grid_width: f32,
    /// Radius of the per-sample point markers.
    pub point_radius: f32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background:   "#000000".to_string(),
            foreground:   "#ffffff".to_string(),
            font_size:    40.0,
            line_width:   5.0,
            grid_width:   2.0,
            point_radius: 3.75,
        }
    }
}
