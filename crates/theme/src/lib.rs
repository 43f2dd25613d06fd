pub mod colors;
pub mod style;

pub use colors::Color;
pub use style::SeriesStyle;

use strip_config::StripConfig;
use strip_core::Metric;

/// Compiled theme derived from [`StripConfig`].
///
/// All colors are pre-parsed from hex strings into normalised `[0, 1]` RGBA.
/// Calling [`Theme::from_config`] is infallible; invalid color strings fall
/// back to safe defaults.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background:   Color,
    pub foreground:   Color,
    pub font_size:    f32,
    pub line_width:   f32,
    pub grid_width:   f32,
    pub point_radius: f32,
    /// One palette per series, in [`Metric::ALL`] order.
    pub series:       [SeriesStyle; Metric::COUNT],
}

impl Theme {
    /// Build a [`Theme`] from the config file's `[theme]` and `[series.*]` sections.
    pub fn from_config(cfg: &StripConfig) -> Self {
        let theme = &cfg.theme;
        Self {
            background:   Color::from_hex(&theme.background).unwrap_or(Color::BLACK),
            foreground:   Color::from_hex(&theme.foreground).unwrap_or(Color::WHITE),
            font_size:    theme.font_size,
            line_width:   theme.line_width,
            grid_width:   theme.grid_width,
            point_radius: theme.point_radius,
            series: Metric::ALL.map(|metric| {
                let base = Color::from_hex(cfg.series_color(metric)).unwrap_or(Color::CYAN);
                SeriesStyle::from_base(base)
            }),
        }
    }

    pub fn series(&self, index: usize) -> &SeriesStyle {
        &self.series[index.min(Metric::COUNT - 1)]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&StripConfig::default())
    }
}
