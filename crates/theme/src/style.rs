use crate::colors::Color;

/// Colours derived from one series' base colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    /// Translucent, darker fill under the curve.
    pub fill: Color,
    /// Full-intensity curve, point markers and cursor label.
    pub stroke: Color,
    /// Dim grid lines behind the curve.
    pub grid: Color,
}

impl SeriesStyle {
    pub fn from_base(base: Color) -> Self {
        Self {
            fill:   base.darkened(3.0).with_alpha(150.0 / 255.0),
            stroke: base.with_alpha(1.0),
            grid:   base.darkened(5.0).with_alpha(200.0 / 255.0),
        }
    }
}
