use strip_core::Session;

/// Left margin of the legend and of the first text column.
pub const MARGIN: f32 = 5.0;

/// Rough glyph advance as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.6;

/// One legend line: series name and its smoothed current value.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub name:  String,
    pub value: String,
}

/// Legend rows for every series in metric order, independent of selection.
pub fn rows(session: &Session) -> Vec<LegendRow> {
    session
        .series()
        .iter()
        .map(|series| LegendRow {
            name:  series.spec().name.clone(),
            value: smoothed_text(series.smoothed(), &series.spec().unit),
        })
        .collect()
}

/// `round(value)` followed by the unit suffix.
pub fn smoothed_text(value: f64, unit: &str) -> String {
    format!("{}{unit}", value.round() as i64)
}

/// Raw sample value followed by the unit suffix.
pub fn readout_text(value: f64, unit: &str) -> String {
    format!("{value}{unit}")
}

/// X pixel of the value column, one glyph past the longest name.
pub fn value_column(rows: &[LegendRow], font_size: f32) -> f32 {
    let longest = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    MARGIN + (longest + 1) as f32 * font_size * GLYPH_WIDTH
}
