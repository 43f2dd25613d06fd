pub mod chart;
pub mod legend;

pub use chart::{Chart, ChartState};
pub use legend::LegendRow;
