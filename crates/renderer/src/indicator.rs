use iced::Point;

/// Distance of the indicator centre from the top-right corner, both axes.
pub const INSET: f32 = 30.0;
/// Radius of the indicator and of its click target.
pub const RADIUS: f32 = 25.0;

/// Connectivity indicator in the top-right corner of the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    pub center: Point,
    pub radius: f32,
}

impl Indicator {
    pub fn for_width(width: f32) -> Self {
        Self {
            center: Point::new(width - INSET, INSET),
            radius: RADIUS,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Solid while connected; while disconnected only when hovered, hinting
    /// that a click reconnects.
    pub fn is_filled(connected: bool, hovered: bool) -> bool {
        connected || hovered
    }
}
