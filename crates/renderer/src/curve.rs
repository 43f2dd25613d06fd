use iced::Point;

/// One step of an outline path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo(Point),
    LineTo(Point),
    CurveTo { control_a: Point, control_b: Point, to: Point },
}

impl Segment {
    /// End point of the segment.
    pub fn end(&self) -> Point {
        match *self {
            Segment::MoveTo(p) | Segment::LineTo(p) => p,
            Segment::CurveTo { to, .. } => to,
        }
    }
}

/// Uniform Catmull-Rom spline through `points`, expressed as cubic Bézier
/// segments.  The first point is assumed to be the current pen position, so
/// the result holds `points.len() - 1` segments.  End points are duplicated
/// to act as their own neighbours.
pub fn catmull_rom(points: &[Point]) -> Vec<Segment> {
    if points.len() < 2 {
        return Vec::new();
    }

    let last = points.len() - 1;
    (0..last)
        .map(|i| {
            let p0 = points[i.saturating_sub(1)];
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = points[(i + 2).min(last)];

            Segment::CurveTo {
                control_a: Point::new(p1.x + (p2.x - p0.x) / 6.0, p1.y + (p2.y - p0.y) / 6.0),
                control_b: Point::new(p2.x - (p3.x - p1.x) / 6.0, p2.y - (p3.y - p1.y) / 6.0),
                to:        p2,
            }
        })
        .collect()
}
