use crate::curve::{catmull_rom, Segment};
use iced::{Point, Size};
use strip_core::{DisplayRange, Session};

/// Range used before the selected series has computed one.
pub const INITIAL_RANGE: DisplayRange = DisplayRange { min: 0.0, max: 10_000.0 };

/// Slots hidden at the edges of the chart; the first sample sits one slot
/// left of the origin and the last ones run past the right edge.
const HIDDEN_SLOTS: usize = 3;

/// Maps (window index, value) pairs of the selected series onto canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub width:          f32,
    pub height:         f32,
    /// Horizontal pixels per slot.
    pub slot_width:     f32,
    /// Vertical pixels per value unit.
    pub vertical_scale: f64,
    /// Horizontal scroll offset, `-(position mod 1) * slot_width`.
    pub offset:         f32,
    pub range:          DisplayRange,
    pub unit_scale:     f64,
}

impl Projection {
    pub fn new(
        size: Size,
        capacity: usize,
        position: f64,
        range: DisplayRange,
        unit_scale: f64,
    ) -> Self {
        let slot_width = size.width / capacity.saturating_sub(HIDDEN_SLOTS).max(1) as f32;
        Self {
            width:          size.width,
            height:         size.height,
            slot_width,
            vertical_scale: f64::from(size.height) / range.span(),
            offset:         -(position.rem_euclid(1.0) as f32) * slot_width,
            range,
            unit_scale,
        }
    }

    /// Projection for the session's selected series at its current scroll
    /// position.
    pub fn for_session(session: &Session, size: Size) -> Self {
        let series = session.selected();
        let viewport = session.viewport();
        Self::new(
            size,
            viewport.capacity(),
            viewport.position(),
            series.range().unwrap_or(INITIAL_RANGE),
            series.spec().unit_scale,
        )
    }

    /// X pixel of window index `index`.
    pub fn x(&self, index: usize) -> f32 {
        self.offset + self.slot_width * (index as f32 - 1.0)
    }

    /// Y pixel of `value`; larger values sit higher.
    pub fn y(&self, value: f64) -> f32 {
        (f64::from(self.height) - (value - self.range.min) * self.vertical_scale) as f32
    }

    pub fn point(&self, index: usize, value: f64) -> Point {
        Point::new(self.x(index), self.y(value))
    }

    /// Y pixels of the horizontal grid lines, one every `unit_scale` in value
    /// space (at least 2 px apart), phased so they stay on round values.
    pub fn horizontal_grid(&self) -> Vec<f32> {
        let step = (self.unit_scale * self.vertical_scale).max(2.0);
        let height = f64::from(self.height);
        let start = (height + self.range.min * self.vertical_scale).rem_euclid(step);
        if !step.is_finite() || !start.is_finite() {
            return Vec::new();
        }

        std::iter::successors(Some(start), |y| Some(y + step))
            .take_while(|y| *y < height)
            .map(|y| y as f32)
            .collect()
    }

    /// X pixels of the vertical grid lines, one per slot, shifted with the
    /// fractional scroll position.
    pub fn vertical_grid(&self) -> Vec<f32> {
        if !self.slot_width.is_finite() || self.slot_width <= 0.0 {
            return Vec::new();
        }

        (0..)
            .map(|k| k as f32 * self.slot_width)
            .take_while(|x| *x < self.width)
            .map(|x| x + self.offset)
            .collect()
    }

    /// Closed outline of the area under `window`: up from below the canvas,
    /// along a smooth curve through every sample, and back down past the
    /// right edge.  Empty when the window is empty or any coordinate is not
    /// finite.
    pub fn area(&self, window: &[f64]) -> Vec<Segment> {
        let points = self.points(window);
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Vec::new();
        };

        let baseline = self.height * 2.0;
        let left = self.x(0);
        let right = self.x(window.len() + 1);

        let mut outline = vec![
            Segment::MoveTo(Point::new(left, baseline)),
            Segment::LineTo(*first),
        ];
        outline.extend(catmull_rom(&points));
        outline.push(Segment::LineTo(Point::new(right, last.y)));
        outline.push(Segment::LineTo(Point::new(right, baseline)));
        outline
    }

    /// Marker positions for every sample in `window`, or nothing if any is not
    /// finite.
    pub fn points(&self, window: &[f64]) -> Vec<Point> {
        let points: Vec<Point> = window
            .iter()
            .enumerate()
            .map(|(i, v)| self.point(i, *v))
            .collect();

        if points.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
            points
        } else {
            Vec::new()
        }
    }

    /// Window index nearest to the pointer's x pixel.
    pub fn cursor_index(&self, pointer_x: f32, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }

        let raw = ((pointer_x - self.offset) / self.slot_width).round() + 1.0;
        if !raw.is_finite() {
            return None;
        }
        Some(raw.clamp(0.0, (len - 1) as f32) as usize)
    }
}
