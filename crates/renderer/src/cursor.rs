use crate::projection::Projection;
use iced::Point;
use strip_core::series::lerp;

/// Easing factor applied to the readout label each frame.
pub const CURSOR_EASING: f64 = 0.3;

/// Pointer-tracking value readout for the selected series.
///
/// The marker snaps to the sample nearest the pointer; the label follows it
/// with easing.  The eased position survives frames where the projected point
/// is not finite, so a degenerate window freezes the label instead of
/// teleporting it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorReadout {
    label:  Point,
    marker: Option<Point>,
    index:  Option<usize>,
    value:  Option<f64>,
}

impl CursorReadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the readout for this frame.  `pointer_x` is `None` while the
    /// pointer is outside the chart.
    pub fn update(&mut self, projection: &Projection, window: &[f64], pointer_x: Option<f32>) {
        let Some(index) = pointer_x.and_then(|x| projection.cursor_index(x, window.len())) else {
            self.marker = None;
            self.index = None;
            self.value = None;
            return;
        };

        let value = window[index];
        let target = projection.point(index, value);

        self.index = Some(index);
        self.value = Some(value);
        self.marker = Some(target);

        if target.x.is_finite() && target.y.is_finite() {
            self.label = Point::new(
                lerp(f64::from(self.label.x), f64::from(target.x), CURSOR_EASING) as f32,
                lerp(f64::from(self.label.y), f64::from(target.y), CURSOR_EASING) as f32,
            );
        }
    }

    /// Eased anchor of the value label.
    pub fn label(&self) -> Point {
        self.label
    }

    /// Un-eased position of the sample under the pointer.
    pub fn marker(&self) -> Option<Point> {
        self.marker.filter(|p| p.x.is_finite() && p.y.is_finite())
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Raw (unsmoothed) value of the sample under the pointer.
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::Size;
    use strip_core::DisplayRange;

    fn projection(range: DisplayRange) -> Projection {
        Projection::new(Size::new(970.0, 500.0), 100, 0.0, range, 10.0)
    }

    #[test]
    fn label_eases_toward_the_sample() {
        let p = projection(DisplayRange { min: 0.0, max: 100.0 });
        let window = [10.0, 20.0, 40.0];
        let mut readout = CursorReadout::new();

        readout.update(&p, &window, Some(10.0));
        assert_eq!(readout.index(), Some(2));
        assert_eq!(readout.value(), Some(40.0));
        assert_eq!(readout.marker(), Some(Point::new(10.0, 300.0)));
        assert!((readout.label().x - 3.0).abs() < 1e-5);
        assert!((readout.label().y - 90.0).abs() < 1e-4);

        for _ in 0..60 {
            readout.update(&p, &window, Some(10.0));
        }
        assert!((readout.label().y - 300.0).abs() < 1e-2);
    }

    #[test]
    fn non_finite_projection_keeps_label() {
        let good = projection(DisplayRange { min: 0.0, max: 100.0 });
        let flat = projection(DisplayRange { min: 5.0, max: 5.0 });
        let mut readout = CursorReadout::new();

        readout.update(&good, &[50.0, 50.0], Some(0.0));
        let before = readout.label();

        readout.update(&flat, &[7.0, 7.0], Some(0.0));
        assert_eq!(readout.label(), before);
        assert_eq!(readout.marker(), None);
        assert_eq!(readout.value(), Some(7.0));
    }

    #[test]
    fn single_sample_window_tracks_its_only_point() {
        let p = projection(DisplayRange { min: 0.0, max: 100.0 });
        let mut readout = CursorReadout::new();

        readout.update(&p, &[40.0], Some(50.0));
        assert_eq!(readout.index(), Some(0));
        assert_eq!(readout.value(), Some(40.0));
        let marker = readout.marker().expect("finite marker");
        assert_eq!(marker, Point::new(-10.0, 300.0));
        assert!(readout.label().x.is_finite() && readout.label().y.is_finite());
    }

    #[test]
    fn empty_window_or_no_pointer_hides_readout() {
        let p = projection(DisplayRange { min: 0.0, max: 100.0 });
        let mut readout = CursorReadout::new();

        readout.update(&p, &[], Some(0.0));
        assert_eq!(readout.index(), None);

        readout.update(&p, &[1.0], None);
        assert_eq!(readout.marker(), None);
    }
}
