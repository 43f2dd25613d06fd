use crate::legend::{self, LegendRow};
use iced::{
    alignment,
    mouse,
    widget::canvas::{self, Action, Canvas, Event, Frame, Geometry, Path, Stroke, Text},
    Element, Length, Point, Rectangle, Renderer, Size, Vector,
};
use strip_core::{event::Message, Session};
use strip_renderer::{CursorReadout, Indicator, Projection, Segment};
use strip_theme::Theme;

/// Pixels per wheel "line" for devices that report line deltas.
const PIXELS_PER_LINE: f32 = 100.0;
/// Wheel pixels per scrolled slot.
const PIXELS_PER_SLOT: f32 = 10.0;
/// Radius of the marker under the pointer.
const CURSOR_MARKER_RADIUS: f32 = 7.5;
/// Gap between the cursor marker and its label.
const LABEL_LIFT: f32 = 10.0;

/// The strip chart: grid, smoothed area of the selected series, pointer
/// readout, legend and connectivity indicator, all on one canvas.
pub struct Chart<'a> {
    session: &'a Session,
    theme:   &'a Theme,
    readout: &'a CursorReadout,
}

/// Canvas-local state: last seen bounds and whether the pointer is inside.
#[derive(Debug, Default)]
pub struct ChartState {
    size:           Option<Size>,
    pointer_inside: bool,
}

impl<'a> Chart<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme, readout: &'a CursorReadout) -> Self {
        Self { session, theme, readout }
    }

    pub fn view(self) -> Element<'a, Message> {
        Canvas::new(self)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn connected(&self) -> bool {
        self.session.idle().connected()
    }

    // ── Drawing passes ────────────────────────────────────────────────────────

    fn draw_grid(&self, frame: &mut Frame, projection: &Projection) {
        let style = self.theme.series(self.session.selected_index());
        let stroke = Stroke::default()
            .with_color(style.grid.to_iced())
            .with_width(self.theme.grid_width);

        for y in projection.horizontal_grid() {
            frame.stroke(&Path::line(Point::new(0.0, y), Point::new(projection.width, y)), stroke);
        }
        for x in projection.vertical_grid() {
            frame.stroke(&Path::line(Point::new(x, 0.0), Point::new(x, projection.height)), stroke);
        }
    }

    fn draw_area(&self, frame: &mut Frame, projection: &Projection) {
        let style = self.theme.series(self.session.selected_index());
        let window = self.session.selected().window();

        let outline = projection.area(window);
        if outline.is_empty() {
            return;
        }

        let path = outline_path(&outline);
        frame.fill(&path, style.fill.to_iced());
        frame.stroke(
            &path,
            Stroke::default()
                .with_color(style.stroke.to_iced())
                .with_width(self.theme.line_width),
        );

        for point in projection.points(window) {
            frame.fill(&Path::circle(point, self.theme.point_radius), style.stroke.to_iced());
        }
    }

    fn draw_readout(&self, frame: &mut Frame) {
        let style = self.theme.series(self.session.selected_index());

        if let Some(marker) = self.readout.marker() {
            frame.stroke(
                &Path::circle(marker, CURSOR_MARKER_RADIUS),
                Stroke::default()
                    .with_color(style.stroke.to_iced())
                    .with_width(self.theme.line_width / 2.0),
            );
        }

        let Some(value) = self.readout.value() else {
            return;
        };
        let unit = &self.session.selected().spec().unit;
        frame.fill_text(Text {
            content:  legend::readout_text(value, unit),
            position: self.readout.label() - Vector::new(0.0, LABEL_LIFT),
            color:    style.stroke.to_iced(),
            size:     self.theme.font_size.into(),
            align_x:  alignment::Horizontal::Center.into(),
            align_y:  alignment::Vertical::Bottom,
            ..Text::default()
        });
    }

    fn draw_legend(&self, frame: &mut Frame) {
        let rows = legend::rows(self.session);
        let value_x = legend::value_column(&rows, self.theme.font_size);

        for (i, LegendRow { name, value }) in rows.into_iter().enumerate() {
            let color = self.theme.series(i).stroke.to_iced();
            let y = legend::MARGIN + i as f32 * self.theme.font_size;

            for (content, x) in [(name, legend::MARGIN), (value, value_x)] {
                frame.fill_text(Text {
                    content,
                    position: Point::new(x, y),
                    color,
                    size: self.theme.font_size.into(),
                    align_x: alignment::Horizontal::Left.into(),
                    align_y: alignment::Vertical::Top,
                    ..Text::default()
                });
            }
        }
    }

    fn draw_indicator(&self, frame: &mut Frame, bounds: Rectangle, cursor: mouse::Cursor) {
        let indicator = Indicator::for_width(bounds.width);
        let hovered = cursor
            .position_in(bounds)
            .is_some_and(|p| indicator.contains(p));
        let circle = Path::circle(indicator.center, indicator.radius);

        if Indicator::is_filled(self.connected(), hovered) {
            frame.fill(&circle, self.theme.foreground.to_iced());
        }
        frame.stroke(
            &circle,
            Stroke::default()
                .with_color(self.theme.foreground.to_iced())
                .with_width(self.theme.line_width),
        );
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    fn pointer_input(
        &self,
        state: &mut ChartState,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        let Event::Mouse(event) = event else {
            return None;
        };

        match event {
            mouse::Event::CursorMoved { .. } => match cursor.position_in(bounds) {
                Some(p) => {
                    state.pointer_inside = true;
                    Some(Action::publish(Message::PointerMoved { x: p.x, y: p.y }))
                }
                None if state.pointer_inside => {
                    state.pointer_inside = false;
                    Some(Action::publish(Message::PointerLeft))
                }
                None => None,
            },
            mouse::Event::CursorLeft if state.pointer_inside => {
                state.pointer_inside = false;
                Some(Action::publish(Message::PointerLeft))
            }
            mouse::Event::WheelScrolled { delta } => {
                cursor.position_in(bounds)?;
                let slots = wheel_slots(*delta);
                (slots != 0).then(|| Action::publish(Message::Pan(slots)).and_capture())
            }
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                let p = cursor.position_in(bounds)?;
                let hit = !self.connected() && Indicator::for_width(bounds.width).contains(p);
                hit.then(|| Action::publish(Message::ReconnectRequested).and_capture())
            }
            _ => None,
        }
    }
}

impl canvas::Program<Message> for Chart<'_> {
    type State = ChartState;

    fn update(
        &self,
        state: &mut ChartState,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        // Input wins; a pending size change goes out with the next event.
        if let Some(action) = self.pointer_input(state, event, bounds, cursor) {
            return Some(action);
        }

        if state.size != Some(bounds.size()) {
            state.size = Some(bounds.size());
            return Some(Action::publish(Message::Resized {
                width:  bounds.width,
                height: bounds.height,
            }));
        }
        None
    }

    fn draw(
        &self,
        _state: &ChartState,
        renderer: &Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), self.theme.background.to_iced());

        let projection = Projection::for_session(self.session, bounds.size());
        self.draw_grid(&mut frame, &projection);
        self.draw_area(&mut frame, &projection);
        self.draw_readout(&mut frame);
        self.draw_legend(&mut frame);
        self.draw_indicator(&mut frame, bounds, cursor);

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &ChartState,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        let over_indicator = cursor
            .position_in(bounds)
            .is_some_and(|p| Indicator::for_width(bounds.width).contains(p));

        if over_indicator && !self.connected() {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Convert a wheel delta into slots to pan.  Scrolling down (negative `y` in
/// Iced) pans toward older samples, i.e. a positive slot count.
pub fn wheel_slots(delta: mouse::ScrollDelta) -> i64 {
    let pixels = match delta {
        mouse::ScrollDelta::Lines { y, .. } => -y * PIXELS_PER_LINE,
        mouse::ScrollDelta::Pixels { y, .. } => -y,
    };
    (pixels / PIXELS_PER_SLOT).trunc() as i64
}

fn outline_path(outline: &[Segment]) -> Path {
    Path::new(|builder| {
        for segment in outline {
            match *segment {
                Segment::MoveTo(p) => builder.move_to(p),
                Segment::LineTo(p) => builder.line_to(p),
                Segment::CurveTo { control_a, control_b, to } => {
                    builder.bezier_curve_to(control_a, control_b, to);
                }
            }
        }
        builder.close();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas::Program as _;

    fn published(action: Option<Action<Message>>) -> Option<Message> {
        action.and_then(|a| a.into_inner().0)
    }

    #[test]
    fn click_during_resize_is_not_lost() {
        let (session, theme, readout) = (Session::default(), Theme::default(), CursorReadout::new());
        let chart = Chart::new(&session, &theme, &readout);
        let mut state = ChartState::default();
        let bounds = Rectangle::new(Point::ORIGIN, Size::new(800.0, 600.0));
        let cursor = mouse::Cursor::Available(Point::new(770.0, 30.0));

        let click = Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left));
        assert!(matches!(
            published(chart.update(&mut state, &click, bounds, cursor)),
            Some(Message::ReconnectRequested)
        ));

        let release = Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left));
        assert!(matches!(
            published(chart.update(&mut state, &release, bounds, cursor)),
            Some(Message::Resized { width, height }) if width == 800.0 && height == 600.0
        ));
        assert!(published(chart.update(&mut state, &release, bounds, cursor)).is_none());
    }

    #[test]
    fn wheel_during_resize_still_pans() {
        let (session, theme, readout) = (Session::default(), Theme::default(), CursorReadout::new());
        let chart = Chart::new(&session, &theme, &readout);
        let mut state = ChartState::default();
        let bounds = Rectangle::new(Point::ORIGIN, Size::new(800.0, 600.0));
        let cursor = mouse::Cursor::Available(Point::new(400.0, 300.0));

        let wheel = Event::Mouse(mouse::Event::WheelScrolled {
            delta: mouse::ScrollDelta::Lines { x: 0.0, y: -1.0 },
        });
        assert!(matches!(
            published(chart.update(&mut state, &wheel, bounds, cursor)),
            Some(Message::Pan(10))
        ));
    }

    #[test]
    fn wheel_down_pans_toward_older_samples() {
        assert_eq!(wheel_slots(mouse::ScrollDelta::Lines { x: 0.0, y: -1.0 }), 10);
        assert_eq!(wheel_slots(mouse::ScrollDelta::Lines { x: 0.0, y: 3.0 }), -30);
    }

    #[test]
    fn small_pixel_deltas_are_truncated() {
        assert_eq!(wheel_slots(mouse::ScrollDelta::Pixels { x: 0.0, y: -9.0 }), 0);
        assert_eq!(wheel_slots(mouse::ScrollDelta::Pixels { x: 0.0, y: -25.0 }), 2);
        assert_eq!(wheel_slots(mouse::ScrollDelta::Pixels { x: 4.0, y: 19.0 }), -1);
    }
}
