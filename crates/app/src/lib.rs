//! Desktop window for `strip`.
//!
//! Owns the Iced application loop and the chart [`Session`], and wires
//! together all background tasks:
//! - Frame timer (ingest drain, easing, redraw)
//! - WebSocket sample feed (restarted on every reconnect request)
//! - Config file watcher (live reload on change)
//! - Keyboard (series focus)

use futures::{channel::mpsc::Sender, SinkExt};
use iced::{
    keyboard::{self, key::Named},
    Element, Point, Size, Subscription, Task,
};
use std::{path::PathBuf, time::Duration};
use strip_config::{default_path, load as load_config, ConfigWatcher, StripConfig};
use strip_core::{event::Message, IngestEvent, Session};
use strip_ingest::IngestClient;
use strip_renderer::{CursorReadout, Projection};
use strip_theme::Theme;
use strip_widgets::Chart;
use tracing::{debug, error, info, warn};

/// Initial window size before the first resize.
const WINDOW_SIZE: (f32, f32) = (1280.0, 720.0);

// ── Entry point ───────────────────────────────────────────────────────────────

/// Open the chart window.  `config_path` defaults to the XDG location and
/// `url` overrides `[source] url`.  Returns when the window is closed.
pub fn run(config_path: Option<PathBuf>, url: Option<String>) -> iced::Result {
    let config_path = config_path.unwrap_or_else(default_path);

    iced::application(
        move || Strip::new(config_path.clone(), url.clone()),
        Strip::update,
        Strip::view,
    )
    .title(Strip::title)
    .subscription(Strip::subscription)
    .style(Strip::style)
    .window_size(WINDOW_SIZE)
    .run()
}

// ── State ─────────────────────────────────────────────────────────────────────

/// Identity of one ingest connection attempt.  Bumping `generation` replaces
/// the running ingest subscription with a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Source {
    url:        String,
    generation: u64,
}

/// Latest connection state reported by the ingest stream.  Unlike the
/// session's idle guard this changes as soon as the event arrives, not on
/// the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    /// An attempt is in flight.
    Connecting,
    Connected,
    Disconnected,
}

struct Strip {
    session:     Session,
    config:      StripConfig,
    config_path: PathBuf,
    theme:       Theme,
    readout:     CursorReadout,
    pointer:     Option<Point>,
    canvas:      Size,
    source:      Source,
    link:        Link,
}

impl Strip {
    fn new(config_path: PathBuf, url: Option<String>) -> (Self, Task<Message>) {
        let config = match load_config(&config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("{e}; using defaults");
                StripConfig::default()
            }
        };

        let url = url.unwrap_or_else(|| config.source.url.clone());
        info!("Sample source: {url}");

        let strip = Self {
            session:     Session::new(config.series_specs(), config.session_settings()),
            theme:       Theme::from_config(&config),
            readout:     CursorReadout::new(),
            pointer:     None,
            canvas:      Size::ZERO,
            source:      Source { url, generation: 0 },
            link:        Link::Connecting,
            config,
            config_path,
        };

        (strip, Task::none())
    }

    fn title(&self) -> String {
        let state = if self.session.idle().connected() { "live" } else { "offline" };
        format!("strip · {} · {state}", self.session.selected().spec().name)
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Ingest(event) => {
                match event {
                    IngestEvent::Connected => self.link = Link::Connected,
                    IngestEvent::Disconnected => self.link = Link::Disconnected,
                    IngestEvent::Sample(_) => {}
                }
                self.session.enqueue(event);
            }
            Message::Pan(delta) => self.session.pan(delta),
            Message::FocusNext => {
                if self.session.focus_next() {
                    debug!("Selected series {}", self.session.selected_index());
                }
            }
            Message::FocusPrevious => {
                if self.session.focus_previous() {
                    debug!("Selected series {}", self.session.selected_index());
                }
            }
            Message::ReconnectRequested => {
                if self.link != Link::Disconnected {
                    debug!("Ignoring reconnect request while {:?}", self.link);
                } else if self.session.request_reconnect() {
                    self.link = Link::Connecting;
                    self.source.generation += 1;
                    info!("Reconnecting to {}", self.source.url);
                }
            }
            Message::PointerMoved { x, y } => self.pointer = Some(Point::new(x, y)),
            Message::PointerLeft => self.pointer = None,
            Message::Resized { width, height } => {
                self.canvas = Size::new(width, height);
                if self.session.resize(width) {
                    debug!("Window capacity now {}", self.session.viewport().capacity());
                }
            }
            Message::ConfigReloaded => self.reload_config(),
            Message::Frame => self.frame(),
        }
        Task::none()
    }

    fn frame(&mut self) {
        self.session.frame();

        let projection = Projection::for_session(&self.session, self.canvas);
        self.readout.update(
            &projection,
            self.session.selected().window(),
            self.pointer.map(|p| p.x),
        );
    }

    /// Re-read the config file.  Theme and series labels apply immediately;
    /// source and view settings are kept until the next start.
    fn reload_config(&mut self) {
        match load_config(&self.config_path) {
            Ok(cfg) => {
                let cfg = StripConfig {
                    source: self.config.source.clone(),
                    view:   self.config.view.clone(),
                    ..cfg
                };
                self.theme = Theme::from_config(&cfg);
                self.session.set_specs(cfg.series_specs());
                self.config = cfg;
                info!("Config reloaded");
            }
            Err(e) => warn!("Config reload failed: {e}"),
        }
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn view(&self) -> Element<'_, Message> {
        Chart::new(&self.session, &self.theme, &self.readout).view()
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    fn subscription(&self) -> Subscription<Message> {
        let frame = iced::time::every(self.config.view.frame_interval()).map(|_| Message::Frame);

        Subscription::batch([
            frame,
            Subscription::run_with(self.source.clone(), ingest_stream),
            Subscription::run_with(self.config_path.clone(), config_stream),
            keyboard::listen().filter_map(key_message),
        ])
    }

    // ── Style ─────────────────────────────────────────────────────────────────

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        iced::theme::Style {
            background_color: self.theme.background.to_iced(),
            text_color:       self.theme.foreground.to_iced(),
        }
    }
}

// ── Subscription streams ──────────────────────────────────────────────────────
//
// `Subscription::run_with` hashes the data argument together with the builder
// function, so a changed `Source` or config path restarts the stream.

/// One connection attempt to the sample feed.  Forwards every ingest event,
/// then idles until a reconnect request replaces the subscription.
fn ingest_stream(source: &Source) -> impl iced::futures::Stream<Item = Message> {
    let client = IngestClient::new(source.url.clone());

    iced::stream::channel(64, move |mut sender: Sender<Message>| async move {
        let mut rx = client.spawn_listener();

        while let Some(event) = rx.recv().await {
            if sender.send(Message::Ingest(event)).await.is_err() {
                break;
            }
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

/// Watches the config file for writes and sends `ConfigReloaded`.
fn config_stream(path: &PathBuf) -> impl iced::futures::Stream<Item = Message> {
    let path = path.clone();

    iced::stream::channel(1, move |mut sender: Sender<Message>| async move {
        let (_watcher, mut rx) = ConfigWatcher::spawn(&path);

        while rx.recv().await.is_some() {
            let _ = sender.try_send(Message::ConfigReloaded);
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Arrow keys move the series focus on release: Down/Left select the next
/// series, Up/Right the previous one.
fn key_message(event: keyboard::Event) -> Option<Message> {
    let keyboard::Event::KeyReleased { key: keyboard::Key::Named(named), .. } = event else {
        return None;
    };

    match named {
        Named::ArrowDown | Named::ArrowLeft => Some(Message::FocusNext),
        Named::ArrowUp | Named::ArrowRight => Some(Message::FocusPrevious),
        _ => None,
    }
}
