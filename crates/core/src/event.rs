use crate::sample::Sample;

/// Transport-level events delivered by the live data source.
///
/// These are never applied to history directly: the session queues them and
/// drains the queue at the start of the next frame.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestEvent {
    /// The source accepted the connection.
    Connected,
    /// One validated sample tuple.
    Sample(Sample),
    /// The connection closed, or a connection attempt failed.
    Disconnected,
}

/// All messages (events) that can flow through the application event bus.
///
/// Sources:
/// - Ingest subscription   → `Ingest`
/// - Chart canvas          → `Pan`, `Pointer*`, `Resized`, `ReconnectRequested`
/// - Keyboard subscription → `FocusNext`, `FocusPrevious`
/// - Config watcher task   → `ConfigReloaded`
/// - Frame timer           → `Frame`
#[derive(Debug, Clone)]
pub enum Message {
    // ── Ingest ────────────────────────────────────────────────────────────────
    /// Connection state change or sample from the live source.
    Ingest(IngestEvent),

    // ── User actions ──────────────────────────────────────────────────────────
    /// Scroll the viewport; positive = toward older data (slots).
    Pan(i64),
    /// Select the next series (clamped, not wrapped).
    FocusNext,
    /// Select the previous series (clamped, not wrapped).
    FocusPrevious,
    /// Click on the connectivity indicator while disconnected.
    ReconnectRequested,
    /// Pointer moved inside the chart (canvas-local pixels).
    PointerMoved { x: f32, y: f32 },
    /// Pointer left the chart.
    PointerLeft,
    /// Chart drawing area changed size (logical pixels).
    Resized { width: f32, height: f32 },

    // ── Config ────────────────────────────────────────────────────────────────
    /// Config file changed on disk; triggers a live reload.
    ConfigReloaded,

    // ── Internal ──────────────────────────────────────────────────────────────
    /// Fixed-rate frame tick driving ingest drain, easing and redraw.
    Frame,
}
