use crate::payload::parse_payload;
use futures::StreamExt;
use strip_core::{IngestEvent, Result, Sample, StripError};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

/// WebSocket client for the live sample feed.
///
/// Every connection is a single attempt: there is no retry or backoff.  A
/// new attempt is made only when the user asks for one.
#[derive(Debug, Clone)]
pub struct IngestClient {
    url: String,
}

impl IngestClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Open the WebSocket connection.
    pub async fn connect(&self) -> Result<IngestStream> {
        let (ws, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| StripError::Ingest(format!("connect '{}': {e}", self.url)))?;

        info!("Connected to sample source {}", self.url);
        Ok(IngestStream { ws })
    }

    /// Spawn a background task that makes one connection attempt and forwards
    /// [`IngestEvent`]s on the returned channel:
    /// `Connected`, then one `Sample` per valid message, then `Disconnected`.
    /// A failed attempt yields a lone `Disconnected`.
    ///
    /// The task stops early when the receiver is dropped.
    pub fn spawn_listener(self) -> mpsc::Receiver<IngestEvent> {
        let (tx, rx) = mpsc::channel(64);

        tokio::spawn(async move {
            let mut stream = match self.connect().await {
                Ok(stream) => stream,
                Err(e) => {
                    warn!("{e}");
                    let _ = tx.send(IngestEvent::Disconnected).await;
                    return;
                }
            };

            if tx.send(IngestEvent::Connected).await.is_err() {
                return;
            }

            while let Some(sample) = stream.next_sample().await {
                if tx.send(IngestEvent::Sample(sample)).await.is_err() {
                    return; // receiver dropped
                }
            }

            info!("Sample source {} closed", self.url);
            let _ = tx.send(IngestEvent::Disconnected).await;
        });

        rx
    }
}

/// An open connection to the sample feed.
pub struct IngestStream {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl IngestStream {
    /// Wait for the next valid sample.  Malformed messages are logged and
    /// skipped; non-text frames are ignored.  Returns `None` once the
    /// connection is closed or fails.
    pub async fn next_sample(&mut self) -> Option<Sample> {
        while let Some(frame) = self.ws.next().await {
            match frame {
                Ok(Message::Text(text)) => match parse_payload(text.as_str()) {
                    Ok(sample) => return Some(sample),
                    Err(e) => warn!("Dropping message: {e}"),
                },
                Ok(Message::Close(frame)) => {
                    debug!("Close frame received: {frame:?}");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Sample source error: {e}");
                    break;
                }
            }
        }
        None
    }
}
