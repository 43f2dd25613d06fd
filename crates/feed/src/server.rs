use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use strip_core::Sample;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// Samples buffered per client before a slow client starts skipping.
pub const FAN_OUT_CAPACITY: usize = 16;

/// Serialise every sample once and publish it to all connected clients.
/// Returns when the sampler stops.
pub async fn publish(mut samples: mpsc::Receiver<Sample>, clients: broadcast::Sender<String>) {
    while let Some(sample) = samples.recv().await {
        match serde_json::to_string(&sample) {
            // Err only means nobody is connected right now.
            Ok(json) => {
                let _ = clients.send(json);
            }
            Err(e) => warn!("Cannot encode sample: {e}"),
        }
    }
    debug!("Sampler stopped");
}

/// Accept WebSocket clients forever, each on its own task.
pub async fn serve(listener: TcpListener, clients: broadcast::Sender<String>) -> std::io::Result<()> {
    loop {
        let (tcp, peer) = listener.accept().await?;
        tokio::spawn(client(tcp, peer, clients.subscribe()));
    }
}

async fn client(tcp: TcpStream, peer: SocketAddr, mut samples: broadcast::Receiver<String>) {
    let ws = match accept_async(tcp).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("Handshake with {peer} failed: {e}");
            return;
        }
    };
    info!("Client {peer} connected");

    let (mut sink, mut incoming) = ws.split();
    loop {
        tokio::select! {
            sample = samples.recv() => match sample {
                Ok(json) => {
                    if sink.send(Message::text(json)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Client {peer} lagging; skipped {skipped} samples");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            frame = incoming.next() => match frame {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    info!("Client {peer} disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_tungstenite::connect_async;

    #[tokio::test]
    async fn connected_clients_receive_published_samples() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (clients, _) = broadcast::channel(FAN_OUT_CAPACITY);
        tokio::spawn(serve(listener, clients.clone()));

        let (mut first, _) = connect_async(format!("ws://{addr}")).await.unwrap();
        let (mut second, _) = connect_async(format!("ws://{addr}")).await.unwrap();

        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(publish(rx, clients));
        tx.send(Sample { memory: 10.0, cpu: 2.5, read: 0.0, write: 7.0 }).await.unwrap();

        for ws in [&mut first, &mut second] {
            let Some(Ok(Message::Text(text))) = ws.next().await else {
                panic!("expected a text frame");
            };
            let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
            assert_eq!(value["memory"], 10.0);
            assert_eq!(value["cpu"], 2.5);
            assert_eq!(value["write"], 7.0);
        }
    }

    #[tokio::test]
    async fn publishing_without_clients_is_harmless() {
        let (clients, _) = broadcast::channel(FAN_OUT_CAPACITY);
        let (tx, rx) = mpsc::channel(4);
        let task = tokio::spawn(publish(rx, clients));

        tx.send(Sample::ZERO).await.unwrap();
        drop(tx);
        task.await.unwrap();
    }
}
