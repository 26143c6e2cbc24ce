//! Single-connection WebSocket feed.
//!
//! Every Text or Binary frame is one order document. Pings are answered,
//! pongs ignored. A close frame, a socket error, or the end of the stream
//! ends the session: [`next_message`](MessageFeed::next_message) returns
//! `None` and the feed stays disconnected until [`connect`](MessageFeed::connect)
//! is called again.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{error, info, trace};

use super::message::SubscribeMessage;
use crate::error::{Error, Result};
use crate::port::{FeedMessage, MessageFeed};

/// WebSocket consumer for the order topic.
pub struct WebSocketFeed {
    url: String,
    topic: String,
    group_id: String,
    ws: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
    sequence: u64,
}

impl WebSocketFeed {
    /// Create a disconnected feed for the given broker URL.
    #[must_use]
    pub fn new(url: impl Into<String>, topic: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            topic: topic.into(),
            group_id: group_id.into(),
            ws: None,
            sequence: 0,
        }
    }

    /// Whether a session is currently open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.ws.is_some()
    }

    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }
}

#[async_trait]
impl MessageFeed for WebSocketFeed {
    async fn connect(&mut self) -> Result<()> {
        self.ws = None;
        info!(url = %self.url, topic = %self.topic, "Connecting to order feed");
        let (mut ws, response) = connect_async(self.url.as_str()).await?;
        info!(status = %response.status(), "Order feed connected");

        let subscribe = SubscribeMessage::new(self.topic.as_str(), self.group_id.as_str());
        let json = serde_json::to_string(&subscribe)
            .map_err(|e| Error::Parse(format!("subscribe frame: {e}")))?;
        ws.send(Message::Text(json)).await?;
        info!(topic = %self.topic, group_id = %self.group_id, "Subscribed to order topic");

        self.ws = Some(ws);
        Ok(())
    }

    async fn next_message(&mut self) -> Option<FeedMessage> {
        loop {
            let ws = self.ws.as_mut()?;
            let frame = match ws.next().await {
                Some(frame) => frame,
                None => {
                    info!("Order feed stream ended");
                    self.ws = None;
                    return None;
                }
            };

            let payload = match frame {
                Ok(Message::Text(text)) => text.into_bytes(),
                Ok(Message::Binary(data)) => data,
                Ok(Message::Ping(data)) => {
                    trace!("Received WebSocket ping");
                    if let Err(e) = ws.send(Message::Pong(data)).await {
                        error!(error = %e, "Failed to answer ping");
                        self.ws = None;
                        return None;
                    }
                    continue;
                }
                Ok(Message::Close(frame)) => {
                    info!(frame = ?frame, "Order feed closed by server");
                    self.ws = None;
                    return None;
                }
                Ok(_) => continue,
                Err(e) => {
                    error!(error = %e, "Order feed error");
                    self.ws = None;
                    return None;
                }
            };

            let sequence = self.next_sequence();
            trace!(sequence, bytes = payload.len(), "Received order frame");
            return Some(FeedMessage::new(sequence, payload));
        }
    }

    fn name(&self) -> &'static str {
        "websocket"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Accept one client, capture its subscribe frame, then play `frames`
    /// and close.
    async fn serve_once(frames: Vec<Message>) -> (String, oneshot::Receiver<(String, bool)>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

            let subscribe = match ws.next().await {
                Some(Ok(Message::Text(text))) => text,
                other => panic!("expected subscribe frame, got {other:?}"),
            };

            for frame in frames {
                ws.send(frame).await.unwrap();
            }
            ws.send(Message::Close(None)).await.unwrap();

            let mut ponged = false;
            while let Some(Ok(msg)) = ws.next().await {
                if matches!(msg, Message::Pong(_)) {
                    ponged = true;
                }
            }
            let _ = tx.send((subscribe, ponged));
        });

        (url, rx)
    }

    #[test]
    fn starts_disconnected() {
        let feed = WebSocketFeed::new("ws://localhost:1", "orders", "g");
        assert!(!feed.is_connected());
        assert_eq!(feed.name(), "websocket");
    }

    #[tokio::test]
    async fn next_message_without_connect_is_none() {
        let mut feed = WebSocketFeed::new("ws://localhost:1", "orders", "g");
        assert!(feed.next_message().await.is_none());
    }

    #[tokio::test]
    async fn connect_failure_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut feed = WebSocketFeed::new(format!("ws://{addr}"), "orders", "g");
        assert!(feed.connect().await.is_err());
        assert!(!feed.is_connected());
    }

    #[tokio::test]
    async fn yields_text_and_binary_frames_and_answers_pings() {
        let (url, done) = serve_once(vec![
            Message::Text(r#"{"order_uid":"a"}"#.into()),
            Message::Ping(b"hb".to_vec()),
            Message::Binary(br#"{"order_uid":"b"}"#.to_vec()),
        ])
        .await;

        let mut feed = WebSocketFeed::new(url, "orders", "orderbridge");
        feed.connect().await.unwrap();

        let first = feed.next_message().await.unwrap();
        assert_eq!(first.sequence, 1);
        assert_eq!(first.payload, br#"{"order_uid":"a"}"#.to_vec());

        let second = feed.next_message().await.unwrap();
        assert_eq!(second.sequence, 2);
        assert_eq!(second.payload, br#"{"order_uid":"b"}"#.to_vec());

        assert!(feed.next_message().await.is_none());
        assert!(!feed.is_connected());
        drop(feed);

        let (subscribe, ponged) = done.await.unwrap();
        let subscribe: serde_json::Value = serde_json::from_str(&subscribe).unwrap();
        assert_eq!(subscribe["type"], "subscribe");
        assert_eq!(subscribe["topic"], "orders");
        assert_eq!(subscribe["group_id"], "orderbridge");
        assert!(ponged);
    }
}
