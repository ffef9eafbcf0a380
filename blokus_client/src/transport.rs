use std::fmt::Display;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens the websocket channel to the game server.
pub async fn open(url: &str) -> Result<WsStream, tungstenite::Error> {
    let (ws, _response) = tokio_tungstenite::connect_async(url).await?;
    Ok(ws)
}

/// Forwards queued frames to the socket.
///
/// Stops when the queue is closed, after a close frame was sent, or when
/// sending fails.
pub async fn write_frames<S>(mut sink: S, mut frames: mpsc::UnboundedReceiver<Message>)
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    while let Some(frame) = frames.recv().await {
        let is_close = matches!(frame, Message::Close(_));
        if let Err(err) = sink.send(frame).await {
            warn!(%err, "Could not send frame");
            return;
        }
        if is_close {
            return;
        }
    }
    let _ = sink.close().await;
}

/// Hands every text frame to `on_text` until the channel ends.
///
/// Returns the reason the channel ended, if the server or the socket gave one.
pub async fn read_frames<S>(mut stream: S, mut on_text: impl FnMut(&str)) -> Option<String>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => on_text(text.as_str()),
            Ok(Message::Binary(bytes)) => debug!(len = bytes.len(), "Ignoring binary frame"),
            Ok(Message::Close(frame)) => {
                return frame
                    .map(|frame| frame.reason.as_str().to_owned())
                    .filter(|reason| !reason.is_empty());
            }
            // Pings are answered by tungstenite
            Ok(_) => {}
            Err(err) => return Some(err.to_string()),
        }
    }
    None
}
