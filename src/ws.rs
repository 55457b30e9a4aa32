//! WebSocket surface.
//!
//! One accept loop, one task per connection. A status envelope greets each
//! client; `inactivity` messages dispatch to the error-explanation or
//! suggestion path depending on whether an error is attached. Malformed
//! JSON answers with an error-shaped envelope and the connection stays
//! open; only a close frame (or transport failure) ends a session.

use std::sync::Arc;

use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::protocol::{ClientMessage, InactivityData, ServerEnvelope};
use crate::tutor::TutorService;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Start the WebSocket server; runs until the listener fails.
pub async fn start_server(
    config: &Config,
    tutor: Arc<TutorService>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = format!("{}:{}", config.bind, config.ws_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("WebSocket server listening on ws://{addr}");

    loop {
        let (stream, peer) = listener.accept().await?;
        let tutor = tutor.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, tutor).await {
                debug!(%peer, "connection ended: {e}");
            }
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    tutor: Arc<TutorService>,
) -> tungstenite::Result<()> {
    let socket = tokio_tungstenite::accept_async(stream).await?;
    info!("new client connected");
    let (mut sink, mut source) = socket.split();

    send_envelope(&mut sink, &ServerEnvelope::connected()).await?;

    while let Some(message) = source.next().await {
        match message? {
            Message::Text(text) => {
                if let Some(reply) = handle_client_text(&tutor, text.as_str()).await {
                    send_envelope(&mut sink, &reply).await?;
                }
            }
            Message::Close(_) => break,
            // Ping/pong are answered by the protocol layer; binary frames
            // carry nothing we understand.
            _ => {}
        }
    }

    info!("client disconnected");
    Ok(())
}

/// Decode and dispatch one client message.
///
/// Returns `None` for messages that warrant no reply (valid JSON with an
/// unhandled type, mirroring how the editor protocol treats them).
async fn handle_client_text(tutor: &TutorService, text: &str) -> Option<ServerEnvelope> {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            warn!("failed to parse message: {e}");
            return Some(ServerEnvelope::response("Error: Invalid JSON message"));
        }
    };

    match serde_json::from_value::<ClientMessage>(value) {
        Ok(ClientMessage::Inactivity(data)) => {
            debug!(file = %data.file_name, "inactivity message");
            Some(ServerEnvelope::response(
                process_inactivity(tutor, data).await,
            ))
        }
        Err(e) => {
            debug!("ignoring unhandled message: {e}");
            None
        }
    }
}

/// An attached error routes to explanation; otherwise proactive
/// suggestions. Both paths are total, so the reply is always an envelope.
async fn process_inactivity(tutor: &TutorService, data: InactivityData) -> String {
    match data.error.as_deref() {
        Some(error) if !error.trim().is_empty() => {
            tutor
                .explain_error(&data.text, error, &data.language, &data.file_name)
                .await
        }
        _ => {
            tutor
                .suggest_on_inactivity(&data.text, &data.file_name, "", &data.language)
                .await
        }
    }
}

async fn send_envelope(sink: &mut WsSink, envelope: &ServerEnvelope) -> tungstenite::Result<()> {
    let json = match serde_json::to_string(envelope) {
        Ok(json) => json,
        Err(e) => {
            warn!("failed to serialize envelope: {e}");
            return Ok(());
        }
    };
    sink.send(Message::Text(json.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TutorError;
    use crate::providers::MockCompletionProvider;

    fn service(mock: MockCompletionProvider) -> TutorService {
        TutorService::new(Arc::new(mock), 50)
    }

    #[tokio::test]
    async fn test_malformed_json_gets_error_envelope() {
        let tutor = service(MockCompletionProvider::new());
        let reply = handle_client_text(&tutor, "{not json").await.unwrap();
        match reply {
            ServerEnvelope::Response(data) => {
                assert!(data.message.contains("Invalid JSON"));
                assert_eq!(data.model, "realtutor-ai");
            }
            other => panic!("expected response envelope, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unhandled_message_type_gets_no_reply() {
        let tutor = service(MockCompletionProvider::new());
        let reply = handle_client_text(&tutor, r#"{"type":"ping","data":{}}"#).await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_inactivity_with_error_routes_to_explanation() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete()
            .withf(|system, _| system.contains("- Error: SyntaxError"))
            .times(1)
            .returning(|_, _| Ok("print(1);".to_string()));
        let tutor = service(mock);
        let message = r#"{
            "type": "inactivity",
            "data": { "text": "print(1", "language": "python",
                      "error": "SyntaxError", "fileName": "a.py" }
        }"#;
        let reply = handle_client_text(&tutor, message).await.unwrap();
        match reply {
            ServerEnvelope::Response(data) => assert!(data.message.contains("print(1);")),
            other => panic!("expected response envelope, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_inactivity_without_error_routes_to_suggestions() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete()
            .withf(|system, _| system.contains("production-ready"))
            .times(1)
            .returning(|_, _| Ok("Consider adding type hints;".to_string()));
        let tutor = service(mock);
        let message = r#"{
            "type": "inactivity",
            "data": { "text": "x = 1", "language": "python", "fileName": "a.py" }
        }"#;
        let reply = handle_client_text(&tutor, message).await.unwrap();
        match reply {
            ServerEnvelope::Response(data) => {
                assert!(data.message.contains("Consider adding type hints"))
            }
            other => panic!("expected response envelope, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handler_failure_stays_enveloped() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete()
            .returning(|_, _| Err(TutorError::Provider("rate limited".into())));
        let tutor = service(mock);
        let message = r#"{
            "type": "inactivity",
            "data": { "text": "x = 1", "fileName": "a.py" }
        }"#;
        let reply = handle_client_text(&tutor, message).await.unwrap();
        match reply {
            ServerEnvelope::Response(data) => {
                assert!(data.message.contains("rate limited"));
                assert_eq!(data.model, "realtutor-ai");
            }
            other => panic!("expected response envelope, got {other:?}"),
        }
    }
}
