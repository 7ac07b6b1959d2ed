//! `PingSubscription` over graphql-transport-ws.

use super::error::ClientError;
use super::operations::OperationRequest;
use super::protocol::{join_errors, ClientMessage, ServerMessage, GRAPHQL_TRANSPORT_WS};
use super::PingStream;
use crate::oplog::OperationKind;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header::SEC_WEBSOCKET_PROTOCOL, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connect, complete the `connection_init` handshake and subscribe.
pub(crate) async fn subscribe(ws_url: &str) -> Result<PingStream, ClientError> {
    let mut request = ws_url.into_client_request()?;
    request.headers_mut().insert(
        SEC_WEBSOCKET_PROTOCOL,
        HeaderValue::from_static(GRAPHQL_TRANSPORT_WS),
    );

    let (mut ws, _) = connect_async(request).await?;
    tracing::debug!(url = %ws_url, "WebSocket connected");

    send(&mut ws, &ClientMessage::ConnectionInit { payload: None }).await?;
    await_ack(&mut ws).await?;

    let id = uuid::Uuid::new_v4().to_string();
    send(
        &mut ws,
        &ClientMessage::Subscribe {
            id: id.clone(),
            payload: OperationRequest::for_kind(OperationKind::Subscription),
        },
    )
    .await?;
    tracing::info!(subscription_id = %id, "Ping subscription established");

    Ok(Box::pin(next_pings(ws, id)))
}

async fn send(ws: &mut WsStream, message: &ClientMessage) -> Result<(), ClientError> {
    let json =
        serde_json::to_string(message).map_err(|e| ClientError::Protocol(e.to_string()))?;
    ws.send(Message::text(json)).await?;
    Ok(())
}

async fn await_ack(ws: &mut WsStream) -> Result<(), ClientError> {
    while let Some(frame) = ws.next().await {
        match frame? {
            Message::Text(text) => match parse(text.as_str())? {
                ServerMessage::ConnectionAck { .. } => return Ok(()),
                ServerMessage::Ping { .. } => {
                    send(ws, &ClientMessage::Pong { payload: None }).await?
                }
                other => {
                    return Err(ClientError::Protocol(format!(
                        "expected connection_ack, got {:?}",
                        other
                    )))
                }
            },
            Message::Ping(data) => ws.send(Message::Pong(data)).await?,
            Message::Close(_) => return Err(ClientError::Closed),
            _ => {}
        }
    }
    Err(ClientError::Closed)
}

fn parse(text: &str) -> Result<ServerMessage, ClientError> {
    serde_json::from_str(text)
        .map_err(|e| ClientError::Protocol(format!("unparseable message: {}", e)))
}

/// Turn server pushes into ping values. The stream ends after the first
/// error, on `complete`, or when the socket closes.
fn next_pings(
    mut ws: WsStream,
    id: String,
) -> impl futures::Stream<Item = Result<Option<String>, ClientError>> + Send {
    async_stream::stream! {
        loop {
            let frame = match ws.next().await {
                Some(Ok(frame)) => frame,
                Some(Err(e)) => {
                    yield Err(ClientError::from(e));
                    break;
                }
                None => {
                    yield Err(ClientError::Closed);
                    break;
                }
            };

            match frame {
                Message::Text(text) => match parse(text.as_str()) {
                    Ok(ServerMessage::Next { id: msg_id, payload }) if msg_id == id => {
                        yield payload.into_ping();
                    }
                    Ok(ServerMessage::Error { id: msg_id, payload }) if msg_id == id => {
                        yield Err(join_errors(&payload));
                        break;
                    }
                    Ok(ServerMessage::Complete { id: msg_id }) if msg_id == id => {
                        tracing::info!(subscription_id = %id, "Server completed ping subscription");
                        break;
                    }
                    Ok(ServerMessage::Ping { .. }) => {
                        let pong = ClientMessage::Pong { payload: None };
                        if let Err(e) = send(&mut ws, &pong).await {
                            yield Err(e);
                            break;
                        }
                    }
                    Ok(other) => {
                        tracing::trace!(message = ?other, "Ignoring server message");
                    }
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                },
                Message::Ping(data) => {
                    if let Err(e) = ws.send(Message::Pong(data)).await {
                        yield Err(ClientError::from(e));
                        break;
                    }
                }
                Message::Close(_) => {
                    yield Err(ClientError::Closed);
                    break;
                }
                _ => {}
            }
        }

        let _ = ws.close(None).await;
    }
}
