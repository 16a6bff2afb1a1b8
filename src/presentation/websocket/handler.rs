//! WebSocket Connection Handler
//!
//! One authenticated connection runs two tasks:
//!
//! - the **read pump** (this connection's handler task) decodes inbound
//!   frames into messages and publishes them through the hub, and owns the
//!   session's cleanup;
//! - the **write pump** (spawned) drains the session's outbound queue to the
//!   socket and pings the peer.
//!
//! The read pump also watches the write pump: if writing fails the session
//! is unregistered right away instead of waiting for a read to fail.

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{
        ws::{Message as WsMessage, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, timeout_at, Instant};

use super::hub::{ConnectedSession, HubError};
use super::messages::{ClientFrame, ErrorFrame};
use super::session::SessionState;
use crate::application::dto::ConnectQuery;
use crate::domain::Message;
use crate::startup::AppState;

/// Reasons a session ends abnormally
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("malformed frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to encode message: {0}")]
    Encode(serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] axum::Error),

    #[error("no pong received within {0:?}")]
    IdleTimeout(Duration),

    #[error("write did not complete within {0:?}")]
    WriteTimeout(Duration),

    #[error(transparent)]
    Hub(#[from] HubError),
}

/// How the read pump ended when no error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadEnd {
    /// Peer sent a close frame or the stream ended
    PeerClosed,
    /// The write pump finished first
    WriterFinished,
}

/// Timing knobs shared by both pumps
#[derive(Debug, Clone, Copy)]
struct PumpTimings {
    pong_wait: Duration,
    ping_period: Duration,
    write_wait: Duration,
}

/// WebSocket upgrade handler
///
/// Credentials arrive in the query string. The connection is upgraded in
/// all cases so a rejected client still receives an error frame.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<ConnectQuery>,
    State(state): State<AppState>,
) -> Response {
    let read_limit = state.settings.websocket.read_limit;
    ws.max_message_size(read_limit)
        .max_frame_size(read_limit)
        .on_upgrade(move |socket| handle_socket(socket, query, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, query: ConnectQuery, state: AppState) {
    let (mut sink, stream) = socket.split();

    let account = match state.accounts.validate(&query.username, &query.password) {
        Ok(account) => account.clone(),
        Err(e) => {
            tracing::warn!(username = %query.username, error = %e, "Invalid account");
            reject(&mut sink).await;
            return;
        }
    };

    let ws_settings = &state.settings.websocket;
    let timings = PumpTimings {
        pong_wait: ws_settings.pong_wait(),
        ping_period: ws_settings.ping_period(),
        write_wait: ws_settings.write_wait(),
    };

    let (session, outbound) =
        ConnectedSession::new(&account.username, &account.channel, ws_settings.send_buffer);
    let mut session_state =
        SessionState::new(session.session_id, account.username, account.channel);
    let session_id = session.session_id;

    if let Err(e) = state.hub.register(session).await {
        tracing::error!(session_id = %session_id, error = %e, "Failed to register session");
        let _ = sink.send(WsMessage::Close(None)).await;
        return;
    }

    tracing::info!(
        session_id = %session_id,
        username = %session_state.username,
        channel = %session_state.channel,
        "User connected"
    );

    let mut writer = tokio::spawn(write_pump(sink, outbound, timings));

    let result = read_pump(stream, &mut session_state, &state, &mut writer, timings).await;

    // Single cleanup path for every way a session can end.
    if let Err(e) = state.hub.unregister(session_id).await {
        tracing::error!(session_id = %session_id, error = %e, "Failed to unregister session");
    }

    match &result {
        Ok(ReadEnd::WriterFinished) => {}
        _ => {
            // Unregistering closes the outbound queue, so the writer drains
            // and sends a close frame on its own unless it is stuck.
            if timeout(timings.write_wait, &mut writer).await.is_err() {
                tracing::debug!(session_id = %session_id, "Write pump stuck, aborting");
                writer.abort();
            }
        }
    }

    match result {
        Ok(end) => tracing::info!(
            session_id = %session_id,
            username = %session_state.username,
            channel = %session_state.channel,
            reason = ?end,
            "User disconnected"
        ),
        Err(e) => tracing::info!(
            session_id = %session_id,
            username = %session_state.username,
            channel = %session_state.channel,
            error = %e,
            "User disconnected"
        ),
    }
}

/// Send the credential error frame and close.
async fn reject(sink: &mut SplitSink<WebSocket, WsMessage>) {
    match serde_json::to_string(&ErrorFrame::invalid_credentials()) {
        Ok(text) => {
            let _ = sink.send(WsMessage::Text(text.into())).await;
        }
        Err(e) => tracing::error!(error = %e, "Failed to encode error frame"),
    }
    let _ = sink.send(WsMessage::Close(None)).await;
}

/// Read inbound frames until the peer leaves, a frame is malformed, the
/// idle deadline passes, or the write pump finishes.
async fn read_pump(
    mut stream: SplitStream<WebSocket>,
    session: &mut SessionState,
    state: &AppState,
    writer: &mut JoinHandle<Result<(), SessionError>>,
    timings: PumpTimings,
) -> Result<ReadEnd, SessionError> {
    loop {
        let deadline = session.read_deadline(timings.pong_wait);

        let frame = tokio::select! {
            frame = timeout_at(deadline, stream.next()) => frame,
            outcome = &mut *writer => {
                match outcome {
                    Ok(Err(e)) => tracing::debug!(
                        session_id = %session.session_id,
                        error = %e,
                        "Write pump failed"
                    ),
                    Err(e) => tracing::debug!(
                        session_id = %session.session_id,
                        error = %e,
                        "Write pump task ended abnormally"
                    ),
                    Ok(Ok(())) => {}
                }
                return Ok(ReadEnd::WriterFinished);
            }
        };

        let frame = match frame {
            Err(_) => return Err(SessionError::IdleTimeout(timings.pong_wait)),
            Ok(None) => return Ok(ReadEnd::PeerClosed),
            Ok(Some(frame)) => frame?,
        };

        let decoded = match frame {
            WsMessage::Text(text) => ClientFrame::from_text(text.as_str())?,
            WsMessage::Binary(bytes) => ClientFrame::from_bytes(&bytes)?,
            WsMessage::Pong(_) => {
                session.pong();
                continue;
            }
            // Pings are answered by the transport.
            WsMessage::Ping(_) => continue,
            WsMessage::Close(_) => return Ok(ReadEnd::PeerClosed),
        };

        let message = session.stamp(decoded);
        tracing::debug!(
            session_id = %session.session_id,
            message_id = %message.id,
            channel = %message.channel,
            "Message received"
        );
        state.hub.publish(message).await?;
    }
}

/// Drain the outbound queue to the socket, pinging on a fixed period.
///
/// Ends with a close frame once the hub closes the queue.
async fn write_pump(
    mut sink: SplitSink<WebSocket, WsMessage>,
    mut outbound: mpsc::Receiver<Message>,
    timings: PumpTimings,
) -> Result<(), SessionError> {
    let mut ping = interval_at(Instant::now() + timings.ping_period, timings.ping_period);

    loop {
        tokio::select! {
            next = outbound.recv() => match next {
                Some(message) => {
                    let text = serde_json::to_string(&message).map_err(SessionError::Encode)?;
                    write_frame(&mut sink, WsMessage::Text(text.into()), timings.write_wait).await?;
                }
                None => {
                    let _ = write_frame(&mut sink, WsMessage::Close(None), timings.write_wait).await;
                    return Ok(());
                }
            },
            _ = ping.tick() => {
                write_frame(&mut sink, WsMessage::Ping(Bytes::new()), timings.write_wait).await?;
            }
        }
    }
}

async fn write_frame(
    sink: &mut SplitSink<WebSocket, WsMessage>,
    frame: WsMessage,
    write_wait: Duration,
) -> Result<(), SessionError> {
    timeout(write_wait, sink.send(frame))
        .await
        .map_err(|_| SessionError::WriteTimeout(write_wait))??;
    Ok(())
}
