// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket bridge for `ws://{server}/ws/{job_id}`.
//!
//! The server pushes the current snapshot right after the handshake and then
//! one frame per job update. The client sends nothing besides the close frame.

use super::{ChannelEvent, ChannelHandle, ConnectionId, LiveChannel};
use crate::endpoint::Endpoint;
use folio_core::JobId;
use futures_util::StreamExt;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use url::Url;

/// Live channel over tokio-tungstenite.
#[derive(Clone, Debug)]
pub struct WsLiveChannel {
    endpoint: Endpoint,
    connect_timeout: Duration,
}

impl WsLiveChannel {
    pub fn new(endpoint: Endpoint, connect_timeout: Duration) -> Self {
        Self { endpoint, connect_timeout }
    }
}

impl LiveChannel for WsLiveChannel {
    fn open(
        &self,
        job_id: &JobId,
        conn: ConnectionId,
        events: mpsc::Sender<ChannelEvent>,
    ) -> ChannelHandle {
        let url = self.endpoint.ws_url(job_id).map_err(|e| e.to_string());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(event_bridge(url, conn, self.connect_timeout, events, shutdown_rx));
        ChannelHandle::new(conn, shutdown_tx, task)
    }
}

/// Background task that connects, forwards frames, and reports closure.
async fn event_bridge(
    url: Result<Url, String>,
    conn: ConnectionId,
    connect_timeout: Duration,
    events: mpsc::Sender<ChannelEvent>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let url = match url {
        Ok(url) => url,
        Err(reason) => {
            tracing::warn!(%conn, %reason, "ws bridge: no usable url");
            let _ = events.send(ChannelEvent::Closed { conn, reason: Some(reason) }).await;
            return;
        }
    };
    let connect = tokio::time::timeout(connect_timeout, tokio_tungstenite::connect_async(url.as_str()));
    let result = tokio::select! {
        result = connect => result,
        _ = &mut shutdown_rx => {
            tracing::debug!(%conn, "ws bridge: shut down while connecting");
            return;
        }
    };

    let mut ws = match result {
        Ok(Ok((ws, _))) => ws,
        Ok(Err(e)) => {
            tracing::warn!(%conn, %url, error = %e, "ws bridge: handshake failed");
            let _ = events.send(ChannelEvent::Closed { conn, reason: Some(e.to_string()) }).await;
            return;
        }
        Err(_) => {
            tracing::warn!(%conn, %url, "ws bridge: connect timed out");
            let reason = format!("connect timed out after {connect_timeout:?}");
            let _ = events.send(ChannelEvent::Closed { conn, reason: Some(reason) }).await;
            return;
        }
    };

    tracing::info!(%conn, %url, "ws bridge connected");
    if events.send(ChannelEvent::Opened { conn }).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            msg = ws.next() => {
                let event = match msg {
                    Some(Ok(Message::Text(text))) => {
                        ChannelEvent::Frame { conn, text: text.as_str().to_owned() }
                    }
                    Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                        Ok(text) => ChannelEvent::Frame { conn, text },
                        Err(_) => {
                            tracing::warn!(%conn, len = bytes.len(), "ws bridge: dropping non-UTF-8 binary frame");
                            continue;
                        }
                    },
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(%conn, ?frame, "ws bridge: received close frame");
                        let reason = frame
                            .map(|f| f.reason.as_str().to_owned())
                            .filter(|r| !r.is_empty());
                        let _ = events.send(ChannelEvent::Closed { conn, reason }).await;
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(%conn, error = %e, "ws bridge: error");
                        let _ = events
                            .send(ChannelEvent::Closed { conn, reason: Some(e.to_string()) })
                            .await;
                        break;
                    }
                    None => {
                        tracing::info!(%conn, "ws bridge: stream ended");
                        let _ = events.send(ChannelEvent::Closed { conn, reason: None }).await;
                        break;
                    }
                    _ => continue, // Ping/Pong/raw frames
                };
                if events.send(event).await.is_err() {
                    break;
                }
            }
            _ = &mut shutdown_rx => {
                tracing::debug!(%conn, "ws bridge: closing on request");
                let _ = ws.close(None).await;
                break;
            }
        }
    }
}
