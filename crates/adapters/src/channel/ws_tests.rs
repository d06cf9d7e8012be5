// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::endpoint::Endpoint;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;

const FRAME: &str = r#"{"status":"processing","progress":25}"#;

async fn recv(rx: &mut mpsc::Receiver<ChannelEvent>) -> ChannelEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for channel event")
        .expect("channel closed")
}

#[tokio::test]
async fn ws_channel_forwards_frames_then_reports_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (path_tx, path_rx) = oneshot::channel();
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let callback = move |req: &Request, resp: Response| {
            let _ = path_tx.send(req.uri().path().to_string());
            Ok::<_, ErrorResponse>(resp)
        };
        let mut ws = tokio_tungstenite::accept_hdr_async(socket, callback).await.unwrap();
        ws.send(Message::Text(FRAME.into())).await.unwrap();
        ws.close(Some(CloseFrame { code: CloseCode::Normal, reason: "job finished".into() }))
            .await
            .unwrap();
        // Drain until the client acknowledges the close
        while ws.next().await.is_some() {}
    });

    let channel = WsLiveChannel::new(
        Endpoint::parse(&format!("http://{addr}")).unwrap(),
        Duration::from_secs(5),
    );
    let (tx, mut rx) = mpsc::channel(8);
    let _handle = channel.open(&JobId::new("J1"), ConnectionId(1), tx);

    assert_eq!(recv(&mut rx).await, ChannelEvent::Opened { conn: ConnectionId(1) });
    assert_eq!(
        recv(&mut rx).await,
        ChannelEvent::Frame { conn: ConnectionId(1), text: FRAME.to_string() }
    );
    assert_eq!(
        recv(&mut rx).await,
        ChannelEvent::Closed { conn: ConnectionId(1), reason: Some("job finished".into()) }
    );
    assert_eq!(path_rx.await.unwrap(), "/ws/J1");
}

#[tokio::test]
async fn ws_channel_requests_job_id_as_one_encoded_segment() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (target_tx, target_rx) = oneshot::channel();
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let callback = move |req: &Request, resp: Response| {
            let _ = target_tx.send(req.uri().to_string());
            Ok::<_, ErrorResponse>(resp)
        };
        let mut ws = tokio_tungstenite::accept_hdr_async(socket, callback).await.unwrap();
        while ws.next().await.is_some() {}
    });

    let channel = WsLiveChannel::new(
        Endpoint::parse(&format!("http://{addr}")).unwrap(),
        Duration::from_secs(5),
    );
    let (tx, mut rx) = mpsc::channel(8);
    let _handle = channel.open(&JobId::new("book 1/../x?y"), ConnectionId(4), tx);

    assert_eq!(recv(&mut rx).await, ChannelEvent::Opened { conn: ConnectionId(4) });
    let target = target_rx.await.unwrap();
    let id = target.strip_prefix("/ws/").unwrap();
    assert!(!id.is_empty() && !id.contains(['/', '?', ' ']), "{target}");
}

#[tokio::test]
async fn ws_channel_reports_unusable_job_id_as_closed() {
    let channel = WsLiveChannel::new(
        Endpoint::parse("http://127.0.0.1:1").unwrap(),
        Duration::from_secs(5),
    );
    let (tx, mut rx) = mpsc::channel(8);
    let _handle = channel.open(&JobId::new("."), ConnectionId(5), tx);

    match recv(&mut rx).await {
        ChannelEvent::Closed { conn, reason } => {
            assert_eq!(conn, ConnectionId(5));
            assert!(reason.unwrap().contains("path segment"));
        }
        other => panic!("expected Closed, got {other:?}"),
    }
}

#[tokio::test]
async fn ws_channel_reports_refused_connection_as_closed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let channel = WsLiveChannel::new(
        Endpoint::parse(&format!("http://{addr}")).unwrap(),
        Duration::from_secs(5),
    );
    let (tx, mut rx) = mpsc::channel(8);
    let _handle = channel.open(&JobId::new("J1"), ConnectionId(3), tx);

    match recv(&mut rx).await {
        ChannelEvent::Closed { conn, reason } => {
            assert_eq!(conn, ConnectionId(3));
            assert!(reason.is_some());
        }
        other => panic!("expected Closed, got {other:?}"),
    }
}

#[tokio::test]
async fn closing_handle_stops_event_delivery() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (closed_tx, closed_rx) = oneshot::channel();
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(socket).await.unwrap();
        ws.send(Message::Text(FRAME.into())).await.unwrap();
        // Expect the client's close frame
        let mut saw_close = false;
        while let Some(Ok(msg)) = ws.next().await {
            if matches!(msg, Message::Close(_)) {
                saw_close = true;
                break;
            }
        }
        let _ = closed_tx.send(saw_close);
    });

    let channel = WsLiveChannel::new(
        Endpoint::parse(&format!("http://{addr}")).unwrap(),
        Duration::from_secs(5),
    );
    let (tx, mut rx) = mpsc::channel(8);
    let handle = channel.open(&JobId::new("J1"), ConnectionId(2), tx);

    assert_eq!(recv(&mut rx).await, ChannelEvent::Opened { conn: ConnectionId(2) });
    assert!(matches!(recv(&mut rx).await, ChannelEvent::Frame { .. }));

    handle.close();

    assert!(closed_rx.await.unwrap(), "server should see a close frame");
    // The bridge exits without reporting Closed for a requested shutdown
    let next = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
    assert_eq!(next, None);
}

#[test]
fn connection_id_display() {
    assert_eq!(ConnectionId(7).to_string(), "conn-7");
}

#[yare::parameterized(
    opened = { ChannelEvent::Opened { conn: ConnectionId(1) } },
    frame  = { ChannelEvent::Frame { conn: ConnectionId(1), text: "{}".into() } },
    closed = { ChannelEvent::Closed { conn: ConnectionId(1), reason: None } },
)]
fn event_reports_its_connection(event: ChannelEvent) {
    assert_eq!(event.conn(), ConnectionId(1));
}

#[tokio::test]
async fn fake_channel_delivers_events_to_open_connection() {
    let fake = FakeLiveChannel::new();
    let (tx, mut rx) = mpsc::channel(8);
    let _handle = fake.open(&JobId::new("J1"), ConnectionId(1), tx);

    assert!(fake.emit(ChannelEvent::Opened { conn: ConnectionId(1) }).await);
    assert!(!fake.emit(ChannelEvent::Opened { conn: ConnectionId(9) }).await);
    assert_eq!(recv(&mut rx).await, ChannelEvent::Opened { conn: ConnectionId(1) });
    assert_eq!(
        fake.opens(),
        vec![OpenCall { job_id: JobId::new("J1"), conn: ConnectionId(1) }]
    );
}

#[tokio::test]
async fn fake_channel_tracks_closed_handles() {
    let fake = FakeLiveChannel::new();
    let (tx, _rx) = mpsc::channel(8);
    let first = fake.open(&JobId::new("J1"), ConnectionId(1), tx.clone());
    let _second = fake.open(&JobId::new("J1"), ConnectionId(2), tx);

    assert!(!fake.is_closed(ConnectionId(1)));
    drop(first);
    assert!(fake.is_closed(ConnectionId(1)));
    assert!(!fake.is_closed(ConnectionId(2)));
}
