// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal HTTP/1.1 GET over TCP.
//!
//! Reads responses using Content-Length framing, falling back to reading
//! until EOF (the request asks for `Connection: close`).

use super::StatusError;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use url::{Position, Url};

pub(super) struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Connect, send, and read with one timeout covering the entire exchange.
pub(super) async fn get(url: &Url, timeout: Duration) -> Result<HttpResponse, StatusError> {
    let host = url.host_str().unwrap_or_default();
    let host_header = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    let addr = format!("{host}:{}", url.port_or_known_default().unwrap_or(80));
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nAccept: application/json\r\nConnection: close\r\n\r\n",
        &url[Position::BeforePath..],
        host_header
    );
    tokio::time::timeout(timeout, send_request(&addr, &request))
        .await
        .map_err(|_| StatusError::Timeout(timeout))?
}

async fn send_request(addr: &str, request: &str) -> Result<HttpResponse, StatusError> {
    let mut stream = TcpStream::connect(addr)
        .await
        .map_err(|e| StatusError::Transport(format!("connect to {addr} failed: {e}")))?;
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|e| StatusError::Transport(format!("write failed: {e}")))?;

    let mut reader = BufReader::new(&mut stream);
    read_http_response(&mut reader).await
}

async fn read_http_response<R: tokio::io::AsyncRead + Unpin>(
    reader: &mut BufReader<R>,
) -> Result<HttpResponse, StatusError> {
    let mut status_line = String::new();
    reader
        .read_line(&mut status_line)
        .await
        .map_err(|e| StatusError::Transport(format!("read status failed: {e}")))?;

    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| StatusError::Transport(format!("bad status line: {:?}", status_line.trim())))?;

    // Headers, extracting Content-Length (case-insensitive)
    let mut content_length: Option<usize> = None;
    loop {
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .await
            .map_err(|e| StatusError::Transport(format!("read header failed: {e}")))?;
        if line == "\r\n" || line == "\n" || line.is_empty() {
            break;
        }
        let line_lower = line.to_ascii_lowercase();
        if let Some(val) = line_lower.strip_prefix("content-length:") {
            content_length = val.trim().parse().ok();
        }
    }

    let mut buf = Vec::new();
    match content_length {
        Some(len) => {
            buf.resize(len, 0);
            reader
                .read_exact(&mut buf)
                .await
                .map_err(|e| StatusError::Transport(format!("read body failed: {e}")))?;
        }
        None => {
            reader
                .read_to_end(&mut buf)
                .await
                .map_err(|e| StatusError::Transport(format!("read body failed: {e}")))?;
        }
    }

    Ok(HttpResponse { status, body: String::from_utf8_lossy(&buf).into_owned() })
}
