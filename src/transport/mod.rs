// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Game server connection.
//!
//! The wire format is one JSON document per line. The server sends `{"type", "msg"}` records
//! and receives `{"cmd"}` records. The connection runs as a tokio task and talks to the UI
//! thread only through channels, so every piece of session state stays on the UI thread.

use std::{fmt, io, mem};

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Message type reserved for map text.
pub const MAP_TYPE: &str = "map";

/// Longest inbound line kept, in bytes. Longer lines are dropped whole.
pub const MAX_LINE_BYTES: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inbound {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub msg: String,
}

impl Inbound {
    pub fn new(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self { kind: kind.into(), msg: msg.into() }
    }

    pub fn is_map(&self) -> bool {
        self.kind == MAP_TYPE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outbound {
    pub cmd: String,
}

impl Outbound {
    /// Command for a submitted input line; blank lines produce nothing.
    pub fn from_line(line: &str) -> Option<Self> {
        if line.trim().is_empty() {
            return None;
        }
        Some(Self { cmd: line.to_owned() })
    }
}

pub fn decode_line(line: &str) -> Result<Inbound, TransportError> {
    serde_json::from_str(line).map_err(|err| TransportError::Decode(err.to_string()))
}

/// JSON record plus the `\n` terminator.
pub fn encode_line(command: &Outbound) -> Result<String, TransportError> {
    let mut line =
        serde_json::to_string(command).map_err(|err| TransportError::Encode(err.to_string()))?;
    line.push('\n');
    Ok(line)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Connected { peer: String },
    Message(Inbound),
    Error(String),
    /// Terminal event; nothing follows it.
    Closed,
}

/// One read from the server stream.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Frame {
    /// Line bytes without the `\n` (or `\r\n`) terminator.
    Line(Vec<u8>),
    /// A line longer than the limit, already discarded; carries its length.
    Oversized(usize),
    Eof,
}

/// Splits a byte stream into `\n`-terminated lines without ever buffering more than
/// `limit` bytes of one line.
///
/// State lives in the struct and every await is `fill_buf`, so a pending `next_frame` can be
/// dropped by `select!` and resumed later without losing bytes.
struct LineReader<R> {
    inner: R,
    limit: usize,
    line: Vec<u8>,
    // Bytes of the current line thrown away after it outgrew `limit`.
    skipped: usize,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    fn new(inner: R, limit: usize) -> Self {
        Self { inner, limit, line: Vec::new(), skipped: 0 }
    }

    async fn next_frame(&mut self) -> io::Result<Frame> {
        loop {
            let available = self.inner.fill_buf().await?;
            if available.is_empty() {
                // An unterminated last line still counts.
                if self.skipped > 0 {
                    return Ok(Frame::Oversized(mem::take(&mut self.skipped)));
                }
                if self.line.is_empty() {
                    return Ok(Frame::Eof);
                }
                return Ok(self.take_line());
            }

            let newline = available.iter().position(|byte| *byte == b'\n');
            let chunk = &available[..newline.unwrap_or(available.len())];
            if self.skipped > 0 || self.line.len() + chunk.len() > self.limit {
                self.skipped += self.line.len() + chunk.len();
                self.line.clear();
            } else {
                self.line.extend_from_slice(chunk);
            }

            let used = newline.map_or(available.len(), |idx| idx + 1);
            self.inner.consume(used);

            if newline.is_some() {
                if self.skipped > 0 {
                    return Ok(Frame::Oversized(mem::take(&mut self.skipped)));
                }
                return Ok(self.take_line());
            }
        }
    }

    fn take_line(&mut self) -> Frame {
        if self.line.last() == Some(&b'\r') {
            self.line.pop();
        }
        Frame::Line(mem::take(&mut self.line))
    }
}

/// UI-side ends of a running connection task.
#[derive(Debug)]
pub struct Transport {
    commands: mpsc::UnboundedSender<Outbound>,
    events: mpsc::UnboundedReceiver<TransportEvent>,
}

impl Transport {
    /// Starts connecting to `address` on `runtime`. Failures arrive as events.
    pub fn spawn(runtime: &tokio::runtime::Handle, address: String) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        runtime.spawn(connect(address, events_tx, commands_rx));
        Self { commands: commands_tx, events: events_rx }
    }

    pub fn send(&self, command: Outbound) -> Result<(), TransportError> {
        self.commands.send(command).map_err(|_| TransportError::Closed)
    }

    /// Next pending event without blocking.
    pub fn try_recv(&mut self) -> Option<TransportEvent> {
        self.events.try_recv().ok()
    }

    pub async fn recv(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }
}

async fn connect(
    address: String,
    events: mpsc::UnboundedSender<TransportEvent>,
    commands: mpsc::UnboundedReceiver<Outbound>,
) {
    info!(%address, "connecting");
    let stream = match TcpStream::connect(&address).await {
        Ok(stream) => stream,
        Err(err) => {
            warn!(%address, error = %err, "connection failed");
            let _ = events.send(TransportEvent::Error(format!("connect {address}: {err}")));
            let _ = events.send(TransportEvent::Closed);
            return;
        }
    };

    let peer = stream.peer_addr().map(|addr| addr.to_string()).unwrap_or(address);
    info!(%peer, "connected");
    let _ = events.send(TransportEvent::Connected { peer });
    serve(stream, events, commands).await;
}

/// Pumps one established stream until either side goes away. Always ends with
/// [`TransportEvent::Closed`]. No reconnect is attempted.
pub async fn serve<S>(
    stream: S,
    events: mpsc::UnboundedSender<TransportEvent>,
    mut commands: mpsc::UnboundedReceiver<Outbound>,
) where
    S: AsyncRead + AsyncWrite,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = LineReader::new(BufReader::new(reader), MAX_LINE_BYTES);

    loop {
        tokio::select! {
            frame = lines.next_frame() => match frame {
                Ok(Frame::Line(bytes)) => {
                    let line = match String::from_utf8(bytes) {
                        Ok(line) => line,
                        Err(err) => {
                            warn!(error = %err, "dropping line that is not UTF-8");
                            continue;
                        }
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match decode_line(&line) {
                        Ok(message) => {
                            debug!(kind = %message.kind, "message");
                            if events.send(TransportEvent::Message(message)).is_err() {
                                break;
                            }
                        }
                        Err(err) => warn!(error = %err, "dropping malformed message"),
                    }
                }
                Ok(Frame::Oversized(len)) => {
                    warn!(len, limit = MAX_LINE_BYTES, "dropping oversized line");
                }
                Ok(Frame::Eof) => {
                    info!("server closed the connection");
                    break;
                }
                Err(err) => {
                    warn!(error = %err, "read failed");
                    let _ = events.send(TransportEvent::Error(err.to_string()));
                    break;
                }
            },
            command = commands.recv() => {
                let Some(command) = command else {
                    break;
                };
                let line = match encode_line(&command) {
                    Ok(line) => line,
                    Err(err) => {
                        warn!(error = %err, "dropping command");
                        continue;
                    }
                };
                if let Err(err) = writer.write_all(line.as_bytes()).await {
                    warn!(error = %err, "write failed");
                    let _ = events.send(TransportEvent::Error(err.to_string()));
                    break;
                }
            }
        }
    }

    let _ = events.send(TransportEvent::Closed);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Decode(String),
    Encode(String),
    Closed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(reason) => write!(f, "malformed message: {reason}"),
            Self::Encode(reason) => write!(f, "cannot encode command: {reason}"),
            Self::Closed => f.write_str("connection closed"),
        }
    }
}

impl std::error::Error for TransportError {}

#[cfg(test)]
mod tests;
