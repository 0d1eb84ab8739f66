// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use super::{
    decode_line, encode_line, serve, Frame, Inbound, LineReader, Outbound, Transport,
    TransportError, TransportEvent,
};

async fn frames(input: &[u8], capacity: usize, limit: usize) -> Vec<Frame> {
    let mut reader = LineReader::new(BufReader::with_capacity(capacity, input), limit);
    let mut out = Vec::new();
    loop {
        let frame = reader.next_frame().await.expect("read");
        if frame == Frame::Eof {
            return out;
        }
        out.push(frame);
    }
}

fn line(text: &str) -> Frame {
    Frame::Line(text.as_bytes().to_vec())
}

#[test]
fn decodes_type_and_msg() {
    let message = decode_line(r#"{"type":"combat","msg":"You hit the rat."}"#).expect("decode");
    assert_eq!(message, Inbound::new("combat", "You hit the rat."));
    assert!(!message.is_map());
    assert!(decode_line(r#"{"type":"map","msg":""}"#).expect("decode").is_map());
}

#[test]
fn missing_fields_default_to_empty() {
    assert_eq!(decode_line(r#"{"msg":"hi"}"#).expect("decode"), Inbound::new("", "hi"));
    assert_eq!(decode_line("{}").expect("decode"), Inbound::new("", ""));
}

#[test]
fn rejects_malformed_lines() {
    let err = decode_line("not json").unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)));
    assert!(err.to_string().starts_with("malformed message"));
}

#[test]
fn blank_input_lines_produce_no_command() {
    assert_eq!(Outbound::from_line(""), None);
    assert_eq!(Outbound::from_line("   \t"), None);
    assert_eq!(Outbound::from_line(" look "), Some(Outbound { cmd: " look ".into() }));
}

#[test]
fn encodes_one_record_per_line() {
    let line = encode_line(&Outbound { cmd: "say \"hi\"".into() }).expect("encode");
    assert_eq!(line, "{\"cmd\":\"say \\\"hi\\\"\"}\n");
}

#[tokio::test]
async fn serve_forwards_messages_and_commands() {
    let (client, server) = tokio::io::duplex(1024);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(serve(client, events_tx, commands_rx));

    let (server_read, mut server_write) = tokio::io::split(server);
    server_write
        .write_all(b"{\"type\":\"chat\",\"msg\":\"hello\"}\n\ngarbage\n{\"type\":\"map\",\"msg\":\"x\\n\"}\n")
        .await
        .expect("write");

    assert_eq!(
        events_rx.recv().await,
        Some(TransportEvent::Message(Inbound::new("chat", "hello")))
    );
    assert_eq!(events_rx.recv().await, Some(TransportEvent::Message(Inbound::new("map", "x\n"))));

    commands_tx.send(Outbound { cmd: "look".into() }).expect("send");
    let mut server_lines = BufReader::new(server_read).lines();
    assert_eq!(
        server_lines.next_line().await.expect("read"),
        Some("{\"cmd\":\"look\"}".to_owned())
    );

    drop(server_write);
    drop(server_lines);
    assert_eq!(events_rx.recv().await, Some(TransportEvent::Closed));
    task.await.expect("serve task");
}

#[tokio::test]
async fn line_reader_splits_lines_across_buffer_refills() {
    let input = b"short\r\n\nsecond line\nunterminated";
    assert_eq!(
        frames(input, 3, 64).await,
        vec![line("short"), line(""), line("second line"), line("unterminated")]
    );
}

#[tokio::test]
async fn line_reader_drops_lines_over_the_limit_and_keeps_going() {
    let input = b"ok\nthis line is far too long\nfine\nanother long tail";
    assert_eq!(
        frames(input, 4, 8).await,
        vec![line("ok"), Frame::Oversized(25), line("fine"), Frame::Oversized(17)]
    );
}

#[tokio::test]
async fn invalid_utf8_line_is_skipped_and_the_session_continues() {
    let (client, mut server) = tokio::io::duplex(1024);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (_commands_tx, commands_rx) = mpsc::unbounded_channel::<Outbound>();
    let task = tokio::spawn(serve(client, events_tx, commands_rx));

    server
        .write_all(b"\xff\xfe bad\n{\"type\":\"chat\",\"msg\":\"after\"}\n")
        .await
        .expect("write");
    assert_eq!(
        events_rx.recv().await,
        Some(TransportEvent::Message(Inbound::new("chat", "after")))
    );

    drop(server);
    assert_eq!(events_rx.recv().await, Some(TransportEvent::Closed));
    task.await.expect("serve task");
}

#[tokio::test]
async fn spawned_transport_connects_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("addr").to_string();
    let mut transport = Transport::spawn(&tokio::runtime::Handle::current(), address);

    let (mut socket, _) = listener.accept().await.expect("accept");
    assert!(matches!(transport.recv().await, Some(TransportEvent::Connected { .. })));

    socket.write_all(b"{\"type\":\"social\",\"msg\":\"waves\"}\n").await.expect("write");
    assert_eq!(
        transport.recv().await,
        Some(TransportEvent::Message(Inbound::new("social", "waves")))
    );

    drop(socket);
    assert_eq!(transport.recv().await, Some(TransportEvent::Closed));
    assert_eq!(transport.send(Outbound { cmd: "look".into() }), Err(TransportError::Closed));
}

#[tokio::test]
async fn failed_connect_reports_error_then_closed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("addr").to_string();
    drop(listener);

    let mut transport = Transport::spawn(&tokio::runtime::Handle::current(), address);
    assert!(matches!(transport.recv().await, Some(TransportEvent::Error(_))));
    assert_eq!(transport.recv().await, Some(TransportEvent::Closed));
}
