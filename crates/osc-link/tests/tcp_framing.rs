// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! TCP delivery: length-prefixed records on a real loopback connection.

use std::io::Read;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use osc_link::{
    Address, Bundle, ClientSocketPool, Error, Message, OscArg, SourceServer, TimeTag,
    Transmitter, TransportConfig, MAX_MSG_SIZE,
};

fn transmitter() -> Transmitter {
    Transmitter::builder()
        .config(TransportConfig::default())
        .pool(Arc::new(ClientSocketPool::new()))
        .build()
}

/// Blocking read of one `[length: u32 BE][payload]` record.
fn read_frame<R: Read>(reader: &mut R, max_size: usize) -> Vec<u8> {
    let mut header = [0u8; 4];
    reader.read_exact(&mut header).unwrap();
    let len = u32::from_be_bytes(header) as usize;
    assert!(len <= max_size, "record of {} bytes exceeds {}", len, max_size);
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).unwrap();
    payload
}

fn message(text: &str) -> Message {
    let mut m = Message::new();
    m.add(text);
    m
}

#[test]
fn test_records_are_length_prefixed_and_concatenated() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let reader = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let first = read_frame(&mut stream, MAX_MSG_SIZE);
        let second = read_frame(&mut stream, MAX_MSG_SIZE);
        (first, second)
    });

    let tx = transmitter();
    let mut addr = Address::tcp("127.0.0.1", port.to_string());

    let one = message("one");
    let mut bundle = Bundle::new(TimeTag::new(1, 2));
    bundle.add_message("/two", message("two"));

    let sent = tx.send_message(&mut addr, "/one", &one).unwrap();
    assert_eq!(sent, one.length("/one"));
    tx.send_bundle(&mut addr, &bundle).unwrap();
    assert!(addr.has_socket());

    let (first, second) = reader.join().unwrap();
    assert_eq!(first, one.serialize("/one"));
    assert_eq!(second, bundle.serialize());
}

#[test]
fn test_connection_refused_leaves_no_socket() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let tx = transmitter();
    let mut addr = Address::tcp("127.0.0.1", port.to_string());

    let err = tx
        .send(&mut addr, "/x", "i", [OscArg::Int32(1)])
        .unwrap_err();
    assert!(matches!(err, Error::Connect(_)));
    assert!(!addr.has_socket());
    assert!(addr.is_resolved());
    #[cfg(unix)]
    assert_eq!(addr.error_code(), libc::ECONNREFUSED);
    // OS message resolved on demand
    assert!(addr.last_error().unwrap().message.is_none());
    assert!(!addr.error_message().unwrap().is_empty());
}

#[test]
fn test_reply_on_accepted_stream() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let mut client = TcpStream::connect(("127.0.0.1", port)).unwrap();
    client
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let (server_side, peer) = listener.accept().unwrap();

    let tx = transmitter();
    let mut addr = Address::tcp("127.0.0.1", peer.port().to_string());
    tx.send_from(
        &mut addr,
        Some(&server_side as &dyn SourceServer),
        TimeTag::IMMEDIATE,
        "/reply",
        "T",
        Vec::<OscArg>::new(),
    )
    .unwrap();
    // Borrowed: the address opened nothing of its own
    assert!(!addr.has_socket());

    let mut expected = Message::new();
    expected.add(true);
    let got = read_frame(&mut client, MAX_MSG_SIZE);
    assert_eq!(got, expected.serialize("/reply"));
}
