// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::unreadable_literal)] // Wire byte constants
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! UDP delivery against a real listener on the loopback interface.
//!
//! Validates that:
//! 1. One send produces exactly one datagram with the serializer's bytes
//! 2. Plain sends use the shared client socket, or an owned one when disabled
//! 3. `send_from` replies leave from the server's bound port
//! 4. Lookup failures leave the address unresolved

use std::net::UdpSocket;
use std::sync::Arc;
use std::time::Duration;

use osc_link::{
    Address, ClientSocketPool, Error, Message, OscArg, SourceServer, TimeTag, Transmitter,
    TransportConfig,
};

fn listener() -> (UdpSocket, String) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("bind listener");
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("read timeout");
    let port = socket.local_addr().expect("local addr").port().to_string();
    (socket, port)
}

fn transmitter(config: TransportConfig) -> (Transmitter, Arc<ClientSocketPool>) {
    let pool = Arc::new(ClientSocketPool::new());
    let tx = Transmitter::builder()
        .config(config)
        .pool(Arc::clone(&pool))
        .build();
    (tx, pool)
}

fn recv(socket: &UdpSocket) -> (Vec<u8>, std::net::SocketAddr) {
    let mut buf = [0u8; 2048];
    let (len, from) = socket.recv_from(&mut buf).expect("datagram");
    (buf[..len].to_vec(), from)
}

#[test]
fn test_single_int_message_on_the_wire() {
    let (rx, port) = listener();
    let (tx, _pool) = transmitter(TransportConfig::default());
    let mut addr = Address::udp("127.0.0.1", port);

    let sent = tx
        .send(&mut addr, "/test", "i", [OscArg::Int32(42)])
        .expect("send");

    let (wire, _) = recv(&rx);
    assert_eq!(sent, wire.len());
    // "/test" padded, ",i" padded, 42 big-endian
    assert_eq!(wire, b"/test\0\0\0,i\0\0\0\0\0\x2a".to_vec());

    // Exactly one datagram
    rx.set_nonblocking(true).unwrap();
    let mut buf = [0u8; 64];
    assert!(rx.recv_from(&mut buf).is_err());
    assert_eq!(addr.error_code(), 0);
}

#[test]
fn test_shared_socket_serves_plain_sends() {
    let (rx, port) = listener();
    let (tx, pool) = transmitter(TransportConfig::default());
    let mut a = Address::udp("127.0.0.1", port.clone());
    let mut b = Address::udp("127.0.0.1", port);

    tx.send(&mut a, "/a", "", Vec::<OscArg>::new()).unwrap();
    tx.send(&mut b, "/b", "", Vec::<OscArg>::new()).unwrap();

    let (_, from_a) = recv(&rx);
    let (_, from_b) = recv(&rx);
    assert_eq!(from_a, from_b);
    assert!(pool.is_initialized());
    assert!(!a.has_socket());
    assert!(!b.has_socket());
}

#[test]
fn test_owned_socket_when_sharing_disabled() {
    let (rx, port) = listener();
    let (tx, pool) = transmitter(TransportConfig::default().shared_client_socket(false));
    let mut addr = Address::udp("127.0.0.1", port);

    let message = {
        let mut m = Message::new();
        m.add("hello").add(1.5f32);
        m
    };
    tx.send_message(&mut addr, "/greet", &message).unwrap();
    tx.send_message(&mut addr, "/greet", &message).unwrap();

    let (first, _) = recv(&rx);
    let (second, _) = recv(&rx);
    assert_eq!(first, message.serialize("/greet"));
    assert_eq!(first, second);
    assert!(addr.has_socket());
    assert!(!pool.is_initialized());
}

#[test]
fn test_send_from_uses_server_port() {
    let (rx, port) = listener();
    let server = UdpSocket::bind("127.0.0.1:0").unwrap();
    let (tx, _pool) = transmitter(TransportConfig::default());
    let mut addr = Address::udp("127.0.0.1", port);

    tx.send_from(
        &mut addr,
        Some(&server as &dyn SourceServer),
        TimeTag::IMMEDIATE,
        "/reply",
        "s",
        [OscArg::from("ok")],
    )
    .unwrap();

    let (_, from) = recv(&rx);
    assert_eq!(from, server.local_addr().unwrap());
    assert!(!addr.has_socket());

    // The server socket is still open and usable
    server.send_to(b"ping", rx.local_addr().unwrap()).unwrap();
    assert_eq!(recv(&rx).0, b"ping".to_vec());
}

#[test]
fn test_send_timestamped_carries_timetag() {
    let (rx, port) = listener();
    let (tx, _pool) = transmitter(TransportConfig::default());
    let mut addr = Address::from_url(&format!("osc.udp://127.0.0.1:{}/", port)).unwrap();
    let tt = TimeTag::new(3_900_000_000, 0x8000_0000);

    tx.send_timestamped(&mut addr, tt, "/at", "i", [OscArg::Int32(1)])
        .unwrap();

    let (wire, _) = recv(&rx);
    assert_eq!(&wire[..8], b"#bundle\0");
    assert_eq!(&wire[8..16], &tt.to_bytes());
}

#[test]
fn test_lookup_failure_leaves_address_unresolved() {
    let (tx, _pool) = transmitter(TransportConfig::default());
    let mut addr = Address::udp("osc-link-test.invalid", "9000");

    let err = tx
        .send(&mut addr, "/x", "", Vec::<OscArg>::new())
        .unwrap_err();
    assert!(matches!(err, Error::Resolve { .. } | Error::NoCandidates { .. }));
    assert!(!addr.is_resolved());
    assert!(!addr.has_socket());
    assert!(addr.error_message().is_some());
}

#[test]
fn test_oversize_rejected_before_lookup() {
    let (tx, _pool) = transmitter(TransportConfig::default().max_message_size(32));
    // Would fail resolution if it got that far
    let mut addr = Address::udp("osc-link-test.invalid", "9000");

    let err = tx
        .send(&mut addr, "/blob", "b", [OscArg::Blob(vec![0u8; 64])])
        .unwrap_err();
    assert!(matches!(err, Error::Oversize { max: 32, .. }));
    assert_eq!(addr.error_code(), 99);
}
