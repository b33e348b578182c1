// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Downstream use of the `test-util` doubles.
//!
//! Validates that:
//! 1. A transmitter built from the exported mocks never touches the network
//! 2. A scripted TCP write failure is resent once on a fresh channel

use std::io;
use std::sync::Arc;

use osc_link::transport::channel::mock::{MockProvider, OpenScript};
use osc_link::transport::StaticResolver;
use osc_link::{Address, ClientSocketPool, Message, OscArg, Transmitter, TransportConfig};

fn transmitter() -> (Transmitter, Arc<MockProvider>, Arc<StaticResolver>) {
    let provider = Arc::new(MockProvider::new());
    let resolver = Arc::new(StaticResolver::new(vec!["192.0.2.7:9000".parse().unwrap()]));
    let tx = Transmitter::builder()
        .config(TransportConfig::default().shared_client_socket(false))
        .pool(Arc::new(ClientSocketPool::new()))
        .resolver(resolver.clone())
        .provider(provider.clone())
        .build();
    (tx, provider, resolver)
}

#[test]
fn test_udp_send_through_mock_channel() {
    let (tx, provider, resolver) = transmitter();
    let mut addr = Address::udp("synth.local", "9000");

    let sent = tx
        .send(&mut addr, "/note", "if", [OscArg::Int32(60), OscArg::Float(0.5)])
        .unwrap();

    let mut expected = Message::new();
    expected.add(60i32).add(0.5f32);
    let expected = expected.serialize("/note");
    assert_eq!(sent, expected.len());
    assert_eq!(resolver.calls(), 1);
    assert_eq!(provider.opened()[0].writes(), vec![expected]);
}

#[test]
fn test_tcp_write_failure_resent_once() {
    let (tx, provider, _) = transmitter();
    provider.push(OpenScript::SendFails(io::ErrorKind::BrokenPipe));
    let mut addr = Address::tcp("synth.local", "9000");

    tx.send(&mut addr, "/ping", "", Vec::<OscArg>::new())
        .unwrap();

    let opened = provider.opened();
    assert_eq!(provider.attempts(), 2);
    assert!(opened[0].is_closed());
    assert!(opened[0].writes().is_empty());
    assert_eq!(opened[1].writes().len(), 1);
    assert_eq!(addr.error_code(), 0);
}
