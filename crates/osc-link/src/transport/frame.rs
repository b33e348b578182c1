// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Length-prefix framing for OSC over TCP.
//!
//! TCP is a stream protocol without message boundaries. Each serialized OSC
//! message or bundle is preceded by its length:
//!
//! ```text
//! +----------------+-------------------------+
//! | Length (4B BE) | OSC message or bundle   |
//! +----------------+-------------------------+
//! ```
//!
//! The length counts payload bytes only. Records are simply concatenated on
//! the stream. UDP and Unix-domain datagrams carry the payload unframed.

use crate::config::TCP_FRAME_HEADER_SIZE;

/// Frame one payload: `[length: u32 BE][payload]`.
#[must_use]
pub fn encode(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(TCP_FRAME_HEADER_SIZE + payload.len());
    encode_into(payload, &mut frame);
    frame
}

/// Append one framed payload to `buf`.
pub fn encode_into(payload: &[u8], buf: &mut Vec<u8>) {
    let len = payload.len() as u32;
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(payload);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_simple() {
        let frame = encode(b"hello");
        assert_eq!(frame.len(), 4 + 5);
        assert_eq!(&frame[..4], &5u32.to_be_bytes());
        assert_eq!(&frame[4..], b"hello");
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(b""), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_concatenated_records() {
        let mut stream = Vec::new();
        encode_into(b"first", &mut stream);
        encode_into(b"second!", &mut stream);

        assert_eq!(&stream[..4], &5u32.to_be_bytes());
        assert_eq!(&stream[4..9], b"first");
        assert_eq!(&stream[9..13], &7u32.to_be_bytes());
        assert_eq!(&stream[13..], b"second!");
    }
}
