// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OSC bundle container.
//!
//! # Wire Format
//!
//! ```text
//! +-------------+-------------+------------------+------------------+----
//! | "#bundle\0" | TimeTag (8) | size (4B BE)     | element bytes    | ...
//! +-------------+-------------+------------------+------------------+----
//! ```
//!
//! Each element is a serialized message or a nested bundle.

use super::message::Message;
use crate::types::{TimeTag, TIMETAG_SIZE};

/// Bundle header: "#bundle" plus NUL.
pub const BUNDLE_TAG: &[u8; 8] = b"#bundle\0";

/// One element of a bundle.
#[derive(Clone, Debug, PartialEq)]
pub enum BundleElement {
    /// Message together with the path it is addressed to.
    Message {
        /// OSC path.
        path: String,
        /// Message arguments.
        message: Message,
    },
    /// Nested bundle.
    Bundle(Bundle),
}

impl BundleElement {
    fn length(&self) -> usize {
        match self {
            BundleElement::Message { path, message } => message.length(path),
            BundleElement::Bundle(b) => b.length(),
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            BundleElement::Message { path, message } => {
                out.extend_from_slice(&message.serialize(path));
            }
            BundleElement::Bundle(b) => b.write(out),
        }
    }
}

/// Messages (and nested bundles) delivered together under one TimeTag.
#[derive(Clone, Debug, PartialEq)]
pub struct Bundle {
    timetag: TimeTag,
    elements: Vec<BundleElement>,
}

impl Bundle {
    /// Create an empty bundle.
    #[must_use]
    pub fn new(timetag: TimeTag) -> Self {
        Self {
            timetag,
            elements: Vec::new(),
        }
    }

    /// Append a message addressed to `path`.
    pub fn add_message(&mut self, path: impl Into<String>, message: Message) -> &mut Self {
        self.elements.push(BundleElement::Message {
            path: path.into(),
            message,
        });
        self
    }

    /// Append a nested bundle.
    pub fn add_bundle(&mut self, bundle: Bundle) -> &mut Self {
        self.elements.push(BundleElement::Bundle(bundle));
        self
    }

    /// Bundle TimeTag.
    #[must_use]
    pub fn timetag(&self) -> TimeTag {
        self.timetag
    }

    /// Elements in order.
    #[must_use]
    pub fn elements(&self) -> &[BundleElement] {
        &self.elements
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when the bundle has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialized length.
    #[must_use]
    pub fn length(&self) -> usize {
        BUNDLE_TAG.len()
            + TIMETAG_SIZE
            + self.elements.iter().map(|e| 4 + e.length()).sum::<usize>()
    }

    /// Serialize into a new buffer of exactly [`length`](Self::length) bytes.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.length());
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(BUNDLE_TAG);
        out.extend_from_slice(&self.timetag.to_bytes());
        for element in &self.elements {
            out.extend_from_slice(&(element.length() as u32).to_be_bytes());
            element.write(out);
        }
    }
}
